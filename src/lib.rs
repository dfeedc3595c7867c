//! Rule-dictionary text correction at four granularities.
//!
//! The crate applies ordered sets of text-rewrite rules ("dictionaries") to
//! input lines. Each dictionary is loaded from a file whose extension selects
//! a *format*: how rules are parsed, how patterns match, how replacements are
//! computed, and whether the dictionary runs per line, sentence, word, or
//! intra-word part. The flagship use case is correcting and annotating
//! Russian prose (inserting stress marks, undoing hyphenation quirks), but
//! nothing in the engine is specific to a text type.
//!
//! ## How a line flows through
//!
//! ```text
//! input line ── Tree::line ─────────────── (tree.rs)
//!                  │
//!   per dictionary, in user order:
//!                  │
//!       node stream at the format's level   (api.rs)
//!                  │
//!       Dictionary::apply per node          (dictionary.rs)
//!         - Indexer shortlists candidates   (indexer.rs)
//!         - each pattern re-tests the text  (pattern.rs)
//!         - matching rules rewrite the node (rule.rs)
//!                  │
//!       mutations bubble up through the tree
//!                  │
//! corrected line ── Tree::text(root)
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use accentor::Corrector;
//!
//! # fn main() -> accentor::Result<()> {
//! let corrector = Corrector::new(["ru/stress.dic", "ru/unhyphen.dicx"])?;
//! let fixed = corrector.execute("по-научному подходу");
//! # Ok(())
//! # }
//! ```
//!
//! Dictionaries that reference side modules (`exts`/`extw` formats, `@name`
//! regex targets) take their resolvers from a pre-registered [`Resolvers`]
//! registry passed to [`Corrector::with_resolvers`].

#[macro_use]
mod macros;

mod api;
mod dictionary;
mod error;
mod format;
mod indexer;
mod loader;
mod pattern;
mod resolver;
mod rule;
mod segment;
mod tree;

pub use api::Corrector;
pub use error::{Error, Result};
pub use resolver::{MatchFn, NodeResolver, Resolvers};
