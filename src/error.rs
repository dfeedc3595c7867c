//! Crate-level error type.
//!
//! All variants surface at dictionary load / `Corrector` construction and are
//! fatal for the load in progress. Once a `Corrector` is built, pattern
//! matching and replacement are total functions; the only runtime code that
//! may fail is user resolvers, and those failures are the resolver's own.
//! The core never catches them.

use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The dictionary file extension has no registered format.
    #[error("no format registered for extension `{0}`")]
    FormatUnknown(String),

    /// A whole-word template produced no token usable as an index key.
    #[error("pattern `{pattern}` yields no key token")]
    PatternMalformed { pattern: String },

    /// The pattern text did not compile as a regular expression.
    #[error("pattern `{pattern}` is not a valid regex")]
    PatternRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// `Indexer::freeze` was called twice. Programmer error.
    #[error("indexer is already frozen")]
    IndexerFrozen,

    /// A dictionary requires a side module that was never registered.
    #[error("no resolver module registered under `{module}`")]
    ResolverModuleMissing { module: String },

    /// The side module is registered but lacks the requested entry.
    #[error("resolver module `{module}` has no entry `{name}`")]
    ResolverFnMissing { module: String, name: String },

    #[error("failed to read dictionary `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The sqlite loader configuration document did not parse.
    #[cfg(feature = "sqlite")]
    #[error("invalid loader configuration `{path}`")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[cfg(feature = "sqlite")]
    #[error("sqlite failure while loading dictionary `{path}`")]
    Sqlite {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
}
