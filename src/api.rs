//! Public surface: the multi-level correction driver.

use std::ffi::OsStr;
use std::path::Path;

use tracing::debug;

use crate::dictionary::Dictionary;
use crate::error::Result;
use crate::format::{self, Level};
use crate::resolver::Resolvers;
use crate::tree::{NodeId, Tree};

/// An ordered chain of dictionaries applied to one line of text at a time.
///
/// Construction resolves each path's format from its file extension and
/// loads the dictionary; all load failures surface here. After that the
/// corrector is read-only and [`execute`](Corrector::execute) can be called
/// any number of times.
///
/// Dictionaries apply in the given order, each at its own level; within one
/// dictionary, rules apply in declaration order.
#[derive(Debug)]
pub struct Corrector {
    dictionaries: Vec<(Dictionary, Level)>,
}

impl Corrector {
    /// Build a corrector over dictionaries that need no side modules.
    pub fn new<I, P>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self::with_resolvers(paths, &Resolvers::default())
    }

    /// Build a corrector, resolving side-module references through `resolvers`.
    pub fn with_resolvers<I, P>(paths: I, resolvers: &Resolvers) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut dictionaries = Vec::new();
        for path in paths {
            dictionaries.push(Self::load(path.as_ref(), resolvers)?);
        }
        debug!(dictionaries = dictionaries.len(), "corrector ready");
        Ok(Self { dictionaries })
    }

    fn load(path: &Path, resolvers: &Resolvers) -> Result<(Dictionary, Level)> {
        let extension = path.extension().and_then(OsStr::to_str).unwrap_or_default();
        let depends = format::format(extension)?;
        let dictionary = Dictionary::load(path, depends, resolvers)?;
        Ok((dictionary, depends.level))
    }

    /// Run every dictionary over `line` and return the corrected text.
    ///
    /// A trailing linefeed does not survive a sentence split and rejoin.
    pub fn execute(&self, line: &str) -> String {
        let mut tree = Tree::line(line);
        let root = tree.root();
        for (dictionary, level) in &self.dictionaries {
            match level {
                Level::Line => dictionary.apply(&mut tree, root),
                Level::Sent => {
                    for sentence in tree.children(root) {
                        dictionary.apply(&mut tree, sentence);
                    }
                }
                Level::Word => {
                    for word in line_words(&mut tree, root) {
                        dictionary.apply(&mut tree, word);
                    }
                }
                Level::Part => {
                    // parts are read only after the word pass, so a word
                    // rewrite re-segments before its parts are visited
                    let words = line_words(&mut tree, root);
                    for &word in &words {
                        dictionary.apply(&mut tree, word);
                    }
                    for word in words {
                        for part in tree.children(word) {
                            dictionary.apply(&mut tree, part);
                        }
                    }
                }
            }
        }
        tree.text(root).to_string()
    }
}

fn line_words(tree: &mut Tree, root: NodeId) -> Vec<NodeId> {
    let mut words = Vec::new();
    for sentence in tree.children(root) {
        words.extend(tree.children(sentence));
    }
    words
}
