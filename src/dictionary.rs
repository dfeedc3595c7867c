//! Dictionaries: ordered rule lists with a candidate lookup strategy.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::{debug, trace};

use crate::error::Result;
use crate::format::{Depends, DictKind, RuleKind};
use crate::indexer::{Indexer, KEY_LENGTH};
use crate::resolver::{Resolvers, SideModule};
use crate::rule::{Rule, Target};
use crate::tree::{NodeId, Tree};

/// How candidate rules are shortlisted for a node.
#[derive(Debug)]
enum Lookup {
    /// Probe every rule.
    Scan,
    /// Key index over the node's own text.
    Indexed(Indexer),
    /// Key index over the node's word children; the node itself is a
    /// sentence whose rule keys live at word granularity.
    Dicx(Indexer),
}

#[derive(Debug)]
pub(crate) struct Dictionary {
    /// Declaration order from the loader; immutable after construction.
    rules: Vec<Rule>,
    lookup: Lookup,
}

impl Dictionary {
    /// Load rules from `path` through the format's component makers.
    pub(crate) fn load(path: &Path, depends: &Depends, resolvers: &Resolvers) -> Result<Self> {
        let side = SideModule::new(path, resolvers);
        let mut rules = Vec::new();
        for row in depends.load.loader.rows(path)? {
            let (pattern_data, target_data) = (depends.load.prepare)(&row);
            let pattern = (depends.pattern_maker)(pattern_data.first().map(String::as_str).unwrap_or_default())?;
            let target = match depends.target_maker {
                Some(make) => make(&target_data, &side)?,
                None => Target::Literal(target_data.first().cloned().unwrap_or_default()),
            };
            rules.push(match (depends.rule, target) {
                (RuleKind::Resolved, Target::Resolver(resolver)) => Rule::Resolved { pattern, resolver },
                (_, target) => Rule::Literal { pattern, target },
            });
        }

        let lookup = match depends.dict {
            DictKind::Plain => Lookup::Scan,
            DictKind::Indexed | DictKind::Dicx => {
                let mut indexer = Indexer::new(KEY_LENGTH);
                for (order_no, rule) in rules.iter().enumerate() {
                    if let Some(entry) = rule.pattern().index_entry() {
                        indexer.add(entry, order_no);
                    }
                }
                indexer.freeze()?;
                match depends.dict {
                    DictKind::Dicx => Lookup::Dicx(indexer),
                    _ => Lookup::Indexed(indexer),
                }
            }
        };

        debug!(path = %path.display(), rules = rules.len(), "dictionary loaded");
        Ok(Self { rules, lookup })
    }

    /// Candidate rule indices for `node`, ascending. Computed once per node:
    /// a substitution never refreshes the shortlist, which keeps a rewrite
    /// from feeding new keys to the rules after it within the same pass.
    fn candidates(&self, tree: &mut Tree, node: NodeId) -> Vec<usize> {
        match &self.lookup {
            Lookup::Scan => (0..self.rules.len()).collect(),
            Lookup::Indexed(indexer) => indexer.lookup(tree.text(node)),
            Lookup::Dicx(indexer) => {
                let mut hits = BTreeSet::new();
                for word in tree.children(node) {
                    hits.extend(indexer.lookup(tree.text(word)));
                }
                hits.into_iter().collect()
            }
        }
    }

    /// Apply every matching rule to `node` in declaration order. Each
    /// candidate is re-tested against the node's *current* text right before
    /// it fires, so earlier rewrites are visible to later rules.
    pub(crate) fn apply(&self, tree: &mut Tree, node: NodeId) {
        for order_no in self.candidates(tree, node) {
            let rule = &self.rules[order_no];
            let probe = tree.text(node).to_string();
            if rule.pattern().matches(&probe) {
                trace!(rule = order_no, probe = %probe, "applying rule");
                rule.apply(tree, node);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format;
    use std::io::Write;

    fn write_dict(extension: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(&format!(".{extension}")).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn load(extension: &str, content: &str) -> Dictionary {
        let file = write_dict(extension, content);
        let depends = format::format(extension).unwrap();
        Dictionary::load(file.path(), depends, &Resolvers::default()).unwrap()
    }

    fn apply_to_line(dictionary: &Dictionary, line: &str) -> String {
        let mut tree = Tree::line(line);
        let root = tree.root();
        dictionary.apply(&mut tree, root);
        tree.text(root).to_string()
    }

    #[test]
    fn later_rules_see_earlier_rewrites() {
        // both rules are shortlisted from the original text; the second is
        // re-tested against (and applied to) the first one's output
        let dictionary = load("dic", "аа=ба\n*а=х\n");
        assert_eq!(apply_to_line(&dictionary, "аа"), "бх");
    }

    #[test]
    fn shortlist_is_fixed_before_the_first_rewrite() {
        // the rewrite produces the second rule's key, but candidates were
        // already chosen from the original text
        let dictionary = load("dic", "аа=бб\nбб=вв\n");
        assert_eq!(apply_to_line(&dictionary, "аа"), "бб");
    }

    #[test]
    fn indexed_and_scan_lookups_agree() {
        let rules = "слово=слoво\n*вка=вкá\nпри*=при́\n";
        let indexed = load("dic", rules);

        let file = write_dict("dic", rules);
        let mut plain = *format::format("dic").unwrap();
        plain.dict = DictKind::Plain;
        let plain = Dictionary::load(file.path(), &plain, &Resolvers::default()).unwrap();

        for probe in ["слово", "приставка", "поставка", "мимо"] {
            assert_eq!(apply_to_line(&indexed, probe), apply_to_line(&plain, probe), "probe `{probe}`");
        }
    }

    #[test]
    fn dicx_candidates_come_from_word_children() {
        let dictionary = load("dicx", "по-*=по *\n");
        let mut tree = Tree::line("по-научному подходу");
        let root = tree.root();
        let sentence = tree.children(root)[0];
        dictionary.apply(&mut tree, sentence);
        assert_eq!(tree.text(root), "по научному подходу");
    }

    #[test]
    fn dicx_shortlist_is_not_refreshed_after_rewrites() {
        // the first rewrite produces the second rule's key, but candidates
        // were already fixed from the original words
        let dictionary = load("dicx", "абв=где\nгде=ёжз\n");
        let mut tree = Tree::line("абв");
        let root = tree.root();
        let sentence = tree.children(root)[0];
        dictionary.apply(&mut tree, sentence);
        assert_eq!(tree.text(root), "где");
    }

    #[test]
    fn malformed_dicx_rule_aborts_the_load() {
        let file = write_dict("dicx", "...=пусто\n");
        let depends = format::format("dicx").unwrap();
        let error = Dictionary::load(file.path(), depends, &Resolvers::default()).unwrap_err();
        assert!(matches!(error, crate::error::Error::PatternMalformed { .. }));
    }

    #[test]
    fn resolved_rules_need_their_side_module() {
        let file = write_dict("extw", "");
        let depends = format::format("extw").unwrap();
        let error = Dictionary::load(file.path(), depends, &Resolvers::default()).unwrap_err();
        assert!(matches!(error, crate::error::Error::ResolverModuleMissing { .. }));
    }
}
