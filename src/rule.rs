//! Rules: a pattern bound to its replacement side.

use std::sync::Arc;

use crate::pattern::Pattern;
use crate::resolver::{MatchFn, NodeResolver};
use crate::tree::{NodeId, Tree};

/// Replacement side of a rule.
pub(crate) enum Target {
    /// Fixed replacement text (may carry `$N` capture references for regex
    /// patterns).
    Literal(String),
    /// Per-match replacement function, bound from a side module (`@name`).
    ByMatch(Arc<MatchFn>),
    /// Node-level resolver, bound from a side module (`corrector`).
    Resolver(Arc<dyn NodeResolver>),
}

impl std::fmt::Debug for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            Target::ByMatch(_) => f.write_str("ByMatch(<function>)"),
            Target::Resolver(_) => f.write_str("Resolver(<function>)"),
        }
    }
}

/// A pattern plus how its replacement is produced.
#[derive(Debug)]
pub(crate) enum Rule {
    /// Rewrites the node through the pattern's replacement.
    Literal { pattern: Pattern, target: Target },
    /// Asks the resolver first and rewrites only when it returns a value.
    Resolved { pattern: Pattern, resolver: Arc<dyn NodeResolver> },
}

impl Rule {
    pub(crate) fn pattern(&self) -> &Pattern {
        match self {
            Rule::Literal { pattern, .. } | Rule::Resolved { pattern, .. } => pattern,
        }
    }

    /// Mutate `node` in place. The caller has already confirmed the pattern
    /// matches the node's current text.
    pub(crate) fn apply(&self, tree: &mut Tree, node: NodeId) {
        match self {
            Rule::Literal { pattern, target } => {
                let probe = tree.text(node).to_string();
                let rewritten = pattern.replace(target, &probe);
                tree.set_text(node, rewritten);
            }
            Rule::Resolved { pattern, resolver } => {
                let probe = tree.text(node).to_string();
                if let Some(found) = resolver.resolve(&probe) {
                    let rewritten = pattern.replace(&Target::Literal(found), &probe);
                    tree.set_text(node, rewritten);
                }
            }
        }
    }
}
