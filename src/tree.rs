//! Lazy hierarchical text model: Line ⊃ Sentence ⊃ Token ⊃ Part.
//!
//! One tree is built per input line and lives for one `execute` call. Nodes
//! sit in an arena (`Vec<NodeData>`, ids are indices) rather than behind
//! parent back-pointers; ids are never reused within a tree.
//!
//! ## Consistency protocol
//!
//! Every node owns a text buffer, a lazy child list, and a `child_changed`
//! flag:
//!
//! - Reading `text` first resolves a pending `child_changed` by re-joining
//!   the children (Line and Sentence restore the whitespace gap recorded at
//!   parse time between neighbours, Token joins its parts with `-`), then
//!   stores the result and clears the flag. Children stay cached.
//! - Writing `text` resolves pending state first, no-ops when the value is
//!   unchanged, and otherwise stores it, drops the cached children, and
//!   flags the parent. The flag propagates upward only on its false→true
//!   transition.
//! - Children are parsed from the node's current text on first access and
//!   cached until the next write.
//!
//! A rewrite that changes a child count at an upper level is safe: children
//! are dropped on write, so the next access re-segments the new text.

use crate::segment::{self, Span};

pub(crate) type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    Line,
    Sentence,
    Token,
    Part,
}

impl NodeKind {
    fn child_kind(self) -> NodeKind {
        match self {
            NodeKind::Line => NodeKind::Sentence,
            NodeKind::Sentence => NodeKind::Token,
            NodeKind::Token | NodeKind::Part => NodeKind::Part,
        }
    }

    fn child_spans(self, text: &str) -> Vec<Span> {
        match self {
            NodeKind::Line => segment::sentences(text),
            NodeKind::Sentence => segment::words(text),
            NodeKind::Token => segment::parts(text),
            NodeKind::Part => Vec::new(),
        }
    }
}

#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    text: String,
    /// Byte span within the parent's text at parse time. Gap restoration on
    /// rejoin relies on these staying untouched across text mutations.
    start: usize,
    stop: usize,
    parent: Option<NodeId>,
    children: Option<Vec<NodeId>>,
    child_changed: bool,
}

#[derive(Debug)]
pub(crate) struct Tree {
    nodes: Vec<NodeData>,
}

impl Tree {
    /// Wrap one input line as the root of a fresh tree.
    pub(crate) fn line(text: &str) -> Self {
        let root = NodeData {
            kind: NodeKind::Line,
            text: text.to_string(),
            start: 0,
            stop: text.len(),
            parent: None,
            children: None,
            child_changed: false,
        };
        Self { nodes: vec![root] }
    }

    pub(crate) fn root(&self) -> NodeId {
        0
    }

    /// Current text of `node`, re-joined from children when one of them
    /// changed since the last read.
    pub(crate) fn text(&mut self, node: NodeId) -> &str {
        if self.nodes[node].child_changed {
            let joined = self.join_children(node);
            let data = &mut self.nodes[node];
            data.text = joined;
            // children stay cached; their content is now reflected here
            data.child_changed = false;
        }
        &self.nodes[node].text
    }

    /// Replace the text of `node`. A no-op when the value is unchanged;
    /// otherwise drops the cached children and flags the parent.
    pub(crate) fn set_text(&mut self, node: NodeId, value: String) {
        if self.text(node) == value {
            return;
        }
        let data = &mut self.nodes[node];
        data.text = value;
        data.children = None;
        if let Some(parent) = data.parent {
            self.mark_child_changed(parent);
        }
    }

    /// Child ids of `node`, segmenting its current text on first access.
    pub(crate) fn children(&mut self, node: NodeId) -> Vec<NodeId> {
        if self.nodes[node].children.is_none() {
            let kind = self.nodes[node].kind;
            let child_kind = kind.child_kind();
            let text = self.text(node).to_string();
            let mut ids = Vec::new();
            for span in kind.child_spans(&text) {
                let id = self.nodes.len();
                self.nodes.push(NodeData {
                    kind: child_kind,
                    text: text[span.start..span.stop].to_string(),
                    start: span.start,
                    stop: span.stop,
                    parent: Some(node),
                    children: None,
                    child_changed: false,
                });
                ids.push(id);
            }
            self.nodes[node].children = Some(ids);
        }
        self.nodes[node].children.clone().unwrap_or_default()
    }

    fn mark_child_changed(&mut self, node: NodeId) {
        if !self.nodes[node].child_changed {
            self.nodes[node].child_changed = true;
            if let Some(parent) = self.nodes[node].parent {
                self.mark_child_changed(parent);
            }
        }
    }

    fn join_children(&mut self, node: NodeId) -> String {
        // child_changed implies the children exist
        let ids = self.nodes[node].children.clone().unwrap_or_default();
        if self.nodes[node].kind == NodeKind::Token {
            let parts: Vec<String> = ids.iter().map(|&part| self.text(part).to_string()).collect();
            return parts.join("-");
        }
        let mut joined = String::new();
        let mut last_stop: Option<usize> = None;
        for &child in &ids {
            let text = self.text(child).to_string();
            let (start, stop) = (self.nodes[child].start, self.nodes[child].stop);
            if let Some(last) = last_stop {
                if start > last {
                    joined.push_str(&" ".repeat(start - last));
                }
            }
            joined.push_str(&text);
            last_stop = Some(stop);
        }
        joined
    }

    #[cfg(test)]
    fn child_changed(&self, node: NodeId) -> bool {
        self.nodes[node].child_changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn children_follow_the_hierarchy() {
        let mut tree = Tree::line("Из-за дома. Вышел кот!");
        let root = tree.root();
        let sentences = tree.children(root);
        assert_eq!(sentences.len(), 2);
        assert_eq!(tree.text(sentences[0]), "Из-за дома.");

        let words = tree.children(sentences[0]);
        assert_eq!(tree.text(words[0]), "Из-за");

        let parts = tree.children(words[0]);
        assert_eq!(parts.len(), 2);
        assert_eq!(tree.text(parts[0]), "Из");
        assert_eq!(tree.text(parts[1]), "за");
    }

    #[test]
    fn unchanged_tree_returns_original_text() {
        let text = "Первое,  с двойным пробелом. И второе.";
        let mut tree = Tree::line(text);
        let root = tree.root();
        for sentence in tree.children(root) {
            tree.children(sentence);
        }
        assert_eq!(tree.text(root), text);
    }

    #[test]
    fn rejoin_preserves_inter_token_gaps() {
        let mut tree = Tree::line("слово,  да");
        let root = tree.root();
        let sentence = tree.children(root)[0];
        let words = tree.children(sentence);
        tree.set_text(words[0], "слoво".to_string());
        assert_eq!(tree.text(root), "слoво,  да");
    }

    #[test]
    fn setting_identical_text_raises_nothing() {
        let mut tree = Tree::line("слово да");
        let root = tree.root();
        let sentence = tree.children(root)[0];
        let word = tree.children(sentence)[0];
        tree.set_text(word, "слово".to_string());
        assert!(!tree.child_changed(sentence));
        assert!(!tree.child_changed(root));
    }

    #[test]
    fn mutation_flags_every_ancestor_once() {
        let mut tree = Tree::line("из-за угла");
        let root = tree.root();
        let sentence = tree.children(root)[0];
        let word = tree.children(sentence)[0];
        let part = tree.children(word)[0];

        tree.set_text(part, "ИЗ".to_string());
        assert!(tree.child_changed(word));
        assert!(tree.child_changed(sentence));
        assert!(tree.child_changed(root));

        assert_eq!(tree.text(root), "ИЗ-за угла");
        assert!(!tree.child_changed(root));
    }

    #[test]
    fn token_rejoins_parts_with_hyphen() {
        let mut tree = Tree::line("по-научному");
        let root = tree.root();
        let sentence = tree.children(root)[0];
        let word = tree.children(sentence)[0];
        let parts = tree.children(word);
        tree.set_text(parts[1], "старому".to_string());
        assert_eq!(tree.text(word), "по-старому");
        assert_eq!(tree.text(root), "по-старому");
    }

    #[test]
    fn write_drops_children_for_resegmentation() {
        let mut tree = Tree::line("по-научному");
        let root = tree.root();
        let sentence = tree.children(root)[0];
        assert_eq!(tree.children(sentence).len(), 1);
        tree.set_text(sentence, "по научному".to_string());
        let words = tree.children(sentence);
        assert_eq!(words.len(), 2);
        assert_eq!(tree.text(words[0]), "по");
    }

    #[test]
    fn single_word_token_has_no_parts() {
        let mut tree = Tree::line("слово");
        let root = tree.root();
        let sentence = tree.children(root)[0];
        let word = tree.children(sentence)[0];
        assert!(tree.children(word).is_empty());
    }
}
