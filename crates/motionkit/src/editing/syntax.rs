//! # Syntax trees
//!
//! ## Overview
//!
//! Some motions work on the structure of a document instead of its characters. They get that
//! structure through the [SyntaxTree] trait, which hosts implement on top of whatever parser they
//! use. Nodes are referred to by [NodeId] handles, and the tree answers questions about their
//! kind, location and neighbours.
//!
//! [SyntaxArena] is a simple implementation that stores nodes in a vector. Hosts without their
//! own parser can fill one in, and it is used throughout this crate's tests.
use editor_types::prelude::{Position, TextRange};

/// A handle to a node inside of a [SyntaxTree].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Navigation over the syntax tree of a document.
///
/// Children are always ordered by their position in the document.
pub trait SyntaxTree {
    /// The node covering the whole document.
    fn root(&self) -> NodeId;

    /// The grammar's name for the kind of a node, like `"function_item"`.
    fn kind(&self, node: NodeId) -> &str;

    /// The text covered by a node.
    fn range(&self, node: NodeId) -> TextRange;

    /// Whether a node is named in the grammar, as opposed to anonymous punctuation.
    fn is_named(&self, node: NodeId) -> bool;

    /// The node containing this one.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// The nodes directly inside of this one.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// The node right after this one within the same parent.
    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let children = self.children(parent);
        let idx = children.iter().position(|c| *c == node)?;

        children.get(idx + 1).copied()
    }

    /// The node right before this one within the same parent.
    fn prev_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let children = self.children(parent);
        let idx = children.iter().position(|c| *c == node)?;

        idx.checked_sub(1).and_then(|i| children.get(i).copied())
    }

    /// The closest named node after this one within the same parent.
    fn next_named_sibling(&self, node: NodeId) -> Option<NodeId> {
        let mut cur = self.next_sibling(node);

        while let Some(n) = cur {
            if self.is_named(n) {
                return Some(n);
            }

            cur = self.next_sibling(n);
        }

        return None;
    }

    /// The closest named node before this one within the same parent.
    fn prev_named_sibling(&self, node: NodeId) -> Option<NodeId> {
        let mut cur = self.prev_sibling(node);

        while let Some(n) = cur {
            if self.is_named(n) {
                return Some(n);
            }

            cur = self.prev_sibling(n);
        }

        return None;
    }

    /// The smallest named node that covers a range.
    ///
    /// Nodes that end where the range starts don't count as covering it, unless the range is
    /// empty and located at the very end of the node.
    fn named_descendant_for_range(&self, range: &TextRange) -> Option<NodeId> {
        let mut node = self.root();
        let mut found = self.is_named(node).then_some(node);

        'descend: loop {
            for child in self.children(node) {
                let r = self.range(child);

                if r.start <= range.start && r.end >= range.end && r.end > range.start {
                    node = child;

                    if self.is_named(child) {
                        found = Some(child);
                    }

                    continue 'descend;
                }
            }

            break;
        }

        return found;
    }

    /// The smallest named node located under a position.
    fn named_node_at(&self, pos: Position) -> Option<NodeId> {
        self.named_descendant_for_range(&TextRange::empty(pos))
    }
}

#[derive(Clone, Debug)]
struct SyntaxNode {
    kind: String,
    range: TextRange,
    named: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A [SyntaxTree] stored in a vector of nodes.
#[derive(Clone, Debug)]
pub struct SyntaxArena {
    nodes: Vec<SyntaxNode>,
}

impl SyntaxArena {
    /// Create a tree with a root node covering a range.
    pub fn new<K: Into<String>>(kind: K, range: TextRange) -> Self {
        let root = SyntaxNode {
            kind: kind.into(),
            range,
            named: true,
            parent: None,
            children: vec![],
        };

        SyntaxArena { nodes: vec![root] }
    }

    fn push(&mut self, parent: NodeId, kind: String, range: TextRange, named: bool) -> NodeId {
        let id = NodeId(self.nodes.len());

        self.nodes.push(SyntaxNode { kind, range, named, parent: Some(parent), children: vec![] });

        let starts: Vec<Position> = self.nodes[parent.0]
            .children
            .iter()
            .map(|c| self.nodes[c.0].range.start)
            .collect();
        let idx = starts.partition_point(|s| *s <= range.start);
        self.nodes[parent.0].children.insert(idx, id);

        return id;
    }

    /// Add a named node underneath `parent`.
    pub fn add<K: Into<String>>(&mut self, parent: NodeId, kind: K, range: TextRange) -> NodeId {
        self.push(parent, kind.into(), range, true)
    }

    /// Add an anonymous node, like a punctuation token, underneath `parent`.
    pub fn add_anonymous<K: Into<String>>(
        &mut self,
        parent: NodeId,
        kind: K,
        range: TextRange,
    ) -> NodeId {
        self.push(parent, kind.into(), range, false)
    }

    /// The number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

impl SyntaxTree for SyntaxArena {
    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn kind(&self, node: NodeId) -> &str {
        self.nodes.get(node.0).map(|n| n.kind.as_str()).unwrap_or("")
    }

    fn range(&self, node: NodeId) -> TextRange {
        self.nodes.get(node.0).map(|n| n.range).unwrap_or_default()
    }

    fn is_named(&self, node: NodeId) -> bool {
        self.nodes.get(node.0).map(|n| n.named).unwrap_or(false)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes.get(node.0).map(|n| n.children.clone()).unwrap_or_default()
    }
}
