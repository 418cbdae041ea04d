//! Abstract Syntax Tree for Natural modules
//!
//! Nodes live in one arena ([`SyntaxTree`]) and refer to each other by [`NodeId`]. Children are allocated before
//! their parent; allocating a node records it as the parent of every child its [`NodeKind`] lists, so parent links
//! are plain indices and the tree never owns cycles.
//!
//! Lookup relations (a variable reference's declaration, a REDEFINE's target) are stored as `Option<NodeId>` fields
//! on the node kinds and are never reported as children.
//!
//! ## Examples
//! ```rust
//! use natparse_syntax::ast::{LiteralKind, Literal, NodeKind, Span, SyntaxTree};
//!
//! let mut tree = SyntaxTree::new();
//! let one = tree.alloc(NodeKind::Literal(Literal::new(LiteralKind::Integer, "1")), Span::new(0, 1));
//! let neg = tree.alloc(NodeKind::Negation { operand: one }, Span::new(0, 2));
//! assert_eq!(tree.parent(one), Some(neg));
//! assert_eq!(tree.children(neg), vec![one]);
//! ```

mod dump;
mod nodes;

pub use dump::dump;
pub use nodes::*;

/// Source location span (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        (span.start, span.len()).into()
    }
}

/// Index of a node in its [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One arena slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub parent: Option<NodeId>,
}

/// Arena holding every node of one parsed module.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
}

impl SyntaxTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node and adopt its children.
    ///
    /// ## Panics
    /// - If a child id does not belong to this tree (children must be allocated first).
    pub fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        for child in kind.children() {
            self.nodes[child.index()].parent = Some(id);
        }
        self.nodes.push(Node { kind, span, parent: None });
        id
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.get(id).kind
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.get(id).span
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).parent
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.kind(id).children()
    }

    /// Post-parse fix-ups (resolving PERFORM targets) that do not change the child structure.
    pub(crate) fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id.index()].kind
    }

    /// All nodes below `id` in pre-order, `id` excluded.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).into_iter().rev().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).into_iter().rev());
        }
        out
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), |n| self.parent(*n))
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i as u32), n))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
