//! Generic host syntax tree.
//!
//! An arena of [`HostNode`]s with parent and child links. Node kinds cover
//! exactly the syntactic patterns the analysis follows; everything else in
//! the host program lowers to [`HostKind::Opaque`], which stops any walk that
//! reaches it.

use embedql_types::{Occurrence, OffsetRange};
use std::collections::HashMap;
use std::sync::Arc;

/// Index of a node within a [`HostTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostNodeId(u32);

impl HostNodeId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Kind of a host syntax node.
///
/// The payload of a node (identifier name, property name, literal key,
/// method name, parameter name) lives in [`HostNode::text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostKind {
    /// An identifier use. `text` is the name.
    Identifier,
    /// Object destructuring pattern. Children are [`HostKind::PatternField`]s.
    ObjectPattern,
    /// Array destructuring pattern. Children are the element patterns.
    ArrayPattern,
    /// One field of an object pattern. `text` is the source field name;
    /// the single child is the binding target (an identifier or a nested
    /// pattern).
    PatternField,
    /// `expr.name` access. `text` is the member name; the single child is the
    /// base expression.
    PropertyAccess,
    /// `expr["name"]` / `expr[0]` with a literal key. `text` is the key; the
    /// single child is the base expression.
    IndexAccess,
    /// A call expression. For method calls `text` is the method name and the
    /// first child is the receiver; remaining children are arguments.
    Call,
    /// A function or callback. Leading children are [`HostKind::Param`]s,
    /// the rest form the body.
    Function,
    /// A function parameter. `text` is the name.
    Param,
    /// A return statement. Optional single child is the returned expression.
    Return,
    /// The bare expression body of an arrow function. Single child is the
    /// expression.
    ArrowBody,
    /// A variable declaration. First child is the binding pattern (identifier
    /// or destructuring pattern), optional second child is the initializer.
    VarDecl,
    /// An assignment expression. Children are `[target, value]`.
    Assignment,
    /// A transparent wrapper: non-null assertion, optional-chain hop,
    /// parenthesization, or a type-assertion-like annotation. Single child is
    /// the operand.
    Guard,
    /// An embedded-document literal. Its [`Occurrence`] is attached to the
    /// tree via [`HostTree::set_occurrence`].
    TemplateLiteral,
    /// An array literal expression.
    ArrayLiteral,
    /// Anything the analysis has no rule for.
    Opaque,
}

/// One node in a [`HostTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostNode {
    pub kind: HostKind,
    /// Name/key payload, when the kind carries one.
    pub text: Option<Arc<str>>,
    /// Byte range in the host source file.
    pub range: OffsetRange,
    pub parent: Option<HostNodeId>,
    pub children: Vec<HostNodeId>,
}

/// Arena-allocated host syntax tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostTree {
    nodes: Vec<HostNode>,
    occurrences: HashMap<HostNodeId, Occurrence>,
}

impl HostTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a root-level node.
    pub fn alloc(&mut self, kind: HostKind, text: Option<Arc<str>>, range: OffsetRange) -> HostNodeId {
        let id = HostNodeId::new(self.nodes.len() as u32);
        self.nodes.push(HostNode {
            kind,
            text,
            range,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Allocate a node as the last child of `parent`.
    pub fn alloc_child(
        &mut self,
        parent: HostNodeId,
        kind: HostKind,
        text: Option<Arc<str>>,
        range: OffsetRange,
    ) -> HostNodeId {
        let id = self.alloc(kind, text, range);
        self.nodes[id.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Attach an occurrence to a [`HostKind::TemplateLiteral`] node.
    pub fn set_occurrence(&mut self, node: HostNodeId, occurrence: Occurrence) {
        self.occurrences.insert(node, occurrence);
    }

    /// The occurrence attached to `node`, if any.
    #[must_use]
    pub fn occurrence_at(&self, node: HostNodeId) -> Option<&Occurrence> {
        self.occurrences.get(&node)
    }

    #[must_use]
    pub fn node(&self, id: HostNodeId) -> &HostNode {
        &self.nodes[id.index()]
    }

    #[must_use]
    pub fn kind(&self, id: HostNodeId) -> HostKind {
        self.nodes[id.index()].kind
    }

    #[must_use]
    pub fn text(&self, id: HostNodeId) -> Option<&Arc<str>> {
        self.nodes[id.index()].text.as_ref()
    }

    #[must_use]
    pub fn parent(&self, id: HostNodeId) -> Option<HostNodeId> {
        self.nodes[id.index()].parent
    }

    #[must_use]
    pub fn children(&self, id: HostNodeId) -> &[HostNodeId] {
        &self.nodes[id.index()].children
    }

    /// Position of `id` among its parent's children, if it has a parent.
    #[must_use]
    pub fn child_index(&self, id: HostNodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
