//! Symbol-resolution capability interface.
//!
//! Implemented by the host tooling (language service, test harness). Must be
//! side-effect-free and answerable synchronously: the resolver and usage
//! walker call into it from the middle of a single analysis pass.

use crate::{DeclarationShape, HostNodeId};
use embedql_types::FileId;
use std::sync::Arc;

/// Stable identity of a declaration, used for cycle detection and as the
/// key of the reference graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclarationId(u32);

impl DeclarationId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

/// A reference to an identifier at a particular use site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentifierRef {
    pub file: FileId,
    pub name: Arc<str>,
    /// The identifier's node in the host tree, when the caller has one.
    pub node: Option<HostNodeId>,
}

impl IdentifierRef {
    #[must_use]
    pub fn new(file: FileId, name: impl Into<Arc<str>>) -> Self {
        Self {
            file,
            name: name.into(),
            node: None,
        }
    }

    #[must_use]
    pub fn at_node(mut self, node: HostNodeId) -> Self {
        self.node = Some(node);
        self
    }
}

/// A resolved declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub id: DeclarationId,
    pub name: Arc<str>,
    pub file: FileId,
    /// Declaration site in the host tree, when available.
    pub node: Option<HostNodeId>,
    /// The recognized shape of the declaration's initializer.
    pub shape: DeclarationShape,
}

/// One use site of a declaration: an identifier node in a host tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Reference {
    pub file: FileId,
    pub node: HostNodeId,
}

/// Symbol-resolution services supplied by the host tooling.
pub trait SymbolResolver {
    /// Resolve an identifier reference to its declaration.
    ///
    /// `None` means the identifier could not be resolved; callers fail soft.
    fn resolve_declaration(&self, ident: &IdentifierRef) -> Option<Declaration>;

    /// All use sites of a declaration.
    fn find_references(&self, decl: DeclarationId) -> Vec<Reference>;

    /// Names visible in the lexical scope enclosing `node`.
    fn symbols_in_scope(&self, file: FileId, node: HostNodeId) -> Vec<Arc<str>>;
}
