//! In-memory fake host workspace.

use embedql_host::{
    Declaration, DeclarationId, DeclarationShape, HostKind, HostNodeId, HostTree, IdentifierRef,
    Reference, SymbolResolver,
};
use embedql_types::{FileId, Occurrence, OffsetRange};
use std::collections::HashMap;
use std::sync::Arc;

/// A fake host program: one [`HostTree`] plus symbol tables, implementing
/// [`SymbolResolver`].
///
/// Declarations are registered by name (optionally keyed to a specific tree
/// node for parameter/local declarations); references are registered
/// explicitly. Name lookup falls back across files, which doubles as the
/// cross-scope shape heuristic the usage walker relies on.
#[derive(Default)]
pub struct FakeWorkspace {
    tree: HostTree,
    by_name: HashMap<Arc<str>, DeclarationId>,
    by_node: HashMap<HostNodeId, DeclarationId>,
    declarations: HashMap<DeclarationId, Declaration>,
    references: HashMap<DeclarationId, Vec<Reference>>,
    scopes: HashMap<HostNodeId, Vec<Arc<str>>>,
    next_id: u32,
}

impl FakeWorkspace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn tree(&self) -> &HostTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut HostTree {
        &mut self.tree
    }

    /// Register a declaration by name.
    pub fn declare(&mut self, file: FileId, name: &str, shape: DeclarationShape) -> DeclarationId {
        self.declare_at(file, name, None, shape)
    }

    /// Register a declaration bound to a specific tree node (a destructured
    /// identifier, a callback parameter).
    pub fn declare_at(
        &mut self,
        file: FileId,
        name: &str,
        node: Option<HostNodeId>,
        shape: DeclarationShape,
    ) -> DeclarationId {
        let id = DeclarationId::new(self.next_id);
        self.next_id += 1;
        let name: Arc<str> = name.into();
        self.declarations.insert(
            id,
            Declaration {
                id,
                name: name.clone(),
                file,
                node,
                shape,
            },
        );
        if let Some(node) = node {
            self.by_node.insert(node, id);
        } else {
            self.by_name.insert(name, id);
        }
        id
    }

    /// Shorthand: a declaration whose initializer is a document literal.
    pub fn declare_document(
        &mut self,
        file: FileId,
        name: &str,
        occurrence: Occurrence,
    ) -> DeclarationId {
        self.declare(file, name, DeclarationShape::DirectDocument(occurrence))
    }

    /// Record a use site for a declaration.
    pub fn add_reference(&mut self, decl: DeclarationId, file: FileId, node: HostNodeId) {
        self.references.entry(decl).or_default().push(Reference { file, node });
    }

    /// Convenience: allocate an identifier use node and register it as a
    /// reference of `decl` in one step.
    pub fn reference_ident(
        &mut self,
        decl: DeclarationId,
        file: FileId,
        parent: Option<HostNodeId>,
        name: &str,
    ) -> HostNodeId {
        let node = match parent {
            Some(p) => self
                .tree
                .alloc_child(p, HostKind::Identifier, Some(name.into()), OffsetRange::at(0)),
            None => self
                .tree
                .alloc(HostKind::Identifier, Some(name.into()), OffsetRange::at(0)),
        };
        self.add_reference(decl, file, node);
        node
    }

    /// Register the names visible in the scope around `node`.
    pub fn set_scope(&mut self, node: HostNodeId, names: Vec<Arc<str>>) {
        self.scopes.insert(node, names);
    }
}

impl SymbolResolver for FakeWorkspace {
    fn resolve_declaration(&self, ident: &IdentifierRef) -> Option<Declaration> {
        // Node-keyed declarations win over plain name lookup.
        if let Some(node) = ident.node {
            if let Some(id) = self.by_node.get(&node) {
                return self.declarations.get(id).cloned();
            }
        }
        let id = self.by_name.get(&ident.name)?;
        self.declarations.get(id).cloned()
    }

    fn find_references(&self, decl: DeclarationId) -> Vec<Reference> {
        self.references.get(&decl).cloned().unwrap_or_default()
    }

    fn symbols_in_scope(&self, _file: FileId, node: HostNodeId) -> Vec<Arc<str>> {
        self.scopes.get(&node).cloned().unwrap_or_default()
    }
}
