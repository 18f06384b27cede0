//! The read-graph walk.
//!
//! Transition rules, applied in priority order at each node reached while
//! following a binding's references:
//!
//! 1. destructuring extends the prefix per bound name (unknown names are
//!    ignored, not reported);
//! 2. property/index access with a literal key extends the prefix;
//! 3. array-transform calls recurse into the callback at the same prefix
//!    (array membership does not extend the path), and non-predicate call
//!    results keep flowing;
//! 4. a return or bare arrow body outside an array callback means the value
//!    escapes: every path under the current prefix is marked used;
//! 5. reassignment restarts the walk at the new declaration, same prefix;
//! 6. guard syntax (optional chaining, assertions, parens) is transparent.
//!
//! Anything else stops that branch. A visited set over (node, prefix,
//! callback-flag) makes the walk a terminating fixed point even on cyclic
//! reference graphs.

use embedql_host::{
    DeclarationId, HostKind, HostNodeId, HostTree, IdentifierRef, SymbolResolver,
};
use embedql_resolver::FieldPathTable;
use embedql_types::FileId;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

/// Methods whose callback receives array elements shaped like the receiver.
const ARRAY_TRANSFORMS: &[&str] = &[
    "map", "filter", "forEach", "reduce", "some", "every", "find", "flatMap", "sort",
];

/// Boolean-producing calls whose result carries no field-path shape.
const PREDICATES: &[&str] = &["some", "every"];

/// Conventional result-wrapper key unwrapped by the cross-scope shape
/// heuristic when it does not name a real field.
const RESULT_WRAPPER: &str = "data";

pub(crate) struct Walker<'a> {
    table: &'a FieldPathTable,
    tree: &'a HostTree,
    symbols: &'a dyn SymbolResolver,
    file: FileId,
    used: BTreeSet<Arc<str>>,
    bailed: bool,
    visited: HashSet<(HostNodeId, String, bool)>,
}

impl<'a> Walker<'a> {
    pub(crate) fn new(
        table: &'a FieldPathTable,
        tree: &'a HostTree,
        symbols: &'a dyn SymbolResolver,
        file: FileId,
    ) -> Self {
        Self {
            table,
            tree,
            symbols,
            file,
            used: BTreeSet::new(),
            bailed: false,
            visited: HashSet::new(),
        }
    }

    pub(crate) fn run(&mut self, declaration: DeclarationId) {
        for reference in self.symbols.find_references(declaration) {
            if reference.file == self.file {
                self.walk_value(reference.node, "", false);
            }
        }
    }

    pub(crate) fn finish(self) -> (BTreeSet<Arc<str>>, bool) {
        (self.used, self.bailed)
    }

    /// `node` is an expression producing the value at `prefix`; classify its
    /// parent to decide where the value flows next.
    fn walk_value(&mut self, node: HostNodeId, prefix: &str, in_array_callback: bool) {
        if !self
            .visited
            .insert((node, prefix.to_owned(), in_array_callback))
        {
            return;
        }
        let Some(parent) = self.tree.parent(node) else {
            return;
        };

        match self.tree.kind(parent) {
            HostKind::Guard => self.walk_value(parent, prefix, in_array_callback),
            HostKind::PropertyAccess if self.is_base_of(node, parent) => {
                self.walk_access(parent, prefix, in_array_callback, false);
            }
            HostKind::IndexAccess if self.is_base_of(node, parent) => {
                self.walk_access(parent, prefix, in_array_callback, true);
            }
            HostKind::Call if self.is_base_of(node, parent) => {
                self.walk_call(parent, prefix, in_array_callback);
            }
            HostKind::VarDecl if !self.is_base_of(node, parent) => {
                if let Some(&pattern) = self.tree.children(parent).first() {
                    self.walk_target(pattern, prefix, in_array_callback);
                }
            }
            HostKind::Assignment if !self.is_base_of(node, parent) => {
                if let Some(&target) = self.tree.children(parent).first() {
                    if self.tree.kind(target) == HostKind::Identifier {
                        self.restart_at(target, prefix, in_array_callback);
                    }
                }
            }
            HostKind::Return | HostKind::ArrowBody => {
                if !in_array_callback {
                    self.bail(prefix);
                }
            }
            _ => {}
        }
    }

    fn is_base_of(&self, node: HostNodeId, parent: HostNodeId) -> bool {
        self.tree.children(parent).first() == Some(&node)
    }

    /// Rule 2: literal-key access. Numeric keys index into arrays and are
    /// transparent; string keys extend the prefix like destructuring.
    fn walk_access(
        &mut self,
        access: HostNodeId,
        prefix: &str,
        in_array_callback: bool,
        maybe_numeric: bool,
    ) {
        let Some(key) = self.tree.text(access).cloned() else {
            return;
        };
        if maybe_numeric && key.parse::<usize>().is_ok() {
            self.walk_value(access, prefix, in_array_callback);
            return;
        }
        let candidate = join(prefix, &key);
        if self.table.admits(&candidate) {
            self.record(&candidate);
            self.walk_value(access, &candidate, in_array_callback);
        } else if prefix.is_empty() && key.as_ref() == RESULT_WRAPPER {
            // Same shape heuristic as destructuring: `response.data` is
            // transparent when `data` does not name a real field.
            self.walk_value(access, prefix, in_array_callback);
        }
    }

    /// Rule 3: array-transform calls.
    fn walk_call(&mut self, call: HostNodeId, prefix: &str, in_array_callback: bool) {
        let Some(method) = self.tree.text(call).cloned() else {
            return;
        };
        if !ARRAY_TRANSFORMS.contains(&method.as_ref()) {
            return;
        }

        let callback = self
            .tree
            .children(call)
            .iter()
            .skip(1)
            .copied()
            .find(|&arg| self.tree.kind(arg) == HostKind::Function);
        if let Some(callback) = callback {
            // The element parameter: reduce's first parameter is the
            // accumulator, which carries no field-path shape.
            let param_index = usize::from(method.as_ref() == "reduce");
            let param = self
                .tree
                .children(callback)
                .iter()
                .copied()
                .filter(|&child| self.tree.kind(child) == HostKind::Param)
                .nth(param_index);
            if let Some(param) = param {
                self.restart_at(param, prefix, true);
            }
        }

        // Non-predicate results keep the element shape (or the array's), so
        // the walk continues from the call expression itself.
        let predicate = PREDICATES.contains(&method.as_ref());
        if !predicate && method.as_ref() != "forEach" {
            self.walk_value(call, prefix, in_array_callback);
        }
    }

    /// Rule 1: the binding side of a declaration or parameter.
    fn walk_target(&mut self, target: HostNodeId, prefix: &str, in_array_callback: bool) {
        match self.tree.kind(target) {
            HostKind::Identifier | HostKind::Param => {
                self.restart_at(target, prefix, in_array_callback);
            }
            HostKind::ObjectPattern => self.walk_pattern(target, prefix, in_array_callback),
            HostKind::ArrayPattern => {
                // Tuple position does not extend the path.
                for &element in self.tree.children(target) {
                    self.walk_target(element, prefix, in_array_callback);
                }
            }
            _ => {}
        }
    }

    fn walk_pattern(&mut self, pattern: HostNodeId, prefix: &str, in_array_callback: bool) {
        for &field in self.tree.children(pattern) {
            if self.tree.kind(field) != HostKind::PatternField {
                continue;
            }
            let Some(name) = self.tree.text(field).cloned() else {
                continue;
            };
            let Some(&target) = self.tree.children(field).first() else {
                continue;
            };
            let candidate = join(prefix, &name);
            if self.table.admits(&candidate) {
                self.record(&candidate);
                self.walk_target(target, &candidate, in_array_callback);
            } else if prefix.is_empty() && name.as_ref() == RESULT_WRAPPER {
                // Shape heuristic: a `{ data }` wrapper around the result is
                // unwrapped without extending the path. Deliberately
                // approximate; tightening it reintroduces false "unused"
                // positives.
                self.walk_target(target, prefix, in_array_callback);
            }
        }
    }

    /// Rule 5: restart the walk at another declaration, same prefix.
    fn restart_at(&mut self, ident: HostNodeId, prefix: &str, in_array_callback: bool) {
        let Some(name) = self.tree.text(ident).cloned() else {
            return;
        };
        let exact = IdentifierRef::new(self.file, name.clone()).at_node(ident);
        // Exact symbol identity first; a plain name lookup across scopes is
        // the fallback (the structurally-similar-binding heuristic).
        let declaration = self
            .symbols
            .resolve_declaration(&exact)
            .or_else(|| self.symbols.resolve_declaration(&IdentifierRef::new(self.file, name)));
        let Some(declaration) = declaration else {
            return;
        };
        for reference in self.symbols.find_references(declaration.id) {
            if reference.file == self.file {
                self.walk_value(reference.node, prefix, in_array_callback);
            }
        }
    }

    /// Rule 4: the value escapes; over-approximate by marking everything
    /// under the current prefix as used.
    fn bail(&mut self, prefix: &str) {
        tracing::trace!(prefix, "value escapes analysis scope, marking subtree used");
        self.bailed = true;
        for path in &self.table.paths {
            let covered = prefix.is_empty()
                || path.path.as_ref() == prefix
                || (path.path.starts_with(prefix) && path.path.as_bytes()[prefix.len()] == b'.');
            if covered {
                self.used.insert(path.path.clone());
            }
        }
    }

    fn record(&mut self, path: &str) {
        self.used.insert(Arc::from(path));
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_owned()
    } else {
        format!("{prefix}.{name}")
    }
}
