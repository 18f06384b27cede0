//! Field-path extraction from resolved documents.
//!
//! Paths are derived by a single deterministic CST walk so identical
//! documents always yield identical path sets in identical order. Fragment
//! spreads are inlined at their spread position, with a visited set guarding
//! against spread cycles.

use crate::{ParseFailure, ResolvedDocument};
use apollo_parser::cst::CstNode;
use embedql_types::OffsetRange;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Root operation kind of a resolved document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    /// Mutations and subscriptions have side-effect semantics that make
    /// "unused" meaningless; usage analysis skips them entirely.
    #[must_use]
    pub const fn side_effecting(self) -> bool {
        !matches!(self, Self::Query)
    }
}

/// A dot-joined path from the document root to one of its fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    /// Dot-joined segments, e.g. `attacks.fast.damage`.
    pub path: Arc<str>,
    /// Range of the defining name in the resolved text. Fields pulled in
    /// through a fragment spread carry the spread's range instead, so
    /// diagnostics attach to a location that exists in the document.
    pub range: OffsetRange,
    /// Whether the field has a sub-selection.
    pub composite: bool,
    /// Identity/typename-shaped fields are excluded from "unused"
    /// consideration but still participate in prefix matching.
    pub reserved: bool,
}

impl FieldPath {
    /// Whether this path names a leaf field.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        !self.composite
    }

    /// The path of the enclosing composite field, if any.
    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.path.rsplit_once('.').map(|(parent, _)| parent)
    }
}

/// The full set of field paths of one resolved document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPathTable {
    /// Kind of the root operation, when the document has one.
    pub operation_kind: Option<OperationKind>,
    /// Explicit name of the root operation, when present.
    pub operation_name: Option<Arc<str>>,
    /// Range of the root operation definition in the resolved text.
    pub operation_range: OffsetRange,
    /// All field paths in document order.
    pub paths: Vec<FieldPath>,
}

impl FieldPathTable {
    /// Leaf paths only.
    pub fn leaves(&self) -> impl Iterator<Item = &FieldPath> {
        self.paths.iter().filter(|p| p.is_leaf())
    }

    /// Whether `candidate` equals a known path or is a strict dot-boundary
    /// prefix of one. This is the admission test the usage walk applies
    /// before descending through a destructured or accessed name.
    #[must_use]
    pub fn admits(&self, candidate: &str) -> bool {
        self.paths.iter().any(|p| {
            p.path.as_ref() == candidate
                || (p.path.len() > candidate.len()
                    && p.path.starts_with(candidate)
                    && p.path.as_bytes()[candidate.len()] == b'.')
        })
    }

    /// Find a path by its dotted form.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&FieldPath> {
        self.paths.iter().find(|p| p.path.as_ref() == path)
    }
}

/// Extract the field-path table of a resolved document.
///
/// Fails only if the resolved text itself does not parse; merged fragments
/// that fail to parse are skipped rather than failing the whole table.
pub fn field_paths(resolved: &ResolvedDocument) -> Result<FieldPathTable, ParseFailure> {
    let tree = apollo_parser::Parser::new(&resolved.text).parse();
    if let Some(error) = tree.errors().next() {
        return Err(ParseFailure {
            message: error.message().to_string(),
            offset: error.index(),
        });
    }

    let mut fragments: HashMap<String, apollo_parser::cst::FragmentDefinition> = HashMap::new();
    let mut operation = None;

    collect_definitions(&tree, &mut fragments, &mut operation);

    // Out-of-line fragments contribute definitions for spread inlining.
    for merged in &resolved.merged_fragments {
        let fragment_tree = apollo_parser::Parser::new(&merged.text).parse();
        if fragment_tree.errors().next().is_some() {
            tracing::debug!(ident = %merged.ident, "merged fragment failed to parse, skipping");
            continue;
        }
        collect_definitions(&fragment_tree, &mut fragments, &mut None);
    }

    let mut table = FieldPathTable::default();
    let Some(op) = operation else {
        return Ok(table);
    };

    table.operation_kind = Some(operation_kind(&op));
    table.operation_name = op.name().map(|name| Arc::from(name.text().to_string()));
    table.operation_range = syntax_range(op.syntax());

    let mut visited = HashSet::new();
    walk_selection_set(
        op.selection_set(),
        &mut String::new(),
        None,
        &fragments,
        &mut visited,
        &mut table.paths,
    );

    Ok(table)
}

fn collect_definitions(
    tree: &apollo_parser::SyntaxTree,
    fragments: &mut HashMap<String, apollo_parser::cst::FragmentDefinition>,
    operation: &mut Option<apollo_parser::cst::OperationDefinition>,
) {
    for definition in tree.document().definitions() {
        match definition {
            apollo_parser::cst::Definition::OperationDefinition(op) => {
                if operation.is_none() {
                    *operation = Some(op);
                }
            }
            apollo_parser::cst::Definition::FragmentDefinition(frag) => {
                if let Some(name) = frag.fragment_name().and_then(|n| n.name()) {
                    fragments.entry(name.text().to_string()).or_insert(frag);
                }
            }
            _ => {}
        }
    }
}

fn operation_kind(op: &apollo_parser::cst::OperationDefinition) -> OperationKind {
    // A missing operation-type keyword means query shorthand.
    op.operation_type().map_or(OperationKind::Query, |ty| {
        if ty.mutation_token().is_some() {
            OperationKind::Mutation
        } else if ty.subscription_token().is_some() {
            OperationKind::Subscription
        } else {
            OperationKind::Query
        }
    })
}

fn walk_selection_set(
    selection_set: Option<apollo_parser::cst::SelectionSet>,
    prefix: &mut String,
    anchor: Option<OffsetRange>,
    fragments: &HashMap<String, apollo_parser::cst::FragmentDefinition>,
    visited: &mut HashSet<String>,
    paths: &mut Vec<FieldPath>,
) {
    let Some(selection_set) = selection_set else {
        return;
    };

    for selection in selection_set.selections() {
        match selection {
            apollo_parser::cst::Selection::Field(field) => {
                let Some(name) = field.name() else { continue };
                let field_name = name.text().to_string();
                // Result objects are keyed by alias when one is present.
                let key = field
                    .alias()
                    .and_then(|a| a.name())
                    .map_or_else(|| field_name.clone(), |n| n.text().to_string());

                let saved_len = prefix.len();
                if !prefix.is_empty() {
                    prefix.push('.');
                }
                prefix.push_str(&key);

                let has_selections = field.selection_set().is_some();
                paths.push(FieldPath {
                    path: Arc::from(prefix.as_str()),
                    range: anchor.unwrap_or_else(|| syntax_range(name.syntax())),
                    composite: has_selections,
                    reserved: field_name == "id" || field_name == "__typename",
                });

                walk_selection_set(field.selection_set(), prefix, anchor, fragments, visited, paths);
                prefix.truncate(saved_len);
            }
            apollo_parser::cst::Selection::FragmentSpread(spread) => {
                let Some(name) = spread.fragment_name().and_then(|n| n.name()) else {
                    continue;
                };
                let fragment_name = name.text().to_string();
                if !visited.insert(fragment_name.clone()) {
                    continue;
                }
                if let Some(fragment) = fragments.get(&fragment_name) {
                    // Spread position anchors every field the fragment
                    // contributes.
                    let spread_anchor = anchor.unwrap_or_else(|| syntax_range(name.syntax()));
                    walk_selection_set(
                        fragment.selection_set(),
                        prefix,
                        Some(spread_anchor),
                        fragments,
                        visited,
                        paths,
                    );
                }
                visited.remove(&fragment_name);
            }
            apollo_parser::cst::Selection::InlineFragment(inline) => {
                // Type conditions do not extend result paths.
                walk_selection_set(inline.selection_set(), prefix, anchor, fragments, visited, paths);
            }
        }
    }
}

fn syntax_range(node: &apollo_parser::SyntaxNode) -> OffsetRange {
    let range = node.text_range();
    OffsetRange::new(u32::from(range.start()) as usize, u32::from(range.end()) as usize)
}
