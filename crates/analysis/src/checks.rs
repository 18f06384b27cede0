//! Structural checks: operation naming, fragment colocation, field usage.

use embedql_host::{HostTree, SymbolResolver};
use embedql_resolver::{derived_operation_name, FieldPathTable, ResolvedDocument};
use embedql_types::{DiagnosticCode, DiagnosticRecord};
use embedql_usage::{compute_usage, unused_leaves, Binding};
use std::collections::HashSet;

/// Host-program context needed to run the usage check for one occurrence.
pub struct UsageContext<'a> {
    /// The binding the query result flows into.
    pub binding: &'a Binding,
    /// The host syntax tree containing the binding's references.
    pub tree: &'a HostTree,
}

/// Warn when the root operation carries no explicit name. Codegen and
/// observability collaborators key on operation names, so an anonymous
/// operation is almost always an oversight.
pub(crate) fn missing_operation_name(
    resolved: &ResolvedDocument,
    table: &FieldPathTable,
) -> Option<DiagnosticRecord> {
    table.operation_kind?;
    if table.operation_name.is_some() {
        return None;
    }
    let (file, range) = resolved.map_range(table.operation_range);
    let message = match derived_operation_name(resolved) {
        Some(name) => format!("operation has no name; `{name}` would be derived from the binding"),
        None => "operation has no name".to_owned(),
    };
    Some(DiagnosticRecord::warning(
        file,
        range,
        DiagnosticCode::MissingOperationName,
        message,
    ))
}

/// Warn about fragments merged through a composition list but never spread
/// anywhere in the effective document.
pub(crate) fn uncolocated_fragments(resolved: &ResolvedDocument) -> Vec<DiagnosticRecord> {
    if resolved.merged_fragments.is_empty() {
        return Vec::new();
    }

    let mut spreads = spread_names(&resolved.text);
    for fragment in &resolved.merged_fragments {
        spreads.extend(spread_names(&fragment.text));
    }

    let mut records = Vec::new();
    for fragment in &resolved.merged_fragments {
        let defined = fragment_definition_names(&fragment.text);
        if defined.is_empty() || defined.iter().any(|name| spreads.contains(name)) {
            continue;
        }
        records.push(DiagnosticRecord::warning(
            resolved.occurrence.file,
            resolved.occurrence.span,
            DiagnosticCode::UncolocatedFragment,
            format!(
                "fragment `{}` is merged into this document but never spread",
                fragment.ident
            ),
        ));
    }
    records
}

/// Report leaf fields the surrounding program never reads, grouped under
/// their nearest composite ancestor. Side-effecting roots are exempt:
/// "unused" has no meaning for mutations and subscriptions.
pub(crate) fn unused_field_diagnostics(
    resolved: &ResolvedDocument,
    table: &FieldPathTable,
    context: &UsageContext<'_>,
    symbols: &dyn SymbolResolver,
) -> Vec<DiagnosticRecord> {
    let Some(kind) = table.operation_kind else {
        return Vec::new();
    };
    if kind.side_effecting() {
        return Vec::new();
    }

    let report = compute_usage(table, context.binding, context.tree, symbols);
    // An escape bail-out means the walk lost track of the value; any
    // "unused" verdict past that point would be a guess.
    if report.bailed {
        return Vec::new();
    }
    unused_leaves(table, &report)
        .into_iter()
        .map(|group| {
            let (file, range) = resolved.map_range(group.anchor.range);
            let message = if group.leaves.len() == 1 {
                format!(
                    "field `{}` is selected but never read",
                    group.leaves[0].path
                )
            } else {
                let names: Vec<&str> = group.leaves.iter().map(|l| l.path.as_ref()).collect();
                format!("fields {} are selected but never read", backtick_list(&names))
            };
            DiagnosticRecord::warning(file, range, DiagnosticCode::UnusedField, message)
        })
        .collect()
}

fn backtick_list(names: &[&str]) -> String {
    names
        .iter()
        .map(|name| format!("`{name}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// All fragment names spread anywhere in `text`.
fn spread_names(text: &str) -> HashSet<String> {
    let tree = apollo_parser::Parser::new(text).parse();
    let mut names = HashSet::new();
    for definition in tree.document().definitions() {
        match definition {
            apollo_parser::cst::Definition::OperationDefinition(op) => {
                collect_spreads(op.selection_set(), &mut names);
            }
            apollo_parser::cst::Definition::FragmentDefinition(frag) => {
                collect_spreads(frag.selection_set(), &mut names);
            }
            _ => {}
        }
    }
    names
}

/// Names of the fragments `text` defines.
fn fragment_definition_names(text: &str) -> Vec<String> {
    let tree = apollo_parser::Parser::new(text).parse();
    tree.document()
        .definitions()
        .filter_map(|definition| {
            if let apollo_parser::cst::Definition::FragmentDefinition(frag) = definition {
                frag.fragment_name()
                    .and_then(|n| n.name())
                    .map(|name| name.text().to_string())
            } else {
                None
            }
        })
        .collect()
}

fn collect_spreads(
    selection_set: Option<apollo_parser::cst::SelectionSet>,
    names: &mut HashSet<String>,
) {
    let Some(selection_set) = selection_set else {
        return;
    };
    for selection in selection_set.selections() {
        match selection {
            apollo_parser::cst::Selection::Field(field) => {
                collect_spreads(field.selection_set(), names);
            }
            apollo_parser::cst::Selection::FragmentSpread(spread) => {
                if let Some(name) = spread.fragment_name().and_then(|n| n.name()) {
                    names.insert(name.text().to_string());
                }
            }
            apollo_parser::cst::Selection::InlineFragment(inline) => {
                collect_spreads(inline.selection_set(), names);
            }
        }
    }
}
