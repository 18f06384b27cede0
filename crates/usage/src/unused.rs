//! Unused-leaf computation and grouping.

use crate::UsageReport;
use embedql_resolver::{FieldPath, FieldPathTable};

/// Unused leaves grouped under a stable, visible anchor field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnusedGroup {
    /// The nearest ancestor composite field present in the document, or the
    /// leaf itself for root-level leaves. Diagnostics attach to its range.
    pub anchor: FieldPath,
    /// Unused leaves in document order.
    pub leaves: Vec<FieldPath>,
}

/// Compute the unused leaves of a document: leaf paths minus used paths,
/// excluding structurally reserved fields, grouped by their nearest ancestor
/// composite field.
#[must_use]
pub fn unused_leaves(table: &FieldPathTable, report: &UsageReport) -> Vec<UnusedGroup> {
    let mut groups: Vec<UnusedGroup> = Vec::new();

    for leaf in table.leaves() {
        if leaf.reserved || report.is_used(&leaf.path) {
            continue;
        }
        let anchor = nearest_composite_ancestor(table, leaf).unwrap_or_else(|| leaf.clone());

        match groups.iter_mut().find(|g| g.anchor.path == anchor.path) {
            Some(group) => group.leaves.push(leaf.clone()),
            None => groups.push(UnusedGroup {
                anchor,
                leaves: vec![leaf.clone()],
            }),
        }
    }

    groups
}

fn nearest_composite_ancestor(table: &FieldPathTable, leaf: &FieldPath) -> Option<FieldPath> {
    let mut current = leaf.parent();
    while let Some(ancestor_path) = current {
        if let Some(ancestor) = table.get(ancestor_path) {
            if ancestor.composite {
                return Some(ancestor.clone());
            }
        }
        current = ancestor_path.rsplit_once('.').map(|(parent, _)| parent);
    }
    None
}
