//! Stable content digest and derived-name helpers.
//!
//! The digest covers the fully-inlined document text plus every transitively
//! merged fragment, so it changes exactly when the effective document
//! changes. Query allow-listing and persisted-query collaborators key on it.

use crate::ResolvedDocument;
use std::hash::{DefaultHasher, Hash, Hasher};

/// Stable digest over a resolved document's effective text.
#[must_use]
pub fn document_digest(resolved: &ResolvedDocument) -> String {
    let mut hasher = DefaultHasher::new();
    resolved.text.hash(&mut hasher);
    // Fragment order is deduplicated-insertion order, which is deterministic
    // for a given document; hash names too so renames change the digest.
    for fragment in &resolved.merged_fragments {
        fragment.ident.hash(&mut hasher);
        fragment.text.hash(&mut hasher);
    }
    format!("{:016x}", hasher.finish())
}

/// The operation name a codegen collaborator would derive from the enclosing
/// binding, used when the document itself names no operation.
///
/// `getPokemonQuery` becomes `GetPokemonQuery`; a binding that is already
/// capitalized passes through unchanged.
#[must_use]
pub fn derived_operation_name(resolved: &ResolvedDocument) -> Option<String> {
    let binding = resolved.occurrence.binding.as_deref()?;
    let mut chars = binding.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().collect::<String>() + chars.as_str())
}
