//! Schema validation of resolved documents via apollo-compiler.

use crate::schema::SchemaSnapshot;
use embedql_resolver::ResolvedDocument;
use embedql_types::{DiagnosticCode, DiagnosticRecord, FileId, LineIndex, OffsetRange};
use std::sync::Arc;

/// Path label for the combined document source; diagnostics located in other
/// sources (the schema) are not this occurrence's problem.
const DOCUMENT_PATH: &str = "document.graphql";

/// Client-only directives stripped by the client runtime before requests go
/// out; the server schema never defines them, so validation complaints about
/// them are noise.
pub(crate) const BUILTIN_CLIENT_DIRECTIVES: &[&str] = &[
    "client",
    "_unmask",
    "unmask",
    "populate",
    "arguments",
    "argumentDefinitions",
    "connection",
    "refetchable",
    "required",
    "defer",
];

/// Where one merged fragment's text sits in the combined source.
struct FragmentSegment {
    start: usize,
    file: FileId,
    span: OffsetRange,
}

/// Validate the resolved document (plus its out-of-line fragments) against
/// the schema snapshot and return position-remapped records.
pub(crate) fn schema_diagnostics(
    resolved: &ResolvedDocument,
    snapshot: &SchemaSnapshot,
    extra_client_directives: &[Arc<str>],
) -> Vec<DiagnosticRecord> {
    let (combined, segments) = combined_text(resolved);
    let index = LineIndex::new(&combined);
    let mut records = Vec::new();

    let result = apollo_compiler::ExecutableDocument::parse_and_validate(
        &snapshot.schema,
        combined.as_str(),
        DOCUMENT_PATH,
    );
    let Err(with_errors) = result else {
        return records;
    };

    for apollo_diag in with_errors.errors.iter() {
        use apollo_compiler::diagnostic::ToCliReport;
        if let Some(location) = apollo_diag.error.location() {
            let file_id = location.file_id();
            if let Some(source_file) = apollo_diag.sources.get(&file_id) {
                if source_file.path() != DOCUMENT_PATH {
                    continue;
                }
            }
        }

        let message = apollo_diag.error.to_string();
        // Out-of-line fragments are definitions without a consuming
        // operation in apollo's eyes; colocation is checked separately.
        if message.contains("must be used in an operation") {
            continue;
        }
        if is_client_directive_message(&message, extra_client_directives) {
            continue;
        }

        let combined_range = apollo_diag
            .line_column_range()
            .map_or(OffsetRange::at(0), |loc| {
                OffsetRange::new(
                    index.offset(
                        loc.start.line.saturating_sub(1),
                        loc.start.column.saturating_sub(1),
                    ),
                    index.offset(
                        loc.end.line.saturating_sub(1),
                        loc.end.column.saturating_sub(1),
                    ),
                )
            });
        let (file, range) = map_combined_range(resolved, &segments, combined_range);
        records.push(DiagnosticRecord::error(
            file,
            range,
            DiagnosticCode::SchemaValidation,
            message,
        ));
    }

    records
}

/// The resolved text followed by every merged fragment, with the start of
/// each fragment segment recorded for position mapping.
fn combined_text(resolved: &ResolvedDocument) -> (String, Vec<FragmentSegment>) {
    let mut combined = resolved.text.to_string();
    let mut segments = Vec::new();
    for fragment in &resolved.merged_fragments {
        combined.push_str("\n\n");
        segments.push(FragmentSegment {
            start: combined.len(),
            file: fragment.source.file,
            span: fragment.source.span,
        });
        combined.push_str(&fragment.text);
    }
    (combined, segments)
}

/// Map a combined-text range to original source: document-region ranges go
/// through the span map, fragment-segment ranges land in the fragment's own
/// source span.
fn map_combined_range(
    resolved: &ResolvedDocument,
    segments: &[FragmentSegment],
    range: OffsetRange,
) -> (FileId, OffsetRange) {
    if range.start < resolved.text.len() || segments.is_empty() {
        let start = range.start.min(resolved.text.len());
        let end = range.end.clamp(start, resolved.text.len());
        return resolved.map_range(OffsetRange::new(start, end));
    }
    for segment in segments.iter().rev() {
        if range.start >= segment.start {
            let relative = range.start - segment.start;
            let start = (segment.span.start + relative).min(segment.span.end);
            let len = range.len().min(segment.span.end - start);
            return (segment.file, OffsetRange::new(start, start + len));
        }
    }
    resolved.map_range(range)
}

fn is_client_directive_message(message: &str, extra: &[Arc<str>]) -> bool {
    if !message.contains("directive") {
        return false;
    }
    BUILTIN_CLIENT_DIRECTIVES
        .iter()
        .any(|name| message.contains(&format!("@{name}")))
        || extra
            .iter()
            .any(|name| message.contains(&format!("@{name}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedql_types::Occurrence;

    fn snapshot(sdl: &str) -> SchemaSnapshot {
        let schema = match apollo_compiler::Schema::parse_and_validate(sdl, "schema.graphql") {
            Ok(valid) => valid,
            Err(with_errors) => {
                apollo_compiler::validation::Valid::assume_valid(with_errors.partial)
            }
        };
        SchemaSnapshot { schema, version: 1 }
    }

    fn resolved(span_start: usize, text: &str) -> ResolvedDocument {
        let occurrence = Occurrence::plain(
            FileId::new(0),
            OffsetRange::new(span_start, span_start + text.len()),
            text,
        );
        embedql_resolver::resolve(&occurrence, &embedql_test_utils::FakeWorkspace::new())
    }

    #[test]
    fn valid_document_yields_no_records() {
        let snap = snapshot("type Query { hello: String }");
        let doc = resolved(0, "query Q { hello }");
        assert!(schema_diagnostics(&doc, &snap, &[]).is_empty());
    }

    #[test]
    fn unknown_field_maps_into_the_occurrence_span() {
        let snap = snapshot("type Query { hello: String }");
        let text = "query Q { nope }";
        let doc = resolved(500, text);

        let records = schema_diagnostics(&doc, &snap, &[]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].code, DiagnosticCode::SchemaValidation);
        assert_eq!(records[0].file, FileId::new(0));
        assert!(records[0].range.start >= 500 && records[0].range.end <= 500 + text.len());
    }

    #[test]
    fn builtin_client_directives_are_filtered() {
        let snap = snapshot("type Query { hello: String }");
        let doc = resolved(0, "query Q { hello @client }");
        assert!(schema_diagnostics(&doc, &snap, &[]).is_empty());
    }

    #[test]
    fn configured_client_directives_extend_the_filter() {
        let snap = snapshot("type Query { hello: String }");
        let doc = resolved(0, "query Q { hello @live }");

        assert_eq!(schema_diagnostics(&doc, &snap, &[]).len(), 1);
        let extra: Vec<Arc<str>> = vec!["live".into()];
        assert!(schema_diagnostics(&doc, &snap, &extra).is_empty());
    }
}
