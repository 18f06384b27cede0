//! Declaration-shape matching.
//!
//! Embedded documents hide behind a few recognized wrapper forms. The
//! recognized forms are one tagged union so adding a wrapper shape means
//! adding a variant and an arm in [`DeclarationShape::classify`], not a new
//! predicate chain.

use crate::{HostKind, HostNodeId, HostTree, IdentifierRef};
use embedql_types::Occurrence;

/// Recognized shape of a declaration's initializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationShape {
    /// The initializer is an embedded-document literal.
    DirectDocument(Occurrence),
    /// The initializer is an embedded-document literal behind exactly one
    /// transparent wrapper (type assertion, schema-qualifier array).
    WrappedDocument(Occurrence),
    /// The initializer is a composition list of document references.
    FragmentList(Vec<IdentifierRef>),
    /// Anything else: a computed value, an opaque import.
    Opaque,
}

impl DeclarationShape {
    /// Classify the initializer node of a declaration.
    ///
    /// Only one level of wrapping is unwrapped; deeper nesting is `Opaque`,
    /// matching the fail-soft policy (an unrecognized shape drops out of text
    /// expansion, it does not abort resolution).
    #[must_use]
    pub fn classify(tree: &HostTree, file: embedql_types::FileId, init: HostNodeId) -> Self {
        match tree.kind(init) {
            HostKind::TemplateLiteral => tree
                .occurrence_at(init)
                .cloned()
                .map_or(Self::Opaque, Self::DirectDocument),
            HostKind::Guard => {
                let [operand] = tree.children(init) else {
                    return Self::Opaque;
                };
                if tree.kind(*operand) == HostKind::TemplateLiteral {
                    tree.occurrence_at(*operand)
                        .cloned()
                        .map_or(Self::Opaque, Self::WrappedDocument)
                } else {
                    Self::Opaque
                }
            }
            HostKind::ArrayLiteral => Self::classify_array(tree, file, init),
            _ => Self::Opaque,
        }
    }

    /// Array initializers are either a schema-qualified document (literal in
    /// first position) or a composition list of identifiers.
    fn classify_array(tree: &HostTree, file: embedql_types::FileId, init: HostNodeId) -> Self {
        let children = tree.children(init);
        match children.first() {
            Some(&first) if tree.kind(first) == HostKind::TemplateLiteral => tree
                .occurrence_at(first)
                .cloned()
                .map_or(Self::Opaque, Self::WrappedDocument),
            Some(_) => {
                let mut idents = Vec::with_capacity(children.len());
                for &child in children {
                    if tree.kind(child) != HostKind::Identifier {
                        return Self::Opaque;
                    }
                    let Some(name) = tree.text(child) else {
                        return Self::Opaque;
                    };
                    idents.push(IdentifierRef::new(file, name.clone()).at_node(child));
                }
                Self::FragmentList(idents)
            }
            None => Self::Opaque,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedql_types::{FileId, OffsetRange};

    fn doc_literal(tree: &mut HostTree, parent: Option<HostNodeId>) -> HostNodeId {
        let range = OffsetRange::new(0, 12);
        let lit = match parent {
            Some(p) => tree.alloc_child(p, HostKind::TemplateLiteral, None, range),
            None => tree.alloc(HostKind::TemplateLiteral, None, range),
        };
        tree.set_occurrence(lit, Occurrence::plain(FileId::new(0), range, "query { a }"));
        lit
    }

    #[test]
    fn direct_document() {
        let mut tree = HostTree::new();
        let lit = doc_literal(&mut tree, None);
        assert!(matches!(
            DeclarationShape::classify(&tree, FileId::new(0), lit),
            DeclarationShape::DirectDocument(_)
        ));
    }

    #[test]
    fn single_wrapper_unwraps() {
        let mut tree = HostTree::new();
        let guard = tree.alloc(HostKind::Guard, None, OffsetRange::new(0, 20));
        doc_literal(&mut tree, Some(guard));
        assert!(matches!(
            DeclarationShape::classify(&tree, FileId::new(0), guard),
            DeclarationShape::WrappedDocument(_)
        ));
    }

    #[test]
    fn double_wrapper_is_opaque() {
        let mut tree = HostTree::new();
        let outer = tree.alloc(HostKind::Guard, None, OffsetRange::new(0, 22));
        let inner = tree.alloc_child(outer, HostKind::Guard, None, OffsetRange::new(1, 21));
        doc_literal(&mut tree, Some(inner));
        assert_eq!(DeclarationShape::classify(&tree, FileId::new(0), outer), DeclarationShape::Opaque);
    }

    #[test]
    fn array_first_element_document() {
        let mut tree = HostTree::new();
        let array = tree.alloc(HostKind::ArrayLiteral, None, OffsetRange::new(0, 30));
        doc_literal(&mut tree, Some(array));
        tree.alloc_child(array, HostKind::Identifier, Some("qualifier".into()), OffsetRange::new(14, 23));
        assert!(matches!(
            DeclarationShape::classify(&tree, FileId::new(0), array),
            DeclarationShape::WrappedDocument(_)
        ));
    }

    #[test]
    fn identifier_list_is_fragment_list() {
        let mut tree = HostTree::new();
        let array = tree.alloc(HostKind::ArrayLiteral, None, OffsetRange::new(0, 20));
        tree.alloc_child(array, HostKind::Identifier, Some("fragA".into()), OffsetRange::new(1, 6));
        tree.alloc_child(array, HostKind::Identifier, Some("fragB".into()), OffsetRange::new(8, 13));
        let DeclarationShape::FragmentList(idents) = DeclarationShape::classify(&tree, FileId::new(0), array) else {
            panic!("expected fragment list");
        };
        assert_eq!(idents.len(), 2);
        assert_eq!(idents[0].name.as_ref(), "fragA");
    }

    #[test]
    fn computed_value_is_opaque() {
        let mut tree = HostTree::new();
        let call = tree.alloc(HostKind::Call, Some("buildQuery".into()), OffsetRange::new(0, 12));
        assert_eq!(DeclarationShape::classify(&tree, FileId::new(0), call), DeclarationShape::Opaque);
    }
}
