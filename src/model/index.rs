//! Index structures for efficient document querying.
//!
//! This module provides `SpdxDocumentIndex`, a precomputed view over a parsed
//! [`SpdxDocument`] that resolves SPDX identifiers to arena positions and
//! groups relationships and annotations by the element they belong to.
//!
//! # Example
//!
//! ```ignore
//! use sbom_importer::model::SpdxDocumentIndex;
//!
//! let document = parse_spdx_file(&path)?;
//! let index = SpdxDocumentIndex::build(&document);
//!
//! // O(1) instead of scanning every relationship
//! let local = index.relationships_of("SPDXRef-Package");
//! ```

use super::{RelationshipType, SpdxAnnotation, SpdxDocument, SpdxPackage, SpdxRelationship};
use std::collections::{HashMap, HashSet};

/// What an SPDX identifier resolves to inside a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementRef {
    Document,
    Package(usize),
    File(usize),
    Snippet(usize),
    /// Not defined here (external reference, `NONE`, `NOASSERTION`, typo)
    Unresolved,
}

/// Precomputed index for document queries.
///
/// Built once per import and borrowed by the graph builder and the metadata
/// writer. Provides O(1) lookups for:
/// - Element kind and position by SPDX identifier
/// - Relationships whose source is a given element (in source order)
/// - Annotations targeting a given element (in source order)
#[derive(Debug, Clone)]
#[must_use]
pub struct SpdxDocumentIndex<'a> {
    document: &'a SpdxDocument,
    /// Arena position by SPDX identifier; the first definition wins
    elements: HashMap<&'a str, ElementRef>,
    /// Relationship positions by source element
    relationships_by_source: HashMap<&'a str, Vec<usize>>,
    /// Annotation positions by annotated element
    annotations_by_target: HashMap<&'a str, Vec<usize>>,
}

impl<'a> SpdxDocumentIndex<'a> {
    /// Build an index over a document.
    pub fn build(document: &'a SpdxDocument) -> Self {
        let mut elements: HashMap<&'a str, ElementRef> = HashMap::with_capacity(
            document.packages.len() + document.files.len() + document.snippets.len() + 1,
        );
        elements.insert(document.spdx_id.as_str(), ElementRef::Document);
        for (idx, pkg) in document.packages.iter().enumerate() {
            elements
                .entry(pkg.spdx_id.as_str())
                .or_insert(ElementRef::Package(idx));
        }
        for (idx, file) in document.files.iter().enumerate() {
            elements
                .entry(file.spdx_id.as_str())
                .or_insert(ElementRef::File(idx));
        }
        for (idx, snippet) in document.snippets.iter().enumerate() {
            elements
                .entry(snippet.spdx_id.as_str())
                .or_insert(ElementRef::Snippet(idx));
        }

        let mut relationships_by_source: HashMap<&'a str, Vec<usize>> = HashMap::new();
        for (idx, rel) in document.relationships.iter().enumerate() {
            relationships_by_source
                .entry(rel.spdx_element_id.as_str())
                .or_default()
                .push(idx);
        }

        let mut annotations_by_target: HashMap<&'a str, Vec<usize>> = HashMap::new();
        for (idx, annotation) in document.annotations.iter().enumerate() {
            annotations_by_target
                .entry(annotation.spdx_ref.as_str())
                .or_default()
                .push(idx);
        }

        Self {
            document,
            elements,
            relationships_by_source,
            annotations_by_target,
        }
    }

    /// The indexed document.
    #[must_use]
    pub const fn document(&self) -> &'a SpdxDocument {
        self.document
    }

    /// Resolve an SPDX identifier.
    #[must_use]
    pub fn resolve(&self, spdx_id: &str) -> ElementRef {
        self.elements
            .get(spdx_id)
            .copied()
            .unwrap_or(ElementRef::Unresolved)
    }

    /// Arena position of the package with this identifier.
    #[must_use]
    pub fn package_index(&self, spdx_id: &str) -> Option<usize> {
        match self.resolve(spdx_id) {
            ElementRef::Package(idx) => Some(idx),
            _ => None,
        }
    }

    /// Package at an arena position.
    #[must_use]
    pub fn package(&self, idx: usize) -> Option<&'a SpdxPackage> {
        self.document.packages.get(idx)
    }

    /// Relationships whose source is the given element, in source order.
    #[must_use]
    pub fn relationships_of(&self, spdx_id: &str) -> Vec<&'a SpdxRelationship> {
        self.relationships_by_source
            .get(spdx_id)
            .map(|indices| {
                indices
                    .iter()
                    .filter_map(|&i| self.document.relationships.get(i))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Annotations targeting the given element, in source order.
    #[must_use]
    pub fn annotations_of(&self, spdx_id: &str) -> Vec<&'a SpdxAnnotation> {
        self.annotations_by_target
            .get(spdx_id)
            .map(|indices| {
                indices
                    .iter()
                    .filter_map(|&i| self.document.annotations.get(i))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Packages the document describes, as arena positions in source order.
    ///
    /// Both `DOCUMENT DESCRIBES X` and `X DESCRIBED_BY DOCUMENT` count;
    /// targets that are not packages are ignored and duplicates collapse.
    #[must_use]
    pub fn described_packages(&self) -> Vec<usize> {
        let doc_id = self.document.spdx_id.as_str();
        let mut seen = HashSet::new();
        let mut described = Vec::new();

        for rel in &self.document.relationships {
            let target = match rel.relationship_type {
                RelationshipType::Describes if rel.spdx_element_id == doc_id => {
                    rel.related_spdx_element.as_str()
                }
                RelationshipType::DescribedBy if rel.related_spdx_element == doc_id => {
                    rel.spdx_element_id.as_str()
                }
                _ => continue,
            };
            if let Some(idx) = self.package_index(target) {
                if seen.insert(idx) {
                    described.push(idx);
                }
            }
        }
        described
    }

    /// Number of indexed elements, the document included.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SpdxFile, DOCUMENT_SPDX_ID};

    fn make_document() -> SpdxDocument {
        let mut doc = SpdxDocument::default();
        doc.packages.push(SpdxPackage::new("SPDXRef-A", "a").with_version("1"));
        doc.packages.push(SpdxPackage::new("SPDXRef-B", "b").with_version("2"));
        doc.files.push(SpdxFile {
            spdx_id: "SPDXRef-F".into(),
            file_name: "./f.c".into(),
            ..SpdxFile::default()
        });
        doc.add_relationship(SpdxRelationship::new(
            DOCUMENT_SPDX_ID,
            RelationshipType::Describes,
            "SPDXRef-A",
        ));
        doc.add_relationship(SpdxRelationship::new(
            "SPDXRef-A",
            RelationshipType::Contains,
            "SPDXRef-B",
        ));
        doc.add_relationship(SpdxRelationship::new(
            "SPDXRef-A",
            RelationshipType::Contains,
            "SPDXRef-F",
        ));
        doc
    }

    #[test]
    fn test_resolve_elements() {
        let doc = make_document();
        let index = SpdxDocumentIndex::build(&doc);

        assert_eq!(index.resolve(DOCUMENT_SPDX_ID), ElementRef::Document);
        assert_eq!(index.resolve("SPDXRef-B"), ElementRef::Package(1));
        assert_eq!(index.resolve("SPDXRef-F"), ElementRef::File(0));
        assert_eq!(index.resolve("SPDXRef-missing"), ElementRef::Unresolved);
        assert_eq!(index.element_count(), 4);
    }

    #[test]
    fn test_relationships_of_in_source_order() {
        let doc = make_document();
        let index = SpdxDocumentIndex::build(&doc);

        let rels = index.relationships_of("SPDXRef-A");
        assert_eq!(rels.len(), 2);
        assert_eq!(rels[0].related_spdx_element, "SPDXRef-B");
        assert_eq!(rels[1].related_spdx_element, "SPDXRef-F");
        assert!(index.relationships_of("SPDXRef-B").is_empty());
    }

    #[test]
    fn test_described_packages_accepts_both_directions() {
        let mut doc = make_document();
        doc.add_relationship(SpdxRelationship::new(
            "SPDXRef-A",
            RelationshipType::DescribedBy,
            DOCUMENT_SPDX_ID,
        ));
        doc.add_relationship(SpdxRelationship::new(
            DOCUMENT_SPDX_ID,
            RelationshipType::Describes,
            "SPDXRef-F",
        ));
        let index = SpdxDocumentIndex::build(&doc);

        assert_eq!(index.described_packages(), vec![0]);
    }
}
