//! Document-level metadata records.

use super::snippet::snippets_from;
use super::values::value_or_default;
use crate::error::MappingError;
use crate::model::{
    AnnotationRecord, ChecksumRecord, CreatorRecord, DocumentCreationInformation, ElementRef,
    ExternalDocumentRef, ExternalDocumentRefRecord, ExtractedLicenseInfo, OtherLicenseRecord,
    RelationshipRecord, SpdxAnnotation, SpdxDocument, SpdxDocumentIndex, SpdxDocumentRecord,
    SpdxRelationship,
};

/// SPDX document record for a release.
///
/// Carries the document's snippets, its own relationships and annotations,
/// and the extracted licenses. Relationships pointing at files are dropped.
#[must_use]
pub fn spdx_document_record(index: &SpdxDocumentIndex<'_>, release_id: &str) -> SpdxDocumentRecord {
    let doc = index.document();
    let relationships: Vec<&SpdxRelationship> = index
        .relationships_of(&doc.spdx_id)
        .into_iter()
        .filter(|rel| !matches!(index.resolve(&rel.related_spdx_element), ElementRef::File(_)))
        .collect();

    SpdxDocumentRecord {
        id: None,
        release_id: release_id.to_string(),
        creation_info_id: None,
        package_info_ids: Vec::new(),
        snippets: snippets_from(&doc.snippets),
        relationships: relationships_from(relationships),
        annotations: annotations_from(index.annotations_of(&doc.spdx_id)),
        other_licenses: other_licenses_from(&doc.extracted_licenses),
    }
}

/// Creation information record for a document.
#[must_use]
pub fn creation_information(doc: &SpdxDocument, spdx_document_id: &str) -> DocumentCreationInformation {
    let info = &doc.creation_info;
    DocumentCreationInformation {
        id: None,
        spdx_document_id: spdx_document_id.to_string(),
        spdx_version: doc.spdx_version.clone(),
        data_license: doc.data_license.clone(),
        spdx_id: doc.spdx_id.clone(),
        name: doc.name.clone(),
        document_namespace: doc.document_namespace.clone(),
        external_document_refs: external_document_refs_from(&doc.external_document_refs),
        license_list_version: value_or_default(info.license_list_version.as_deref()),
        creators: creators_from(&info.creators),
        created: value_or_default(info.created.as_deref()),
        creator_comment: value_or_default(info.comment.as_deref()),
        document_comment: value_or_default(doc.comment.as_deref()),
    }
}

pub fn annotations_from<'a>(
    annotations: impl IntoIterator<Item = &'a SpdxAnnotation>,
) -> Vec<AnnotationRecord> {
    annotations
        .into_iter()
        .enumerate()
        .map(|(index, annotation)| AnnotationRecord {
            annotator: annotation.annotator.clone(),
            annotation_date: value_or_default(annotation.annotation_date.as_deref()),
            annotation_type: annotation.annotation_type.clone(),
            annotation_comment: value_or_default(annotation.comment.as_deref()),
            index,
        })
        .collect()
}

pub fn relationships_from<'a>(
    relationships: impl IntoIterator<Item = &'a SpdxRelationship>,
) -> Vec<RelationshipRecord> {
    relationships
        .into_iter()
        .enumerate()
        .map(|(index, rel)| RelationshipRecord {
            spdx_element_id: rel.spdx_element_id.clone(),
            relationship_type: rel.relationship_type.as_str().to_string(),
            related_spdx_element: rel.related_spdx_element.clone(),
            relationship_comment: value_or_default(rel.comment.as_deref()),
            index,
        })
        .collect()
}

pub fn other_licenses_from(licenses: &[ExtractedLicenseInfo]) -> Vec<OtherLicenseRecord> {
    licenses
        .iter()
        .enumerate()
        .map(|(index, license)| OtherLicenseRecord {
            license_id: license.license_id.clone(),
            extracted_text: value_or_default(license.extracted_text.as_deref()),
            license_name: value_or_default(license.name.as_deref()),
            license_cross_refs: license.cross_refs.clone(),
            license_comment: value_or_default(license.comment.as_deref()),
            index,
        })
        .collect()
}

/// External document references. Only those carrying a checksum are kept.
pub fn external_document_refs_from(refs: &[ExternalDocumentRef]) -> Vec<ExternalDocumentRefRecord> {
    refs.iter()
        .filter_map(|r| r.checksum.as_ref().map(|checksum| (r, checksum)))
        .enumerate()
        .map(|(index, (r, checksum))| ExternalDocumentRefRecord {
            external_document_id: r.external_document_id.clone(),
            spdx_document: r.spdx_document_uri.clone(),
            checksum: ChecksumRecord {
                algorithm: checksum.algorithm.to_uppercase(),
                checksum_value: checksum.value.clone(),
                index: 0,
            },
            index,
        })
        .collect()
}

/// Creator entries split into type and value at the first `:`.
///
/// Entries that do not split into two non-empty halves are logged and
/// skipped; indices count only the kept entries.
pub fn creators_from(creators: &[String]) -> Vec<CreatorRecord> {
    creators
        .iter()
        .filter_map(|raw| match parse_creator(raw) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping creator");
                None
            }
        })
        .enumerate()
        .map(|(index, (creator_type, value))| CreatorRecord {
            creator_type,
            value,
            index,
        })
        .collect()
}

fn parse_creator(raw: &str) -> Result<(String, String), MappingError> {
    let (kind, value) = raw
        .split_once(':')
        .ok_or_else(|| MappingError::MalformedCreator(raw.to_string()))?;
    let (kind, value) = (kind.trim(), value.trim());
    if kind.is_empty() || value.is_empty() {
        return Err(MappingError::MalformedCreator(raw.to_string()));
    }
    Ok((kind.to_string(), value.to_string()))
}
