//! Document metadata records persisted next to an imported release.
//!
//! Every string field is total: absent source values are stored as `""`,
//! never as null. Records drawn from source-ordered collections carry an
//! explicit `index` so order survives storage that does not keep it.

use serde::{Deserialize, Serialize};

/// Mirror of an SPDX document, owned by exactly one release.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpdxDocumentRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub release_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_info_id: Option<String>,
    #[serde(default)]
    pub package_info_ids: Vec<String>,
    #[serde(default)]
    pub snippets: Vec<SnippetInformation>,
    #[serde(default)]
    pub relationships: Vec<RelationshipRecord>,
    #[serde(default)]
    pub annotations: Vec<AnnotationRecord>,
    #[serde(default)]
    pub other_licenses: Vec<OtherLicenseRecord>,
}

/// Header and creation information of an SPDX document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentCreationInformation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub spdx_document_id: String,
    pub spdx_version: String,
    pub data_license: String,
    pub spdx_id: String,
    pub name: String,
    pub document_namespace: String,
    #[serde(default)]
    pub external_document_refs: Vec<ExternalDocumentRefRecord>,
    pub license_list_version: String,
    #[serde(default)]
    pub creators: Vec<CreatorRecord>,
    pub created: String,
    pub creator_comment: String,
    pub document_comment: String,
}

/// Everything an SPDX package says about itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInformation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub spdx_document_id: String,
    pub name: String,
    pub spdx_id: String,
    pub version_info: String,
    pub package_file_name: String,
    pub supplier: String,
    pub originator: String,
    pub download_location: String,
    pub files_analyzed: bool,
    #[serde(default)]
    pub verification_code: VerificationCodeRecord,
    #[serde(default)]
    pub checksums: Vec<ChecksumRecord>,
    pub homepage: String,
    pub source_info: String,
    pub primary_package_purpose: String,
    pub release_date: String,
    pub built_date: String,
    pub valid_until_date: String,
    pub license_concluded: String,
    #[serde(default)]
    pub license_info_from_files: Vec<String>,
    pub license_declared: String,
    pub license_comments: String,
    pub copyright_text: String,
    pub summary: String,
    pub description: String,
    pub package_comment: String,
    #[serde(default)]
    pub external_refs: Vec<ExternalRefRecord>,
    #[serde(default)]
    pub attribution_text: Vec<String>,
    #[serde(default)]
    pub annotations: Vec<AnnotationRecord>,
    /// The package's own relationships, file targets excluded
    #[serde(default)]
    pub relationships: Vec<RelationshipRecord>,
    /// Position among the package infos of its document
    pub index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub annotator: String,
    pub annotation_date: String,
    pub annotation_type: String,
    pub annotation_comment: String,
    pub index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetInformation {
    pub spdx_id: String,
    pub snippet_from_file: String,
    #[serde(default)]
    pub snippet_ranges: Vec<SnippetRange>,
    pub license_concluded: String,
    #[serde(default)]
    pub license_info_in_snippets: Vec<String>,
    pub license_comments: String,
    pub copyright_text: String,
    pub comment: String,
    pub name: String,
    pub snippet_attribution_text: String,
    pub index: usize,
}

/// Kind of a [`SnippetRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RangeType {
    Byte,
    Line,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetRange {
    pub range_type: RangeType,
    pub start_pointer: String,
    pub end_pointer: String,
    pub reference: String,
    pub index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipRecord {
    pub spdx_element_id: String,
    pub relationship_type: String,
    pub related_spdx_element: String,
    pub relationship_comment: String,
    pub index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherLicenseRecord {
    pub license_id: String,
    pub extracted_text: String,
    pub license_name: String,
    #[serde(default)]
    pub license_cross_refs: Vec<String>,
    pub license_comment: String,
    pub index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecksumRecord {
    pub algorithm: String,
    pub checksum_value: String,
    pub index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalRefRecord {
    pub reference_category: String,
    pub reference_type: String,
    pub reference_locator: String,
    pub comment: String,
    pub index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalDocumentRefRecord {
    pub external_document_id: String,
    pub spdx_document: String,
    pub checksum: ChecksumRecord,
    pub index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatorRecord {
    /// `Tool`, `Person` or `Organization`
    #[serde(rename = "type")]
    pub creator_type: String,
    pub value: String,
    pub index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationCodeRecord {
    pub value: String,
    #[serde(default)]
    pub excluded_files: Vec<String>,
}
