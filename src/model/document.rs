//! In-memory SPDX 2.x document graph.
//!
//! Parsers populate these arenas in source order. Elements reference each
//! other only by SPDX identifier; [`SpdxDocumentIndex`](super::SpdxDocumentIndex)
//! resolves those identifiers to arena positions.

use std::fmt;

/// Identifier conventionally used for the document element itself.
pub const DOCUMENT_SPDX_ID: &str = "SPDXRef-DOCUMENT";

/// Sentinel meaning "the creator made no assertion".
pub const NOASSERTION: &str = "NOASSERTION";

/// Sentinel meaning "there is no value".
pub const NONE: &str = "NONE";

/// A parsed SPDX document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpdxDocument {
    pub spdx_version: String,
    pub data_license: String,
    pub spdx_id: String,
    pub name: String,
    pub document_namespace: String,
    pub comment: Option<String>,
    pub creation_info: CreationInfo,
    pub external_document_refs: Vec<ExternalDocumentRef>,
    pub extracted_licenses: Vec<ExtractedLicenseInfo>,
    pub packages: Vec<SpdxPackage>,
    pub files: Vec<SpdxFile>,
    pub snippets: Vec<SpdxSnippet>,
    pub relationships: Vec<SpdxRelationship>,
    pub annotations: Vec<SpdxAnnotation>,
}

impl Default for SpdxDocument {
    fn default() -> Self {
        Self {
            spdx_version: String::new(),
            data_license: String::new(),
            spdx_id: DOCUMENT_SPDX_ID.to_string(),
            name: String::new(),
            document_namespace: String::new(),
            comment: None,
            creation_info: CreationInfo::default(),
            external_document_refs: Vec::new(),
            extracted_licenses: Vec::new(),
            packages: Vec::new(),
            files: Vec::new(),
            snippets: Vec::new(),
            relationships: Vec::new(),
            annotations: Vec::new(),
        }
    }
}

impl SpdxDocument {
    /// Whether `id` names this document.
    #[must_use]
    pub fn is_document_id(&self, id: &str) -> bool {
        id == self.spdx_id
    }

    /// Add a relationship, returning its arena position.
    pub fn add_relationship(&mut self, relationship: SpdxRelationship) -> usize {
        self.relationships.push(relationship);
        self.relationships.len() - 1
    }
}

/// Who produced the document, and when.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreationInfo {
    /// Raw `"Type: value"` creator strings
    pub creators: Vec<String>,
    pub created: Option<String>,
    pub comment: Option<String>,
    pub license_list_version: Option<String>,
}

/// A checksum attached to a package, file, or external document reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpdxChecksum {
    /// Upper-case algorithm name (`SHA1`, `SHA256`, `MD5`, ...)
    pub algorithm: String,
    pub value: String,
}

impl SpdxChecksum {
    pub fn new(algorithm: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            algorithm: algorithm.into(),
            value: value.into(),
        }
    }

    /// Both algorithm and value are present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.algorithm.is_empty() && !self.value.is_empty()
    }
}

/// Reference to an element of another SPDX document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalDocumentRef {
    pub external_document_id: String,
    pub spdx_document_uri: String,
    pub checksum: Option<SpdxChecksum>,
}

/// A non-listed license declared inside the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedLicenseInfo {
    pub license_id: String,
    pub extracted_text: Option<String>,
    pub name: Option<String>,
    pub cross_refs: Vec<String>,
    pub comment: Option<String>,
}

/// Verification code computed over a package's files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageVerificationCode {
    pub value: String,
    pub excluded_files: Vec<String>,
}

/// External reference (purl, cpe, ...) of a package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpdxExternalRef {
    /// Category in enum form (`PACKAGE_MANAGER`, `SECURITY`, ...)
    pub category: String,
    pub reference_type: String,
    pub locator: String,
    pub comment: Option<String>,
}

/// An SPDX package element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpdxPackage {
    pub spdx_id: String,
    pub name: String,
    pub version: Option<String>,
    pub package_file_name: Option<String>,
    pub supplier: Option<String>,
    pub originator: Option<String>,
    pub download_location: Option<String>,
    pub files_analyzed: Option<bool>,
    pub verification_code: Option<PackageVerificationCode>,
    pub checksums: Vec<SpdxChecksum>,
    pub homepage: Option<String>,
    pub source_info: Option<String>,
    pub license_concluded: Option<String>,
    pub license_info_from_files: Vec<String>,
    pub license_declared: Option<String>,
    pub license_comments: Option<String>,
    pub copyright_text: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub comment: Option<String>,
    pub external_refs: Vec<SpdxExternalRef>,
    pub attribution_texts: Vec<String>,
    pub primary_package_purpose: Option<String>,
    pub release_date: Option<String>,
    pub built_date: Option<String>,
    pub valid_until_date: Option<String>,
}

impl SpdxPackage {
    pub fn new(spdx_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            spdx_id: spdx_id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Version, treating an empty string as absent.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref().filter(|v| !v.trim().is_empty())
    }

    /// `"name version"`, the key releases and projects are deduplicated on.
    #[must_use]
    pub fn qualified_name(&self) -> Option<String> {
        self.version().map(|v| format!("{} {v}", self.name))
    }
}

/// An SPDX file element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpdxFile {
    pub spdx_id: String,
    pub file_name: String,
    pub checksums: Vec<SpdxChecksum>,
    pub license_concluded: Option<String>,
    pub license_info_in_file: Vec<String>,
    pub copyright_text: Option<String>,
    pub comment: Option<String>,
}

/// How a [`SinglePointer`] addresses a position inside a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    ByteOffset,
    LineNumber,
}

impl fmt::Display for PointerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByteOffset => write!(f, "byte offset"),
            Self::LineNumber => write!(f, "line number"),
        }
    }
}

/// A position inside the file a snippet was taken from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinglePointer {
    pub reference: String,
    pub kind: PointerKind,
    pub value: u64,
}

impl SinglePointer {
    pub fn byte_offset(reference: impl Into<String>, value: u64) -> Self {
        Self {
            reference: reference.into(),
            kind: PointerKind::ByteOffset,
            value,
        }
    }

    pub fn line_number(reference: impl Into<String>, value: u64) -> Self {
        Self {
            reference: reference.into(),
            kind: PointerKind::LineNumber,
            value,
        }
    }
}

/// A start/end pointer pair. Either side may be missing in malformed input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartEndPointer {
    pub start: Option<SinglePointer>,
    pub end: Option<SinglePointer>,
}

impl StartEndPointer {
    pub fn new(start: SinglePointer, end: SinglePointer) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// An SPDX snippet element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpdxSnippet {
    pub spdx_id: String,
    pub snippet_from_file: String,
    pub byte_range: StartEndPointer,
    pub line_range: Option<StartEndPointer>,
    pub license_concluded: Option<String>,
    pub license_info_in_snippet: Vec<String>,
    pub license_comments: Option<String>,
    pub copyright_text: Option<String>,
    pub comment: Option<String>,
    pub name: Option<String>,
    pub attribution_texts: Vec<String>,
}

/// SPDX relationship kinds.
///
/// Only a handful drive import decisions; the rest round-trip by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RelationshipType {
    Describes,
    DescribedBy,
    Contains,
    ContainedBy,
    DependsOn,
    DependencyOf,
    DynamicLink,
    StaticLink,
    Other(String),
}

impl RelationshipType {
    /// Parse an SPDX relationship type name. Unknown names are preserved.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let upper = s.trim().to_uppercase().replace('-', "_");
        match upper.as_str() {
            "DESCRIBES" => Self::Describes,
            "DESCRIBED_BY" => Self::DescribedBy,
            "CONTAINS" => Self::Contains,
            "CONTAINED_BY" => Self::ContainedBy,
            "DEPENDS_ON" => Self::DependsOn,
            "DEPENDENCY_OF" => Self::DependencyOf,
            "DYNAMIC_LINK" => Self::DynamicLink,
            "STATIC_LINK" => Self::StaticLink,
            _ => Self::Other(upper),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Describes => "DESCRIBES",
            Self::DescribedBy => "DESCRIBED_BY",
            Self::Contains => "CONTAINS",
            Self::ContainedBy => "CONTAINED_BY",
            Self::DependsOn => "DEPENDS_ON",
            Self::DependencyOf => "DEPENDENCY_OF",
            Self::DynamicLink => "DYNAMIC_LINK",
            Self::StaticLink => "STATIC_LINK",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed relationship between two elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpdxRelationship {
    pub spdx_element_id: String,
    pub relationship_type: RelationshipType,
    pub related_spdx_element: String,
    pub comment: Option<String>,
}

impl SpdxRelationship {
    pub fn new(
        spdx_element_id: impl Into<String>,
        relationship_type: RelationshipType,
        related_spdx_element: impl Into<String>,
    ) -> Self {
        Self {
            spdx_element_id: spdx_element_id.into(),
            relationship_type,
            related_spdx_element: related_spdx_element.into(),
            comment: None,
        }
    }
}

/// An annotation on some element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpdxAnnotation {
    /// Annotated element; the document itself when the source leaves it out
    pub spdx_ref: String,
    pub annotator: String,
    pub annotation_date: Option<String>,
    /// `REVIEW` or `OTHER`
    pub annotation_type: String,
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationship_type_parse() {
        assert_eq!(RelationshipType::parse("CONTAINS"), RelationshipType::Contains);
        assert_eq!(RelationshipType::parse("described-by"), RelationshipType::DescribedBy);
        assert_eq!(
            RelationshipType::parse("GENERATED_FROM"),
            RelationshipType::Other("GENERATED_FROM".to_string())
        );
        assert_eq!(RelationshipType::parse("GENERATED_FROM").as_str(), "GENERATED_FROM");
    }

    #[test]
    fn test_package_version_blank_is_absent() {
        let pkg = SpdxPackage::new("SPDXRef-A", "a").with_version("  ");
        assert_eq!(pkg.version(), None);
        assert_eq!(pkg.qualified_name(), None);

        let pkg = SpdxPackage::new("SPDXRef-A", "a").with_version("1.0");
        assert_eq!(pkg.qualified_name().as_deref(), Some("a 1.0"));
    }

    #[test]
    fn test_default_document_id() {
        let doc = SpdxDocument::default();
        assert!(doc.is_document_id(DOCUMENT_SPDX_ID));
    }
}
