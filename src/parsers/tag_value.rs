//! SPDX tag-value reader.
//!
//! The format is a flat sequence of `Tag: value` lines. Sections are
//! implied: `PackageName`, `FileName`, `SnippetSPDXID` and `LicenseID` each
//! open a new element, and element-level tags (`SPDXID`, checksums, license
//! fields) apply to whichever element was opened last. `<text>` values may
//! span several lines.

use super::detection::SpdxFileType;
use super::traits::{DocumentParser, ParseError};
use crate::model::{
    ExternalDocumentRef, ExtractedLicenseInfo, PackageVerificationCode, RelationshipType,
    SinglePointer, SpdxAnnotation, SpdxChecksum, SpdxDocument, SpdxExternalRef, SpdxFile,
    SpdxPackage, SpdxRelationship, SpdxSnippet, StartEndPointer,
};

/// Parser for the tag-value serialization
#[derive(Debug, Clone, Copy, Default)]
pub struct TagValueParser;

impl TagValueParser {
    /// Create a new tag-value parser
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Parse a relationship line (`SPDXRef-A CONTAINS SPDXRef-B`)
    fn parse_relationship_line(value: &str) -> Option<SpdxRelationship> {
        let parts: Vec<&str> = value.split_whitespace().collect();
        if parts.len() >= 3 {
            Some(SpdxRelationship::new(
                parts[0],
                RelationshipType::parse(parts[1]),
                parts[2],
            ))
        } else {
            None
        }
    }

    /// Parse an external ref line (`PACKAGE-MANAGER purl pkg:npm/x@1`)
    fn parse_external_ref_line(value: &str) -> Option<SpdxExternalRef> {
        let parts: Vec<&str> = value.split_whitespace().collect();
        if parts.len() >= 3 {
            Some(SpdxExternalRef {
                category: parts[0].to_uppercase().replace('-', "_"),
                reference_type: parts[1].to_string(),
                locator: parts[2].to_string(),
                comment: None,
            })
        } else {
            None
        }
    }

    /// Parse a checksum line (`SHA1: 85ed0817af83a24ad8da68c2b5094de69833983c`)
    fn parse_checksum_line(value: &str) -> Option<SpdxChecksum> {
        let (algorithm, checksum) = value.split_once(':')?;
        Some(SpdxChecksum::new(
            algorithm.trim().to_uppercase(),
            checksum.trim(),
        ))
    }

    /// Parse an external document reference
    /// (`DocumentRef-x http://example.org/doc SHA1: d6a7...`)
    fn parse_external_document_ref_line(value: &str) -> Option<ExternalDocumentRef> {
        let mut parts = value.splitn(3, char::is_whitespace);
        let id = parts.next().filter(|s| !s.is_empty())?;
        let uri = parts.next().map(str::trim).filter(|s| !s.is_empty())?;
        let checksum = parts.next().and_then(Self::parse_checksum_line);
        Some(ExternalDocumentRef {
            external_document_id: id.to_string(),
            spdx_document_uri: uri.to_string(),
            checksum,
        })
    }

    /// Parse a verification code (`d6a7... (excludes: ./a.spdx, ./b.txt)`)
    fn parse_verification_code(value: &str) -> PackageVerificationCode {
        match value.split_once('(') {
            Some((code, rest)) => {
                let inner = rest.trim_end().trim_end_matches(')');
                let files = inner
                    .split_once(':')
                    .map_or(inner, |(_, files)| files);
                PackageVerificationCode {
                    value: code.trim().to_string(),
                    excluded_files: files
                        .split(',')
                        .map(str::trim)
                        .filter(|f| !f.is_empty())
                        .map(String::from)
                        .collect(),
                }
            }
            None => PackageVerificationCode {
                value: value.trim().to_string(),
                excluded_files: Vec::new(),
            },
        }
    }

    /// Parse a snippet range (`310:420`). Unparsable bounds are left empty.
    fn parse_range(value: &str, line_based: bool) -> StartEndPointer {
        let pointer = |raw: &str| {
            raw.trim().parse::<u64>().ok().map(|v| {
                if line_based {
                    SinglePointer::line_number(String::new(), v)
                } else {
                    SinglePointer::byte_offset(String::new(), v)
                }
            })
        };
        match value.split_once(':') {
            Some((start, end)) => StartEndPointer {
                start: pointer(start),
                end: pointer(end),
            },
            None => StartEndPointer {
                start: pointer(value),
                end: None,
            },
        }
    }
}

/// Element the next element-level tag applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Document,
    Package(usize),
    File(usize),
    Snippet(usize),
    License(usize),
}

/// Accumulates a document while tags stream in.
struct TagValueBuilder {
    doc: SpdxDocument,
    section: Section,
    last_relationship: Option<usize>,
    last_annotation: Option<usize>,
}

impl TagValueBuilder {
    fn new() -> Self {
        Self {
            doc: SpdxDocument::default(),
            section: Section::Document,
            last_relationship: None,
            last_annotation: None,
        }
    }

    fn package_mut(&mut self) -> Option<&mut SpdxPackage> {
        match self.section {
            Section::Package(i) => self.doc.packages.get_mut(i),
            _ => None,
        }
    }

    fn file_mut(&mut self) -> Option<&mut SpdxFile> {
        match self.section {
            Section::File(i) => self.doc.files.get_mut(i),
            _ => None,
        }
    }

    fn snippet_mut(&mut self) -> Option<&mut SpdxSnippet> {
        match self.section {
            Section::Snippet(i) => self.doc.snippets.get_mut(i),
            _ => None,
        }
    }

    fn license_mut(&mut self) -> Option<&mut ExtractedLicenseInfo> {
        match self.section {
            Section::License(i) => self.doc.extracted_licenses.get_mut(i),
            _ => None,
        }
    }

    fn annotation_mut(&mut self) -> Option<&mut SpdxAnnotation> {
        self.last_annotation
            .and_then(|i| self.doc.annotations.get_mut(i))
    }

    fn apply(&mut self, key: &str, value: String) {
        match key {
            // Document header
            "SPDXVersion" => self.doc.spdx_version = value,
            "DataLicense" => self.doc.data_license = value,
            "DocumentName" => self.doc.name = value,
            "DocumentNamespace" => self.doc.document_namespace = value,
            "DocumentComment" => self.doc.comment = Some(value),
            "ExternalDocumentRef" => {
                if let Some(ext) = TagValueParser::parse_external_document_ref_line(&value) {
                    self.doc.external_document_refs.push(ext);
                }
            }
            "SPDXID" => self.apply_spdx_id(value),

            // Creation info
            "Creator" => self.doc.creation_info.creators.push(value),
            "Created" => self.doc.creation_info.created = Some(value),
            "CreatorComment" => self.doc.creation_info.comment = Some(value),
            "LicenseListVersion" => self.doc.creation_info.license_list_version = Some(value),

            // Relationships
            "Relationship" => {
                if let Some(rel) = TagValueParser::parse_relationship_line(&value) {
                    self.last_relationship = Some(self.doc.add_relationship(rel));
                }
            }
            "RelationshipComment" => {
                if let Some(rel) = self
                    .last_relationship
                    .and_then(|i| self.doc.relationships.get_mut(i))
                {
                    rel.comment = Some(value);
                }
            }

            // Annotations
            "Annotator" => {
                self.doc.annotations.push(SpdxAnnotation {
                    spdx_ref: self.doc.spdx_id.clone(),
                    annotator: value,
                    ..SpdxAnnotation::default()
                });
                self.last_annotation = Some(self.doc.annotations.len() - 1);
            }
            "AnnotationDate" => {
                if let Some(ann) = self.annotation_mut() {
                    ann.annotation_date = Some(value);
                }
            }
            "AnnotationType" => {
                if let Some(ann) = self.annotation_mut() {
                    ann.annotation_type = value.to_uppercase();
                }
            }
            "AnnotationComment" => {
                if let Some(ann) = self.annotation_mut() {
                    ann.comment = Some(value);
                }
            }
            "SPDXREF" => {
                if let Some(ann) = self.annotation_mut() {
                    ann.spdx_ref = value;
                }
            }

            // Element openers
            "PackageName" => {
                self.doc.packages.push(SpdxPackage {
                    name: value,
                    ..SpdxPackage::default()
                });
                self.section = Section::Package(self.doc.packages.len() - 1);
            }
            "FileName" => {
                self.doc.files.push(SpdxFile {
                    file_name: value,
                    ..SpdxFile::default()
                });
                self.section = Section::File(self.doc.files.len() - 1);
            }
            "SnippetSPDXID" => {
                self.doc.snippets.push(SpdxSnippet {
                    spdx_id: value,
                    ..SpdxSnippet::default()
                });
                self.section = Section::Snippet(self.doc.snippets.len() - 1);
            }
            "LicenseID" => {
                self.doc.extracted_licenses.push(ExtractedLicenseInfo {
                    license_id: value,
                    ..ExtractedLicenseInfo::default()
                });
                self.section = Section::License(self.doc.extracted_licenses.len() - 1);
            }

            _ => self.apply_element_tag(key, value),
        }
    }

    fn apply_spdx_id(&mut self, value: String) {
        match self.section {
            Section::Document => self.doc.spdx_id = value,
            Section::Package(i) => {
                if let Some(pkg) = self.doc.packages.get_mut(i) {
                    pkg.spdx_id = value;
                }
            }
            Section::File(i) => {
                if let Some(file) = self.doc.files.get_mut(i) {
                    file.spdx_id = value;
                }
            }
            Section::Snippet(i) => {
                if let Some(snippet) = self.doc.snippets.get_mut(i) {
                    snippet.spdx_id = value;
                }
            }
            Section::License(_) => {}
        }
    }

    fn apply_element_tag(&mut self, key: &str, value: String) {
        match self.section {
            Section::Package(_) => self.apply_package_tag(key, value),
            Section::File(_) => self.apply_file_tag(key, value),
            Section::Snippet(_) => self.apply_snippet_tag(key, value),
            Section::License(_) => self.apply_license_tag(key, value),
            Section::Document => {}
        }
    }

    fn apply_package_tag(&mut self, key: &str, value: String) {
        let Some(pkg) = self.package_mut() else {
            return;
        };
        match key {
            "PackageVersion" => pkg.version = Some(value),
            "PackageFileName" => pkg.package_file_name = Some(value),
            "PackageSupplier" => pkg.supplier = Some(value),
            "PackageOriginator" => pkg.originator = Some(value),
            "PackageDownloadLocation" => pkg.download_location = Some(value),
            "FilesAnalyzed" => pkg.files_analyzed = Some(value.eq_ignore_ascii_case("true")),
            "PackageVerificationCode" => {
                pkg.verification_code = Some(TagValueParser::parse_verification_code(&value));
            }
            "PackageChecksum" => {
                if let Some(checksum) = TagValueParser::parse_checksum_line(&value) {
                    pkg.checksums.push(checksum);
                }
            }
            "PackageHomePage" => pkg.homepage = Some(value),
            "PackageSourceInfo" => pkg.source_info = Some(value),
            "PrimaryPackagePurpose" => pkg.primary_package_purpose = Some(value),
            "ReleaseDate" => pkg.release_date = Some(value),
            "BuiltDate" => pkg.built_date = Some(value),
            "ValidUntilDate" => pkg.valid_until_date = Some(value),
            "PackageLicenseConcluded" => pkg.license_concluded = Some(value),
            "PackageLicenseInfoFromFiles" => pkg.license_info_from_files.push(value),
            "PackageLicenseDeclared" => pkg.license_declared = Some(value),
            "PackageLicenseComments" => pkg.license_comments = Some(value),
            "PackageCopyrightText" => pkg.copyright_text = Some(value),
            "PackageSummary" => pkg.summary = Some(value),
            "PackageDescription" => pkg.description = Some(value),
            "PackageComment" => pkg.comment = Some(value),
            "PackageAttributionText" => pkg.attribution_texts.push(value),
            "ExternalRef" => {
                if let Some(ext_ref) = TagValueParser::parse_external_ref_line(&value) {
                    pkg.external_refs.push(ext_ref);
                }
            }
            "ExternalRefComment" => {
                if let Some(ext_ref) = pkg.external_refs.last_mut() {
                    ext_ref.comment = Some(value);
                }
            }
            _ => {}
        }
    }

    fn apply_file_tag(&mut self, key: &str, value: String) {
        let Some(file) = self.file_mut() else {
            return;
        };
        match key {
            "FileChecksum" => {
                if let Some(checksum) = TagValueParser::parse_checksum_line(&value) {
                    file.checksums.push(checksum);
                }
            }
            "LicenseConcluded" => file.license_concluded = Some(value),
            "LicenseInfoInFile" => file.license_info_in_file.push(value),
            "FileCopyrightText" => file.copyright_text = Some(value),
            "FileComment" => file.comment = Some(value),
            _ => {}
        }
    }

    fn apply_snippet_tag(&mut self, key: &str, value: String) {
        let Some(snippet) = self.snippet_mut() else {
            return;
        };
        match key {
            "SnippetFromFileSPDXID" => snippet.snippet_from_file = value,
            "SnippetByteRange" => snippet.byte_range = TagValueParser::parse_range(&value, false),
            "SnippetLineRange" => {
                snippet.line_range = Some(TagValueParser::parse_range(&value, true));
            }
            "SnippetLicenseConcluded" => snippet.license_concluded = Some(value),
            "LicenseInfoInSnippet" => snippet.license_info_in_snippet.push(value),
            "SnippetLicenseComments" => snippet.license_comments = Some(value),
            "SnippetCopyrightText" => snippet.copyright_text = Some(value),
            "SnippetComment" => snippet.comment = Some(value),
            "SnippetName" => snippet.name = Some(value),
            "SnippetAttributionText" => snippet.attribution_texts.push(value),
            _ => {}
        }
    }

    fn apply_license_tag(&mut self, key: &str, value: String) {
        let Some(license) = self.license_mut() else {
            return;
        };
        match key {
            "ExtractedText" => license.extracted_text = Some(value),
            "LicenseName" => license.name = Some(value),
            "LicenseCrossReference" => license.cross_refs.push(value),
            "LicenseComment" => license.comment = Some(value),
            _ => {}
        }
    }

    fn finish(mut self) -> Result<SpdxDocument, ParseError> {
        if self.doc.spdx_version.trim().is_empty() {
            return Err(ParseError::MissingField("SPDXVersion".to_string()));
        }
        // Range pointers point into the snippet's file
        for snippet in &mut self.doc.snippets {
            let file = snippet.snippet_from_file.clone();
            let ranges = std::iter::once(&mut snippet.byte_range).chain(snippet.line_range.as_mut());
            for range in ranges {
                for pointer in [range.start.as_mut(), range.end.as_mut()].into_iter().flatten() {
                    if pointer.reference.is_empty() {
                        pointer.reference.clone_from(&file);
                    }
                }
            }
        }
        Ok(self.doc)
    }
}

impl DocumentParser for TagValueParser {
    fn parse_str(&self, content: &str) -> Result<SpdxDocument, ParseError> {
        let mut builder = TagValueBuilder::new();
        let mut lines = content.lines().enumerate();

        while let Some((line_idx, raw)) = lines.next() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            let value = match value.strip_prefix("<text>") {
                Some(rest) => match rest.find("</text>") {
                    Some(end) => rest[..end].to_string(),
                    None => {
                        let mut text = rest.to_string();
                        let mut closed = false;
                        for (_, next) in lines.by_ref() {
                            text.push('\n');
                            if let Some(end) = next.find("</text>") {
                                text.push_str(&next[..end]);
                                closed = true;
                                break;
                            }
                            text.push_str(next);
                        }
                        if !closed {
                            return Err(ParseError::TagValueError {
                                line: line_idx + 1,
                                message: format!("unterminated <text> value for {key}"),
                            });
                        }
                        text.trim().to_string()
                    }
                },
                None => value.to_string(),
            };

            builder.apply(key, value);
        }

        builder.finish()
    }

    fn file_type(&self) -> SpdxFileType {
        SpdxFileType::TagValue
    }
}
