//! SPDX RDF/XML reader.
//!
//! RDF/XML alternates class elements (`spdx:Package`, `spdx:Relationship`,
//! upper-case local names) with property elements (`spdx:name`,
//! `spdx:relatedSpdxElement`, lower-case). Class elements open a frame on a
//! stack; property values apply to the innermost frame. A class element
//! nested inside a property is both hoisted into the document arenas and
//! used as that property's value, which is how inline definitions such as
//! a package inside `relatedSpdxElement` resolve.

use super::detection::SpdxFileType;
use super::traits::{DocumentParser, ParseError};
use crate::model::{
    ExternalDocumentRef, ExtractedLicenseInfo, NOASSERTION, NONE, PackageVerificationCode,
    PointerKind, RelationshipType, SinglePointer, SpdxAnnotation, SpdxChecksum, SpdxDocument,
    SpdxExternalRef, SpdxFile, SpdxPackage, SpdxRelationship, SpdxSnippet, StartEndPointer,
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;

/// Parser for the RDF/XML serialization
#[derive(Debug, Clone, Copy, Default)]
pub struct RdfXmlParser;

impl RdfXmlParser {
    /// Create a new RDF/XML parser
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// Extract local name from qualified XML name (strips namespace prefix)
fn local_name(name: &[u8]) -> String {
    let name_str = String::from_utf8_lossy(name);
    name_str
        .rfind(':')
        .map_or_else(|| name_str.to_string(), |idx| name_str[idx + 1..].to_string())
}

fn is_uri(value: &str) -> bool {
    value.contains("://") || value.starts_with('#')
}

/// Extract SPDX ID from URI (e.g., "http://example.org#SPDXRef-Package" -> "SPDXRef-Package")
fn extract_spdx_id_from_uri(uri: &str) -> String {
    if !is_uri(uri) {
        return uri.to_string();
    }
    uri.rfind('#').map_or_else(
        || uri.rfind('/').map_or_else(|| uri.to_string(), |idx| uri[idx + 1..].to_string()),
        |idx| uri[idx + 1..].to_string(),
    )
}

/// Extract license identifier from URI (e.g., "http://spdx.org/licenses/MIT" -> "MIT")
fn extract_license_from_uri(uri: &str) -> String {
    if !is_uri(uri) {
        return uri.to_string();
    }
    let last = uri
        .rsplit(['/', '#'])
        .find(|segment| !segment.is_empty())
        .unwrap_or(uri);
    let lowered = last.to_lowercase();
    if lowered == "noassertion" {
        NOASSERTION.to_string()
    } else if lowered == "none" {
        NONE.to_string()
    } else {
        last.to_string()
    }
}

/// Strip the vocabulary prefix of an enumerated term
/// (`http://spdx.org/rdf/terms#relationshipType_contains` -> `contains`).
fn vocabulary_term<'a>(value: &'a str, prefix: &str) -> &'a str {
    let term = value.rfind('#').map_or(value, |idx| &value[idx + 1..]);
    term.strip_prefix(prefix).unwrap_or(term)
}

/// `packageManager` / `package-manager` -> `PACKAGE_MANAGER`
fn screaming_snake(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 4);
    let mut prev_lower = false;
    for c in value.chars() {
        if c == '-' || c == '_' || c.is_whitespace() {
            out.push('_');
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower {
            out.push('_');
        }
        prev_lower = c.is_lowercase();
        out.extend(c.to_uppercase());
    }
    out
}

/// Normalize a property value, whether it came as text or `rdf:resource`.
fn normalize_value(property: &str, raw: &str) -> String {
    match property {
        "relationshipType" => vocabulary_term(raw, "relationshipType_").to_uppercase(),
        "algorithm" => vocabulary_term(raw, "checksumAlgorithm_").to_uppercase(),
        "annotationType" => vocabulary_term(raw, "annotationType_").to_uppercase(),
        "primaryPackagePurpose" => vocabulary_term(raw, "purpose_").to_uppercase(),
        "referenceCategory" => screaming_snake(vocabulary_term(raw, "referenceCategory_")),
        "referenceType" => raw
            .rsplit(['/', '#'])
            .find(|segment| !segment.is_empty())
            .unwrap_or(raw)
            .to_string(),
        "dataLicense" | "licenseConcluded" | "licenseDeclared" | "licenseInfoFromFiles"
        | "licenseInfoInFile" | "licenseInfoInSnippet" | "member" => extract_license_from_uri(raw),
        "relatedSpdxElement" | "spdxElementId" | "snippetFromFile" | "reference"
        | "describesPackage" => extract_spdx_id_from_uri(raw),
        _ => raw.to_string(),
    }
}

/// `rdf:about` and `rdf:resource` of an element.
fn rdf_attributes(e: &BytesStart<'_>) -> (Option<String>, Option<String>) {
    let mut about = None;
    let mut resource = None;
    for attr in e.attributes().filter_map(std::result::Result::ok) {
        match local_name(attr.key.as_ref()).as_str() {
            "about" => about = Some(String::from_utf8_lossy(&attr.value).to_string()),
            "resource" => resource = Some(String::from_utf8_lossy(&attr.value).to_string()),
            _ => {}
        }
    }
    (about, resource)
}

fn is_class_name(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Partially read class element.
#[derive(Debug)]
enum Node {
    Document,
    CreationInfo,
    Package(SpdxPackage),
    File(SpdxFile),
    Snippet(SpdxSnippet),
    Relationship(SpdxRelationship),
    Annotation(SpdxAnnotation),
    Checksum(SpdxChecksum),
    ExternalRef(SpdxExternalRef),
    ExternalDocumentRef(ExternalDocumentRef),
    ExtractedLicense(ExtractedLicenseInfo),
    VerificationCode(PackageVerificationCode),
    Range(StartEndPointer),
    Pointer {
        kind: PointerKind,
        reference: String,
        value: Option<u64>,
    },
    LicenseSet {
        operator: &'static str,
        members: Vec<String>,
    },
    Opaque {
        about: Option<String>,
    },
}

#[derive(Debug)]
struct Frame {
    node: Node,
    /// Property element this class element is the value of
    property: Option<String>,
}

#[derive(Default)]
struct RdfBuilder {
    doc: SpdxDocument,
    frames: Vec<Frame>,
    saw_document: bool,
    package_positions: HashMap<String, usize>,
    file_positions: HashMap<String, usize>,
    snippet_positions: HashMap<String, usize>,
}

impl RdfBuilder {
    /// SPDX id of the innermost element frame; the document when there is none.
    fn enclosing_element_id(&self) -> String {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| match &frame.node {
                Node::Package(pkg) => Some(pkg.spdx_id.clone()),
                Node::File(file) => Some(file.spdx_id.clone()),
                Node::Snippet(snippet) => Some(snippet.spdx_id.clone()),
                Node::Document => Some(self.doc.spdx_id.clone()),
                _ => None,
            })
            .unwrap_or_else(|| self.doc.spdx_id.clone())
    }

    fn open_class(&mut self, name: &str, about: Option<String>, property: Option<String>) {
        let id = about
            .as_deref()
            .map(extract_spdx_id_from_uri)
            .unwrap_or_default();
        let node = match name {
            "SpdxDocument" => {
                if let Some(about) = about.as_deref() {
                    match about.split_once('#') {
                        Some((namespace, fragment)) => {
                            self.doc.document_namespace = namespace.to_string();
                            if !fragment.is_empty() {
                                self.doc.spdx_id = fragment.to_string();
                            }
                        }
                        None => self.doc.document_namespace = about.to_string(),
                    }
                }
                self.saw_document = true;
                Node::Document
            }
            "CreationInfo" => Node::CreationInfo,
            "Package" => Node::Package(SpdxPackage {
                spdx_id: id,
                ..SpdxPackage::default()
            }),
            "File" => Node::File(SpdxFile {
                spdx_id: id,
                ..SpdxFile::default()
            }),
            "Snippet" => Node::Snippet(SpdxSnippet {
                spdx_id: id,
                ..SpdxSnippet::default()
            }),
            "Relationship" => Node::Relationship(SpdxRelationship::new(
                self.enclosing_element_id(),
                RelationshipType::Other(String::new()),
                String::new(),
            )),
            "Annotation" => Node::Annotation(SpdxAnnotation {
                spdx_ref: self.enclosing_element_id(),
                ..SpdxAnnotation::default()
            }),
            "Checksum" => Node::Checksum(SpdxChecksum::default()),
            "ExternalRef" => Node::ExternalRef(SpdxExternalRef::default()),
            "ExternalDocumentRef" => Node::ExternalDocumentRef(ExternalDocumentRef::default()),
            "ExtractedLicensingInfo" => Node::ExtractedLicense(ExtractedLicenseInfo {
                license_id: about
                    .as_deref()
                    .map(extract_license_from_uri)
                    .unwrap_or_default(),
                ..ExtractedLicenseInfo::default()
            }),
            "PackageVerificationCode" => {
                Node::VerificationCode(PackageVerificationCode::default())
            }
            "StartEndPointer" => Node::Range(StartEndPointer::default()),
            "ByteOffsetPointer" => Node::Pointer {
                kind: PointerKind::ByteOffset,
                reference: String::new(),
                value: None,
            },
            "LineCharPointer" => Node::Pointer {
                kind: PointerKind::LineNumber,
                reference: String::new(),
                value: None,
            },
            "DisjunctiveLicenseSet" => Node::LicenseSet {
                operator: "OR",
                members: Vec::new(),
            },
            "ConjunctiveLicenseSet" => Node::LicenseSet {
                operator: "AND",
                members: Vec::new(),
            },
            _ => Node::Opaque { about },
        };
        self.frames.push(Frame { node, property });
    }

    fn close_class(&mut self) {
        let Some(Frame { node, property }) = self.frames.pop() else {
            return;
        };
        match node {
            Node::Document | Node::CreationInfo => {}
            Node::Package(pkg) => {
                let id = pkg.spdx_id.clone();
                self.store_package(pkg);
                self.link(property, &id);
            }
            Node::File(file) => {
                let id = file.spdx_id.clone();
                self.store_file(file);
                self.link(property, &id);
            }
            Node::Snippet(snippet) => {
                let id = snippet.spdx_id.clone();
                self.store_snippet(snippet);
                self.link(property, &id);
            }
            Node::Relationship(rel) => {
                if !rel.related_spdx_element.is_empty() {
                    self.doc.add_relationship(rel);
                }
            }
            Node::Annotation(annotation) => self.doc.annotations.push(annotation),
            Node::Checksum(checksum) => {
                let owner = self.frames.iter_mut().rev().find(|f| {
                    matches!(
                        f.node,
                        Node::Package(_) | Node::File(_) | Node::ExternalDocumentRef(_)
                    )
                });
                match owner.map(|f| &mut f.node) {
                    Some(Node::Package(pkg)) => pkg.checksums.push(checksum),
                    Some(Node::File(file)) => file.checksums.push(checksum),
                    Some(Node::ExternalDocumentRef(ext)) => ext.checksum = Some(checksum),
                    _ => {}
                }
            }
            Node::ExternalRef(ext_ref) => {
                if let Some(pkg) = self.innermost_package() {
                    pkg.external_refs.push(ext_ref);
                }
            }
            Node::ExternalDocumentRef(ext) => self.doc.external_document_refs.push(ext),
            Node::ExtractedLicense(license) => {
                let id = license.license_id.clone();
                if !self
                    .doc
                    .extracted_licenses
                    .iter()
                    .any(|l| l.license_id == id)
                {
                    self.doc.extracted_licenses.push(license);
                }
                if let Some(property) = property.filter(|p| p != "hasExtractedLicensingInfo") {
                    self.apply_value(&property, id);
                }
            }
            Node::VerificationCode(code) => {
                if let Some(pkg) = self.innermost_package() {
                    pkg.verification_code = Some(code);
                }
            }
            Node::Range(range) => {
                let snippet = self.frames.iter_mut().rev().find_map(|f| match &mut f.node {
                    Node::Snippet(s) => Some(s),
                    _ => None,
                });
                if let Some(snippet) = snippet {
                    assign_range(snippet, range);
                }
            }
            Node::Pointer {
                kind,
                reference,
                value,
            } => {
                let pointer = value.map(|value| SinglePointer {
                    reference,
                    kind,
                    value,
                });
                if let Some(Node::Range(range)) = self.frames.last_mut().map(|f| &mut f.node) {
                    match property.as_deref() {
                        Some("startPointer") => range.start = pointer,
                        Some("endPointer") => range.end = pointer,
                        _ => {}
                    }
                }
            }
            Node::LicenseSet { operator, members } => {
                let expression = match members.len() {
                    0 => String::new(),
                    1 => members.concat(),
                    _ => {
                        let separator = format!(" {operator} ");
                        format!("({})", members.join(separator.as_str()))
                    }
                };
                if let Some(property) = property {
                    if !expression.is_empty() {
                        self.apply_value(&property, expression);
                    }
                }
            }
            Node::Opaque { about } => {
                if let (Some(property), Some(about)) = (property, about) {
                    self.apply_resource(&property, &about);
                }
            }
        }
    }

    fn innermost_package(&mut self) -> Option<&mut SpdxPackage> {
        self.frames.iter_mut().rev().find_map(|f| match &mut f.node {
            Node::Package(pkg) => Some(pkg),
            _ => None,
        })
    }

    /// A class element closed inside a property: its id is the property value.
    fn link(&mut self, property: Option<String>, id: &str) {
        if let Some(property) = property {
            if !id.is_empty() {
                self.apply_value(&property, id.to_string());
            }
        }
    }

    fn store_package(&mut self, pkg: SpdxPackage) {
        match self.package_positions.get(&pkg.spdx_id) {
            Some(&pos) => {
                // A bare reference may precede the full definition
                if self.doc.packages[pos].name.is_empty() {
                    self.doc.packages[pos] = pkg;
                }
            }
            None => {
                self.package_positions
                    .insert(pkg.spdx_id.clone(), self.doc.packages.len());
                self.doc.packages.push(pkg);
            }
        }
    }

    fn store_file(&mut self, file: SpdxFile) {
        match self.file_positions.get(&file.spdx_id) {
            Some(&pos) => {
                if self.doc.files[pos].file_name.is_empty() {
                    self.doc.files[pos] = file;
                }
            }
            None => {
                self.file_positions
                    .insert(file.spdx_id.clone(), self.doc.files.len());
                self.doc.files.push(file);
            }
        }
    }

    fn store_snippet(&mut self, snippet: SpdxSnippet) {
        match self.snippet_positions.get(&snippet.spdx_id) {
            Some(&pos) => {
                if self.doc.snippets[pos].snippet_from_file.is_empty() {
                    self.doc.snippets[pos] = snippet;
                }
            }
            None => {
                self.snippet_positions
                    .insert(snippet.spdx_id.clone(), self.doc.snippets.len());
                self.doc.snippets.push(snippet);
            }
        }
    }

    fn apply_resource(&mut self, property: &str, uri: &str) {
        let value = normalize_value(property, uri);
        self.apply_value(property, value);
    }

    fn apply_value(&mut self, property: &str, value: String) {
        if property == "describesPackage" {
            let doc_id = self.doc.spdx_id.clone();
            self.doc.add_relationship(SpdxRelationship::new(
                doc_id,
                RelationshipType::Describes,
                value,
            ));
            return;
        }

        let doc = &mut self.doc;
        let Some(frame) = self.frames.last_mut() else {
            return;
        };
        match &mut frame.node {
            Node::Document => match property {
                "specVersion" | "spdxVersion" => doc.spdx_version = value,
                "dataLicense" => doc.data_license = value,
                "name" => doc.name = value,
                "comment" => doc.comment = Some(value),
                _ => {}
            },
            Node::CreationInfo => match property {
                "created" => doc.creation_info.created = Some(value),
                "creator" => doc.creation_info.creators.push(value),
                "licenseListVersion" => doc.creation_info.license_list_version = Some(value),
                "comment" => doc.creation_info.comment = Some(value),
                _ => {}
            },
            Node::Package(pkg) => apply_package_property(pkg, property, value),
            Node::File(file) => match property {
                "fileName" => file.file_name = value,
                "licenseConcluded" => file.license_concluded = Some(value),
                "licenseInfoInFile" => file.license_info_in_file.push(value),
                "copyrightText" => file.copyright_text = Some(value),
                "comment" => file.comment = Some(value),
                _ => {}
            },
            Node::Snippet(snippet) => match property {
                "snippetFromFile" => snippet.snippet_from_file = value,
                "licenseConcluded" => snippet.license_concluded = Some(value),
                "licenseInfoInSnippet" => snippet.license_info_in_snippet.push(value),
                "licenseComments" => snippet.license_comments = Some(value),
                "copyrightText" => snippet.copyright_text = Some(value),
                "comment" => snippet.comment = Some(value),
                "name" => snippet.name = Some(value),
                "attributionText" => snippet.attribution_texts.push(value),
                _ => {}
            },
            Node::Relationship(rel) => match property {
                "relationshipType" => rel.relationship_type = RelationshipType::parse(&value),
                "relatedSpdxElement" => rel.related_spdx_element = value,
                "spdxElementId" => rel.spdx_element_id = value,
                "comment" => rel.comment = Some(value),
                _ => {}
            },
            Node::Annotation(annotation) => match property {
                "annotator" => annotation.annotator = value,
                "annotationDate" => annotation.annotation_date = Some(value),
                "annotationType" => annotation.annotation_type = value,
                "comment" => annotation.comment = Some(value),
                _ => {}
            },
            Node::Checksum(checksum) => match property {
                "algorithm" => checksum.algorithm = value,
                "checksumValue" => checksum.value = value,
                _ => {}
            },
            Node::ExternalRef(ext_ref) => match property {
                "referenceCategory" => ext_ref.category = value,
                "referenceType" => ext_ref.reference_type = value,
                "referenceLocator" => ext_ref.locator = value,
                "comment" => ext_ref.comment = Some(value),
                _ => {}
            },
            Node::ExternalDocumentRef(ext) => match property {
                "externalDocumentId" => ext.external_document_id = value,
                "spdxDocument" => ext.spdx_document_uri = value,
                _ => {}
            },
            Node::ExtractedLicense(license) => match property {
                "licenseId" => license.license_id = value,
                "extractedText" => license.extracted_text = Some(value),
                "name" => license.name = Some(value),
                "seeAlso" => license.cross_refs.push(value),
                "comment" => license.comment = Some(value),
                _ => {}
            },
            Node::VerificationCode(code) => match property {
                "packageVerificationCodeValue" => code.value = value,
                "packageVerificationCodeExcludedFile" => code.excluded_files.push(value),
                _ => {}
            },
            Node::Pointer {
                reference,
                value: pointer_value,
                ..
            } => match property {
                "offset" | "lineNumber" => *pointer_value = value.trim().parse().ok(),
                "reference" => *reference = value,
                _ => {}
            },
            Node::LicenseSet { members, .. } => {
                if property == "member" {
                    members.push(value);
                }
            }
            Node::Range(_) | Node::Opaque { .. } => {}
        }
    }

    fn finish(self) -> Result<SpdxDocument, ParseError> {
        if !self.saw_document {
            return Err(ParseError::InvalidStructure(
                "no SpdxDocument element found".to_string(),
            ));
        }
        Ok(self.doc)
    }
}

fn apply_package_property(pkg: &mut SpdxPackage, property: &str, value: String) {
    match property {
        "name" => pkg.name = value,
        "versionInfo" => pkg.version = Some(value),
        "packageFileName" => pkg.package_file_name = Some(value),
        "supplier" => pkg.supplier = Some(value),
        "originator" => pkg.originator = Some(value),
        "downloadLocation" => pkg.download_location = Some(value),
        "filesAnalyzed" => pkg.files_analyzed = Some(value.eq_ignore_ascii_case("true")),
        "homepage" => pkg.homepage = Some(value),
        "sourceInfo" => pkg.source_info = Some(value),
        "primaryPackagePurpose" => pkg.primary_package_purpose = Some(value),
        "releaseDate" => pkg.release_date = Some(value),
        "builtDate" => pkg.built_date = Some(value),
        "validUntilDate" => pkg.valid_until_date = Some(value),
        "licenseConcluded" => pkg.license_concluded = Some(value),
        "licenseInfoFromFiles" => pkg.license_info_from_files.push(value),
        "licenseDeclared" => pkg.license_declared = Some(value),
        "licenseComments" => pkg.license_comments = Some(value),
        "copyrightText" => pkg.copyright_text = Some(value),
        "summary" => pkg.summary = Some(value),
        "description" => pkg.description = Some(value),
        "comment" => pkg.comment = Some(value),
        "attributionText" => pkg.attribution_texts.push(value),
        _ => {}
    }
}

/// Byte ranges go to `byte_range`, line ranges to `line_range`; the start
/// pointer decides, so a mismatched pair stays visible to the mapper.
fn assign_range(snippet: &mut SpdxSnippet, range: StartEndPointer) {
    let kind = range
        .start
        .as_ref()
        .or(range.end.as_ref())
        .map(|p| p.kind);
    match kind {
        Some(PointerKind::LineNumber) => snippet.line_range = Some(range),
        Some(PointerKind::ByteOffset) => snippet.byte_range = range,
        None => {
            if snippet.byte_range.is_empty() {
                snippet.byte_range = range;
            }
        }
    }
}

impl DocumentParser for RdfXmlParser {
    fn parse_str(&self, content: &str) -> Result<SpdxDocument, ParseError> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(true);

        let mut builder = RdfBuilder::default();
        let mut element_stack: Vec<String> = Vec::new();
        let mut current_text = String::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let name = local_name(e.name().as_ref());
                    let (about, resource) = rdf_attributes(e);
                    current_text.clear();
                    if is_class_name(&name) {
                        let property = element_stack
                            .last()
                            .filter(|parent| !is_class_name(parent))
                            .cloned();
                        builder.open_class(&name, about, property);
                    } else if let Some(resource) = resource {
                        builder.apply_resource(&name, &resource);
                    }
                    element_stack.push(name);
                }
                Ok(Event::Empty(ref e)) => {
                    let name = local_name(e.name().as_ref());
                    let (about, resource) = rdf_attributes(e);
                    if is_class_name(&name) {
                        // A bare `<spdx:Package rdf:about="..."/>` only references
                        let property = element_stack
                            .last()
                            .filter(|parent| !is_class_name(parent));
                        if let (Some(property), Some(about)) = (property, about) {
                            builder.apply_resource(property, &about);
                        }
                    } else if let Some(resource) = resource {
                        builder.apply_resource(&name, &resource);
                    }
                }
                Ok(Event::Text(ref e)) => {
                    let text = e
                        .unescape()
                        .map_err(|err| ParseError::XmlError(err.to_string()))?;
                    current_text.push_str(&text);
                }
                Ok(Event::CData(ref e)) => {
                    current_text.push_str(&String::from_utf8_lossy(e));
                }
                Ok(Event::End(ref e)) => {
                    let name = local_name(e.name().as_ref());
                    element_stack.pop();
                    if is_class_name(&name) {
                        builder.close_class();
                    } else if !current_text.trim().is_empty() {
                        let value = normalize_value(&name, current_text.trim());
                        builder.apply_value(&name, value);
                    }
                    current_text.clear();
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(ParseError::XmlError(format!(
                        "Error parsing RDF/XML at position {}: {:?}",
                        reader.buffer_position(),
                        e
                    )));
                }
                _ => {}
            }
            buf.clear();
        }

        if !element_stack.is_empty() {
            return Err(ParseError::XmlError(format!(
                "unexpected end of document inside <{}>",
                element_stack.join("/")
            )));
        }

        builder.finish()
    }

    fn file_type(&self) -> SpdxFileType {
        SpdxFileType::RdfXml
    }
}
