//! File type detection for uploaded SPDX documents.
//!
//! The serialization is decided from the file name alone. Content is never
//! sniffed: an upload whose name does not carry a supported suffix is
//! rejected before a parser ever sees it.

use std::fmt;
use std::path::Path;

/// Supported SPDX serializations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpdxFileType {
    /// `Tag: value` lines, `.spdx`
    TagValue,
    /// RDF/XML, `.rdf` or `*rdf.xml`
    RdfXml,
}

impl SpdxFileType {
    /// Get the human-readable name for this file type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::TagValue => "tag-value",
            Self::RdfXml => "RDF/XML",
        }
    }

    /// Suffix used for scratch copies of uploads of this type.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::TagValue => ".spdx",
            Self::RdfXml => ".rdf",
        }
    }
}

impl fmt::Display for SpdxFileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lower-cased extension of a file name, if it has one.
fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
}

/// Determine the SPDX serialization from a file name.
///
/// Returns `None` for anything that is not `.spdx`, `.rdf`, or an `.xml`
/// file whose name ends in `rdf.xml`.
#[must_use]
pub fn detect_file_type(file_name: &str) -> Option<SpdxFileType> {
    match extension_of(file_name)?.as_str() {
        "spdx" => Some(SpdxFileType::TagValue),
        "rdf" => Some(SpdxFileType::RdfXml),
        "xml" if file_name.to_lowercase().ends_with("rdf.xml") => Some(SpdxFileType::RdfXml),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_tag_value() {
        assert_eq!(detect_file_type("bom.spdx"), Some(SpdxFileType::TagValue));
        assert_eq!(detect_file_type("BOM.SPDX"), Some(SpdxFileType::TagValue));
        assert_eq!(
            detect_file_type("/uploads/nested/bom.spdx"),
            Some(SpdxFileType::TagValue)
        );
    }

    #[test]
    fn test_detect_rdf() {
        assert_eq!(detect_file_type("bom.rdf"), Some(SpdxFileType::RdfXml));
        assert_eq!(detect_file_type("bom.rdf.xml"), Some(SpdxFileType::RdfXml));
        assert_eq!(detect_file_type("bom-rdf.xml"), Some(SpdxFileType::RdfXml));
        assert_eq!(detect_file_type("BOM.RDF.XML"), Some(SpdxFileType::RdfXml));
    }

    #[test]
    fn test_reject_other_names() {
        assert_eq!(detect_file_type("bom.xml"), None);
        assert_eq!(detect_file_type("bom.json"), None);
        assert_eq!(detect_file_type("bom.spdx.json"), None);
        assert_eq!(detect_file_type("spdx"), None);
        assert_eq!(detect_file_type(""), None);
    }
}
