//! Parser trait definitions and error types.
//!
//! This module defines the `DocumentParser` trait implemented by the
//! tag-value and RDF/XML readers.

use super::detection::SpdxFileType;
use crate::model::SpdxDocument;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during SPDX parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("XML parse error: {0}")]
    XmlError(String),

    #[error("Tag-value parse error at line {line}: {message}")]
    TagValueError { line: usize, message: String },

    #[error("Invalid SPDX structure: {0}")]
    InvalidStructure(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

impl From<quick_xml::Error> for ParseError {
    fn from(err: quick_xml::Error) -> Self {
        Self::XmlError(err.to_string())
    }
}

/// Trait for SPDX serialization readers
///
/// Implementors provide `parse_str()`; reading from disk is shared.
pub trait DocumentParser {
    /// Parse a document from a file path
    fn parse(&self, path: &Path) -> Result<SpdxDocument, ParseError> {
        let content = std::fs::read_to_string(path)?;
        self.parse_str(&content)
    }

    /// Parse a document from string content
    fn parse_str(&self, content: &str) -> Result<SpdxDocument, ParseError>;

    /// The serialization this parser reads
    fn file_type(&self) -> SpdxFileType;
}
