//! SPDX document readers.
//!
//! This module reads SPDX 2.x tag-value and RDF/XML documents into the
//! in-memory [`SpdxDocument`] graph.
//!
//! ## Format Detection
//!
//! The serialization is chosen from the file name only (see
//! [`detect_file_type`]). Content is never sniffed: an upload called
//! `bom.txt` is rejected even if it holds valid tag-value.
//!
//! ## Usage
//!
//! ```no_run
//! use sbom_importer::parsers::parse_spdx_file;
//! use std::path::Path;
//!
//! let document = parse_spdx_file(Path::new("bom.spdx")).unwrap();
//! println!("{} packages", document.packages.len());
//! ```

mod detection;
mod rdf;
mod tag_value;
mod traits;

pub use detection::{detect_file_type, SpdxFileType};
pub use rdf::RdfXmlParser;
pub use tag_value::TagValueParser;
pub use traits::{DocumentParser, ParseError};

use crate::model::SpdxDocument;
use std::path::Path;

/// Get the parser for a file type
#[must_use]
pub fn parser_for(file_type: SpdxFileType) -> Box<dyn DocumentParser> {
    match file_type {
        SpdxFileType::TagValue => Box::new(TagValueParser::new()),
        SpdxFileType::RdfXml => Box::new(RdfXmlParser::new()),
    }
}

/// Parse an SPDX document from a file, choosing the reader by file name
pub fn parse_spdx_file(path: &Path) -> Result<SpdxDocument, ParseError> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    let file_type = detect_file_type(file_name).ok_or_else(|| {
        ParseError::InvalidStructure(format!("unsupported file type: {}", path.display()))
    })?;
    parser_for(file_type).parse(path)
}

/// Parse an SPDX document from string content of a known type
pub fn parse_spdx_str(content: &str, file_type: SpdxFileType) -> Result<SpdxDocument, ParseError> {
    parser_for(file_type).parse_str(content)
}
