//! Data model for SPDX import.
//!
//! Two halves: the parsed SPDX document graph ([`SpdxDocument`] and its
//! element arenas) and the catalog the importer writes into (components,
//! releases, projects, and the document metadata records that mirror the
//! source next to a release).
//!
//! # Index Support
//!
//! Identifier resolution goes through [`SpdxDocumentIndex`], built once per
//! import:
//!
//! ```ignore
//! let document = parse_spdx_file(&path)?;
//! let index = SpdxDocumentIndex::build(&document);
//!
//! for pkg_idx in index.described_packages() { /* ... */ }
//! ```

mod catalog;
mod document;
mod index;
mod records;

pub use catalog::*;
pub use document::*;
pub use index::*;
pub use records::*;
