//! **Import SPDX bills of materials into a component / release / project catalog.**
//!
//! `sbom-importer` reads SPDX 2.x documents in tag-value or RDF/XML form and
//! writes the packages they describe into a catalog through a pluggable
//! persistence sink. The described package becomes a release (linked to
//! the releases of the packages it contains) or a project; optionally the
//! whole document is mirrored as metadata records next to the release.
//!
//! ## Core Concepts & Modules
//!
//! - **[`parsers`]**: tag-value and RDF/XML readers producing an
//!   [`SpdxDocument`](model::SpdxDocument). The serialization is chosen
//!   from the file name.
//! - **[`model`]**: the parsed document graph, its identifier index
//!   [`SpdxDocumentIndex`](model::SpdxDocumentIndex), and the catalog
//!   entities written by an import.
//! - **[`mapper`]**: pure functions turning SPDX elements into catalog
//!   entities and metadata records.
//! - **[`import`]**: the [`SpdxBomImporter`] orchestrator and its graph
//!   walk over `CONTAINS` relationships.
//! - **[`sink`]**: the [`BomSink`] trait plus in-memory and JSON file
//!   implementations.
//! - **[`config`]**: YAML configuration, presets and validation.
//!
//! ## Getting Started
//!
//! ```no_run
//! use sbom_importer::{ImportConfig, InMemorySink, SpdxBomImporter};
//! use sbom_importer::model::{AttachmentContent, User};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let importer = SpdxBomImporter::new(InMemorySink::new(), ImportConfig::default());
//!
//!     let file = std::fs::File::open("path/to/bom.spdx")?;
//!     let content = AttachmentContent::new("upload-1", "bom.spdx");
//!     let user = User::new("jane@example.org", "R&D");
//!
//!     let summary = importer.import_as_release(file, &content, &user);
//!     println!(
//!         "{}: {} ({} of {} elements written)",
//!         summary.request_status,
//!         summary.message,
//!         summary.total_affected_elements,
//!         summary.total_elements
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Command-Line Interface (CLI)
//!
//! The `sbom-importer` binary wraps the library around a JSON file store;
//! run `sbom-importer --help` for its subcommands.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod cli;
pub mod config;
pub mod error;
pub mod import;
pub mod mapper;
pub mod model;
pub mod parsers;
pub mod sink;

// Re-export main types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigPreset, ImportConfig};
pub use config::{ConfigError, Validatable};
pub use error::{ErrorContext, ImportError, OptionContext, Result, StructuralViolation};
pub use import::{ImportPreparation, RequestStatus, RequestSummary, SpdxBomImporter};
pub use parsers::{SpdxFileType, detect_file_type, parse_spdx_file, parse_spdx_str};
pub use sink::{BomSink, InMemorySink, JsonFileSink, Response, SinkError};
