//! Entity mapper.
//!
//! Pure conversions from the parsed SPDX document into catalog entities and
//! document metadata records. Every string is extracted totally: an absent
//! source value becomes `""`. Records drawn from an ordered source
//! collection carry their 0-based position as `index`.
//!
//! A field or sub-entity that cannot be mapped (a snippet range with
//! mismatched pointers, an incomplete checksum, a creator without a type)
//! is logged and skipped; no function in this module fails.

mod catalog;
mod document;
mod package;
mod snippet;
mod values;

pub use catalog::{
    ATTACHMENT_COMMENT, attachment_from_upload, component_from_package, project_from_package,
    release_from_package,
};
pub use document::{
    annotations_from, creation_information, creators_from, external_document_refs_from,
    other_licenses_from, relationships_from, spdx_document_record,
};
pub use package::{checksums_from, external_refs_from, package_information, verification_code_from};
pub use snippet::{snippet_information, snippet_ranges, snippets_from};
pub use values::{created_on_today, declared_license, value_or_default};
