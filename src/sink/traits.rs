//! Persistence sink trait.
//!
//! This module provides the `BomSink` trait, the only way the importer
//! reads or writes durable state.

use super::Response;
use crate::model::{
    Component, DocumentCreationInformation, PackageInformation, Project, Release,
    SpdxDocumentRecord,
};
use thiserror::Error;

/// Errors reported by a sink.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SinkError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("{entity} is missing a required field: {field}")]
    Invalid {
        entity: &'static str,
        field: &'static str,
    },

    #[error("storage error: {0}")]
    Storage(String),

    #[error("store lock poisoned")]
    Poisoned,
}

impl SinkError {
    pub const fn not_found(entity: &'static str, id: String) -> Self {
        Self::NotFound { entity, id }
    }
}

/// Result type for sink operations
pub type SinkResult<T> = std::result::Result<T, SinkError>;

/// Trait for persistence sinks.
///
/// Implement this trait to import into a different store.
///
/// `add_component`, `add_release` and `add_project` must be atomic
/// insert-if-absent on their deduplication key (component name, release and
/// project `"name version"`). A hit returns the stored id with
/// `affected = false`; for releases the incoming relationship links are merged
/// into the stored record without overwriting links it already has.
///
/// # Example
///
/// ```ignore
/// use sbom_importer::sink::{BomSink, InMemorySink};
///
/// let sink = InMemorySink::new();
/// let response = sink.add_component(component)?;
/// assert!(sink.search_component(&name)?.is_some());
/// ```
pub trait BomSink: Send + Sync {
    /// Find a component by exact name.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read
    fn search_component(&self, name: &str) -> SinkResult<Option<Component>>;

    /// Find a release by exact `"name version"`.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read
    fn search_release(&self, qualified_name: &str) -> SinkResult<Option<Release>>;

    /// Insert a component unless one with the same name exists.
    ///
    /// # Errors
    /// Returns an error if the store cannot be written
    fn add_component(&self, component: Component) -> SinkResult<Response>;

    /// Insert a release unless one with the same `"name version"` exists.
    ///
    /// # Errors
    /// Returns an error if the release has no component or the store cannot be written
    fn add_release(&self, release: Release) -> SinkResult<Response>;

    /// Insert a project unless one with the same `"name version"` exists.
    ///
    /// # Errors
    /// Returns an error if the store cannot be written
    fn add_project(&self, project: Project) -> SinkResult<Response>;

    /// Insert an SPDX document record (no id) or replace the stored one.
    ///
    /// The owning release is linked to the record.
    ///
    /// # Errors
    /// Returns an error if the owning release does not exist
    fn add_or_update_spdx_document(&self, document: SpdxDocumentRecord) -> SinkResult<Response>;

    /// Insert or replace document creation information.
    ///
    /// The owning SPDX document record is linked to it.
    ///
    /// # Errors
    /// Returns an error if the owning document does not exist
    fn add_or_update_document_creation_information(
        &self,
        info: DocumentCreationInformation,
    ) -> SinkResult<Response>;

    /// Insert or replace package information.
    ///
    /// The owning SPDX document record lists it.
    ///
    /// # Errors
    /// Returns an error if the owning document does not exist
    fn add_or_update_package_information(&self, info: PackageInformation)
    -> SinkResult<Response>;

    /// # Errors
    /// Returns [`SinkError::NotFound`] for an unknown id
    fn get_release(&self, id: &str) -> SinkResult<Release>;

    /// # Errors
    /// Returns [`SinkError::NotFound`] for an unknown id
    fn get_spdx_document(&self, id: &str) -> SinkResult<SpdxDocumentRecord>;

    /// # Errors
    /// Returns [`SinkError::NotFound`] for an unknown id
    fn get_document_creation_info(&self, id: &str) -> SinkResult<DocumentCreationInformation>;

    /// # Errors
    /// Returns [`SinkError::NotFound`] for an unknown id
    fn get_package_info(&self, id: &str) -> SinkResult<PackageInformation>;
}
