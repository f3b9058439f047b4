//! JSON file backed sink.
//!
//! Wraps an [`InMemorySink`] and persists its [`StoreState`] as pretty
//! printed JSON. Writes are only durable after [`JsonFileSink::flush`].

use super::{BomSink, InMemorySink, Response, SinkError, SinkResult, StoreState};
use crate::model::{
    Component, DocumentCreationInformation, PackageInformation, Project, Release,
    SpdxDocumentRecord,
};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Sink persisted to a single JSON file.
#[derive(Debug)]
pub struct JsonFileSink {
    path: PathBuf,
    inner: InMemorySink,
}

impl JsonFileSink {
    /// Open the store at `path`, starting empty if the file does not exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed
    pub fn open(path: impl Into<PathBuf>) -> SinkResult<Self> {
        let path = path.into();
        let state = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| SinkError::Storage(format!("{}: {e}", path.display())))?;
            serde_json::from_str::<StoreState>(&content)
                .map_err(|e| SinkError::Storage(format!("{}: {e}", path.display())))?
        } else {
            StoreState::default()
        };
        tracing::debug!(
            path = %path.display(),
            records = state.record_count(),
            "Opened JSON store"
        );
        Ok(Self {
            path,
            inner: InMemorySink::from_state(state),
        })
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy of the current contents, flushed or not.
    ///
    /// # Errors
    /// Returns [`SinkError::Poisoned`] if a writer panicked
    pub fn snapshot(&self) -> SinkResult<StoreState> {
        self.inner.snapshot()
    }

    /// Write the store to disk.
    ///
    /// The file is replaced atomically: a temporary file next to it is
    /// written first and then renamed over it.
    ///
    /// # Errors
    /// Returns an error if serialization or any filesystem step fails
    pub fn flush(&self) -> SinkResult<()> {
        let state = self.inner.snapshot()?;
        let json = serde_json::to_string_pretty(&state)
            .map_err(|e| SinkError::Storage(format!("serialize store: {e}")))?;

        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let storage = |e: std::io::Error| SinkError::Storage(format!("{}: {e}", self.path.display()));

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(storage)?;
        tmp.write_all(json.as_bytes()).map_err(storage)?;
        tmp.persist(&self.path).map_err(|e| storage(e.error))?;

        tracing::debug!(
            path = %self.path.display(),
            records = state.record_count(),
            "Flushed JSON store"
        );
        Ok(())
    }
}

impl BomSink for JsonFileSink {
    fn search_component(&self, name: &str) -> SinkResult<Option<Component>> {
        self.inner.search_component(name)
    }

    fn search_release(&self, qualified_name: &str) -> SinkResult<Option<Release>> {
        self.inner.search_release(qualified_name)
    }

    fn add_component(&self, component: Component) -> SinkResult<Response> {
        self.inner.add_component(component)
    }

    fn add_release(&self, release: Release) -> SinkResult<Response> {
        self.inner.add_release(release)
    }

    fn add_project(&self, project: Project) -> SinkResult<Response> {
        self.inner.add_project(project)
    }

    fn add_or_update_spdx_document(&self, document: SpdxDocumentRecord) -> SinkResult<Response> {
        self.inner.add_or_update_spdx_document(document)
    }

    fn add_or_update_document_creation_information(
        &self,
        info: DocumentCreationInformation,
    ) -> SinkResult<Response> {
        self.inner.add_or_update_document_creation_information(info)
    }

    fn add_or_update_package_information(
        &self,
        info: PackageInformation,
    ) -> SinkResult<Response> {
        self.inner.add_or_update_package_information(info)
    }

    fn get_release(&self, id: &str) -> SinkResult<Release> {
        self.inner.get_release(id)
    }

    fn get_spdx_document(&self, id: &str) -> SinkResult<SpdxDocumentRecord> {
        self.inner.get_spdx_document(id)
    }

    fn get_document_creation_info(&self, id: &str) -> SinkResult<DocumentCreationInformation> {
        self.inner.get_document_creation_info(id)
    }

    fn get_package_info(&self, id: &str) -> SinkResult<PackageInformation> {
        self.inner.get_package_info(id)
    }
}
