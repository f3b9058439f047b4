//! In-memory reference sink.

use super::{BomSink, Response, SinkError, SinkResult};
use crate::model::{
    Component, DocumentCreationInformation, PackageInformation, Project, Release,
    SpdxDocumentRecord,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Everything a sink stores, keyed by id in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreState {
    #[serde(default)]
    pub components: IndexMap<String, Component>,
    #[serde(default)]
    pub releases: IndexMap<String, Release>,
    #[serde(default)]
    pub projects: IndexMap<String, Project>,
    #[serde(default)]
    pub spdx_documents: IndexMap<String, SpdxDocumentRecord>,
    #[serde(default)]
    pub creation_infos: IndexMap<String, DocumentCreationInformation>,
    #[serde(default)]
    pub package_infos: IndexMap<String, PackageInformation>,
}

impl StoreState {
    /// Total number of stored records of every kind.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.components.len()
            + self.releases.len()
            + self.projects.len()
            + self.spdx_documents.len()
            + self.creation_infos.len()
            + self.package_infos.len()
    }
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Mutex-guarded sink keeping everything in memory.
///
/// Every insert-if-absent runs its lookup and insert under one lock, so
/// concurrent imports naming the same component or release cannot both
/// create it.
#[derive(Debug, Default)]
pub struct InMemorySink {
    state: Mutex<StoreState>,
}

impl InMemorySink {
    /// Create an empty sink
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink pre-populated with `state`
    #[must_use]
    pub fn from_state(state: StoreState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    /// Copy of the current contents
    ///
    /// # Errors
    /// Returns [`SinkError::Poisoned`] if a writer panicked
    pub fn snapshot(&self) -> SinkResult<StoreState> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> SinkResult<MutexGuard<'_, StoreState>> {
        self.state.lock().map_err(|_| SinkError::Poisoned)
    }
}

impl BomSink for InMemorySink {
    fn search_component(&self, name: &str) -> SinkResult<Option<Component>> {
        let state = self.lock()?;
        Ok(state.components.values().find(|c| c.name == name).cloned())
    }

    fn search_release(&self, qualified_name: &str) -> SinkResult<Option<Release>> {
        let state = self.lock()?;
        Ok(state
            .releases
            .values()
            .find(|r| r.qualified_name() == qualified_name)
            .cloned())
    }

    fn add_component(&self, mut component: Component) -> SinkResult<Response> {
        if component.name.is_empty() {
            return Err(SinkError::Invalid {
                entity: "component",
                field: "name",
            });
        }
        let mut state = self.lock()?;
        if let Some(id) = state
            .components
            .iter()
            .find_map(|(id, c)| (c.name == component.name).then(|| id.clone()))
        {
            tracing::debug!(component = %component.name, id = %id, "Component already exists");
            return Ok(Response::existing(id));
        }
        let id = new_id();
        component.id = Some(id.clone());
        tracing::debug!(component = %component.name, id = %id, "Added component");
        state.components.insert(id.clone(), component);
        Ok(Response::created(id))
    }

    fn add_release(&self, mut release: Release) -> SinkResult<Response> {
        if release.component_id.is_empty() {
            return Err(SinkError::Invalid {
                entity: "release",
                field: "component_id",
            });
        }
        let key = release.qualified_name();
        let mut state = self.lock()?;
        if let Some(existing) = state
            .releases
            .values_mut()
            .find(|r| r.qualified_name() == key)
        {
            for (linked_id, relationship) in release.release_id_to_relationship {
                existing
                    .release_id_to_relationship
                    .entry(linked_id)
                    .or_insert(relationship);
            }
            let id = existing.id.clone().unwrap_or_default();
            tracing::debug!(release = %key, id = %id, "Release already exists");
            return Ok(Response::existing(id));
        }
        let id = new_id();
        release.id = Some(id.clone());
        tracing::debug!(release = %key, id = %id, "Added release");
        state.releases.insert(id.clone(), release);
        Ok(Response::created(id))
    }

    fn add_project(&self, mut project: Project) -> SinkResult<Response> {
        let key = project.qualified_name();
        let mut state = self.lock()?;
        if let Some(id) = state
            .projects
            .iter()
            .find_map(|(id, p)| (p.qualified_name() == key).then(|| id.clone()))
        {
            tracing::debug!(project = %key, id = %id, "Project already exists");
            return Ok(Response::existing(id));
        }
        let id = new_id();
        project.id = Some(id.clone());
        tracing::debug!(project = %key, id = %id, "Added project");
        state.projects.insert(id.clone(), project);
        Ok(Response::created(id))
    }

    fn add_or_update_spdx_document(&self, mut document: SpdxDocumentRecord) -> SinkResult<Response> {
        let mut state = self.lock()?;
        let release_id = document.release_id.clone();
        if !state.releases.contains_key(&release_id) {
            return Err(SinkError::not_found("release", release_id));
        }
        let id = document.id.clone().unwrap_or_else(new_id);
        document.id = Some(id.clone());
        state.spdx_documents.insert(id.clone(), document);
        if let Some(release) = state.releases.get_mut(&release_id) {
            release.spdx_id = Some(id.clone());
        }
        Ok(Response::created(id))
    }

    fn add_or_update_document_creation_information(
        &self,
        mut info: DocumentCreationInformation,
    ) -> SinkResult<Response> {
        let mut state = self.lock()?;
        let document_id = info.spdx_document_id.clone();
        if !state.spdx_documents.contains_key(&document_id) {
            return Err(SinkError::not_found("SPDX document", document_id));
        }
        let id = info.id.clone().unwrap_or_else(new_id);
        info.id = Some(id.clone());
        state.creation_infos.insert(id.clone(), info);
        if let Some(document) = state.spdx_documents.get_mut(&document_id) {
            document.creation_info_id = Some(id.clone());
        }
        Ok(Response::created(id))
    }

    fn add_or_update_package_information(
        &self,
        mut info: PackageInformation,
    ) -> SinkResult<Response> {
        let mut state = self.lock()?;
        let document_id = info.spdx_document_id.clone();
        if !state.spdx_documents.contains_key(&document_id) {
            return Err(SinkError::not_found("SPDX document", document_id));
        }
        let id = info.id.clone().unwrap_or_else(new_id);
        info.id = Some(id.clone());
        state.package_infos.insert(id.clone(), info);
        if let Some(document) = state.spdx_documents.get_mut(&document_id) {
            if !document.package_info_ids.contains(&id) {
                document.package_info_ids.push(id.clone());
            }
        }
        Ok(Response::created(id))
    }

    fn get_release(&self, id: &str) -> SinkResult<Release> {
        self.lock()?
            .releases
            .get(id)
            .cloned()
            .ok_or_else(|| SinkError::not_found("release", id.to_string()))
    }

    fn get_spdx_document(&self, id: &str) -> SinkResult<SpdxDocumentRecord> {
        self.lock()?
            .spdx_documents
            .get(id)
            .cloned()
            .ok_or_else(|| SinkError::not_found("SPDX document", id.to_string()))
    }

    fn get_document_creation_info(&self, id: &str) -> SinkResult<DocumentCreationInformation> {
        self.lock()?
            .creation_infos
            .get(id)
            .cloned()
            .ok_or_else(|| SinkError::not_found("document creation information", id.to_string()))
    }

    fn get_package_info(&self, id: &str) -> SinkResult<PackageInformation> {
        self.lock()?
            .package_infos
            .get(id)
            .cloned()
            .ok_or_else(|| SinkError::not_found("package information", id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReleaseRelationship;

    fn component(name: &str) -> Component {
        Component {
            name: name.to_string(),
            ..Component::default()
        }
    }

    fn release(name: &str, version: &str, component_id: &str) -> Release {
        Release {
            name: name.to_string(),
            version: version.to_string(),
            component_id: component_id.to_string(),
            ..Release::default()
        }
    }

    #[test]
    fn test_add_component_is_insert_if_absent() {
        let sink = InMemorySink::new();
        let first = sink.add_component(component("zlib")).unwrap();
        let second = sink.add_component(component("zlib")).unwrap();

        assert!(first.is_affected());
        assert!(!second.is_affected());
        assert_eq!(first.id(), second.id());
        assert_eq!(sink.snapshot().unwrap().components.len(), 1);
        assert!(sink.search_component("zlib").unwrap().is_some());
        assert!(sink.search_component("zlib2").unwrap().is_none());
    }

    #[test]
    fn test_add_release_merges_links() {
        let sink = InMemorySink::new();
        let mut first = release("zlib", "1.3", "c1");
        first
            .release_id_to_relationship
            .insert("r-a".into(), ReleaseRelationship::Contained);
        let created = sink.add_release(first).unwrap();

        let mut second = release("zlib", "1.3", "c1");
        second
            .release_id_to_relationship
            .insert("r-a".into(), ReleaseRelationship::Referred);
        second
            .release_id_to_relationship
            .insert("r-b".into(), ReleaseRelationship::Contained);
        let merged = sink.add_release(second).unwrap();

        assert_eq!(created.id(), merged.id());
        assert!(!merged.is_affected());
        let stored = sink.get_release(created.id()).unwrap();
        assert_eq!(stored.release_id_to_relationship.len(), 2);
        assert_eq!(
            stored.release_id_to_relationship["r-a"],
            ReleaseRelationship::Contained
        );
    }

    #[test]
    fn test_release_requires_component() {
        let sink = InMemorySink::new();
        let err = sink.add_release(release("zlib", "1.3", "")).unwrap_err();
        assert!(matches!(err, SinkError::Invalid { .. }));
    }

    #[test]
    fn test_metadata_records_link_to_owners() {
        let sink = InMemorySink::new();
        let release_id = sink
            .add_release(release("zlib", "1.3", "c1"))
            .unwrap()
            .id()
            .to_string();

        let doc = sink
            .add_or_update_spdx_document(SpdxDocumentRecord {
                release_id: release_id.clone(),
                ..SpdxDocumentRecord::default()
            })
            .unwrap();
        assert_eq!(
            sink.get_release(&release_id).unwrap().spdx_id.as_deref(),
            Some(doc.id())
        );

        let info = sink
            .add_or_update_document_creation_information(DocumentCreationInformation {
                spdx_document_id: doc.id().to_string(),
                ..DocumentCreationInformation::default()
            })
            .unwrap();
        let package = sink
            .add_or_update_package_information(PackageInformation {
                spdx_document_id: doc.id().to_string(),
                ..PackageInformation::default()
            })
            .unwrap();

        let stored = sink.get_spdx_document(doc.id()).unwrap();
        assert_eq!(stored.creation_info_id.as_deref(), Some(info.id()));
        assert_eq!(stored.package_info_ids, vec![package.id().to_string()]);
    }

    #[test]
    fn test_update_replaces_by_id() {
        let sink = InMemorySink::new();
        let release_id = sink
            .add_release(release("zlib", "1.3", "c1"))
            .unwrap()
            .id()
            .to_string();
        let doc = sink
            .add_or_update_spdx_document(SpdxDocumentRecord {
                release_id: release_id.clone(),
                ..SpdxDocumentRecord::default()
            })
            .unwrap();
        let mut record = sink.get_spdx_document(doc.id()).unwrap();
        record.other_licenses.push(Default::default());
        let updated = sink.add_or_update_spdx_document(record).unwrap();

        assert_eq!(updated.id(), doc.id());
        assert_eq!(sink.snapshot().unwrap().spdx_documents.len(), 1);
    }

    #[test]
    fn test_get_unknown_is_not_found() {
        let sink = InMemorySink::new();
        assert!(matches!(
            sink.get_release("nope"),
            Err(SinkError::NotFound { .. })
        ));
        assert!(sink
            .add_or_update_package_information(PackageInformation::default())
            .is_err());
    }
}
