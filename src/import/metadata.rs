//! Document metadata persisted next to an imported release.

use crate::error::{ErrorContext, Result};
use crate::mapper::{creation_information, package_information, spdx_document_record};
use crate::model::{SpdxDocumentIndex, SpdxPackage};
use crate::sink::BomSink;

/// Store the SPDX document record, its creation information and the
/// package information of `pkg` for the release `release_id`.
///
/// Records already linked to the release are updated in place, so
/// importing the same document again does not duplicate them. Returns the
/// id of the SPDX document record.
pub fn persist_document_metadata<S: BomSink + ?Sized>(
    sink: &S,
    index: &SpdxDocumentIndex<'_>,
    release_id: &str,
    pkg: &SpdxPackage,
) -> Result<String> {
    let release = sink
        .get_release(release_id)
        .with_context(|| format!("loading release {release_id}"))?;

    let mut record = spdx_document_record(index, release_id);
    if let Some(existing_id) = release.spdx_id.as_deref() {
        let existing = sink
            .get_spdx_document(existing_id)
            .with_context(|| format!("loading SPDX document {existing_id}"))?;
        record.id = existing.id;
        record.creation_info_id = existing.creation_info_id;
        record.package_info_ids = existing.package_info_ids;
    }
    let creation_info_id = record.creation_info_id.clone();
    let first_package_info_id = record.package_info_ids.first().cloned();

    let document_id = sink
        .add_or_update_spdx_document(record)
        .context("storing SPDX document")?
        .id()
        .to_string();

    let mut creation = creation_information(index.document(), &document_id);
    creation.id = creation_info_id;
    let creation_response = sink
        .add_or_update_document_creation_information(creation)
        .context("storing document creation information")?;
    tracing::debug!(id = %creation_response.id(), "Stored document creation information");

    match package_information(index, pkg, &document_id) {
        Some(mut info) => {
            info.id = first_package_info_id;
            let info_response = sink
                .add_or_update_package_information(info)
                .with_context(|| format!("storing package information for {}", pkg.spdx_id))?;
            tracing::debug!(
                package = %pkg.spdx_id,
                id = %info_response.id(),
                "Stored package information"
            );
        }
        None => tracing::debug!(
            package = %pkg.spdx_id,
            "No package information for package without name or version"
        ),
    }

    tracing::info!(
        release = %release_id,
        document = %document_id,
        "Stored SPDX document metadata"
    );
    Ok(document_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Component, Release, SpdxDocument};
    use crate::sink::InMemorySink;

    fn sink_with_release() -> (InMemorySink, String) {
        let sink = InMemorySink::new();
        let component = sink
            .add_component(Component {
                name: "a".into(),
                ..Component::default()
            })
            .unwrap();
        let release = sink
            .add_release(Release {
                name: "a".into(),
                version: "1".into(),
                component_id: component.id().to_string(),
                ..Release::default()
            })
            .unwrap();
        (sink, release.id().to_string())
    }

    #[test]
    fn test_metadata_is_linked_and_reused() {
        let mut doc = SpdxDocument {
            spdx_version: "SPDX-2.3".into(),
            name: "demo".into(),
            ..SpdxDocument::default()
        };
        doc.packages
            .push(SpdxPackage::new("SPDXRef-a", "a").with_version("1"));
        let index = SpdxDocumentIndex::build(&doc);
        let (sink, release_id) = sink_with_release();

        let first = persist_document_metadata(&sink, &index, &release_id, &doc.packages[0]).unwrap();
        let second = persist_document_metadata(&sink, &index, &release_id, &doc.packages[0]).unwrap();
        assert_eq!(first, second);

        let state = sink.snapshot().unwrap();
        assert_eq!(state.spdx_documents.len(), 1);
        assert_eq!(state.creation_infos.len(), 1);
        assert_eq!(state.package_infos.len(), 1);

        let release = sink.get_release(&release_id).unwrap();
        assert_eq!(release.spdx_id.as_deref(), Some(first.as_str()));
        let record = sink.get_spdx_document(&first).unwrap();
        assert!(record.creation_info_id.is_some());
        assert_eq!(record.package_info_ids.len(), 1);
        let info = sink.get_package_info(&record.package_info_ids[0]).unwrap();
        assert_eq!(info.index, 0);
        assert_eq!(info.name, "a");
    }
}
