//! SPDX BOM import orchestration.
//!
//! [`SpdxBomImporter`] turns one uploaded SPDX document into catalog
//! entities:
//!
//! 1. The file type is detected from the upload's file name and the stream
//!    is copied to a scoped temporary file ([`ScopedUpload`]).
//! 2. The document is parsed and indexed; it must describe exactly one
//!    package.
//! 3. The described package becomes a release (with its contained packages
//!    as linked releases, and every other package of the document as a
//!    sibling) or a project (with a flat usage map or a release network).
//!
//! Every entry point returns a summary value; errors never escape.
//!
//! # Example
//!
//! ```no_run
//! use sbom_importer::import::SpdxBomImporter;
//! use sbom_importer::config::ImportConfig;
//! use sbom_importer::model::{AttachmentContent, User};
//! use sbom_importer::sink::InMemorySink;
//!
//! let importer = SpdxBomImporter::new(InMemorySink::new(), ImportConfig::default());
//! let file = std::fs::File::open("bom.spdx").unwrap();
//! let content = AttachmentContent::new("att-1", "bom.spdx");
//! let user = User::new("jane@example.org", "R&D");
//!
//! let summary = importer.import_as_release(file, &content, &user);
//! println!("{}: {}", summary.request_status, summary.message);
//! ```

mod graph;
mod lookup;
mod metadata;
mod summary;
mod upload;

pub use graph::{GraphBuilder, release_relationship_for};
pub use lookup::{find_or_create_component, find_or_create_release, find_release_id};
pub use metadata::persist_document_metadata;
pub use summary::{ERROR_READ_FILE, ImportPreparation, RequestStatus, RequestSummary};
pub use upload::ScopedUpload;

use crate::config::ImportConfig;
use crate::error::{ErrorContext, ImportError, OptionContext, Result, StructuralViolation};
use crate::mapper::{attachment_from_upload, project_from_package};
use crate::model::{
    Attachment, AttachmentContent, MainlineState, ProjectReleaseRelationship,
    SpdxDocumentIndex, User,
};
use crate::parsers::{detect_file_type, parse_spdx_file, parser_for};
use crate::sink::{BomSink, Response};
use std::fmt;
use std::io::Read;
use std::path::Path;

/// What the described package is imported as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImportTarget {
    Release,
    Project,
}

impl fmt::Display for ImportTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Release => f.write_str("release"),
            Self::Project => f.write_str("project"),
        }
    }
}

/// Imports SPDX documents through a [`BomSink`].
pub struct SpdxBomImporter<S: BomSink> {
    sink: S,
    config: ImportConfig,
}

impl<S: BomSink> SpdxBomImporter<S> {
    pub const fn new(sink: S, config: ImportConfig) -> Self {
        Self { sink, config }
    }

    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    #[must_use]
    pub fn into_sink(self) -> S {
        self.sink
    }

    #[must_use]
    pub const fn config(&self) -> ImportConfig {
        self.config
    }

    /// Parse and check a document without writing anything.
    ///
    /// On success the preview lists every package of the document, not
    /// only the described one.
    #[must_use]
    pub fn prepare_import(&self, path: &Path) -> ImportPreparation {
        let document = match parse_spdx_file(path) {
            Ok(document) => document,
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Failed to read SPDX document");
                return ImportPreparation::failure(ERROR_READ_FILE);
            }
        };
        let index = SpdxDocumentIndex::build(&document);

        if let Err(violation) = single_described_package(&index) {
            tracing::warn!(path = %path.display(), "{violation}");
            return ImportPreparation::failure(violation.to_string());
        }

        let mut preparation = ImportPreparation {
            request_status: Some(RequestStatus::Success),
            ..ImportPreparation::default()
        };
        for pkg in &document.packages {
            preparation.component_names.push(pkg.name.clone());
            if let Some(name) = pkg.qualified_name() {
                preparation.release_names.push(name);
            }
            preparation
                .versions
                .push(pkg.version().unwrap_or_default().to_string());
        }
        tracing::info!(
            path = %path.display(),
            packages = document.packages.len(),
            "Prepared SPDX import"
        );
        preparation
    }

    /// Import the described package as a release.
    pub fn import_as_release<R: Read>(
        &self,
        reader: R,
        content: &AttachmentContent,
        user: &User,
    ) -> RequestSummary {
        self.run(reader, content, user, ImportTarget::Release)
    }

    /// Import the described package as a project.
    pub fn import_as_project<R: Read>(
        &self,
        reader: R,
        content: &AttachmentContent,
        user: &User,
    ) -> RequestSummary {
        self.run(reader, content, user, ImportTarget::Project)
    }

    fn run<R: Read>(
        &self,
        reader: R,
        content: &AttachmentContent,
        user: &User,
        target: ImportTarget,
    ) -> RequestSummary {
        match self.try_import(reader, content, user, target) {
            Ok(response) => {
                tracing::info!(
                    file = %content.filename,
                    target = %target,
                    id = %response.id(),
                    total = response.count(),
                    affected = response.count_affected(),
                    "Imported SPDX BOM"
                );
                RequestSummary::success(&response)
            }
            Err(e) => {
                tracing::error!(
                    file = %content.filename,
                    target = %target,
                    error = %e,
                    "SPDX BOM import failed"
                );
                RequestSummary::from_error(&e)
            }
        }
    }

    fn try_import<R: Read>(
        &self,
        reader: R,
        content: &AttachmentContent,
        user: &User,
        target: ImportTarget,
    ) -> Result<Response> {
        let file_type = detect_file_type(&content.filename).with_context_none(|| {
            format!(
                "unsupported file '{}', expected .spdx or .rdf",
                content.filename
            )
        })?;

        // Removed on every exit path when `upload` drops
        let upload = ScopedUpload::persist(reader, &content.id, file_type)?;
        if upload.is_empty() {
            tracing::warn!(file = %content.filename, "Uploaded BOM is empty");
        }
        let document = parser_for(upload.file_type())
            .parse(upload.path())
            .with_context(|| format!("reading {}", content.filename))?;
        let index = SpdxDocumentIndex::build(&document);
        tracing::debug!(
            file = %content.filename,
            file_type = %upload.file_type(),
            bytes = upload.len(),
            elements = index.element_count(),
            "Parsed SPDX document"
        );

        let root = single_described_package(&index)?;
        let attachment = attachment_from_upload(content, upload.sha256(), user);

        match target {
            ImportTarget::Release => self.import_release(&index, root, &attachment, user),
            ImportTarget::Project => self.import_project(&index, root, &attachment, user),
        }
    }

    fn import_release(
        &self,
        index: &SpdxDocumentIndex<'_>,
        root: usize,
        attachment: &Attachment,
        user: &User,
    ) -> Result<Response> {
        let mut graph = GraphBuilder::new(&self.sink, index, user);
        let mut response = graph
            .import_release(root, Some(attachment))?
            .ok_or_else(|| ImportError::NotImportable {
                target: ImportTarget::Release.to_string(),
            })?;

        if self.config.spdx_document_enabled
            && let Some(pkg) = index.package(root)
        {
            persist_document_metadata(&self.sink, index, response.id(), pkg)
                .with_context(|| format!("storing document metadata for {}", pkg.spdx_id))?;
        }

        for (idx, sibling) in graph.import_unreached(attachment)? {
            if self.config.spdx_document_enabled
                && let Some(pkg) = index.package(idx)
            {
                persist_document_metadata(&self.sink, index, sibling.id(), pkg)
                    .with_context(|| format!("storing document metadata for {}", pkg.spdx_id))?;
            }
            response.add_child(sibling);
        }
        response.add_children(graph.take_component_only());
        Ok(response)
    }

    fn import_project(
        &self,
        index: &SpdxDocumentIndex<'_>,
        root: usize,
        attachment: &Attachment,
        user: &User,
    ) -> Result<Response> {
        let pkg = index
            .package(root)
            .context_none("described package is not in the document")?;
        let mut project = project_from_package(pkg, user);
        project.attachments.push(attachment.clone());

        let mut graph = GraphBuilder::new(&self.sink, index, user);
        graph.enter(root);

        let children = if self.config.flexible_project_release_relationship {
            let (nodes, responses): (Vec<_>, Vec<_>) =
                graph.release_nodes(root)?.into_iter().unzip();
            project.release_id_to_usage = nodes
                .iter()
                .map(|node| {
                    let usage =
                        ProjectReleaseRelationship::new(node.relationship, node.mainline_state);
                    (node.release_id.clone(), usage)
                })
                .collect();
            project.release_relation_network =
                Some(serde_json::to_string(&nodes).context("encoding release network")?);
            responses
        } else {
            let links = graph.release_links(root)?;
            project.release_id_to_usage = links
                .iter()
                .map(|link| {
                    let usage = ProjectReleaseRelationship::new(
                        link.release_relationship(),
                        MainlineState::Open,
                    );
                    (link.id().to_string(), usage)
                })
                .collect();
            links
        };

        let mut response = self
            .sink
            .add_project(project)
            .with_context(|| format!("adding project for {}", pkg.spdx_id))?;
        response.add_children(children);
        response.add_children(graph.take_component_only());
        Ok(response)
    }
}

/// Arena position of the one package the document describes.
fn single_described_package(
    index: &SpdxDocumentIndex<'_>,
) -> std::result::Result<usize, StructuralViolation> {
    match index.described_packages().as_slice() {
        [] => Err(StructuralViolation::NoTopLevelPackage),
        [idx] => Ok(*idx),
        many => Err(StructuralViolation::MultipleTopLevelPackages { count: many.len() }),
    }
}
