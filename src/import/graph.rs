//! Dependency graph builder.
//!
//! Walks `CONTAINS` relationships below a package and imports every
//! contained package as a release. Two shapes of result are produced:
//!
//! - **links**: each release carries a flat map from child release id to
//!   relationship kind ([`GraphBuilder::release_links`])
//! - **nodes**: a [`ReleaseNode`] tree for a project's release network,
//!   releases are stored without links ([`GraphBuilder::release_nodes`])
//!
//! Packages are tracked per run by arena position. A package resolved
//! earlier in the run is reused by id and not walked again; a package
//! that is still being walked (a cycle) is skipped.

use super::lookup::{find_or_create_component, find_or_create_release, find_release_id};
use crate::error::Result;
use crate::mapper::{created_on_today, release_from_package};
use crate::model::{
    Attachment, ReleaseNode, ReleaseRelationship, RelationshipType, SpdxDocumentIndex,
    SpdxPackage, User,
};
use crate::sink::{BomSink, Response};
use std::collections::{HashMap, HashSet};

/// Release relationship for an SPDX relationship kind, if it is followed.
#[must_use]
pub fn release_relationship_for(kind: &RelationshipType) -> Option<ReleaseRelationship> {
    match kind {
        RelationshipType::Contains => Some(ReleaseRelationship::Contained),
        _ => None,
    }
}

/// What a package became during this run.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Resolution {
    Release(String),
    ComponentOnly,
    /// No name to store it under
    Unnamed,
}

/// Outcome of visiting one package.
enum Visit {
    /// Imported now
    Imported(Response),
    /// Imported earlier in this run
    BackReference(String),
    /// Nothing to link
    Skipped,
}

/// Per-run traversal state over one document.
pub struct GraphBuilder<'a, S: BomSink + ?Sized> {
    sink: &'a S,
    index: &'a SpdxDocumentIndex<'a>,
    user: &'a User,
    resolved: HashMap<usize, Resolution>,
    walking: HashSet<usize>,
    /// Responses for components created without a release
    component_only: Vec<Response>,
}

impl<'a, S: BomSink + ?Sized> GraphBuilder<'a, S> {
    pub fn new(sink: &'a S, index: &'a SpdxDocumentIndex<'a>, user: &'a User) -> Self {
        Self {
            sink,
            index,
            user,
            resolved: HashMap::new(),
            walking: HashSet::new(),
            component_only: Vec::new(),
        }
    }

    /// Import the package at `idx` as a release linked to its contained
    /// packages.
    ///
    /// Returns `None` when the package has no version (a component is
    /// still created) or no name, lies on the current walk, or was already
    /// reduced to a component. A package already imported in this run yields a
    /// response for the existing release.
    pub fn import_release(
        &mut self,
        idx: usize,
        attachment: Option<&Attachment>,
    ) -> Result<Option<Response>> {
        Ok(match self.visit(idx, attachment)? {
            Visit::Imported(response) => Some(response),
            Visit::BackReference(id) => Some(Response::existing(id)),
            Visit::Skipped => None,
        })
    }

    /// Releases for the packages `idx` contains, each tagged with its
    /// relationship kind. Releases carry their own links.
    pub fn release_links(&mut self, idx: usize) -> Result<Vec<Response>> {
        let mut links = Vec::new();
        for (target, relationship) in self.followed_targets(idx) {
            if let Some(response) = self.import_release(target, None)? {
                links.push(response.with_relationship(relationship));
            }
        }
        Ok(links)
    }

    /// [`ReleaseNode`] trees for the packages `idx` contains.
    ///
    /// Releases are stored without links; the tree carries the structure.
    /// Each node comes with the response tree of the writes behind it.
    pub fn release_nodes(&mut self, idx: usize) -> Result<Vec<(ReleaseNode, Response)>> {
        self.walking.insert(idx);
        let mut nodes = Vec::new();
        for (target, relationship) in self.followed_targets(idx) {
            if let Some(node) = self.release_node(target, relationship)? {
                nodes.push(node);
            }
        }
        self.walking.remove(&idx);
        Ok(nodes)
    }

    /// Import every package of the document not reached so far.
    ///
    /// Versioned packages become releases, with links and `attachment`,
    /// unless a release of that name is already stored, in which case the
    /// stored one stands in for them. Versionless ones become components.
    /// Returns the newly imported releases with the package each came from.
    pub fn import_unreached(
        &mut self,
        attachment: &Attachment,
    ) -> Result<Vec<(usize, Response)>> {
        let mut created = Vec::new();
        for idx in 0..self.index.document().packages.len() {
            if self.resolved.contains_key(&idx) || self.walking.contains(&idx) {
                continue;
            }
            let Some(pkg) = self.index.package(idx) else {
                continue;
            };
            if let Some(name) = pkg.qualified_name() {
                if let Some(id) = find_release_id(self.sink, &name)? {
                    tracing::debug!(release = %name, id = %id, "Sibling release already stored");
                    self.resolved.insert(idx, Resolution::Release(id));
                    continue;
                }
            }
            if let Visit::Imported(response) = self.visit(idx, Some(attachment))? {
                tracing::info!(
                    package = %pkg.spdx_id,
                    id = %response.id(),
                    "Imported sibling release"
                );
                created.push((idx, response));
            }
        }
        Ok(created)
    }

    /// Mark `idx` as being walked so relationships back to it are skipped.
    pub fn enter(&mut self, idx: usize) {
        self.walking.insert(idx);
    }

    /// Responses for packages that only became components.
    pub fn take_component_only(&mut self) -> Vec<Response> {
        std::mem::take(&mut self.component_only)
    }

    fn visit(&mut self, idx: usize, attachment: Option<&Attachment>) -> Result<Visit> {
        let Some(pkg) = self.index.package(idx) else {
            return Ok(Visit::Skipped);
        };
        if let Some(visit) = self.check_visited(idx, pkg) {
            return Ok(visit);
        }
        if self.skip_unnamed(idx, pkg) {
            return Ok(Visit::Skipped);
        }

        let component = find_or_create_component(self.sink, pkg, self.user)?;
        let Some(mut release) = release_from_package(pkg, component.id(), self.user) else {
            tracing::info!(
                package = %pkg.spdx_id,
                name = %pkg.name,
                "Package has no version, imported as component only"
            );
            self.resolved.insert(idx, Resolution::ComponentOnly);
            self.component_only.push(component);
            return Ok(Visit::Skipped);
        };

        self.walking.insert(idx);
        let links = self.release_links(idx);
        self.walking.remove(&idx);
        let links = links?;

        release.release_id_to_relationship = links
            .iter()
            .map(|link| (link.id().to_string(), link.release_relationship()))
            .collect();
        if let Some(attachment) = attachment {
            release.attachments.push(attachment.clone());
        }

        let mut response = find_or_create_release(self.sink, release)?;
        self.resolved
            .insert(idx, Resolution::Release(response.id().to_string()));
        response.add_child(component);
        response.add_children(links);
        Ok(Visit::Imported(response))
    }

    fn release_node(
        &mut self,
        idx: usize,
        relationship: ReleaseRelationship,
    ) -> Result<Option<(ReleaseNode, Response)>> {
        let Some(pkg) = self.index.package(idx) else {
            return Ok(None);
        };
        let user = self.user;
        let node = |id: &str| ReleaseNode::new(id, relationship, user.email.clone(), created_on_today());
        match self.check_visited(idx, pkg) {
            Some(Visit::BackReference(id)) => {
                let response = Response::existing(id.clone()).with_relationship(relationship);
                return Ok(Some((node(&id), response)));
            }
            Some(_) => return Ok(None),
            None => {}
        }
        if self.skip_unnamed(idx, pkg) {
            return Ok(None);
        }

        let component = find_or_create_component(self.sink, pkg, self.user)?;
        let Some(release) = release_from_package(pkg, component.id(), self.user) else {
            tracing::info!(
                package = %pkg.spdx_id,
                name = %pkg.name,
                "Package has no version, imported as component only"
            );
            self.resolved.insert(idx, Resolution::ComponentOnly);
            self.component_only.push(component);
            return Ok(None);
        };

        let mut response = find_or_create_release(self.sink, release)?;
        let release_id = response.id().to_string();
        self.resolved
            .insert(idx, Resolution::Release(release_id.clone()));
        response.add_child(component);

        let children = self.release_nodes(idx)?;
        let (child_nodes, child_responses): (Vec<_>, Vec<_>) = children.into_iter().unzip();
        response.add_children(child_responses);

        let node = node(&release_id).with_children(child_nodes);
        Ok(Some((node, response.with_relationship(relationship))))
    }

    /// Packages without a name cannot become components; they are left out
    /// of the import instead of failing it.
    fn skip_unnamed(&mut self, idx: usize, pkg: &SpdxPackage) -> bool {
        if !pkg.name.trim().is_empty() {
            return false;
        }
        tracing::warn!(package = %pkg.spdx_id, "Package has no name, skipping it");
        self.resolved.insert(idx, Resolution::Unnamed);
        true
    }

    /// Already-seen handling shared by both walks.
    fn check_visited(&self, idx: usize, pkg: &SpdxPackage) -> Option<Visit> {
        if self.walking.contains(&idx) {
            tracing::warn!(
                package = %pkg.spdx_id,
                "Relationship cycle detected, skipping back edge"
            );
            return Some(Visit::Skipped);
        }
        match self.resolved.get(&idx) {
            Some(Resolution::Release(id)) => {
                tracing::debug!(
                    package = %pkg.spdx_id,
                    id = %id,
                    "Reusing release imported earlier in this run"
                );
                Some(Visit::BackReference(id.clone()))
            }
            Some(Resolution::ComponentOnly | Resolution::Unnamed) => Some(Visit::Skipped),
            None => None,
        }
    }

    /// Packages reached from `idx` through followed relationship kinds,
    /// in source order.
    fn followed_targets(&self, idx: usize) -> Vec<(usize, ReleaseRelationship)> {
        let Some(pkg) = self.index.package(idx) else {
            return Vec::new();
        };
        self.index
            .relationships_of(&pkg.spdx_id)
            .into_iter()
            .filter_map(|rel| {
                let Some(relationship) = release_relationship_for(&rel.relationship_type) else {
                    tracing::debug!(
                        package = %pkg.spdx_id,
                        kind = %rel.relationship_type,
                        "Unsupported relationship type"
                    );
                    return None;
                };
                let target = self.index.package_index(&rel.related_spdx_element);
                if target.is_none() {
                    tracing::debug!(
                        package = %pkg.spdx_id,
                        related = %rel.related_spdx_element,
                        "Related element is not a package in this document"
                    );
                }
                target.map(|t| (t, relationship))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SpdxDocument, SpdxRelationship};
    use crate::sink::InMemorySink;

    fn contains(from: &str, to: &str) -> SpdxRelationship {
        SpdxRelationship::new(from, RelationshipType::Contains, to)
    }

    fn document(packages: &[(&str, Option<&str>)], relationships: Vec<SpdxRelationship>) -> SpdxDocument {
        let mut doc = SpdxDocument::default();
        for (name, version) in packages {
            let mut pkg = SpdxPackage::new(format!("SPDXRef-{name}"), *name);
            pkg.version = version.map(String::from);
            doc.packages.push(pkg);
        }
        doc.relationships = relationships;
        doc
    }

    #[test]
    fn test_only_contains_is_followed() {
        assert_eq!(
            release_relationship_for(&RelationshipType::Contains),
            Some(ReleaseRelationship::Contained)
        );
        assert_eq!(release_relationship_for(&RelationshipType::DependsOn), None);
        assert_eq!(release_relationship_for(&RelationshipType::Describes), None);
    }

    #[test]
    fn test_cycle_is_skipped() {
        let doc = document(
            &[("a", Some("1")), ("b", Some("2"))],
            vec![contains("SPDXRef-a", "SPDXRef-b"), contains("SPDXRef-b", "SPDXRef-a")],
        );
        let index = SpdxDocumentIndex::build(&doc);
        let sink = InMemorySink::new();
        let user = User::new("a@b.c", "QA");
        let mut graph = GraphBuilder::new(&sink, &index, &user);

        let response = graph.import_release(0, None).unwrap().unwrap();
        let state = sink.snapshot().unwrap();
        assert_eq!(state.releases.len(), 2);

        let a = sink.get_release(response.id()).unwrap();
        assert_eq!(a.release_id_to_relationship.len(), 1);
        let b_id = a.release_id_to_relationship.keys().next().unwrap();
        let b = sink.get_release(b_id).unwrap();
        assert!(b.release_id_to_relationship.is_empty());
    }

    #[test]
    fn test_diamond_reuses_release() {
        let doc = document(
            &[("a", Some("1")), ("b", Some("1")), ("c", Some("1")), ("d", Some("1"))],
            vec![
                contains("SPDXRef-a", "SPDXRef-b"),
                contains("SPDXRef-a", "SPDXRef-c"),
                contains("SPDXRef-b", "SPDXRef-d"),
                contains("SPDXRef-c", "SPDXRef-d"),
            ],
        );
        let index = SpdxDocumentIndex::build(&doc);
        let sink = InMemorySink::new();
        let user = User::new("a@b.c", "QA");
        let mut graph = GraphBuilder::new(&sink, &index, &user);

        graph.import_release(0, None).unwrap().unwrap();
        let state = sink.snapshot().unwrap();
        assert_eq!(state.releases.len(), 4);
        assert_eq!(state.components.len(), 4);

        let b = state.releases.values().find(|r| r.name == "b").unwrap();
        let c = state.releases.values().find(|r| r.name == "c").unwrap();
        assert_eq!(b.release_id_to_relationship, c.release_id_to_relationship);
    }

    #[test]
    fn test_release_nodes_tree() {
        let doc = document(
            &[("a", Some("1")), ("b", Some("1")), ("c", Some("1"))],
            vec![contains("SPDXRef-a", "SPDXRef-b"), contains("SPDXRef-b", "SPDXRef-c")],
        );
        let index = SpdxDocumentIndex::build(&doc);
        let sink = InMemorySink::new();
        let user = User::new("a@b.c", "QA");
        let mut graph = GraphBuilder::new(&sink, &index, &user);

        let nodes = graph.release_nodes(0).unwrap();
        assert_eq!(nodes.len(), 1);
        let (b_node, b_response) = &nodes[0];
        assert_eq!(b_node.children.len(), 1);
        assert!(b_node.children[0].children.is_empty());
        assert_eq!(b_node.subtree_size(), 2);
        // b release, b component, c release, c component
        assert_eq!(b_response.count(), 4);

        let state = sink.snapshot().unwrap();
        assert!(state.releases.values().all(|r| r.release_id_to_relationship.is_empty()));
    }

    #[test]
    fn test_versionless_child_is_component_only() {
        let doc = document(
            &[("a", Some("1")), ("b", None)],
            vec![contains("SPDXRef-a", "SPDXRef-b")],
        );
        let index = SpdxDocumentIndex::build(&doc);
        let sink = InMemorySink::new();
        let user = User::new("a@b.c", "QA");
        let mut graph = GraphBuilder::new(&sink, &index, &user);

        let response = graph.import_release(0, None).unwrap().unwrap();
        let state = sink.snapshot().unwrap();
        assert_eq!(state.releases.len(), 1);
        assert_eq!(state.components.len(), 2);
        assert!(sink
            .get_release(response.id())
            .unwrap()
            .release_id_to_relationship
            .is_empty());
        assert_eq!(graph.take_component_only().len(), 1);
    }

    #[test]
    fn test_unnamed_package_is_left_out() {
        let doc = document(
            &[("a", Some("1")), ("", Some("2")), ("c", Some("3"))],
            vec![contains("SPDXRef-a", "SPDXRef-"), contains("SPDXRef-a", "SPDXRef-c")],
        );
        let index = SpdxDocumentIndex::build(&doc);
        let sink = InMemorySink::new();
        let user = User::new("a@b.c", "QA");
        let mut graph = GraphBuilder::new(&sink, &index, &user);

        let response = graph.import_release(0, None).unwrap().unwrap();
        // a and c, each a release and a component
        assert_eq!(response.count(), 4);
        let a = sink.get_release(response.id()).unwrap();
        assert_eq!(a.release_id_to_relationship.len(), 1);

        // Already skipped, not retried as a sibling
        let attachment = Attachment::default();
        assert!(graph.import_unreached(&attachment).unwrap().is_empty());
        let state = sink.snapshot().unwrap();
        assert_eq!(state.components.len(), 2);
        assert_eq!(state.releases.len(), 2);
    }
}
