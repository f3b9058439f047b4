//! Write results reported by a sink.

use crate::model::ReleaseRelationship;
use serde::Serialize;

/// Outcome of one sink write, plus the writes it triggered.
///
/// Responses form a tree mirroring the import: a release response holds its
/// component's response and the responses of the releases it links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[must_use]
pub struct Response {
    id: String,
    affected: bool,
    release_relationship: ReleaseRelationship,
    children: Vec<Response>,
}

impl Response {
    /// A freshly written entity.
    pub fn created(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            affected: true,
            release_relationship: ReleaseRelationship::default(),
            children: Vec::new(),
        }
    }

    /// An entity that already existed and was left as is.
    pub fn existing(id: impl Into<String>) -> Self {
        Self {
            affected: false,
            ..Self::created(id)
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub const fn is_affected(&self) -> bool {
        self.affected
    }

    #[must_use]
    pub const fn release_relationship(&self) -> ReleaseRelationship {
        self.release_relationship
    }

    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    pub fn with_relationship(mut self, relationship: ReleaseRelationship) -> Self {
        self.release_relationship = relationship;
        self
    }

    pub fn add_child(&mut self, child: Self) {
        self.children.push(child);
    }

    pub fn add_children(&mut self, children: impl IntoIterator<Item = Self>) {
        self.children.extend(children);
    }

    /// This entity plus every entity below it.
    #[must_use]
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Self::count).sum::<usize>()
    }

    /// Entities in this tree that were actually written.
    #[must_use]
    pub fn count_affected(&self) -> usize {
        usize::from(self.affected) + self.children.iter().map(Self::count_affected).sum::<usize>()
    }
}
