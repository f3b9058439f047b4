//! Catalog entities the importer writes: components, releases, projects.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Relationship of a release to the release or project that links it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReleaseRelationship {
    Contained,
    Referred,
    #[default]
    Unknown,
    DynamicallyLinked,
    StaticallyLinked,
    SideBySide,
    Standalone,
    InternalUse,
    Optional,
    ToBeReplaced,
    CodeSnippet,
}

impl ReleaseRelationship {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Contained => "CONTAINED",
            Self::Referred => "REFERRED",
            Self::Unknown => "UNKNOWN",
            Self::DynamicallyLinked => "DYNAMICALLY_LINKED",
            Self::StaticallyLinked => "STATICALLY_LINKED",
            Self::SideBySide => "SIDE_BY_SIDE",
            Self::Standalone => "STANDALONE",
            Self::InternalUse => "INTERNAL_USE",
            Self::Optional => "OPTIONAL",
            Self::ToBeReplaced => "TO_BE_REPLACED",
            Self::CodeSnippet => "CODE_SNIPPET",
        }
    }
}

impl fmt::Display for ReleaseRelationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Workflow state of a project-to-release link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MainlineState {
    #[default]
    Open,
    Mainline,
    Specific,
    Phaseout,
    Denied,
}

impl fmt::Display for MainlineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Open => "OPEN",
            Self::Mainline => "MAINLINE",
            Self::Specific => "SPECIFIC",
            Self::Phaseout => "PHASEOUT",
            Self::Denied => "DENIED",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComponentType {
    #[default]
    Oss,
    Cots,
    Internal,
    InnerSource,
    Service,
    Freesoftware,
    CodeSnippet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttachmentType {
    #[default]
    ComponentLicenseInfoCombined,
    Document,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckStatus {
    #[default]
    NotChecked,
    Accepted,
    Rejected,
}

/// The person an import runs on behalf of.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub department: String,
}

impl User {
    pub fn new(email: impl Into<String>, department: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            department: department.into(),
        }
    }
}

/// Metadata of an uploaded file, as handed over by the upload layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentContent {
    pub id: String,
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl AttachmentContent {
    pub fn new(id: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            filename: filename.into(),
            content_type: None,
        }
    }
}

/// An uploaded file linked to a release or project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub attachment_content_id: String,
    pub filename: String,
    pub attachment_type: AttachmentType,
    pub created_comment: String,
    pub created_by: String,
    pub created_on: String,
    pub check_status: CheckStatus,
    pub sha256: String,
}

/// A product aggregation root, deduplicated by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub component_type: ComponentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_unit: Option<String>,
    pub created_by: String,
    pub created_on: String,
}

/// One version of a component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub version: String,
    pub component_id: String,
    #[serde(default)]
    pub external_ids: BTreeMap<String, String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    /// Linked release id to relationship, in link order
    #[serde(default)]
    pub release_id_to_relationship: IndexMap<String, ReleaseRelationship>,
    /// Linked SPDX document record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spdx_id: Option<String>,
    pub created_by: String,
    pub created_on: String,
}

impl Release {
    /// `"name version"`, the deduplication key.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{} {}", self.name, self.version)
    }
}

/// Usage of a release inside a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectReleaseRelationship {
    pub release_relation: ReleaseRelationship,
    pub mainline_state: MainlineState,
}

impl ProjectReleaseRelationship {
    #[must_use]
    pub const fn new(release_relation: ReleaseRelationship, mainline_state: MainlineState) -> Self {
        Self {
            release_relation,
            mainline_state,
        }
    }
}

/// A consumer of releases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub release_id_to_usage: IndexMap<String, ProjectReleaseRelationship>,
    /// JSON-encoded [`ReleaseNode`] forest, set in flexible mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_relation_network: Option<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    pub created_by: String,
    pub created_on: String,
}

impl Project {
    /// `"name version"`, the deduplication key.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{} {}", self.name, self.version)
    }
}

/// A node of a project's release dependency tree.
///
/// Field names on the wire match what existing consumers of
/// `release_relation_network` read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseNode {
    #[serde(rename = "releaseId")]
    pub release_id: String,
    #[serde(rename = "releaseRelationship")]
    pub relationship: ReleaseRelationship,
    #[serde(rename = "mainlineState")]
    pub mainline_state: MainlineState,
    #[serde(default)]
    pub comment: String,
    #[serde(rename = "createOn")]
    pub created_on: String,
    #[serde(rename = "createBy")]
    pub created_by: String,
    #[serde(rename = "releaseLink", default)]
    pub children: Vec<ReleaseNode>,
}

impl ReleaseNode {
    pub fn new(
        release_id: impl Into<String>,
        relationship: ReleaseRelationship,
        created_by: impl Into<String>,
        created_on: impl Into<String>,
    ) -> Self {
        Self {
            release_id: release_id.into(),
            relationship,
            mainline_state: MainlineState::Open,
            comment: String::new(),
            created_on: created_on.into(),
            created_by: created_by.into(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<Self>) -> Self {
        self.children = children;
        self
    }

    /// Number of nodes in this subtree, this one included.
    #[must_use]
    pub fn subtree_size(&self) -> usize {
        1 + self.children.iter().map(Self::subtree_size).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_node_wire_names() {
        let node = ReleaseNode::new("r1", ReleaseRelationship::Contained, "a@b.c", "2024-01-01")
            .with_children(vec![ReleaseNode::new(
                "r2",
                ReleaseRelationship::Contained,
                "a@b.c",
                "2024-01-01",
            )]);
        let json = serde_json::to_value(&node).unwrap();

        assert_eq!(json["releaseId"], "r1");
        assert_eq!(json["releaseRelationship"], "CONTAINED");
        assert_eq!(json["mainlineState"], "OPEN");
        assert_eq!(json["createBy"], "a@b.c");
        assert_eq!(json["createOn"], "2024-01-01");
        assert_eq!(json["releaseLink"][0]["releaseId"], "r2");
        assert_eq!(node.subtree_size(), 2);
    }

    #[test]
    fn test_qualified_names() {
        let release = Release {
            name: "zlib".into(),
            version: "1.3".into(),
            ..Release::default()
        };
        assert_eq!(release.qualified_name(), "zlib 1.3");
    }
}
