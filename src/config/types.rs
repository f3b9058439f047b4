//! Configuration types for sbom-importer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// CLI arguments are layered over file values with [`AppConfig::merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Import behavior switches
    pub import: ImportConfig,
    /// Where the JSON store lives
    pub store: StoreConfig,
    /// Identity recorded on created entities
    pub user: UserConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for [`AppConfig`].
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    pub const fn spdx_document_enabled(mut self, enabled: bool) -> Self {
        self.config.import.spdx_document_enabled = enabled;
        self
    }

    pub const fn flexible_project_release_relationship(mut self, enabled: bool) -> Self {
        self.config.import.flexible_project_release_relationship = enabled;
        self
    }

    pub fn store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.store.path = path.into();
        self
    }

    pub fn user(mut self, email: impl Into<String>, department: impl Into<String>) -> Self {
        self.config.user.email = email.into();
        self.config.user.department = department.into();
        self
    }

    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Section types
// ============================================================================

/// Switches handed to the importer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ImportConfig {
    /// Store SPDX document, creation and package information next to
    /// imported releases
    pub spdx_document_enabled: bool,
    /// Build a release network tree for projects instead of a flat
    /// release usage map
    pub flexible_project_release_relationship: bool,
}

/// Location of the JSON store used by the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct StoreConfig {
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(super::DEFAULT_STORE_PATH),
        }
    }
}

/// The importing user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct UserConfig {
    pub email: String,
    /// Becomes the business unit of created components
    pub department: String,
}

impl UserConfig {
    #[must_use]
    pub fn to_user(&self) -> crate::model::User {
        crate::model::User::new(self.email.clone(), self.department.clone())
    }
}
