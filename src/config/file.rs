//! YAML config files: where they are looked for, how they are read, and
//! how command line values are layered on top.

use super::types::AppConfig;
use std::path::{Path, PathBuf};

// ============================================================================
// Discovery
// ============================================================================

/// File names tried in each searched directory, first match wins.
const CONFIG_FILE_NAMES: &[&str] = &[
    ".sbom-importer.yaml",
    ".sbom-importer.yml",
    "sbom-importer.yaml",
];

/// Directories searched when no explicit path is given, in order: the
/// working directory, `<config dir>/sbom-importer`, then the home directory.
fn search_dirs() -> Vec<PathBuf> {
    let mut dirs_to_search = Vec::with_capacity(3);
    dirs_to_search.extend(std::env::current_dir().ok());
    dirs_to_search.extend(dirs::config_dir().map(|dir| dir.join("sbom-importer")));
    dirs_to_search.extend(dirs::home_dir());
    dirs_to_search
}

/// Locate the config file to use.
///
/// An explicit path wins when it exists; otherwise [`search_dirs`] are
/// tried in turn.
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path
        && path.is_file()
    {
        return Some(path.to_path_buf());
    }
    search_dirs().iter().find_map(|dir| find_config_in_dir(dir))
}

fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

// ============================================================================
// Loading
// ============================================================================

/// Failure to read a config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("config file {} does not exist", .0.display())]
    NotFound(PathBuf),
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config YAML: {0}")]
    Parse(#[from] serde_yaml_ng::Error),
}

/// Read and deserialize one config file. Missing sections take defaults.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(serde_yaml_ng::from_str(&text)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ConfigFileError::NotFound(path.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}

/// The discovered config, or defaults when none is found or it is broken.
///
/// Also returns the path the config came from.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    let Some(path) = discover_config_file(explicit_path) else {
        return (AppConfig::default(), None);
    };
    match load_config_file(&path) {
        Ok(config) => (config, Some(path)),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring config file");
            (AppConfig::default(), None)
        }
    }
}

// ============================================================================
// Layering
// ============================================================================

impl AppConfig {
    /// Layer `other` over `self`.
    ///
    /// Switches only ever turn on; strings and paths override when set.
    pub fn merge(&mut self, other: &Self) {
        if other.import.spdx_document_enabled {
            self.import.spdx_document_enabled = true;
        }
        if other.import.flexible_project_release_relationship {
            self.import.flexible_project_release_relationship = true;
        }

        if other.store.path.as_os_str() != super::DEFAULT_STORE_PATH {
            self.store.path.clone_from(&other.store.path);
        }

        if !other.user.email.is_empty() {
            self.user.email.clone_from(&other.user.email);
        }
        if !other.user.department.is_empty() {
            self.user.department.clone_from(&other.user.department);
        }
    }

    /// The discovered config with command line values layered on top.
    #[must_use]
    pub fn from_file_with_overrides(
        explicit_path: Option<&Path>,
        overrides: &Self,
    ) -> (Self, Option<PathBuf>) {
        let (mut merged, source) = load_or_default(explicit_path);
        merged.merge(overrides);
        (merged, source)
    }
}

// ============================================================================
// Example
// ============================================================================

/// A commented config file showing every setting with its default.
#[must_use]
pub fn generate_example_config() -> String {
    r"# SBOM Importer Configuration
# ============================
#
# Place this file at:
#   - .sbom-importer.yaml in the working directory
#   - ~/.config/sbom-importer/sbom-importer.yaml for global config
#
# Flags given on the command line take precedence over this file.

import:
  # Store SPDX document, creation and package information with each release
  spdx_document_enabled: false
  # Build a release network tree for projects instead of a flat usage map
  flexible_project_release_relationship: false

store:
  # JSON file holding components, releases, projects and document records
  path: sbom-store.json

user:
  # Recorded as creator of every imported entity
  email: importer@example.org
  # Becomes the business unit of created components
  department: ''
"
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================
