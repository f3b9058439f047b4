//! Configuration module for sbom-importer.
//!
//! This module provides:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - Named presets for the import switches
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Configuration File
//!
//! Place a `.sbom-importer.yaml` file in the working directory or
//! `~/.config/sbom-importer/`:
//!
//! ```yaml
//! import:
//!   spdx_document_enabled: true
//! user:
//!   email: jane@example.org
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{ConfigPreset, DEFAULT_STORE_PATH};
pub use types::{AppConfig, AppConfigBuilder, ImportConfig, StoreConfig, UserConfig};
pub use validation::{ConfigError, Validatable};

pub use file::{
    ConfigFileError, discover_config_file, generate_example_config, load_config_file,
    load_or_default,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// # Errors
/// Returns an error if the schema cannot be serialized
pub fn generate_json_schema() -> Result<String, serde_json::Error> {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_schema_names_sections() {
        let schema = generate_json_schema().unwrap();
        assert!(schema.contains("spdx_document_enabled"));
        assert!(schema.contains("flexible_project_release_relationship"));
        assert!(schema.contains("department"));
    }
}
