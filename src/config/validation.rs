//! Configuration validation for sbom-importer.

use super::types::{AppConfig, StoreConfig, UserConfig};

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.store.validate());
        errors.extend(self.user.validate());
        errors
    }
}

impl Validatable for StoreConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.path.as_os_str().is_empty() {
            errors.push(ConfigError {
                field: "store.path".to_string(),
                message: "Store path must not be empty".to_string(),
            });
        } else if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            errors.push(ConfigError {
                field: "store.path".to_string(),
                message: format!("Parent directory does not exist: {}", parent.display()),
            });
        }
        errors
    }
}

impl Validatable for UserConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.email.trim().is_empty() {
            errors.push(ConfigError {
                field: "user.email".to_string(),
                message: "An importing user email is required".to_string(),
            });
        } else if !self.email.contains('@') {
            errors.push(ConfigError {
                field: "user.email".to_string(),
                message: format!("'{}' is not an email address", self.email),
            });
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_needs_user() {
        let errors = AppConfig::default().validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "user.email");
    }

    #[test]
    fn test_valid_config() {
        let config = AppConfig::builder().user("jane@example.org", "R&D").build();
        assert!(config.is_valid());
    }

    #[test]
    fn test_bad_email() {
        let user = UserConfig {
            email: "jane".into(),
            department: String::new(),
        };
        assert!(!user.is_valid());
    }

    #[test]
    fn test_store_parent_must_exist() {
        let store = StoreConfig {
            path: PathBuf::from("/definitely/not/here/store.json"),
        };
        let errors = store.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("Parent directory"));

        let empty = StoreConfig {
            path: PathBuf::new(),
        };
        assert!(!empty.is_valid());
    }
}
