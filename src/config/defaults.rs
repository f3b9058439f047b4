//! Default configurations and presets for sbom-importer.

use super::types::{AppConfig, ImportConfig};

/// Store file used when none is configured.
pub const DEFAULT_STORE_PATH: &str = "sbom-store.json";

// ============================================================================
// Configuration Presets
// ============================================================================

/// Named configuration presets for common use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPreset {
    /// Releases and flat project usage, no document metadata
    Default,
    /// Same switches as `Default`, kept for scripts that name it
    Legacy,
    /// Document metadata and release network trees
    Full,
}

impl ConfigPreset {
    /// Get the preset name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Legacy => "legacy",
            Self::Full => "full",
        }
    }

    /// Parse a preset from a string name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" => Some(Self::Default),
            "legacy" | "flat" => Some(Self::Legacy),
            "full" | "flexible" => Some(Self::Full),
            _ => None,
        }
    }

    /// Get a description of this preset.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Default => "Import releases and projects without document metadata",
            Self::Legacy => "Flat project release usage map, no document metadata",
            Self::Full => "Store SPDX document metadata and build release network trees",
        }
    }

    /// Get all available presets.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Default, Self::Legacy, Self::Full]
    }

    /// Import switches of this preset.
    #[must_use]
    pub const fn import_config(&self) -> ImportConfig {
        match self {
            Self::Default | Self::Legacy => ImportConfig {
                spdx_document_enabled: false,
                flexible_project_release_relationship: false,
            },
            Self::Full => ImportConfig {
                spdx_document_enabled: true,
                flexible_project_release_relationship: true,
            },
        }
    }
}

impl std::fmt::Display for ConfigPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl AppConfig {
    /// Create a configuration from a preset.
    #[must_use]
    pub fn from_preset(preset: ConfigPreset) -> Self {
        Self {
            import: preset.import_config(),
            ..Self::default()
        }
    }
}
