//! Unified error types for sbom-importer.
//!
//! The taxonomy follows the stages of an import: the upload is rejected
//! before parsing, the source fails to parse, the document is structurally
//! unusable, or the persistence sink refuses a read or write. Failures of a
//! single field or sub-entity are absorbed by the mapper and never surface
//! here (see [`MappingError`]).

use crate::parsers::ParseError;
use crate::sink::SinkError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for import operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ImportError {
    /// Upload refused before any parsing was attempted
    #[error("Input rejected: {0}")]
    InputRejected(String),

    /// Malformed source content
    #[error("Failed to parse SPDX document: {context}")]
    Parse {
        context: String,
        #[source]
        source: ParseError,
    },

    /// Zero or several described top-level packages
    #[error(transparent)]
    Structural(#[from] StructuralViolation),

    /// The described package cannot become the requested entity
    #[error("Failed to import the BOM as type=[{target}].")]
    NotImportable { target: String },

    /// Sink rejected a read or write; entities written earlier in the run stay
    #[error("Persistence failed: {context}")]
    Persistence {
        context: String,
        #[source]
        source: SinkError,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A value could not be encoded for storage
    #[error("JSON serialization failed: {0}")]
    Serialization(String),
}

/// Document shape violations that abort an import.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralViolation {
    #[error("The provided BOM did not contain any top level packages.")]
    NoTopLevelPackage,

    #[error(
        "The provided BOM file contained multiple described top level packages. This is not allowed here."
    )]
    MultipleTopLevelPackages { count: usize },
}

/// A single field or sub-entity that could not be mapped.
///
/// These are logged and skipped; an import never fails because of one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("Missing {0} pointer")]
    MissingPointer(&'static str),

    #[error("Start and end pointers differ in kind ({start} vs {end})")]
    MismatchedPointers { start: String, end: String },

    #[error("Malformed creator '{0}', expected 'Type: value'")]
    MalformedCreator(String),

    #[error("Incomplete checksum (algorithm '{algorithm}', value '{value}')")]
    IncompleteChecksum { algorithm: String, value: String },
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for import operations
pub type Result<T> = std::result::Result<T, ImportError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl ImportError {
    /// Create a parse error with context
    pub fn parse(context: impl Into<String>, source: ParseError) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }

    /// Create a persistence error with context
    pub fn persistence(context: impl Into<String>, source: SinkError) -> Self {
        Self::Persistence {
            context: context.into(),
            source,
        }
    }

    /// Create an input rejection
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::InputRejected(message.into())
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether the sink was touched before this error was raised.
    ///
    /// Only failures raised once the graph walk has started can leave
    /// entities behind; everything else aborts before the first write.
    #[must_use]
    pub const fn may_have_written(&self) -> bool {
        matches!(
            self,
            Self::Persistence { .. } | Self::NotImportable { .. } | Self::Serialization(_)
        )
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<ParseError> for ImportError {
    fn from(err: ParseError) -> Self {
        Self::parse(String::new(), err)
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<SinkError> for ImportError {
    fn from(err: SinkError) -> Self {
        Self::persistence(String::new(), err)
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context strings are chained outermost first, so an error raised while
/// adding a release for a nested package reads
/// `"importing package X: adding release: <sink message>"`.
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure (lazy evaluation).
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<ImportError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: ImportError, new_ctx: &str) -> ImportError {
    match err {
        ImportError::Parse {
            context: existing,
            source,
        } => ImportError::Parse {
            context: chain_context(new_ctx, &existing),
            source,
        },
        ImportError::Persistence {
            context: existing,
            source,
        } => ImportError::Persistence {
            context: chain_context(new_ctx, &existing),
            source,
        },
        ImportError::Io {
            path,
            message,
            source,
        } => ImportError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        ImportError::InputRejected(msg) => {
            ImportError::InputRejected(chain_context(new_ctx, &msg))
        }
        ImportError::Config(msg) => ImportError::Config(chain_context(new_ctx, &msg)),
        ImportError::Serialization(msg) => {
            ImportError::Serialization(chain_context(new_ctx, &msg))
        }
        // Structural messages are user-facing verbatim
        other @ (ImportError::Structural(_) | ImportError::NotImportable { .. }) => other,
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

/// Extension trait for Option types to convert to errors with context.
pub trait OptionContext<T> {
    /// Convert None to an input rejection with the given context.
    fn context_none(self, context: impl Into<String>) -> Result<T>;

    /// Convert None to an input rejection with context from a closure.
    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T> OptionContext<T> for Option<T> {
    fn context_none(self, context: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| ImportError::InputRejected(context.into()))
    }

    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.ok_or_else(|| ImportError::InputRejected(f().into()))
    }
}
