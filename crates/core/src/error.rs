//! Error types shared across the yamato-gen workspace.

// Rust 1.92 compiler bug: false positives for thiserror/miette derive macro fields
// https://github.com/rust-lang/rust/issues/147648
#![allow(unused_assignments)]

use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for yamato-gen operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading configuration or generating pipeline definitions.
///
/// Every variant aborts generation of the whole job set. Nothing is retried.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// A required key is absent from an input descriptor.
    #[error("{entity} is missing required field '{field}'")]
    #[diagnostic(
        code(yamato::input::missing_field),
        help("Every editor needs a `version` and every project needs a `name`")
    )]
    MissingField {
        /// Kind of descriptor (e.g. "editor", "project")
        entity: &'static str,
        /// Name of the missing field
        field: &'static str,
    },

    /// The naming service could not resolve a key into an identifier or path.
    #[error("Cannot derive a name from {kind} '{key}': {reason}")]
    #[diagnostic(code(yamato::naming::unknown_key))]
    UnknownNamingKey {
        /// Kind of key (e.g. "editor version", "project name")
        kind: &'static str,
        /// The key that failed to resolve
        key: String,
        /// Why it failed
        reason: String,
    },

    /// Invalid configuration.
    #[error("Configuration error: {message}")]
    #[diagnostic(code(yamato::config))]
    Config {
        /// The error message
        message: String,
        /// The configuration file involved, if known
        path: Option<PathBuf>,
    },

    /// Two jobs in the same pipeline file resolved to the same identifier.
    #[error("Duplicate job id '{job_id}'")]
    #[diagnostic(
        code(yamato::jobs::duplicate),
        help("Editor versions and project names must be unique in the configuration")
    )]
    DuplicateJob {
        /// The colliding job id
        job_id: String,
    },

    /// YAML serialization or deserialization failed.
    #[error("Serialization error: {message}")]
    #[diagnostic(code(yamato::serialization))]
    Serialization {
        /// Error message from the serializer
        message: String,
    },

    /// I/O error while reading configuration or writing pipeline files.
    #[error("I/O {operation} failed{}", path.as_ref().map_or(String::new(), |p| format!(": {}", p.display())))]
    #[diagnostic(
        code(yamato::io),
        help("Check file permissions and ensure the path exists")
    )]
    Io {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// Path that caused the error, if available
        path: Option<Box<Path>>,
        /// Operation that failed (e.g., "read", "write")
        operation: String,
    },
}

impl Error {
    /// Create a missing-field error.
    #[must_use]
    pub const fn missing_field(entity: &'static str, field: &'static str) -> Self {
        Self::MissingField { entity, field }
    }

    /// Create an unknown-naming-key error.
    #[must_use]
    pub fn unknown_naming_key(
        kind: &'static str,
        key: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::UnknownNamingKey {
            kind,
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error without a file path.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            path: None,
        }
    }

    /// Create a configuration error tied to a file.
    #[must_use]
    pub fn config_at(message: impl Into<String>, path: impl AsRef<Path>) -> Self {
        Self::Config {
            message: message.into(),
            path: Some(path.as_ref().to_path_buf()),
        }
    }

    /// Create a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create an I/O error with path context.
    #[must_use]
    pub fn io(
        source: std::io::Error,
        path: impl AsRef<Path>,
        operation: impl Into<String>,
    ) -> Self {
        Self::Io {
            source,
            path: Some(path.as_ref().into()),
            operation: operation.into(),
        }
    }

    /// Whether this error stems from user input rather than the environment.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::MissingField { .. }
                | Self::UnknownNamingKey { .. }
                | Self::Config { .. }
                | Self::DuplicateJob { .. }
        )
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Self::serialization(err.to_string())
    }
}
