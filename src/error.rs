//! Custom error types for RobotCopy
//!
//! This module defines the error hierarchy for the library using thiserror.
//! Storage and serialization failures degrade to these values at the record
//! store boundary; folder-analysis failures never become errors at all.

use std::path::PathBuf;

use thiserror::Error;

use crate::fs::access::AccessType;

/// The main error type for RobotCopy operations
#[derive(Error, Debug)]
pub enum RobotCopyError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Record store errors (resolution, write, rename, remove)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Validation errors for backup definitions
    #[error("Validation error: {0}")]
    Validation(String),

    /// Display name longer than the configured bound
    #[error("Backup name is too long ({length} chars, max {max})")]
    NameTooLong { length: usize, max: usize },

    /// Origin and destination resolve to the same folder
    #[error("Origin and destination refer to the same location: {0}")]
    IdenticalTargets(PathBuf),

    /// One of origin/destination lives inside the other
    #[error("Origin '{origin}' and destination '{destination}' are nested within one another")]
    NestedTargets {
        origin: PathBuf,
        destination: PathBuf,
    },

    /// The relation between two paths could not be determined
    #[error("Cannot determine how '{0}' and '{1}' relate to each other")]
    UndeterminedRelation(PathBuf, PathBuf),

    /// The folder does not allow the requested kind of access
    #[error("Folder '{path}' does not allow {access} access: {reason}")]
    AccessDenied {
        path: PathBuf,
        access: AccessType,
        reason: String,
    },

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Stored data was written by an incompatible version and the operator
    /// declined to reset it
    #[error(
        "Saved data is incompatible with this version (stored: {}, expected: {})",
        version_label(.stored),
        .expected
    )]
    IncompatibleData { stored: Option<u32>, expected: u32 },
}

impl RobotCopyError {
    /// Create a "not found" error for backup definitions
    pub fn backup_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Backup",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for stored records
    pub fn record_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Record",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error blocks a definition from being persisted
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::NameTooLong { .. }
                | Self::IdenticalTargets(_)
                | Self::NestedTargets { .. }
                | Self::UndeterminedRelation(..)
                | Self::AccessDenied { .. }
        )
    }
}

impl From<std::io::Error> for RobotCopyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for RobotCopyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

fn version_label(version: &Option<u32>) -> String {
    version
        .map(|v| v.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Result type alias for RobotCopy operations
pub type RobotCopyResult<T> = Result<T, RobotCopyError>;
