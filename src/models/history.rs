//! Backup history model
//!
//! One entry per finished backup run. Entries snapshot the definition's name
//! and paths so the ledger stays readable after the definition is edited or
//! removed.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::definition::BackupDefinition;
use super::ids::BackupId;

/// Which batch a backup ran in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OperationGroup {
    #[default]
    Unknown,
    Startup,
    Logon,
    Alone,
}

impl OperationGroup {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "unknown" => Some(Self::Unknown),
            "startup" => Some(Self::Startup),
            "logon" => Some(Self::Logon),
            "alone" | "manual" => Some(Self::Alone),
            _ => None,
        }
    }
}

impl fmt::Display for OperationGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "Unknown"),
            Self::Startup => write!(f, "Startup"),
            Self::Logon => write!(f, "Logon"),
            Self::Alone => write!(f, "Alone"),
        }
    }
}

/// How a backup run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationResult {
    OriginMissing,
    DestinationMissing,
    NestedTargets,
    IdenticalTargets,
    IllegalParameters,
    UserInterrupted,
    Success,
    Other,
}

impl OperationResult {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "origin_missing" => Some(Self::OriginMissing),
            "destination_missing" => Some(Self::DestinationMissing),
            "nested_targets" | "nested" => Some(Self::NestedTargets),
            "identical_targets" | "identical" => Some(Self::IdenticalTargets),
            "illegal_parameters" => Some(Self::IllegalParameters),
            "user_interrupted" | "interrupted" => Some(Self::UserInterrupted),
            "success" | "ok" => Some(Self::Success),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// One-word label for tables
    pub fn short_label(&self) -> &'static str {
        match self {
            Self::OriginMissing => "No Origin",
            Self::DestinationMissing => "No Destination",
            Self::NestedTargets => "Nested",
            Self::IdenticalTargets => "Identical",
            Self::IllegalParameters => "Illegal",
            Self::UserInterrupted => "Interrupted",
            Self::Success => "Success",
            Self::Other => "Failed",
        }
    }
}

impl fmt::Display for OperationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::OriginMissing => "The origin folder could not be found",
            Self::DestinationMissing => "The destination folder could not be found",
            Self::NestedTargets => "The origin and destination folders are nested",
            Self::IdenticalTargets => "The origin and destination folders are the same",
            Self::IllegalParameters => "The backup was started with illegal parameters",
            Self::UserInterrupted => "The backup was interrupted by the user",
            Self::Success => "The backup completed successfully",
            Self::Other => "The backup failed for an unknown reason",
        };
        write!(f, "{}", text)
    }
}

/// A single, immutable backup history record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupHistoryEntry {
    pub backup_id: BackupId,

    #[serde(rename = "backup_name")]
    pub name: String,

    #[serde(rename = "origin_folder")]
    pub origin: PathBuf,

    #[serde(rename = "destination_folder")]
    pub destination: PathBuf,

    #[serde(rename = "backup_time")]
    pub completed_at: DateTime<Utc>,

    pub operation_group: OperationGroup,

    pub operation_result: OperationResult,
}

impl BackupHistoryEntry {
    /// Snapshot a definition's outcome at `completed_at`
    pub fn record(
        definition: &BackupDefinition,
        completed_at: DateTime<Utc>,
        operation_group: OperationGroup,
        operation_result: OperationResult,
    ) -> Self {
        Self {
            backup_id: definition.id,
            name: definition.plan.name.clone(),
            origin: definition.plan.origin.clone(),
            destination: definition.plan.destination.clone(),
            completed_at,
            operation_group,
            operation_result,
        }
    }
}
