//! Strongly-typed identifier for backup definitions
//!
//! Identifiers are small integers handed out by the catalog's counter, so the
//! wrapper is a plain `u64` rather than a UUID.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Identifier of a stored backup definition, assigned once and never changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackupId(u64);

impl BackupId {
    /// Wrap a raw identifier
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw identifier
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Name of the record holding this definition
    pub fn record_name(&self) -> String {
        format!("Backup{}", self.0)
    }

    /// Inverse of `record_name`
    pub fn from_record_name(name: &str) -> Option<Self> {
        name.strip_prefix("Backup")?.parse().ok().map(Self)
    }
}

impl fmt::Display for BackupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for BackupId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl FromStr for BackupId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().trim_start_matches('#').parse().map(Self)
    }
}
