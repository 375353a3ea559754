//! Environment counters
//!
//! A single record at the installation root holding the compatibility stamp
//! and a flat map of integer counters. Every mutation goes through
//! `RecordStore::edit_with`, the store's only read-modify-write path.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RobotCopyResult;

use super::records::{Namespace, RecordStore};

/// Record name of the environment file in the Root namespace
pub const ENVIRONMENT_RECORD: &str = "environment";

/// Key holding the compatibility stamp
pub const COMPATIBILITY_KEY: &str = "FileStructureCompatibilityVersion";

/// Counter of backup definitions ever created
pub const TOTAL_BACKUPS_KEY: &str = "TotalBackups";

/// Typed view of the environment record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentCounters {
    #[serde(rename = "FileStructureCompatibilityVersion")]
    pub compatibility_version: u32,

    #[serde(flatten)]
    pub counters: BTreeMap<String, u64>,
}

impl EnvironmentCounters {
    /// Fresh counters stamped with `compatibility_version`
    pub fn new(compatibility_version: u32) -> Self {
        let mut counters = BTreeMap::new();
        counters.insert(TOTAL_BACKUPS_KEY.to_string(), 0);
        Self {
            compatibility_version,
            counters,
        }
    }

    pub fn get(&self, key: &str) -> Option<u64> {
        self.counters.get(key).copied()
    }
}

/// Accessor for the environment record
pub struct Environment<'a> {
    records: &'a RecordStore,
}

impl<'a> Environment<'a> {
    pub fn new(records: &'a RecordStore) -> Self {
        Self { records }
    }

    /// Load the whole record
    pub fn counters(&self) -> RobotCopyResult<EnvironmentCounters> {
        self.records.load_required(Namespace::Root, ENVIRONMENT_RECORD)
    }

    /// Write a fresh record, replacing whatever was there
    pub fn initialize(&self, compatibility_version: u32) -> RobotCopyResult<EnvironmentCounters> {
        let counters = EnvironmentCounters::new(compatibility_version);
        self.records
            .save(Namespace::Root, ENVIRONMENT_RECORD, &counters, None)?;
        Ok(counters)
    }

    /// Stored compatibility stamp, `None` when absent or not an integer
    pub fn compatibility_version(&self) -> RobotCopyResult<Option<u32>> {
        let record: Option<Value> = self.records.load(Namespace::Root, ENVIRONMENT_RECORD)?;
        Ok(record
            .as_ref()
            .and_then(|r| r.get(COMPATIBILITY_KEY))
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok()))
    }

    /// Read a counter, `default` when the key or the record is missing
    pub fn get(&self, key: &str, default: u64) -> RobotCopyResult<u64> {
        let record: Option<Value> = self.records.load(Namespace::Root, ENVIRONMENT_RECORD)?;
        Ok(record
            .as_ref()
            .and_then(|r| r.get(key))
            .and_then(Value::as_u64)
            .unwrap_or(default))
    }

    /// Overwrite a counter
    pub fn set(&self, key: &str, value: u64) -> RobotCopyResult<()> {
        self.records
            .edit_with(Namespace::Root, ENVIRONMENT_RECORD, None, |record| {
                record.insert(key.to_string(), Value::from(value));
            })
    }

    /// Add `by` to a counter (missing counts as 0) and return the new value
    pub fn increment(&self, key: &str, by: u64) -> RobotCopyResult<u64> {
        self.records
            .edit_with(Namespace::Root, ENVIRONMENT_RECORD, None, |record| {
                let current = record.get(key).and_then(Value::as_u64).unwrap_or(0);
                let next = current.saturating_add(by);
                record.insert(key.to_string(), Value::from(next));
                next
            })
    }
}
