//! Backup history ledger
//!
//! The whole ledger is one JSON array in the Logs namespace, oldest entry
//! first. Appending rewrites the array; history grows with backup runs, not
//! with anything high-volume.

use crate::error::RobotCopyResult;
use crate::models::{BackupHistoryEntry, BackupId};

use super::records::{Namespace, RecordStore};

/// Record name of the ledger in the Logs namespace
pub const HISTORY_RECORD: &str = "backup_history";

/// Append-only log of backup outcomes
pub struct HistoryLedger<'a> {
    records: &'a RecordStore,
}

impl<'a> HistoryLedger<'a> {
    pub(crate) fn new(records: &'a RecordStore) -> Self {
        Self { records }
    }

    /// Add an entry at the end
    ///
    /// Fails without writing if the stored ledger cannot be read.
    pub fn append(&self, entry: BackupHistoryEntry) -> RobotCopyResult<()> {
        let mut entries = self.list()?;
        entries.push(entry);
        self.records
            .save(Namespace::Logs, HISTORY_RECORD, &entries, None)
    }

    /// Every entry in insertion order
    pub fn list(&self) -> RobotCopyResult<Vec<BackupHistoryEntry>> {
        Ok(self
            .records
            .load(Namespace::Logs, HISTORY_RECORD)?
            .unwrap_or_default())
    }

    /// Entries belonging to one definition, in insertion order
    pub fn for_backup(&self, id: BackupId) -> RobotCopyResult<Vec<BackupHistoryEntry>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|entry| entry.backup_id == id)
            .collect())
    }

    /// Drop every entry
    pub fn clear(&self) -> RobotCopyResult<()> {
        let empty: Vec<BackupHistoryEntry> = Vec::new();
        self.records
            .save(Namespace::Logs, HISTORY_RECORD, &empty, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::AppPaths;
    use crate::models::{OperationGroup, OperationResult};
    use chrono::{Duration, TimeZone, Utc};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, RecordStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = RecordStore::new(AppPaths::with_base_dir(temp_dir.path().to_path_buf()));
        (temp_dir, store)
    }

    fn entry(id: u64, minutes: i64, result: OperationResult) -> BackupHistoryEntry {
        BackupHistoryEntry {
            backup_id: BackupId::new(id),
            name: format!("Backup {}", id),
            origin: PathBuf::from("/src"),
            destination: PathBuf::from("/dst"),
            completed_at: Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap()
                + Duration::minutes(minutes),
            operation_group: OperationGroup::Alone,
            operation_result: result,
        }
    }

    #[test]
    fn test_empty_when_absent() {
        let (_temp_dir, store) = create_test_store();
        assert!(HistoryLedger::new(&store).list().unwrap().is_empty());
    }

    #[test]
    fn test_append_preserves_insertion_order() {
        let (temp_dir, store) = create_test_store();
        let ledger = HistoryLedger::new(&store);

        // Later timestamp first; no re-sorting
        let late = entry(1, 30, OperationResult::Success);
        let early = entry(2, 0, OperationResult::OriginMissing);
        ledger.append(late.clone()).unwrap();
        ledger.append(early.clone()).unwrap();

        assert_eq!(ledger.list().unwrap(), vec![late, early]);
        assert!(temp_dir.path().join("Logs").join("backup_history.json").exists());
    }

    #[test]
    fn test_clear_then_append() {
        let (_temp_dir, store) = create_test_store();
        let ledger = HistoryLedger::new(&store);
        ledger.append(entry(1, 0, OperationResult::Success)).unwrap();

        ledger.clear().unwrap();
        assert!(ledger.list().unwrap().is_empty());

        let e = entry(3, 5, OperationResult::UserInterrupted);
        ledger.append(e.clone()).unwrap();
        assert_eq!(ledger.list().unwrap(), vec![e]);
    }

    #[test]
    fn test_for_backup() {
        let (_temp_dir, store) = create_test_store();
        let ledger = HistoryLedger::new(&store);
        ledger.append(entry(1, 0, OperationResult::Success)).unwrap();
        ledger.append(entry(2, 1, OperationResult::Other)).unwrap();
        ledger.append(entry(1, 2, OperationResult::NestedTargets)).unwrap();

        let first = ledger.for_backup(BackupId::new(1)).unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[1].operation_result, OperationResult::NestedTargets);
    }

    #[test]
    fn test_append_refuses_malformed_ledger() {
        let (temp_dir, store) = create_test_store();
        let logs = temp_dir.path().join("Logs");
        fs::create_dir_all(&logs).unwrap();
        fs::write(logs.join("backup_history.json"), "[{ broken").unwrap();

        let ledger = HistoryLedger::new(&store);
        assert!(ledger.append(entry(1, 0, OperationResult::Success)).is_err());
        assert_eq!(
            fs::read_to_string(logs.join("backup_history.json")).unwrap(),
            "[{ broken"
        );
    }
}
