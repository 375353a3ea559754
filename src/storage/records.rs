//! Keyed record store
//!
//! A record is one JSON document identified by `(namespace, name, extension)`.
//! Names are unique within a namespace regardless of extension: lookups probe
//! the known extensions in priority order and saves clear stale siblings.
//!
//! Every I/O or (de)serialization failure is logged here, at the boundary,
//! and handed back as an `Err`; absence of a record is `Ok(None)`.
//!
//! The store is meant for a single process. `edit_with` serializes
//! read-modify-write sequences inside this process, nothing guards against a
//! second process writing the same installation root.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::config::paths::AppPaths;
use crate::error::{RobotCopyError, RobotCopyResult};

use super::file_io::{read_json, write_json_atomic};

/// Extension used for backup definition records
pub const BACKUP_ENTRY_EXTENSION: &str = "rcbe";

/// Schema-free record body: a JSON object
pub type Record = Map<String, Value>;

/// Fixed logical partitions of the installation root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Backup definitions
    Backups,
    /// Settings and other general storage
    General,
    /// Backup history and other logs
    Logs,
    /// Scratch data
    Temp,
    /// Files directly under the installation root
    Root,
}

impl Namespace {
    pub const ALL: [Namespace; 5] = [
        Namespace::Backups,
        Namespace::General,
        Namespace::Logs,
        Namespace::Temp,
        Namespace::Root,
    ];

    /// Directory name below the installation root, `None` for `Root`
    pub fn dir_name(self) -> Option<&'static str> {
        match self {
            Self::Backups => Some("Backups"),
            Self::General => Some("Storage"),
            Self::Logs => Some("Logs"),
            Self::Temp => Some("Temp"),
            Self::Root => None,
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dir_name().unwrap_or("root"))
    }
}

/// Known record file types, in lookup priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    BackupEntry,
    Json,
    Xml,
    Text,
}

impl FileType {
    /// Lookup order used by `find_existing`
    pub const PRIORITY: [FileType; 4] = [
        FileType::BackupEntry,
        FileType::Json,
        FileType::Xml,
        FileType::Text,
    ];

    /// Extension used when nothing is on disk yet
    pub const DEFAULT: FileType = FileType::Json;

    pub fn extension(self) -> &'static str {
        match self {
            Self::BackupEntry => BACKUP_ENTRY_EXTENSION,
            Self::Json => "json",
            Self::Xml => "xml",
            Self::Text => "txt",
        }
    }

    /// Parse a file type from an extension (without the dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::PRIORITY
            .into_iter()
            .find(|t| t.extension().eq_ignore_ascii_case(ext))
    }
}

/// File-backed record store rooted at one installation directory
pub struct RecordStore {
    paths: AppPaths,
    write_lock: Mutex<()>,
}

impl RecordStore {
    /// Create a record store over an installation root
    pub fn new(paths: AppPaths) -> Self {
        Self {
            paths,
            write_lock: Mutex::new(()),
        }
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    /// Map a record triple to its on-disk location
    ///
    /// Without a file type the default extension is used.
    pub fn resolve_path(
        &self,
        namespace: Namespace,
        name: &str,
        file_type: Option<FileType>,
    ) -> PathBuf {
        let file_type = file_type.unwrap_or(FileType::DEFAULT);
        self.paths
            .namespace_dir(namespace)
            .join(format!("{}.{}", name, file_type.extension()))
    }

    /// Find the file currently holding `name`, or the default path if none does
    pub fn find_existing(&self, namespace: Namespace, name: &str) -> PathBuf {
        self.existing_type(namespace, name)
            .map(|t| self.resolve_path(namespace, name, Some(t)))
            .unwrap_or_else(|| self.resolve_path(namespace, name, None))
    }

    /// Check whether a record exists under any known extension
    pub fn exists(&self, namespace: Namespace, name: &str) -> bool {
        self.existing_type(namespace, name).is_some()
    }

    fn existing_type(&self, namespace: Namespace, name: &str) -> Option<FileType> {
        FileType::PRIORITY
            .into_iter()
            .find(|t| self.resolve_path(namespace, name, Some(*t)).is_file())
    }

    /// Serialize `data` to the record's path
    pub fn save<T>(
        &self,
        namespace: Namespace,
        name: &str,
        data: &T,
        file_type: Option<FileType>,
    ) -> RobotCopyResult<()>
    where
        T: Serialize + ?Sized,
    {
        let result = self.save_inner(namespace, name, data, file_type);
        report("save", namespace, name, result)
    }

    fn save_inner<T>(
        &self,
        namespace: Namespace,
        name: &str,
        data: &T,
        file_type: Option<FileType>,
    ) -> RobotCopyResult<()>
    where
        T: Serialize + ?Sized,
    {
        check_name(name)?;
        let chosen = file_type.unwrap_or(FileType::DEFAULT);
        write_json_atomic(self.resolve_path(namespace, name, Some(chosen)), data)?;

        for other in FileType::PRIORITY.into_iter().filter(|t| *t != chosen) {
            let stale = self.resolve_path(namespace, name, Some(other));
            if stale.is_file() {
                if let Err(e) = fs::remove_file(&stale) {
                    tracing::warn!(
                        path = %stale.display(),
                        error = %e,
                        "failed to remove stale record sibling"
                    );
                }
            }
        }

        Ok(())
    }

    /// Load a record; `Ok(None)` when nothing exists under any known extension
    pub fn load<T>(&self, namespace: Namespace, name: &str) -> RobotCopyResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let result = check_name(name).and_then(|_| match self.existing_type(namespace, name) {
            Some(t) => read_json(self.resolve_path(namespace, name, Some(t))),
            None => Ok(None),
        });
        report("load", namespace, name, result)
    }

    /// Load a record that must exist
    pub fn load_required<T>(&self, namespace: Namespace, name: &str) -> RobotCopyResult<T>
    where
        T: DeserializeOwned,
    {
        self.load(namespace, name)?.ok_or_else(|| {
            let err = RobotCopyError::record_not_found(format!("{}/{}", namespace, name));
            tracing::error!(%namespace, name, "record does not exist");
            err
        })
    }

    /// Shallow-merge `partial` into the stored object (or an empty one) and save
    pub fn edit(
        &self,
        namespace: Namespace,
        name: &str,
        partial: Record,
        file_type: Option<FileType>,
    ) -> RobotCopyResult<Record> {
        self.edit_with(namespace, name, file_type, |record| {
            record.extend(partial);
            record.clone()
        })
    }

    /// Load-or-empty, apply `update`, save: the single read-modify-write path
    ///
    /// Without a file type, an existing record keeps its extension.
    pub fn edit_with<F, R>(
        &self,
        namespace: Namespace,
        name: &str,
        file_type: Option<FileType>,
        update: F,
    ) -> RobotCopyResult<R>
    where
        F: FnOnce(&mut Record) -> R,
    {
        let _guard = self.write_lock.lock().map_err(|e| {
            RobotCopyError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let file_type = file_type.or_else(|| self.existing_type(namespace, name));
        let current: Option<Value> = self.load(namespace, name)?;
        let mut record = match current {
            None => Record::new(),
            Some(Value::Object(map)) => map,
            Some(_) => {
                let err = RobotCopyError::Storage(format!(
                    "Record {}/{} is not an object and cannot be edited",
                    namespace, name
                ));
                return report("edit", namespace, name, Err(err));
            }
        };

        let output = update(&mut record);
        self.save(namespace, name, &record, file_type)?;
        Ok(output)
    }

    /// Delete a record; `Ok(false)` when there was nothing to delete
    pub fn remove(&self, namespace: Namespace, name: &str) -> RobotCopyResult<bool> {
        let result = check_name(name).and_then(|_| match self.existing_type(namespace, name) {
            Some(t) => {
                let path = self.resolve_path(namespace, name, Some(t));
                fs::remove_file(&path).map(|_| true).map_err(|e| {
                    RobotCopyError::Storage(format!("Failed to remove {}: {}", path.display(), e))
                })
            }
            None => Ok(false),
        });
        report("remove", namespace, name, result)
    }

    /// Load a record, persisting and returning `default` if it is absent
    pub fn load_or_create<T>(
        &self,
        namespace: Namespace,
        name: &str,
        default: T,
        file_type: Option<FileType>,
    ) -> RobotCopyResult<T>
    where
        T: Serialize + DeserializeOwned,
    {
        match self.load(namespace, name)? {
            Some(existing) => Ok(existing),
            None => {
                self.save(namespace, name, &default, file_type)?;
                Ok(default)
            }
        }
    }

    /// Names of all records in a namespace, sorted and deduplicated
    pub fn list_names(&self, namespace: Namespace) -> RobotCopyResult<Vec<String>> {
        let dir = self.paths.namespace_dir(namespace);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&dir).map_err(|e| {
            RobotCopyError::Storage(format!("Failed to read {}: {}", dir.display(), e))
        });
        let entries = report("list", namespace, "*", entries)?;

        let mut names = BTreeSet::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let known = path
                .extension()
                .and_then(|ext| ext.to_str())
                .and_then(FileType::from_extension)
                .is_some();
            if !known {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.insert(stem.to_string());
            }
        }

        Ok(names.into_iter().collect())
    }

    /// Recursively delete the whole installation root
    ///
    /// Refuses when the root holds anything besides namespace directories
    /// and record files, so a misdirected root is never wiped.
    pub fn destroy_all(&self) -> RobotCopyResult<()> {
        let base = self.paths.base_dir();
        let result = if base.parent().is_none() {
            Err(RobotCopyError::Storage(format!(
                "Refusing to delete filesystem root {}",
                base.display()
            )))
        } else if !base.exists() {
            Ok(())
        } else {
            self.check_installation_root().and_then(|()| {
                fs::remove_dir_all(base).map_err(|e| {
                    RobotCopyError::Storage(format!("Failed to delete {}: {}", base.display(), e))
                })
            })
        };
        report("destroy", Namespace::Root, "*", result)
    }

    fn check_installation_root(&self) -> RobotCopyResult<()> {
        let base = self.paths.base_dir();
        let entries = fs::read_dir(base).map_err(|e| {
            RobotCopyError::Storage(format!("Failed to read {}: {}", base.display(), e))
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| {
                RobotCopyError::Storage(format!("Failed to read {}: {}", base.display(), e))
            })?;
            let path = entry.path();
            let name = entry.file_name();
            let name = name.to_string_lossy();
            let file_type = entry.file_type().map_err(|e| {
                RobotCopyError::Storage(format!("Failed to inspect {}: {}", path.display(), e))
            })?;

            let known = if file_type.is_dir() {
                Namespace::ALL
                    .iter()
                    .any(|namespace| namespace.dir_name() == Some(name.as_ref()))
            } else if file_type.is_file() {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .map_or(false, |ext| {
                        ext == "tmp" || FileType::from_extension(ext).is_some()
                    })
            } else {
                false
            };
            if !known {
                return Err(RobotCopyError::Storage(format!(
                    "Refusing to delete {}: '{}' does not belong to a RobotCopy installation",
                    base.display(),
                    name
                )));
            }
        }
        Ok(())
    }
}

fn check_name(name: &str) -> RobotCopyResult<()> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(&['/', '\\'][..])
        || name.contains('\0');
    if invalid {
        return Err(RobotCopyError::Storage(format!(
            "Invalid record name: '{}'",
            name
        )));
    }
    Ok(())
}

/// Log a failed store operation before handing the error back
fn report<T>(
    operation: &str,
    namespace: Namespace,
    name: &str,
    result: RobotCopyResult<T>,
) -> RobotCopyResult<T> {
    if let Err(e) = &result {
        tracing::error!(operation, %namespace, name, error = %e, "record store operation failed");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, RecordStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = RecordStore::new(AppPaths::with_base_dir(temp_dir.path().to_path_buf()));
        (temp_dir, store)
    }

    #[test]
    fn test_resolve_path() {
        let (temp_dir, store) = create_test_store();

        assert_eq!(
            store.resolve_path(Namespace::Backups, "Backup1", Some(FileType::BackupEntry)),
            temp_dir.path().join("Backups").join("Backup1.rcbe")
        );
        assert_eq!(
            store.resolve_path(Namespace::Root, "environment", None),
            temp_dir.path().join("environment.json")
        );
        assert_eq!(
            store.resolve_path(Namespace::General, "settings", Some(FileType::Text)),
            temp_dir.path().join("Storage").join("settings.txt")
        );
    }

    #[test]
    fn test_find_existing_falls_back_to_default() {
        let (temp_dir, store) = create_test_store();

        let path = store.find_existing(Namespace::Logs, "missing");
        assert_eq!(path, temp_dir.path().join("Logs").join("missing.json"));
        assert!(!path.exists());
    }

    #[test]
    fn test_find_existing_respects_priority() {
        let (temp_dir, store) = create_test_store();
        let dir = temp_dir.path().join("Backups");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("Backup1.txt"), "{}").unwrap();
        fs::write(dir.join("Backup1.rcbe"), "{}").unwrap();

        assert_eq!(
            store.find_existing(Namespace::Backups, "Backup1"),
            dir.join("Backup1.rcbe")
        );
    }

    #[test]
    fn test_round_trip_under_every_extension() {
        let (_temp_dir, store) = create_test_store();
        let data = json!({"name": "Docs", "values": [1, 2, 3], "nested": {"ok": true}});

        for file_type in FileType::PRIORITY {
            store
                .save(Namespace::General, "record", &data, Some(file_type))
                .unwrap();
            let loaded: Value = store.load(Namespace::General, "record").unwrap().unwrap();
            assert_eq!(loaded, data, "round trip failed for {:?}", file_type);
        }
    }

    #[test]
    fn test_save_removes_stale_siblings() {
        let (temp_dir, store) = create_test_store();

        store
            .save(Namespace::General, "prefs", &json!({"a": 1}), Some(FileType::BackupEntry))
            .unwrap();
        store
            .save(Namespace::General, "prefs", &json!({"a": 2}), Some(FileType::Json))
            .unwrap();

        let dir = temp_dir.path().join("Storage");
        assert!(!dir.join("prefs.rcbe").exists());
        assert!(dir.join("prefs.json").exists());

        let loaded: Value = store.load(Namespace::General, "prefs").unwrap().unwrap();
        assert_eq!(loaded, json!({"a": 2}));
    }

    #[test]
    fn test_load_absent_is_none() {
        let (_temp_dir, store) = create_test_store();
        let loaded: Option<Value> = store.load(Namespace::Logs, "nothing").unwrap();
        assert!(loaded.is_none());

        let required: RobotCopyResult<Value> = store.load_required(Namespace::Logs, "nothing");
        assert!(required.unwrap_err().is_not_found());
    }

    #[test]
    fn test_load_malformed_is_error() {
        let (temp_dir, store) = create_test_store();
        fs::write(temp_dir.path().join("broken.json"), "{ nope").unwrap();

        let result: RobotCopyResult<Option<Value>> = store.load(Namespace::Root, "broken");
        assert!(matches!(result, Err(RobotCopyError::Json(_))));
    }

    #[test]
    fn test_edit_shallow_merges() {
        let (_temp_dir, store) = create_test_store();
        store
            .save(
                Namespace::Root,
                "env",
                &json!({"keep": 1, "replace": {"deep": true}}),
                None,
            )
            .unwrap();

        let mut partial = Record::new();
        partial.insert("replace".into(), json!(5));
        partial.insert("added".into(), json!("x"));
        store.edit(Namespace::Root, "env", partial, None).unwrap();

        let loaded: Value = store.load(Namespace::Root, "env").unwrap().unwrap();
        assert_eq!(loaded, json!({"keep": 1, "replace": 5, "added": "x"}));
    }

    #[test]
    fn test_edit_creates_missing_record() {
        let (_temp_dir, store) = create_test_store();

        let mut partial = Record::new();
        partial.insert("count".into(), json!(1));
        store.edit(Namespace::Temp, "fresh", partial, None).unwrap();

        let loaded: Value = store.load(Namespace::Temp, "fresh").unwrap().unwrap();
        assert_eq!(loaded, json!({"count": 1}));
    }

    #[test]
    fn test_edit_keeps_existing_extension() {
        let (temp_dir, store) = create_test_store();
        store
            .save(Namespace::Backups, "Backup3", &json!({}), Some(FileType::BackupEntry))
            .unwrap();

        store
            .edit(Namespace::Backups, "Backup3", Record::new(), None)
            .unwrap();

        assert!(temp_dir.path().join("Backups").join("Backup3.rcbe").exists());
        assert!(!temp_dir.path().join("Backups").join("Backup3.json").exists());
    }

    #[test]
    fn test_edit_refuses_non_object() {
        let (_temp_dir, store) = create_test_store();
        store
            .save(Namespace::Logs, "list", &json!([1, 2]), None)
            .unwrap();

        let result = store.edit(Namespace::Logs, "list", Record::new(), None);
        assert!(matches!(result, Err(RobotCopyError::Storage(_))));

        let loaded: Value = store.load(Namespace::Logs, "list").unwrap().unwrap();
        assert_eq!(loaded, json!([1, 2]));
    }

    #[test]
    fn test_remove() {
        let (_temp_dir, store) = create_test_store();
        store
            .save(Namespace::Backups, "Backup1", &json!({}), Some(FileType::BackupEntry))
            .unwrap();

        assert!(store.remove(Namespace::Backups, "Backup1").unwrap());
        assert!(!store.exists(Namespace::Backups, "Backup1"));
        assert!(!store.remove(Namespace::Backups, "Backup1").unwrap());
    }

    #[test]
    fn test_load_or_create() {
        let (_temp_dir, store) = create_test_store();

        let created = store
            .load_or_create(Namespace::Root, "env", json!({"v": 1}), None)
            .unwrap();
        assert_eq!(created, json!({"v": 1}));
        assert!(store.exists(Namespace::Root, "env"));

        let existing = store
            .load_or_create(Namespace::Root, "env", json!({"v": 2}), None)
            .unwrap();
        assert_eq!(existing, json!({"v": 1}));
    }

    #[test]
    fn test_list_names() {
        let (temp_dir, store) = create_test_store();
        store
            .save(Namespace::Backups, "Backup2", &json!({}), Some(FileType::BackupEntry))
            .unwrap();
        store
            .save(Namespace::Backups, "Backup1", &json!({}), Some(FileType::BackupEntry))
            .unwrap();
        let dir = temp_dir.path().join("Backups");
        fs::write(dir.join("Backup9.rcbe.tmp"), "{}").unwrap();
        fs::write(dir.join("notes.md"), "ignored").unwrap();

        let names = store.list_names(Namespace::Backups).unwrap();
        assert_eq!(names, vec!["Backup1".to_string(), "Backup2".to_string()]);

        assert!(store.list_names(Namespace::Temp).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_names_rejected() {
        let (_temp_dir, store) = create_test_store();

        assert!(store.save(Namespace::Root, "", &json!({}), None).is_err());
        assert!(store
            .save(Namespace::Root, "../escape", &json!({}), None)
            .is_err());
    }

    #[test]
    fn test_destroy_all() {
        let (temp_dir, store) = create_test_store();
        store
            .save(Namespace::Backups, "Backup1", &json!({}), Some(FileType::BackupEntry))
            .unwrap();
        store.save(Namespace::Root, "env", &json!({}), None).unwrap();

        store.destroy_all().unwrap();
        assert!(!temp_dir.path().exists());

        // Nothing left to delete is fine
        store.destroy_all().unwrap();
    }

    #[test]
    fn test_destroy_all_refuses_foreign_root() {
        let (temp_dir, store) = create_test_store();
        store.save(Namespace::Root, "environment", &json!({}), None).unwrap();
        fs::create_dir(temp_dir.path().join("Pictures")).unwrap();
        fs::write(temp_dir.path().join("notes.md"), "keep me").unwrap();

        let err = store.destroy_all().unwrap_err();
        assert!(err.to_string().contains("does not belong"));
        assert!(temp_dir.path().join("Pictures").is_dir());
        assert!(temp_dir.path().join("notes.md").exists());
        assert!(temp_dir.path().join("environment.json").exists());
    }

    #[test]
    fn test_file_type_from_extension() {
        assert_eq!(FileType::from_extension("rcbe"), Some(FileType::BackupEntry));
        assert_eq!(FileType::from_extension("JSON"), Some(FileType::Json));
        assert_eq!(FileType::from_extension("tmp"), None);
    }
}
