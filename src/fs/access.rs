//! Folder accessibility probes
//!
//! Probes touch the real filesystem: a read probe lists the folder, a write
//! probe creates and removes a small file inside it.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RobotCopyError, RobotCopyResult};

/// File created (and removed again) by the write probe
pub const WRITE_PROBE_FILE: &str = ".robotcopy_write_probe";

/// Kind of access a folder must allow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AccessType {
    Read,
    Write,
    #[default]
    ReadAndWrite,
}

impl AccessType {
    pub fn includes_read(self) -> bool {
        matches!(self, Self::Read | Self::ReadAndWrite)
    }

    pub fn includes_write(self) -> bool {
        matches!(self, Self::Write | Self::ReadAndWrite)
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
            Self::ReadAndWrite => write!(f, "read and write"),
        }
    }
}

/// Check that `path` names an existing folder below a filesystem root
pub fn validate_folder(path: &Path) -> RobotCopyResult<()> {
    if path.as_os_str().is_empty() {
        return Err(RobotCopyError::Validation("Folder path is empty".into()));
    }
    if !path.is_dir() {
        return Err(RobotCopyError::Validation(format!(
            "The path '{}' does not lead to a valid directory",
            path.display()
        )));
    }
    if path.parent().is_none() {
        return Err(RobotCopyError::Validation(format!(
            "The path '{}' must lead to a sub-folder of a drive, not to the drive itself",
            path.display()
        )));
    }
    Ok(())
}

/// Validate `path` and probe it for the requested access
pub fn check_access(path: &Path, access: AccessType) -> RobotCopyResult<()> {
    validate_folder(path)?;

    if access.includes_read() {
        probe_read(path).map_err(|e| denied(path, AccessType::Read, e))?;
    }
    if access.includes_write() {
        probe_write(path).map_err(|e| denied(path, AccessType::Write, e))?;
    }
    Ok(())
}

/// Boolean form of `check_access`; failures are logged
pub fn can_access(path: &Path, access: AccessType) -> bool {
    match check_access(path, access) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(path = %path.display(), %access, error = %e, "folder is not accessible");
            false
        }
    }
}

fn probe_read(path: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(path)? {
        entry?;
    }
    Ok(())
}

fn probe_write(path: &Path) -> std::io::Result<()> {
    let probe = path.join(WRITE_PROBE_FILE);
    let written = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&probe)
        .and_then(|mut file| file.write_all(b"Testing write access."));

    // Remove the probe even when the write itself failed half way
    let removed = fs::remove_file(&probe);
    written?;
    removed
}

fn denied(path: &Path, access: AccessType, err: std::io::Error) -> RobotCopyError {
    RobotCopyError::AccessDenied {
        path: path.to_path_buf(),
        access,
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_accessible_folder() {
        let temp_dir = TempDir::new().unwrap();

        check_access(temp_dir.path(), AccessType::ReadAndWrite).unwrap();
        assert!(can_access(temp_dir.path(), AccessType::Read));
        assert!(!temp_dir.path().join(WRITE_PROBE_FILE).exists());
    }

    #[test]
    fn test_validate_rejects_bad_paths() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        assert!(validate_folder(Path::new("")).is_err());
        assert!(validate_folder(&file).is_err());
        assert!(validate_folder(&temp_dir.path().join("missing")).is_err());
        assert!(validate_folder(temp_dir.path()).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_filesystem_root_rejected() {
        let err = validate_folder(Path::new("/")).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("drive itself"));
    }

    #[test]
    fn test_access_type_flags() {
        assert!(AccessType::ReadAndWrite.includes_read());
        assert!(AccessType::ReadAndWrite.includes_write());
        assert!(!AccessType::Read.includes_write());
        assert!(!AccessType::Write.includes_read());
        assert_eq!(AccessType::ReadAndWrite.to_string(), "read and write");
    }

    #[cfg(unix)]
    #[test]
    fn test_read_only_folder_denies_write() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let locked = temp_dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        // Privileged users can write anyway; nothing to check then
        let writable = fs::write(locked.join("x"), "x").is_ok();
        if !writable {
            let err = check_access(&locked, AccessType::Write).unwrap_err();
            assert!(matches!(
                err,
                RobotCopyError::AccessDenied {
                    access: AccessType::Write,
                    ..
                }
            ));
            assert!(check_access(&locked, AccessType::Read).is_ok());
        }

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    }
}
