//! Path management for RobotCopy
//!
//! Resolves the installation root that holds every stored record, and the
//! namespace directories beneath it.
//!
//! ## Path Resolution Order
//!
//! 1. `ROBOTCOPY_DATA_DIR` environment variable (if set)
//! 2. Windows: `%APPDATA%\RobotCopy`
//! 3. Linux: `$XDG_DATA_HOME/RobotCopy` or `~/.local/share/RobotCopy`
//! 4. macOS: `~/Library/Application Support/RobotCopy`

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::error::RobotCopyError;
use crate::storage::records::Namespace;

/// Program name, also the name of the installation root directory
pub const PROGRAM_NAME: &str = "RobotCopy";

/// Environment variable overriding the installation root
pub const DATA_DIR_ENV: &str = "ROBOTCOPY_DATA_DIR";

/// Manages all paths used by RobotCopy
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Installation root; every namespace lives below it
    base_dir: PathBuf,
}

impl AppPaths {
    /// Create a new AppPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no platform data directory can be determined and
    /// no override is set.
    pub fn new() -> Result<Self, RobotCopyError> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create AppPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the installation root
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Directory for a namespace; `Root` maps to the installation root
    pub fn namespace_dir(&self, namespace: Namespace) -> PathBuf {
        match namespace.dir_name() {
            Some(name) => self.base_dir.join(name),
            None => self.base_dir.clone(),
        }
    }

    /// Get the backup definitions directory
    pub fn backups_dir(&self) -> PathBuf {
        self.namespace_dir(Namespace::Backups)
    }

    /// Get the general storage directory
    pub fn storage_dir(&self) -> PathBuf {
        self.namespace_dir(Namespace::General)
    }

    /// Get the logs directory
    pub fn logs_dir(&self) -> PathBuf {
        self.namespace_dir(Namespace::Logs)
    }

    /// Get the scratch directory
    pub fn temp_dir(&self) -> PathBuf {
        self.namespace_dir(Namespace::Temp)
    }

    /// Ensure the installation root and every namespace directory exist
    pub fn ensure_directories(&self) -> Result<(), RobotCopyError> {
        for namespace in Namespace::ALL {
            let dir = self.namespace_dir(namespace);
            std::fs::create_dir_all(&dir).map_err(|e| {
                RobotCopyError::Io(format!(
                    "Failed to create directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }

        Ok(())
    }
}

/// Resolve the default installation root based on platform
fn resolve_default_path() -> Result<PathBuf, RobotCopyError> {
    let dirs = BaseDirs::new().ok_or_else(|| {
        RobotCopyError::Config("Could not determine the user's data directory".into())
    })?;
    Ok(dirs.data_dir().join(PROGRAM_NAME))
}
