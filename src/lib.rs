//! RobotCopy - personal backup scheduling
//!
//! This library provides the core of the RobotCopy backup scheduler: a
//! concurrent folder-statistics engine used to validate backup targets, and a
//! versioned, file-based record store holding backup definitions, backup
//! history and process-wide counters.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Installation paths and user settings
//! - `error`: Custom error types
//! - `models`: Backup definitions and history entries
//! - `fs`: Path relations, access probes and folder analysis
//! - `storage`: Record store, compatibility gate, catalog and history ledger
//! - `services`: Validation of backup definitions before they are stored
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the `robotcopy` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use robotcopy::config::AppPaths;
//! use robotcopy::storage::CompatibilityGate;
//!
//! let paths = AppPaths::new()?;
//! let workspace = CompatibilityGate::new(paths).open(&|_, _| false)?;
//! for definition in workspace.catalog().list()? {
//!     println!("{}", definition);
//! }
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod fs;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{RobotCopyError, RobotCopyResult};
