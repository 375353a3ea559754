//! Configuration module for RobotCopy
//!
//! This module provides configuration management including:
//! - Installation root and namespace path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::Settings;
