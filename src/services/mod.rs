//! Service layer for RobotCopy
//!
//! The service layer sits between the front end and the storage layer and
//! owns validation that the storage layer deliberately skips.

pub mod setup;

pub use setup::SetupService;
