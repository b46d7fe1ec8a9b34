//! Foundation types for hark.
//!
//! This crate contains the types shared by the dispatch engine and the
//! console application: the ordered permission levels, the error type, and
//! the console configuration loaded from TOML.

pub mod config;
pub mod error;
pub mod permission;

pub use config::{ConsoleConfig, UserSeed};
pub use error::{HarkError, Result};
pub use permission::PermissionLevel;
