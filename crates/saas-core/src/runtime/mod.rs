//! External tool invocation
//!
//! This module provides:
//! - Best-effort subprocess execution with captured diagnostics
//! - Package manager detection and install command construction

pub mod package_manager;
pub mod process;

pub use package_manager::PackageManager;
pub use process::{is_available, run, ProcessOutcome, ProcessSpec};
