//! SaaS Core - Template composition and module overlay engine
//!
//! This library turns a project name, an ordered set of feature modules and a
//! mobile flag into a ready-to-run source tree built from a template library.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - layout resolution, tree copying, env
//!   fragment merging, manifest patching, dependency aggregation, subprocesses
//! - **Layer 2: Workflow Orchestration** - [`Scaffolder`], a stage-by-stage
//!   coordinator driven by an explicit [`ScaffoldConfig`]
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use saas_core::{ScaffoldConfig, ScaffoldRequest, Scaffolder};
//!
//! let config = ScaffoldConfig::new(std::env::current_dir()?, "templates".as_ref());
//! let request = ScaffoldRequest::new("my-saas-app", ["stripe"], false)?;
//! let report = Scaffolder::new(config).run(&request).await?;
//! println!("created {}", report.project_dir.display());
//! ```

pub mod config;
pub mod deps;
pub mod error;
pub mod fs;
pub mod layout;
pub mod request;
pub mod runtime;
pub mod scaffold;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::ScaffoldConfig;
pub use deps::resolve_dependencies;
pub use error::{ScaffoldError, StageError};
pub use layout::{Layout, RootRole, TargetRoots};
pub use request::ScaffoldRequest;
pub use runtime::{PackageManager, ProcessOutcome};
pub use scaffold::{ScaffoldReport, Scaffolder, Stage, StageResult, Warning};
pub use templates::{TemplateCatalog, TemplatePaths};

#[cfg(feature = "tui")]
pub use tui::run;
