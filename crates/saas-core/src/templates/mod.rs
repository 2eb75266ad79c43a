//! Template composition
//!
//! This module provides:
//! - The template library: role paths, catalog, module loading (`catalog`)
//! - Tree copying with an exclusion predicate and overwrite policy (`copier`)
//! - Env-declaration fragment merging (`env`)
//! - Module overlay routing onto the resolved layout (`overlay`)
//! - Manifest patching (`manifest`)
//! - CLI/template version compatibility (`version`)

pub mod catalog;
pub mod copier;
pub mod env;
pub mod manifest;
pub mod overlay;
pub mod version;

pub use catalog::{
    ModuleEntry, ModuleLayout, ModuleTemplate, TemplateCatalog, TemplatePaths, TemplateRole,
};
pub use copier::{copy_tree, is_env_file, CopyOptions, CopyReport, ENV_EXAMPLE_FILE};
pub use env::merge_env_fragment;
pub use manifest::{patch_manifest, ManifestPatch};
pub use overlay::{resolve_module_targets, ModuleResolution, OverlayTarget};
pub use version::check_compatibility;
