//! Module overlay routing and application

use crate::error::Result;
use crate::layout::{RootRole, TargetRoots};
use crate::templates::catalog::{ModuleLayout, ModuleTemplate};
use crate::templates::copier::{copy_tree, CopyOptions, CopyReport, ENV_EXAMPLE_FILE};
use crate::templates::env::merge_env_file;
use std::path::{Path, PathBuf};

/// One source tree routed onto one output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayTarget {
    pub role: RootRole,
    pub source: PathBuf,
    pub target_root: PathBuf,
    pub env_target: PathBuf,
}

impl OverlayTarget {
    pub fn new(role: RootRole, source: &Path, target_root: &Path) -> Self {
        Self {
            role,
            source: source.to_path_buf(),
            target_root: target_root.to_path_buf(),
            env_target: target_root.join(ENV_EXAMPLE_FILE),
        }
    }

    pub fn env_source(&self) -> PathBuf {
        self.source.join(ENV_EXAMPLE_FILE)
    }
}

/// Where a module's trees go for a given set of roots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleResolution {
    pub targets: Vec<OverlayTarget>,
    /// The module ships a native tree but the layout has no native root
    pub skipped_native: bool,
}

/// Route a module's sub-trees onto the resolved roots
pub fn resolve_module_targets(module: &ModuleTemplate, roots: &TargetRoots) -> ModuleResolution {
    let mut targets = Vec::new();
    let mut skipped_native = false;

    match &module.layout {
        ModuleLayout::PerTarget { web, native } => {
            if let Some(web) = web {
                targets.push(OverlayTarget::new(RootRole::Web, web, roots.web()));
            }
            if let Some(native) = native {
                match roots.native() {
                    Some(native_root) => {
                        targets.push(OverlayTarget::new(RootRole::Native, native, native_root))
                    }
                    None => skipped_native = true,
                }
            }
        }
        ModuleLayout::Legacy { tree } => {
            targets.push(OverlayTarget::new(RootRole::Web, tree, roots.web()));
        }
    }

    ModuleResolution {
        targets,
        skipped_native,
    }
}

/// Merge the env fragment of `target`, then copy the rest of its tree
pub async fn apply_overlay(label: &str, target: &OverlayTarget) -> Result<OverlayOutcome> {
    let merged_env = merge_env_file(&target.env_source(), &target.env_target, label).await?;
    let copy = copy_tree(
        &target.source,
        &target.target_root,
        &CopyOptions::without_env_files(),
    )
    .await?;

    tracing::debug!(
        module = label,
        role = %target.role,
        files = copy.copied.len(),
        merged_env,
        "applied overlay"
    );

    Ok(OverlayOutcome {
        role: target.role,
        merged_env,
        copy,
    })
}

/// Result of one overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayOutcome {
    pub role: RootRole,
    pub merged_env: bool,
    pub copy: CopyReport,
}

/// Apply every routed tree of `module`, in routing order
pub async fn apply_module(
    module: &ModuleTemplate,
    roots: &TargetRoots,
) -> Result<(ModuleResolution, Vec<OverlayOutcome>)> {
    let resolution = resolve_module_targets(module, roots);
    let mut outcomes = Vec::with_capacity(resolution.targets.len());
    for target in &resolution.targets {
        outcomes.push(apply_overlay(&module.id, target).await?);
    }
    Ok((resolution, outcomes))
}
