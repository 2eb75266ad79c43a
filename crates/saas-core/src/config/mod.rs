//! Scaffold configuration
//!
//! Everything the coordinator would otherwise discover from its environment
//! (template locations, output directory, tooling) is passed in here.

pub mod generator;

use crate::runtime::PackageManager;
use crate::templates::TemplatePaths;
use std::path::{Path, PathBuf};

/// Environment variable overriding the template root
pub const TEMPLATE_DIR_ENV: &str = "SAAS_TEMPLATE_DIR";
/// Environment variable selecting the package manager
pub const PACKAGE_MANAGER_ENV: &str = "SAAS_PACKAGE_MANAGER";

const DEFAULT_GIT_PROGRAM: &str = "git";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldConfig {
    /// Directory the project directory is created in
    pub output_dir: PathBuf,
    pub templates: TemplatePaths,
    pub package_manager: PackageManager,
    /// Run `git init` after the files are written
    pub init_git: bool,
    /// Run the package manager install after the files are written
    pub install_deps: bool,
    /// Version control binary, `git` unless overridden
    pub git_program: String,
    /// Replaces the package manager binary in the install command
    pub install_program: Option<String>,
}

impl ScaffoldConfig {
    pub fn new(output_dir: impl Into<PathBuf>, template_root: &Path) -> Self {
        Self {
            output_dir: output_dir.into(),
            templates: TemplatePaths::from_root(template_root),
            package_manager: PackageManager::default(),
            init_git: true,
            install_deps: true,
            git_program: DEFAULT_GIT_PROGRAM.to_string(),
            install_program: None,
        }
    }

    pub fn with_package_manager(mut self, package_manager: PackageManager) -> Self {
        self.package_manager = package_manager;
        self
    }

    pub fn with_git(mut self, init_git: bool) -> Self {
        self.init_git = init_git;
        self
    }

    pub fn with_install(mut self, install_deps: bool) -> Self {
        self.install_deps = install_deps;
        self
    }

    pub fn with_git_program(mut self, program: impl Into<String>) -> Self {
        self.git_program = program.into();
        self
    }

    pub fn with_install_program(mut self, program: impl Into<String>) -> Self {
        self.install_program = Some(program.into());
        self
    }

    pub fn project_dir(&self, project_name: &str) -> PathBuf {
        self.output_dir.join(project_name)
    }
}

/// Pick the template root: explicit flag, then env var, then candidates in order
pub fn resolve_template_root(
    flag: Option<PathBuf>,
    env_value: Option<String>,
    candidates: &[PathBuf],
) -> PathBuf {
    flag.or_else(|| env_value.filter(|v| !v.trim().is_empty()).map(PathBuf::from))
        .or_else(|| candidates.iter().find(|c| c.is_dir()).cloned())
        .unwrap_or_else(|| PathBuf::from("templates"))
}
