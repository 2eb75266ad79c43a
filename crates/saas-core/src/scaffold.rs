//! Scaffold coordinator
//!
//! A run walks a fixed sequence of stages:
//!
//! ```text
//! Validating -> CreatingRoots -> CopyingBaseTemplates -> PatchingManifests
//!   -> ApplyingModules -> WritingSystemFiles -> InitializingVcs
//!   -> InstallingDependencies -> Done
//! ```
//!
//! Every stage reports a [`StageResult`]. `Abort` ends the run with a
//! [`StageError`] and leaves whatever was written on disk. `Warn` is recorded
//! in the [`ScaffoldReport`] and the run moves on. Warnings come only from
//! module lookup, the optional infrastructure template, and the two
//! subprocess stages.

use crate::config::generator::{write_gitignore, write_pnpm_workspace};
use crate::config::ScaffoldConfig;
use crate::deps::resolve_dependencies;
use crate::error::{ScaffoldError, StageError};
use crate::fs::is_dir;
use crate::layout::{Layout, RootRole, TargetRoots, NATIVE_WORKSPACE, WEB_WORKSPACE};
use crate::request::ScaffoldRequest;
use crate::runtime::{run, ProcessOutcome, ProcessSpec};
use crate::templates::copier::{copy_tree, CopyOptions, ENV_EXAMPLE_FILE};
use crate::templates::env::merge_env_file;
use crate::templates::manifest::{patch_manifest, upsert_manifest, ManifestPatch};
use crate::templates::overlay::apply_module;
use crate::templates::{ModuleTemplate, TemplateRole};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

const GIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Coordinator stages in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Validating,
    CreatingRoots,
    CopyingBaseTemplates,
    PatchingManifests,
    ApplyingModules,
    WritingSystemFiles,
    InitializingVcs,
    InstallingDependencies,
    Done,
}

impl Stage {
    pub fn next(&self) -> Option<Stage> {
        match self {
            Stage::Validating => Some(Stage::CreatingRoots),
            Stage::CreatingRoots => Some(Stage::CopyingBaseTemplates),
            Stage::CopyingBaseTemplates => Some(Stage::PatchingManifests),
            Stage::PatchingManifests => Some(Stage::ApplyingModules),
            Stage::ApplyingModules => Some(Stage::WritingSystemFiles),
            Stage::WritingSystemFiles => Some(Stage::InitializingVcs),
            Stage::InitializingVcs => Some(Stage::InstallingDependencies),
            Stage::InstallingDependencies => Some(Stage::Done),
            Stage::Done => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Stage::Validating => "validating",
            Stage::CreatingRoots => "creating project directories",
            Stage::CopyingBaseTemplates => "copying base templates",
            Stage::PatchingManifests => "patching manifests",
            Stage::ApplyingModules => "applying modules",
            Stage::WritingSystemFiles => "writing system files",
            Stage::InitializingVcs => "initializing git",
            Stage::InstallingDependencies => "installing dependencies",
            Stage::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Something the operator should know that did not stop the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A selected module has no template directory
    ModuleNotFound { module: String },
    /// An optional template tree is absent from the library
    TemplateSkipped { role: String, path: PathBuf },
    /// A best-effort subprocess failed
    Subprocess {
        stage: Stage,
        reason: String,
        remedy: String,
    },
}

impl Warning {
    /// Command the operator can run to finish the step by hand
    pub fn remedy(&self) -> Option<&str> {
        match self {
            Warning::Subprocess { remedy, .. } => Some(remedy),
            _ => None,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::ModuleNotFound { module } => {
                write!(f, "Module '{}' has no template and was skipped", module)
            }
            Warning::TemplateSkipped { role, path } => {
                write!(f, "Template '{}' not found at {}, skipped", role, path.display())
            }
            Warning::Subprocess { stage, reason, .. } => write!(f, "{} failed: {}", stage, reason),
        }
    }
}

/// Outcome of a single stage
#[derive(Debug)]
pub enum StageResult {
    Continue,
    Warn(Vec<Warning>),
    Abort(ScaffoldError),
}

impl From<Result<Vec<Warning>, ScaffoldError>> for StageResult {
    fn from(result: Result<Vec<Warning>, ScaffoldError>) -> Self {
        match result {
            Ok(warnings) if warnings.is_empty() => StageResult::Continue,
            Ok(warnings) => StageResult::Warn(warnings),
            Err(e) => StageResult::Abort(e),
        }
    }
}

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldReport {
    pub project_dir: PathBuf,
    pub layout: Layout,
    /// Modules whose templates were applied, in selection order
    pub applied_modules: Vec<String>,
    pub dependencies: Vec<String>,
    pub git_initialized: bool,
    pub dependencies_installed: bool,
    pub warnings: Vec<Warning>,
    /// Every stage entered, ending in [`Stage::Done`]
    pub stages: Vec<Stage>,
}

/// Mutable state threaded through one run
struct RunState<'a> {
    request: &'a ScaffoldRequest,
    roots: TargetRoots,
    modules: Vec<(String, Option<ModuleTemplate>)>,
    report: ScaffoldReport,
}

/// Sequences the engine components into one scaffold run
#[derive(Debug, Clone)]
pub struct Scaffolder {
    config: ScaffoldConfig,
}

impl Scaffolder {
    pub fn new(config: ScaffoldConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScaffoldConfig {
        &self.config
    }

    pub async fn run(&self, request: &ScaffoldRequest) -> Result<ScaffoldReport, StageError> {
        self.run_with_progress(request, |_| {}).await
    }

    /// Run every stage, calling `on_stage` as each one starts
    pub async fn run_with_progress<F>(
        &self,
        request: &ScaffoldRequest,
        mut on_stage: F,
    ) -> Result<ScaffoldReport, StageError>
    where
        F: FnMut(Stage),
    {
        let project_dir = self.config.project_dir(request.project_name());
        let roots = TargetRoots::resolve(&project_dir, request.with_mobile());
        let mut state = RunState {
            request,
            report: ScaffoldReport {
                project_dir: project_dir.clone(),
                layout: roots.layout(),
                applied_modules: Vec::new(),
                dependencies: Vec::new(),
                git_initialized: false,
                dependencies_installed: false,
                warnings: Vec::new(),
                stages: Vec::new(),
            },
            roots,
            modules: Vec::new(),
        };

        let mut stage = Stage::Validating;
        loop {
            on_stage(stage);
            state.report.stages.push(stage);
            tracing::info!(%stage, project = %project_dir.display(), "stage");

            match self.execute(stage, &mut state).await {
                StageResult::Continue => {}
                StageResult::Warn(warnings) => {
                    // Callers surface these to the operator
                    for warning in &warnings {
                        tracing::info!(%stage, "{}", warning);
                    }
                    state.report.warnings.extend(warnings);
                }
                StageResult::Abort(source) => {
                    tracing::info!(%stage, error = %source, "scaffold aborted");
                    return Err(StageError {
                        stage,
                        project_dir,
                        source,
                    });
                }
            }

            match stage.next() {
                Some(next) => stage = next,
                None => break,
            }
        }

        Ok(state.report)
    }

    async fn execute(&self, stage: Stage, state: &mut RunState<'_>) -> StageResult {
        match stage {
            Stage::Validating => self.validate(state).await.into(),
            Stage::CreatingRoots => create_roots(&state.roots).await.into(),
            Stage::CopyingBaseTemplates => self.copy_base_templates(&state.roots).await.into(),
            Stage::PatchingManifests => {
                patch_manifests(&state.roots, state.request.project_name())
                    .await
                    .into()
            }
            Stage::ApplyingModules => apply_modules(state).await.into(),
            Stage::WritingSystemFiles => write_system_files(&state.roots).await.into(),
            Stage::InitializingVcs => self.init_git(state).await,
            Stage::InstallingDependencies => self.install_dependencies(state).await,
            Stage::Done => StageResult::Continue,
        }
    }

    /// Precondition check. Performs no writes.
    async fn validate(&self, state: &mut RunState<'_>) -> Result<Vec<Warning>, ScaffoldError> {
        let project_dir = state.roots.root();
        let exists = crate::fs::exists(project_dir)
            .await
            .map_err(|e| ScaffoldError::CreateDir {
                path: project_dir.to_path_buf(),
                source: e,
            })?;
        if exists {
            return Err(ScaffoldError::TargetExists {
                path: project_dir.to_path_buf(),
            });
        }

        let mut modules = Vec::with_capacity(state.request.modules().len());
        for id in state.request.modules() {
            modules.push((id.clone(), self.config.templates.load_module(id).await));
        }
        state.modules = modules;

        Ok(Vec::new())
    }

    async fn copy_base_templates(&self, roots: &TargetRoots) -> Result<Vec<Warning>, ScaffoldError> {
        let templates = &self.config.templates;
        let mut warnings = Vec::new();

        copy_base(&TemplateRole::BaseWeb, &templates.base_web, roots.web(), true).await?;

        if let Some(native_root) = roots.native() {
            copy_base(&TemplateRole::NativeBase, &templates.native_base, native_root, true).await?;
        }

        if is_dir(&templates.base_infra).await {
            copy_base(&TemplateRole::BaseInfra, &templates.base_infra, roots.root(), false).await?;
        } else {
            warnings.push(Warning::TemplateSkipped {
                role: TemplateRole::BaseInfra.to_string(),
                path: templates.base_infra.clone(),
            });
        }

        Ok(warnings)
    }

    async fn init_git(&self, state: &mut RunState<'_>) -> StageResult {
        if !self.config.init_git {
            tracing::debug!("git init disabled");
            return StageResult::Continue;
        }

        let root = state.roots.root();
        let spec = ProcessSpec::new(&self.config.git_program, ["init"]).with_timeout(GIT_TIMEOUT);
        match run(&spec, root).await {
            ProcessOutcome::Success => {
                state.report.git_initialized = true;
                StageResult::Continue
            }
            ProcessOutcome::Failed(reason) => StageResult::Warn(vec![Warning::Subprocess {
                stage: Stage::InitializingVcs,
                reason,
                remedy: spec.remedy(root),
            }]),
        }
    }

    async fn install_dependencies(&self, state: &mut RunState<'_>) -> StageResult {
        let dependencies: Vec<String> = resolve_dependencies(state.request.modules())
            .into_iter()
            .collect();
        state.report.dependencies = dependencies.clone();

        if !self.config.install_deps {
            tracing::debug!("dependency install disabled");
            return StageResult::Continue;
        }

        let workspace = state.roots.layout().is_workspace().then_some(WEB_WORKSPACE);
        let (mut spec, cwd) = self.config.package_manager.install_command(
            state.roots.root(),
            &dependencies,
            workspace,
        );
        if let Some(program) = &self.config.install_program {
            spec.program = program.clone();
        }

        match run(&spec, &cwd).await {
            ProcessOutcome::Success => {
                state.report.dependencies_installed = true;
                StageResult::Continue
            }
            ProcessOutcome::Failed(reason) => StageResult::Warn(vec![Warning::Subprocess {
                stage: Stage::InstallingDependencies,
                reason,
                remedy: spec.remedy(&cwd),
            }]),
        }
    }
}

async fn create_roots(roots: &TargetRoots) -> Result<Vec<Warning>, ScaffoldError> {
    for (role, dir) in roots.directories() {
        // `create_dir`, not `create_dir_all`: the project root must be new
        fs::create_dir(dir)
            .await
            .map_err(|e| ScaffoldError::CreateDir {
                path: dir.to_path_buf(),
                source: e,
            })?;
        tracing::debug!(%role, dir = %dir.display(), "created root");
    }
    Ok(Vec::new())
}

/// `.gitignore` always, plus the pnpm workspace file for the Workspace layout
async fn write_system_files(roots: &TargetRoots) -> Result<Vec<Warning>, ScaffoldError> {
    write_gitignore(roots.root()).await?;
    if roots.layout().is_workspace() {
        write_pnpm_workspace(roots.root(), roots.layout().workspaces()).await?;
    }
    Ok(Vec::new())
}

/// Copy one base template and merge its env fragment into `target`
async fn copy_base(
    role: &TemplateRole,
    source: &Path,
    target: &Path,
    overwrite: bool,
) -> Result<(), ScaffoldError> {
    if !is_dir(source).await {
        return Err(ScaffoldError::TemplateMissing {
            role: role.to_string(),
            path: source.to_path_buf(),
        });
    }

    let label = source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| role.to_string());
    merge_env_file(&source.join(ENV_EXAMPLE_FILE), &target.join(ENV_EXAMPLE_FILE), &label).await?;

    let options = CopyOptions::without_env_files().overwrite(overwrite);
    let report = copy_tree(source, target, &options).await?;
    tracing::debug!(%role, files = report.copied.len(), kept = report.kept_existing.len(), "copied base template");
    Ok(())
}

async fn patch_manifests(roots: &TargetRoots, name: &str) -> Result<Vec<Warning>, ScaffoldError> {
    const PACKAGE_JSON: &str = "package.json";

    match roots.layout() {
        Layout::Single => {
            patch_manifest(&roots.root().join(PACKAGE_JSON), &ManifestPatch::name(name)).await?;
        }
        Layout::Workspace => {
            upsert_manifest(
                &roots.root().join(PACKAGE_JSON),
                &ManifestPatch::workspace_root(name, roots.layout().workspaces()),
            )
            .await?;

            let web_name = format!("{}-{}", name, WEB_WORKSPACE);
            patch_manifest(&roots.web().join(PACKAGE_JSON), &ManifestPatch::name(&web_name)).await?;

            if let Some(native) = roots.get(RootRole::Native) {
                let native_name = format!("{}-{}", name, NATIVE_WORKSPACE);
                patch_manifest(&native.join(PACKAGE_JSON), &ManifestPatch::name(&native_name))
                    .await?;
                patch_manifest(&native.join("app.json"), &ManifestPatch::expo_app(name)).await?;
            }
        }
    }

    Ok(Vec::new())
}

async fn apply_modules(state: &mut RunState<'_>) -> Result<Vec<Warning>, ScaffoldError> {
    let mut warnings = Vec::new();

    for (id, module) in &state.modules {
        let Some(module) = module else {
            warnings.push(Warning::ModuleNotFound { module: id.clone() });
            continue;
        };

        let (resolution, outcomes) = apply_module(module, &state.roots).await?;
        if resolution.skipped_native {
            tracing::debug!(module = %id, "layout has no native root, native overlay skipped");
        }
        if !outcomes.is_empty() {
            state.report.applied_modules.push(id.clone());
        }
    }

    Ok(warnings)
}
