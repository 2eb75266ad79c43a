//! Charm-style CLI prompts using cliclack

use crate::config::{self, ScaffoldConfig, PACKAGE_MANAGER_ENV, TEMPLATE_DIR_ENV};
use crate::layout::WEB_WORKSPACE;
use crate::request::{project_name_problem, ScaffoldRequest};
use crate::runtime::PackageManager;
use crate::scaffold::{ScaffoldReport, Scaffolder, Warning};
use crate::templates::{version, TemplateCatalog, TemplatePaths};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Command shown when the templates expect a newer CLI
const UPGRADE_COMMAND: &str = "cargo install saas-cli --force";

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Template library root, overrides `SAAS_TEMPLATE_DIR`
    pub template_dir: Option<PathBuf>,

    /// Project name (prompted when absent)
    pub name: Option<String>,

    /// Modules to include, in order (prompted when absent)
    pub modules: Option<Vec<String>>,

    /// Include the Expo mobile app (prompted when absent)
    pub mobile: Option<bool>,

    /// Package manager, overrides `SAAS_PACKAGE_MANAGER` and detection
    pub package_manager: Option<PackageManager>,

    pub skip_git: bool,
    pub skip_install: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// Run the CLI with interactive prompts
pub async fn run(args: CreateArgs, cli_version: &str) -> Result<()> {
    cliclack::intro(format!(
        "{} {}",
        "  SAAS-CLI  ".on_cyan().black(),
        "The Ultimate SaaS Starter".cyan()
    ))?;

    // Step 1: Locate templates and load the module catalog
    let template_root = locate_templates(&args)?;
    let templates = TemplatePaths::from_root(&template_root);
    let catalog = load_catalog(&templates, cli_version).await?;

    // Step 2: Collect the request
    let project_name = select_project_name(&args)?;
    let modules = select_modules(&catalog, &args)?;
    let with_mobile = select_mobile(&args)?;
    let request = ScaffoldRequest::new(project_name, modules, with_mobile)?;

    // Step 3: Build the configuration
    let output_dir = std::env::current_dir().context("Failed to read the current directory")?;
    let package_manager = select_package_manager(&args)?;
    let config = ScaffoldConfig::new(output_dir, &template_root)
        .with_package_manager(package_manager)
        .with_git(!args.skip_git)
        .with_install(!args.skip_install);

    // Step 4: Scaffold
    let report = create_project(config.clone(), &request).await?;

    // Step 5: Surface warnings and next steps
    report_warnings(&report.warnings)?;
    print_next_steps(&config, &report)?;

    Ok(())
}

fn locate_templates(args: &CreateArgs) -> Result<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        candidates.push(exe_dir.join("templates"));
    }
    candidates.push(PathBuf::from("templates"));

    let root = config::resolve_template_root(
        args.template_dir.clone(),
        std::env::var(TEMPLATE_DIR_ENV).ok(),
        &candidates,
    );
    if !root.is_dir() {
        anyhow::bail!(
            "Template directory not found: {} (use --template-dir or {})",
            root.display(),
            TEMPLATE_DIR_ENV
        );
    }
    cliclack::log::info(format!("Using templates from {}", root.display()))?;
    Ok(root)
}

async fn load_catalog(templates: &TemplatePaths, cli_version: &str) -> Result<TemplateCatalog> {
    let catalog = TemplateCatalog::load(&templates.catalog).await?;

    if let Some(warning) =
        version::check_compatibility(cli_version, catalog.version.as_deref(), UPGRADE_COMMAND)
    {
        cliclack::log::warning(warning)?;
    }

    Ok(catalog)
}

fn select_project_name(args: &CreateArgs) -> Result<String> {
    if let Some(name) = &args.name {
        if let Some(problem) = project_name_problem(name) {
            anyhow::bail!("{}", problem);
        }
        cliclack::log::info(format!("Project name: {}", name))?;
        return Ok(name.clone());
    }

    if args.yes {
        anyhow::bail!("--yes requires --name");
    }

    let name: String = cliclack::input("What is your project named?")
        .placeholder("my-saas-app")
        .validate(|input: &String| match project_name_problem(input) {
            Some(problem) => Err(problem),
            None => Ok(()),
        })
        .interact()?;

    Ok(name)
}

fn select_modules(catalog: &TemplateCatalog, args: &CreateArgs) -> Result<Vec<String>> {
    if let Some(modules) = &args.modules {
        let mut selected: Vec<String> = Vec::new();
        for module in modules {
            let module = module.trim().to_lowercase();
            if module.is_empty() || selected.contains(&module) {
                continue;
            }
            if !catalog.contains(&module) {
                cliclack::log::warning(format!("Unknown module: {}", module))?;
            }
            selected.push(module);
        }
        return Ok(selected);
    }

    if args.yes || catalog.modules.is_empty() {
        return Ok(Vec::new());
    }

    let mut multi = cliclack::multiselect("Which modules would you like to include?");
    for entry in &catalog.modules {
        multi = multi.item(
            entry.id.clone(),
            &entry.label,
            entry.hint.as_deref().unwrap_or(""),
        );
    }
    let mut selected: Vec<String> = multi.required(false).interact()?;

    // Keep catalog order regardless of the order items were toggled in
    selected.sort_by_key(|id| catalog.modules.iter().position(|m| &m.id == id));
    Ok(selected)
}

fn select_mobile(args: &CreateArgs) -> Result<bool> {
    if let Some(mobile) = args.mobile {
        return Ok(mobile);
    }
    if args.yes {
        return Ok(false);
    }

    let mobile: bool = cliclack::confirm("Do you want to include a Mobile App (Expo)?")
        .initial_value(false)
        .interact()?;
    Ok(mobile)
}

fn select_package_manager(args: &CreateArgs) -> Result<PackageManager> {
    if let Some(pm) = args.package_manager {
        return Ok(pm);
    }
    if let Ok(value) = std::env::var(PACKAGE_MANAGER_ENV) {
        return value
            .parse::<PackageManager>()
            .map_err(|e| anyhow::anyhow!("{} ({})", e, PACKAGE_MANAGER_ENV));
    }
    Ok(PackageManager::detect())
}

async fn create_project(config: ScaffoldConfig, request: &ScaffoldRequest) -> Result<ScaffoldReport> {
    let spinner = cliclack::spinner();
    spinner.start("Copying project files...");

    let scaffolder = Scaffolder::new(config);
    let result = scaffolder
        .run_with_progress(request, |stage| {
            spinner.set_message(format!("{}...", capitalize(stage.description())));
        })
        .await;

    match result {
        Ok(report) => {
            spinner.stop(format!(
                "{} {}",
                "Project created in".green(),
                report.project_dir.display()
            ));
            Ok(report)
        }
        Err(e) => {
            spinner.stop(format!("{}", "Failed to scaffold project.".red()));
            cliclack::log::error(format!("{}", e))?;
            Err(e.into())
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn report_warnings(warnings: &[Warning]) -> Result<()> {
    for warning in warnings {
        match warning.remedy() {
            Some(remedy) => cliclack::log::warning(format!(
                "{}\nRun it manually: {}",
                warning,
                remedy.yellow()
            ))?,
            None => cliclack::log::warning(warning.to_string())?,
        }
    }
    Ok(())
}

/// Numbered follow-up commands for the operator
pub fn next_steps(config: &ScaffoldConfig, report: &ScaffoldReport) -> Vec<String> {
    let pm = config.package_manager;
    let mut steps = Vec::new();

    let relative = report
        .project_dir
        .strip_prefix(&config.output_dir)
        .unwrap_or(&report.project_dir);
    steps.push(format!("cd {}", relative.display()));

    if !report.dependencies_installed {
        // Same command the install stage runs, relative to the project root
        let workspace = report.layout.is_workspace().then_some(WEB_WORKSPACE);
        let (spec, cwd) = pm.install_command(Path::new("."), &report.dependencies, workspace);
        match cwd.strip_prefix(".") {
            Ok(sub) if !sub.as_os_str().is_empty() => {
                steps.push(format!("(cd {} && {})", sub.display(), spec))
            }
            _ => steps.push(spec.to_string()),
        }
    }

    steps.push("Copy .env.example to .env.local and fill in your keys".to_string());

    if report.layout.is_workspace() {
        steps.push(format!("cd web && {}", pm.run_script("dev")));
    } else {
        steps.push(pm.run_script("dev"));
    }

    steps
}

fn print_next_steps(config: &ScaffoldConfig, report: &ScaffoldReport) -> Result<()> {
    let steps = next_steps(config, report);

    println!();
    println!("  {}", "Next steps".bold());
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step.cyan());
    }
    println!();

    cliclack::outro("You're all set! Happy coding.".green())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Layout;

    fn report(layout: Layout, installed: bool) -> ScaffoldReport {
        ScaffoldReport {
            project_dir: PathBuf::from("/work/demo"),
            layout,
            applied_modules: Vec::new(),
            dependencies: Vec::new(),
            git_initialized: true,
            dependencies_installed: installed,
            warnings: Vec::new(),
            stages: Vec::new(),
        }
    }

    #[test]
    fn test_next_steps_single_layout() {
        let config = ScaffoldConfig::new("/work", Path::new("/templates"));
        let steps = next_steps(&config, &report(Layout::Single, true));
        assert_eq!(steps.first().map(String::as_str), Some("cd demo"));
        assert_eq!(steps.last().map(String::as_str), Some("npm run dev"));
        assert!(!steps.iter().any(|s| s == "npm install"));
    }

    #[test]
    fn test_next_steps_include_install_when_skipped() {
        let config = ScaffoldConfig::new("/work", Path::new("/templates"))
            .with_package_manager(PackageManager::Pnpm);
        let steps = next_steps(&config, &report(Layout::Workspace, false));
        assert!(steps.iter().any(|s| s == "pnpm install"));
        assert_eq!(steps.last().map(String::as_str), Some("cd web && pnpm dev"));
    }

    fn with_dependencies(mut report: ScaffoldReport) -> ScaffoldReport {
        report.dependencies = ["@supabase/supabase-js", "@supabase/ssr", "stripe", "@stripe/stripe-js"]
            .into_iter()
            .map(String::from)
            .collect();
        report
    }

    #[test]
    fn test_skipped_install_lists_every_dependency() {
        let config = ScaffoldConfig::new("/work", Path::new("/templates"));
        let steps = next_steps(&config, &with_dependencies(report(Layout::Single, false)));
        assert_eq!(
            steps[1],
            "npm install @supabase/supabase-js @supabase/ssr stripe @stripe/stripe-js"
        );
    }

    #[test]
    fn test_skipped_install_targets_web_workspace() {
        let config = ScaffoldConfig::new("/work", Path::new("/templates"))
            .with_package_manager(PackageManager::Pnpm);
        let steps = next_steps(&config, &with_dependencies(report(Layout::Workspace, false)));
        assert_eq!(
            steps[1],
            "pnpm add @supabase/supabase-js @supabase/ssr stripe @stripe/stripe-js --filter ./web"
        );

        let config = config.with_package_manager(PackageManager::Bun);
        let steps = next_steps(&config, &with_dependencies(report(Layout::Workspace, false)));
        assert_eq!(
            steps[1],
            "(cd web && bun add @supabase/supabase-js @supabase/ssr stripe @stripe/stripe-js)"
        );
        assert_eq!(steps.last().map(String::as_str), Some("cd web && bun dev"));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("applying modules"), "Applying modules");
        assert_eq!(capitalize(""), "");
    }
}
