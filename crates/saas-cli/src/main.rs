//! create-saas-app - Project scaffolding for SaaS starters

mod logging;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use saas_core::tui::CreateArgs;
use saas_core::PackageManager;
use std::path::PathBuf;

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(name = "create-saas-app")]
#[command(about = "The Ultimate SaaS Starter: scaffold a Next.js app with optional modules and an Expo app")]
#[command(version)]
pub struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new project
    Create(CliCreateArgs),
}

#[derive(Parser, Debug, Default)]
pub struct CliCreateArgs {
    /// Template library to use instead of the bundled one
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Project name (letters, numbers, dashes, underscores)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Modules to include, in order (comma-separated: stripe,resend,openai)
    #[arg(short, long, value_delimiter = ',')]
    pub modules: Option<Vec<String>>,

    /// Include the Expo mobile app
    #[arg(long, conflicts_with = "no_mobile")]
    pub mobile: bool,

    /// Do not include the Expo mobile app
    #[arg(long = "no-mobile")]
    pub no_mobile: bool,

    /// Package manager to install with (npm, pnpm, yarn, bun)
    #[arg(long = "package-manager", value_parser = parse_package_manager)]
    pub package_manager: Option<PackageManager>,

    /// Skip git initialization
    #[arg(long = "skip-git")]
    pub skip_git: bool,

    /// Skip dependency installation
    #[arg(long = "skip-install")]
    pub skip_install: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

fn parse_package_manager(value: &str) -> Result<PackageManager, String> {
    value.parse()
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        let mobile = match (args.mobile, args.no_mobile) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        CreateArgs {
            template_dir: args.template_dir,
            name: args.name,
            modules: args.modules,
            mobile,
            package_manager: args.package_manager,
            skip_git: args.skip_git,
            skip_install: args.skip_install,
            yes: args.yes,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    logging::init_logging(args.verbose)?;

    // No subcommand provided, default to create behavior (interactive mode)
    let create_args: CreateArgs = match args.command {
        Some(Command::Create(create_args)) => create_args.into(),
        None => CreateArgs::default(),
    };

    let result = saas_core::run(create_args, CLI_VERSION).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_non_interactive_create() {
        let args = Args::parse_from([
            "create-saas-app",
            "-vv",
            "create",
            "--name",
            "demo",
            "--modules",
            "stripe,resend",
            "--mobile",
            "--package-manager",
            "pnpm",
            "--skip-git",
            "-y",
        ]);
        assert_eq!(args.verbose, 2);

        let Some(Command::Create(create)) = args.command else {
            panic!("expected create subcommand");
        };
        let create: CreateArgs = create.into();
        assert_eq!(create.name.as_deref(), Some("demo"));
        assert_eq!(
            create.modules,
            Some(vec!["stripe".to_string(), "resend".to_string()])
        );
        assert_eq!(create.mobile, Some(true));
        assert_eq!(create.package_manager, Some(PackageManager::Pnpm));
        assert!(create.skip_git);
        assert!(!create.skip_install);
        assert!(create.yes);
    }

    #[test]
    fn test_mobile_left_to_prompt_by_default() {
        let args = Args::parse_from(["create-saas-app", "create"]);
        let Some(Command::Create(create)) = args.command else {
            panic!("expected create subcommand");
        };
        let create: CreateArgs = create.into();
        assert_eq!(create.mobile, None);
        assert_eq!(create.modules, None);
    }

    #[test]
    fn test_no_mobile_flag() {
        let args = Args::parse_from(["create-saas-app", "create", "--no-mobile"]);
        let Some(Command::Create(create)) = args.command else {
            panic!("expected create subcommand");
        };
        assert_eq!(CreateArgs::from(create).mobile, Some(false));
    }

    #[test]
    fn test_rejects_unknown_package_manager() {
        let result = Args::try_parse_from(["create-saas-app", "create", "--package-manager", "cargo"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_no_subcommand() {
        let args = Args::parse_from(["create-saas-app"]);
        assert!(args.command.is_none());
    }
}
