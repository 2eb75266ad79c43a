//! Package manager selection and install command construction

use super::process::{is_available, ProcessSpec};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Supported JavaScript package managers, in detection order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PackageManager {
    #[default]
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

impl PackageManager {
    pub const ALL: [PackageManager; 4] = [
        PackageManager::Npm,
        PackageManager::Pnpm,
        PackageManager::Yarn,
        PackageManager::Bun,
    ];

    pub fn binary(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
            PackageManager::Bun => "bun",
        }
    }

    /// First package manager found on PATH, npm when none responds
    pub fn detect() -> Self {
        Self::ALL
            .into_iter()
            .find(|pm| is_available(pm.binary()))
            .unwrap_or_default()
    }

    /// Install command and working directory.
    ///
    /// With no extra packages this is a plain install. Extra packages are
    /// added to `workspace` when given, otherwise to the project itself.
    pub fn install_command(
        &self,
        project_dir: &Path,
        packages: &[String],
        workspace: Option<&str>,
    ) -> (ProcessSpec, PathBuf) {
        let root = project_dir.to_path_buf();
        if packages.is_empty() {
            return (ProcessSpec::new(self.binary(), ["install"]), root);
        }

        let mut args: Vec<String> = Vec::new();
        let mut cwd = root;
        match (self, workspace) {
            (PackageManager::Npm, ws) => {
                args.push("install".to_string());
                args.extend(packages.iter().cloned());
                if let Some(ws) = ws {
                    args.push(format!("--workspace={}", ws));
                }
            }
            (PackageManager::Pnpm, ws) => {
                args.push("add".to_string());
                args.extend(packages.iter().cloned());
                if let Some(ws) = ws {
                    args.push("--filter".to_string());
                    args.push(format!("./{}", ws));
                }
            }
            (PackageManager::Yarn, Some(ws)) => {
                args.extend(["workspace".to_string(), ws.to_string(), "add".to_string()]);
                args.extend(packages.iter().cloned());
            }
            (PackageManager::Yarn, None) => {
                args.push("add".to_string());
                args.extend(packages.iter().cloned());
            }
            (PackageManager::Bun, ws) => {
                args.push("add".to_string());
                args.extend(packages.iter().cloned());
                if let Some(ws) = ws {
                    cwd = cwd.join(ws);
                }
            }
        }

        (ProcessSpec::new(self.binary(), args), cwd)
    }

    /// How to start the dev server
    pub fn run_script(&self, script: &str) -> String {
        match self {
            PackageManager::Npm => format!("npm run {}", script),
            other => format!("{} {}", other.binary(), script),
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary())
    }
}

impl FromStr for PackageManager {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "npm" => Ok(PackageManager::Npm),
            "pnpm" => Ok(PackageManager::Pnpm),
            "yarn" => Ok(PackageManager::Yarn),
            "bun" => Ok(PackageManager::Bun),
            other => Err(format!(
                "Unknown package manager '{}' (expected npm, pnpm, yarn or bun)",
                other
            )),
        }
    }
}
