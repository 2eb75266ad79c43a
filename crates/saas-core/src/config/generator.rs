//! Generated system files

use crate::error::{Result, ScaffoldError};
use crate::fs::write_atomic;
use serde::Serialize;
use std::io;
use std::path::Path;

/// pnpm reads workspace members from this file, not from `package.json`
pub const PNPM_WORKSPACE_FILE: &str = "pnpm-workspace.yaml";

/// Ignore patterns written to every generated project
const GITIGNORE_ENTRIES: &[&str] = &[
    "# dependencies",
    "node_modules/",
    ".pnp",
    "",
    "# build output",
    ".next/",
    "out/",
    "dist/",
    "build/",
    ".expo/",
    ".turbo/",
    "",
    "# env files (keep the example)",
    ".env",
    ".env*",
    "!.env.example",
    "",
    "# os metadata",
    ".DS_Store",
    "Thumbs.db",
    "",
    "# logs",
    "*.log",
];

pub fn gitignore_content() -> String {
    let mut content = GITIGNORE_ENTRIES.join("\n");
    content.push('\n');
    content
}

/// Write `.gitignore` at the project root, replacing any template copy
pub async fn write_gitignore(project_root: &Path) -> Result<()> {
    let path = project_root.join(".gitignore");
    if let Err(e) = write_atomic(&path, gitignore_content().as_bytes()).await {
        return Err(ScaffoldError::WriteFile { path, source: e });
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct PnpmWorkspace<'a> {
    packages: &'a [&'a str],
}

pub fn pnpm_workspace_content(workspaces: &[&str]) -> serde_yaml::Result<String> {
    serde_yaml::to_string(&PnpmWorkspace {
        packages: workspaces,
    })
}

/// Write `pnpm-workspace.yaml` listing `workspaces` at the project root
pub async fn write_pnpm_workspace(project_root: &Path, workspaces: &[&str]) -> Result<()> {
    let path = project_root.join(PNPM_WORKSPACE_FILE);
    let content = match pnpm_workspace_content(workspaces) {
        Ok(content) => content,
        Err(e) => {
            return Err(ScaffoldError::WriteFile {
                path,
                source: io::Error::new(io::ErrorKind::InvalidData, e),
            })
        }
    };
    if let Err(e) = write_atomic(&path, content.as_bytes()).await {
        return Err(ScaffoldError::WriteFile { path, source: e });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_gitignore_covers_required_entries() {
        let content = gitignore_content();
        let lines: Vec<&str> = content.lines().collect();
        for required in ["node_modules/", ".next/", "dist/", ".env*", "!.env.example", ".DS_Store"] {
            assert!(lines.contains(&required), "missing {}", required);
        }
        assert!(content.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_write_gitignore() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".gitignore"), "stale").unwrap();
        write_gitignore(dir.path()).await.unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join(".gitignore")).unwrap(),
            gitignore_content()
        );
    }

    #[tokio::test]
    async fn test_write_pnpm_workspace() {
        let dir = TempDir::new().unwrap();
        write_pnpm_workspace(dir.path(), &["web", "native"]).await.unwrap();

        let content = std::fs::read_to_string(dir.path().join(PNPM_WORKSPACE_FILE)).unwrap();
        let parsed: serde_yaml::Value = serde_yaml::from_str(&content).unwrap();
        let packages: Vec<&str> = parsed["packages"]
            .as_sequence()
            .unwrap()
            .iter()
            .map(|p| p.as_str().unwrap())
            .collect();
        assert_eq!(packages, vec!["web", "native"]);
    }
}
