//! Target directory layout resolution

use std::fmt;
use std::path::{Path, PathBuf};

/// Workspace directory name for the web application
pub const WEB_WORKSPACE: &str = "web";
/// Workspace directory name for the native application
pub const NATIVE_WORKSPACE: &str = "native";

/// Shape of the generated project tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// One application rooted at the project directory
    Single,
    /// Monorepo with `web/` and `native/` workspaces under the project directory
    Workspace,
}

impl Layout {
    pub fn from_mobile(with_mobile: bool) -> Self {
        if with_mobile {
            Layout::Workspace
        } else {
            Layout::Single
        }
    }

    pub fn is_workspace(&self) -> bool {
        matches!(self, Layout::Workspace)
    }

    /// Workspace names declared in the root manifest
    pub fn workspaces(&self) -> &'static [&'static str] {
        match self {
            Layout::Single => &[],
            Layout::Workspace => &[WEB_WORKSPACE, NATIVE_WORKSPACE],
        }
    }
}

/// Logical role of an output directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RootRole {
    Root,
    Web,
    Native,
}

impl RootRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            RootRole::Root => "root",
            RootRole::Web => "web",
            RootRole::Native => "native",
        }
    }
}

impl fmt::Display for RootRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Concrete output directories for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRoots {
    layout: Layout,
    root: PathBuf,
    web: PathBuf,
    native: Option<PathBuf>,
}

impl TargetRoots {
    /// Resolve the directories for `project_dir`. Pure, touches nothing on disk.
    pub fn resolve(project_dir: &Path, with_mobile: bool) -> Self {
        let layout = Layout::from_mobile(with_mobile);
        let root = project_dir.to_path_buf();
        match layout {
            Layout::Single => Self {
                layout,
                web: root.clone(),
                root,
                native: None,
            },
            Layout::Workspace => Self {
                layout,
                web: root.join(WEB_WORKSPACE),
                native: Some(root.join(NATIVE_WORKSPACE)),
                root,
            },
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn web(&self) -> &Path {
        &self.web
    }

    pub fn native(&self) -> Option<&Path> {
        self.native.as_deref()
    }

    pub fn get(&self, role: RootRole) -> Option<&Path> {
        match role {
            RootRole::Root => Some(self.root.as_path()),
            RootRole::Web => Some(self.web.as_path()),
            RootRole::Native => self.native(),
        }
    }

    /// Distinct directories to create, root first
    pub fn directories(&self) -> Vec<(RootRole, &Path)> {
        let mut dirs = vec![(RootRole::Root, self.root.as_path())];
        if self.web != self.root {
            dirs.push((RootRole::Web, self.web.as_path()));
        }
        if let Some(native) = &self.native {
            dirs.push((RootRole::Native, native.as_path()));
        }
        dirs
    }
}
