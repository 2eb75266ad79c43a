//! Template library: role paths, the module catalog, and module loading

use crate::error::{Result, ScaffoldError};
use crate::fs::is_dir;
use crate::layout::{NATIVE_WORKSPACE, WEB_WORKSPACE};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File name of the catalog at the template root
pub const CATALOG_FILE: &str = "template.yaml";

/// Logical role of a read-only template tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateRole {
    BaseWeb,
    BaseInfra,
    NativeBase,
    Module(String),
}

impl std::fmt::Display for TemplateRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateRole::BaseWeb => f.write_str("base-web"),
            TemplateRole::BaseInfra => f.write_str("base-infra"),
            TemplateRole::NativeBase => f.write_str("native-base"),
            TemplateRole::Module(id) => write!(f, "module:{}", id),
        }
    }
}

/// Where each template role lives on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePaths {
    pub base_web: PathBuf,
    pub base_infra: PathBuf,
    pub native_base: PathBuf,
    pub modules: PathBuf,
    pub catalog: PathBuf,
}

impl TemplatePaths {
    /// Conventional layout under a single template root
    pub fn from_root(root: &Path) -> Self {
        Self {
            base_web: root.join("web").join("nextjs"),
            base_infra: root.join("infra"),
            native_base: root.join("native").join("expo"),
            modules: root.join("modules"),
            catalog: root.join(CATALOG_FILE),
        }
    }

    pub fn path_for(&self, role: &TemplateRole) -> PathBuf {
        match role {
            TemplateRole::BaseWeb => self.base_web.clone(),
            TemplateRole::BaseInfra => self.base_infra.clone(),
            TemplateRole::NativeBase => self.native_base.clone(),
            TemplateRole::Module(id) => self.modules.join(id),
        }
    }

    /// Load a module's template, `None` when the library has no such module
    pub async fn load_module(&self, id: &str) -> Option<ModuleTemplate> {
        if id.is_empty() || id.contains(['/', '\\']) || id == "." || id == ".." {
            return None;
        }
        let root = self.modules.join(id);
        if !is_dir(&root).await {
            return None;
        }
        Some(ModuleTemplate::from_dir(id, root).await)
    }
}

/// How a module's tree is organised, decided once at load time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleLayout {
    /// `web/` and/or `native/` sub-trees, one per target
    PerTarget {
        web: Option<PathBuf>,
        native: Option<PathBuf>,
    },
    /// The whole tree is a web overlay
    Legacy { tree: PathBuf },
}

/// A module template loaded from the library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleTemplate {
    pub id: String,
    pub root: PathBuf,
    pub layout: ModuleLayout,
}

impl ModuleTemplate {
    /// Probe `root` for per-target sub-folders
    pub async fn from_dir(id: &str, root: PathBuf) -> Self {
        let web = existing_dir(root.join(WEB_WORKSPACE)).await;
        let native = existing_dir(root.join(NATIVE_WORKSPACE)).await;

        let layout = if web.is_some() || native.is_some() {
            ModuleLayout::PerTarget { web, native }
        } else {
            ModuleLayout::Legacy { tree: root.clone() }
        };

        Self {
            id: id.to_string(),
            root,
            layout,
        }
    }
}

async fn existing_dir(dir: PathBuf) -> Option<PathBuf> {
    is_dir(&dir).await.then_some(dir)
}

/// One selectable module as listed in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModuleEntry {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub hint: Option<String>,
}

/// Template catalog (`templates/template.yaml`)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TemplateCatalog {
    /// Minimum CLI version the templates were written for
    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub modules: Vec<ModuleEntry>,
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TemplateCatalog {
    /// Catalog used when the template library ships none
    pub fn builtin() -> Self {
        let entry = |id: &str, label: &str, hint: &str| ModuleEntry {
            id: id.to_string(),
            label: label.to_string(),
            hint: Some(hint.to_string()),
        };
        Self {
            version: None,
            modules: vec![
                entry("stripe", "Stripe (Payments)", "Subscriptions & Checkout"),
                entry("resend", "Resend (Email)", "Transactional Emails"),
                entry("openai", "OpenAI", "AI Integration"),
            ],
        }
    }

    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| ScaffoldError::Catalog {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load the catalog at `path`, falling back to [`TemplateCatalog::builtin`] if absent
    pub async fn load(path: &Path) -> Result<Self> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Self::parse(&content, path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(catalog = %path.display(), "no catalog, using built-in modules");
                Ok(Self::builtin())
            }
            Err(e) => Err(ScaffoldError::Catalog {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.modules.iter().any(|m| m.id == id)
    }
}
