//! Error taxonomy for the scaffold engine
//!
//! Fatal conditions are [`ScaffoldError`] values. The coordinator wraps them in
//! a [`StageError`] so the diagnostic always names the stage that failed.
//! Non-fatal conditions never become errors; see [`crate::scaffold::Warning`].

use crate::scaffold::Stage;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal failures raised by the engine components
#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error(
        "Invalid project name '{0}': only letters, numbers, dashes, and underscores are allowed"
    )]
    InvalidProjectName(String),

    #[error("Module '{0}' was selected more than once")]
    DuplicateModule(String),

    #[error("Target directory already exists: {}", path.display())]
    TargetExists { path: PathBuf },

    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Template '{role}' not found at {}", path.display())]
    TemplateMissing { role: String, path: PathBuf },

    #[error("Failed to copy {} to {}: {source}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to merge env fragment into {}: {source}", path.display())]
    EnvMerge {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read manifest {}: {reason}", path.display())]
    ManifestRead { path: PathBuf, reason: String },

    #[error("Failed to write manifest {}: {reason}", path.display())]
    ManifestWrite { path: PathBuf, reason: String },

    #[error("Failed to write {}: {source}", path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to load template catalog {}: {reason}", path.display())]
    Catalog { path: PathBuf, reason: String },
}

impl ScaffoldError {
    pub(crate) fn copy(from: impl Into<PathBuf>, to: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Copy {
            from: from.into(),
            to: to.into(),
            source,
        }
    }
}

/// A fatal error tagged with the coordinator stage it aborted
#[derive(Debug, Error)]
#[error("Scaffold aborted while {stage}: {source}\nPartial output was left in {}", project_dir.display())]
pub struct StageError {
    pub stage: Stage,
    pub project_dir: PathBuf,
    #[source]
    pub source: ScaffoldError,
}

impl StageError {
    /// True when the run aborted before touching the filesystem
    pub fn is_precondition(&self) -> bool {
        matches!(
            self.source,
            ScaffoldError::TargetExists { .. }
                | ScaffoldError::InvalidProjectName(_)
                | ScaffoldError::DuplicateModule(_)
        )
    }
}

pub type Result<T, E = ScaffoldError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_error_names_stage_and_directory() {
        let err = StageError {
            stage: Stage::CopyingBaseTemplates,
            project_dir: PathBuf::from("/tmp/demo"),
            source: ScaffoldError::TemplateMissing {
                role: "base-web".to_string(),
                path: PathBuf::from("/templates/web/nextjs"),
            },
        };

        let message = err.to_string();
        assert!(message.contains("copying base templates"));
        assert!(message.contains("base-web"));
        assert!(message.contains("/tmp/demo"));
        assert!(!err.is_precondition());
    }

    #[test]
    fn test_target_exists_is_precondition() {
        let err = StageError {
            stage: Stage::Validating,
            project_dir: PathBuf::from("demo"),
            source: ScaffoldError::TargetExists {
                path: PathBuf::from("demo"),
            },
        };
        assert!(err.is_precondition());
    }
}
