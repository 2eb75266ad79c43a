//! Template tree copying with exclusion and overwrite policy

use crate::error::{Result, ScaffoldError};
use crate::fs::write_atomic;
use std::io;
use std::path::Path;
use tokio::fs;
use walkdir::WalkDir;

/// Default name of the env-declaration file merged across templates
pub const ENV_EXAMPLE_FILE: &str = ".env.example";

/// Matches any env-declaration file (`.env`, `.env.example`, `.env.local`, ...)
pub fn is_env_file(relative_path: &Path) -> bool {
    relative_path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name == ".env" || name.starts_with(".env."))
}

fn exclude_nothing(_: &Path) -> bool {
    false
}

/// How [`copy_tree`] treats collisions and which files it leaves out
#[derive(Debug, Clone, Copy)]
pub struct CopyOptions {
    pub overwrite_existing: bool,
    /// Called with the path relative to the source root
    pub exclude: fn(&Path) -> bool,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            overwrite_existing: true,
            exclude: exclude_nothing,
        }
    }
}

impl CopyOptions {
    pub fn overwrite(mut self, overwrite_existing: bool) -> Self {
        self.overwrite_existing = overwrite_existing;
        self
    }

    pub fn exclude(mut self, predicate: fn(&Path) -> bool) -> Self {
        self.exclude = predicate;
        self
    }

    /// The policy used for every template and module overlay copy
    pub fn without_env_files() -> Self {
        Self::default().exclude(is_env_file)
    }
}

/// What a copy did, as relative paths in walk order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
    pub copied: Vec<String>,
    pub excluded: Vec<String>,
    pub kept_existing: Vec<String>,
}

/// Recursively copy `source` into `destination`.
///
/// Each file is written atomically. A failure stops the copy and leaves the
/// files already written in place.
pub async fn copy_tree(
    source: &Path,
    destination: &Path,
    options: &CopyOptions,
) -> Result<CopyReport> {
    fs::create_dir_all(destination)
        .await
        .map_err(|e| ScaffoldError::CreateDir {
            path: destination.to_path_buf(),
            source: e,
        })?;

    let mut report = CopyReport::default();

    for entry in WalkDir::new(source).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| ScaffoldError::copy(source, destination, io::Error::from(e)))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| {
                ScaffoldError::copy(
                    entry.path(),
                    destination,
                    io::Error::new(io::ErrorKind::InvalidInput, e),
                )
            })?;
        let target_path = destination.join(relative);
        let display_path = relative.to_string_lossy().replace('\\', "/");

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target_path)
                .await
                .map_err(|e| ScaffoldError::CreateDir {
                    path: target_path.clone(),
                    source: e,
                })?;
            continue;
        }

        if (options.exclude)(relative) {
            tracing::debug!(file = %display_path, "excluded from copy");
            report.excluded.push(display_path);
            continue;
        }

        let already_there = crate::fs::exists(&target_path)
            .await
            .map_err(|e| ScaffoldError::copy(entry.path(), &target_path, e))?;
        if already_there && !options.overwrite_existing {
            tracing::debug!(file = %display_path, "kept existing file");
            report.kept_existing.push(display_path);
            continue;
        }

        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ScaffoldError::CreateDir {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let content = fs::read(entry.path())
            .await
            .map_err(|e| ScaffoldError::copy(entry.path(), &target_path, e))?;
        write_atomic(&target_path, &content)
            .await
            .map_err(|e| ScaffoldError::copy(entry.path(), &target_path, e))?;

        tracing::debug!(file = %display_path, to = %destination.display(), "copied");
        report.copied.push(display_path);
    }

    Ok(report)
}
