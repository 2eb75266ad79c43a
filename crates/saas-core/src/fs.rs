//! Small filesystem helpers shared by the writers

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Sibling path used while a file is being written
fn staging_path(path: &Path) -> io::Result<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} has no file name", path.display()),
        )
    })?;

    let mut staged = OsString::from(".");
    staged.push(file_name);
    staged.push(format!(".{}.partial", std::process::id()));
    Ok(path.with_file_name(staged))
}

/// Write `contents` so that readers see either the old file or the complete new one
pub async fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let staged = staging_path(path)?;
    let result = match fs::write(&staged, contents).await {
        Ok(()) => fs::rename(&staged, path).await,
        Err(e) => Err(e),
    };
    // Never leave a staged file behind, whichever step failed
    if result.is_err() {
        let _ = fs::remove_file(&staged).await;
    }
    result
}

/// `true` if anything (file, dir, or dangling link) exists at `path`
pub async fn exists(path: &Path) -> io::Result<bool> {
    fs::try_exists(path).await
}

/// `true` if `path` is a directory. Unreadable paths count as absent.
pub async fn is_dir(path: &Path) -> bool {
    fs::metadata(path)
        .await
        .is_ok_and(|metadata| metadata.is_dir())
}
