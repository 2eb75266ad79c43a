//! Env-declaration fragment merging
//!
//! Every template contributes at most one `.env.example` fragment per target.
//! The first fragment written to a target lands verbatim. Each later fragment
//! is appended under a provenance line:
//!
//! ```text
//! NEXT_PUBLIC_SUPABASE_URL=
//! # Module: stripe
//! STRIPE_SECRET_KEY=
//! ```
//!
//! Call order decides fragment order, so callers must merge in module
//! selection order.

use crate::error::{Result, ScaffoldError};
use crate::fs::write_atomic;
use std::path::Path;
use tokio::fs;

/// Provenance comment placed above an appended fragment
pub fn provenance_line(label: &str) -> String {
    format!("# Module: {}", label)
}

/// Append `fragment` to `existing` under a provenance line for `label`
pub fn append_fragment(existing: &str, label: &str, fragment: &str) -> String {
    let mut merged = String::with_capacity(existing.len() + fragment.len() + label.len() + 16);
    merged.push_str(existing);
    if !merged.is_empty() && !merged.ends_with('\n') {
        merged.push('\n');
    }
    merged.push_str(&provenance_line(label));
    merged.push('\n');
    merged.push_str(fragment);
    if !merged.ends_with('\n') {
        merged.push('\n');
    }
    merged
}

/// Merge one fragment into the env file at `target`
pub async fn merge_env_fragment(target: &Path, label: &str, fragment: &str) -> Result<()> {
    let map_err = |e| ScaffoldError::EnvMerge {
        path: target.to_path_buf(),
        source: e,
    };

    let merged = if crate::fs::exists(target).await.map_err(map_err)? {
        let existing = fs::read_to_string(target).await.map_err(map_err)?;
        append_fragment(&existing, label, fragment)
    } else {
        fragment.to_string()
    };

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).await.map_err(map_err)?;
    }
    write_atomic(target, merged.as_bytes())
        .await
        .map_err(map_err)?;

    tracing::debug!(target = %target.display(), module = label, "merged env fragment");
    Ok(())
}

/// Merge the fragment at `source` (if any) into `target`. Returns whether one was found.
pub async fn merge_env_file(source: &Path, target: &Path, label: &str) -> Result<bool> {
    let map_err = |e| ScaffoldError::EnvMerge {
        path: source.to_path_buf(),
        source: e,
    };

    if !crate::fs::exists(source).await.map_err(map_err)? {
        return Ok(false);
    }
    let fragment = fs::read_to_string(source).await.map_err(map_err)?;
    merge_env_fragment(target, label, &fragment).await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_append_inserts_single_newline() {
        let merged = append_fragment("A=1", "stripe", "STRIPE_KEY=");
        assert_eq!(merged, "A=1\n# Module: stripe\nSTRIPE_KEY=\n");
    }

    #[test]
    fn test_append_keeps_existing_terminator() {
        let merged = append_fragment("A=1\n", "resend", "RESEND_API_KEY=\n");
        assert_eq!(merged, "A=1\n# Module: resend\nRESEND_API_KEY=\n");
    }

    #[test]
    fn test_append_to_crlf_content() {
        let merged = append_fragment("A=1\r\n", "openai", "OPENAI_API_KEY=");
        assert_eq!(merged, "A=1\r\n# Module: openai\nOPENAI_API_KEY=\n");
    }

    #[tokio::test]
    async fn test_first_fragment_is_verbatim() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join(".env.example");

        merge_env_fragment(&target, "stripe", "STRIPE_KEY=")
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "STRIPE_KEY=");
    }

    #[tokio::test]
    async fn test_fragment_order_follows_call_order() {
        let dir = TempDir::new().unwrap();
        let ab = dir.path().join("ab.env");
        let ba = dir.path().join("ba.env");
        std::fs::write(&ab, "BASE=1\n").unwrap();
        std::fs::write(&ba, "BASE=1\n").unwrap();

        merge_env_fragment(&ab, "stripe", "S=1").await.unwrap();
        merge_env_fragment(&ab, "resend", "R=1").await.unwrap();
        merge_env_fragment(&ba, "resend", "R=1").await.unwrap();
        merge_env_fragment(&ba, "stripe", "S=1").await.unwrap();

        assert_eq!(
            std::fs::read_to_string(&ab).unwrap(),
            "BASE=1\n# Module: stripe\nS=1\n# Module: resend\nR=1\n"
        );
        assert_eq!(
            std::fs::read_to_string(&ba).unwrap(),
            "BASE=1\n# Module: resend\nR=1\n# Module: stripe\nS=1\n"
        );
    }

    #[tokio::test]
    async fn test_merge_env_file_without_source() {
        let dir = TempDir::new().unwrap();
        let found = merge_env_file(
            &dir.path().join("missing.env"),
            &dir.path().join(".env.example"),
            "stripe",
        )
        .await
        .unwrap();

        assert!(!found);
        assert!(!dir.path().join(".env.example").exists());
    }
}
