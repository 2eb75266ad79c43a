//! Structured manifest patching (`package.json`, `app.json`)

use crate::error::{Result, ScaffoldError};
use crate::fs::write_atomic;
use serde_json::{json, Map, Value};
use std::path::Path;
use tokio::fs;

/// A set of field assignments applied to one manifest.
///
/// Objects are merged recursively, everything else replaces the old value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManifestPatch {
    fields: Map<String, Value>,
}

impl ManifestPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Package name patch
    pub fn name(name: &str) -> Self {
        Self::new().set("name", name)
    }

    /// Root manifest of a monorepo declaring its workspaces
    pub fn workspace_root(name: &str, workspaces: &[&str]) -> Self {
        Self::new()
            .set("name", name)
            .set("private", true)
            .set("workspaces", json!(workspaces))
    }

    /// Expo application display name and slug
    pub fn expo_app(name: &str) -> Self {
        Self::new().set("expo", json!({ "name": name, "slug": name }))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Apply to an in-memory document. A non-object document is replaced.
    pub fn apply_to(&self, document: &mut Value) {
        if !document.is_object() {
            *document = Value::Object(Map::new());
        }
        if let Value::Object(map) = document {
            for (key, value) in &self.fields {
                match map.get_mut(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
    }
}

fn deep_merge(existing: &mut Value, incoming: &Value) {
    match (existing, incoming) {
        (Value::Object(current), Value::Object(updates)) => {
            for (key, value) in updates {
                match current.get_mut(key) {
                    Some(slot) => deep_merge(slot, value),
                    None => {
                        current.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (slot, value) => *slot = value.clone(),
    }
}

/// Two-space indented JSON with a trailing newline
pub fn to_manifest_string(document: &Value) -> serde_json::Result<String> {
    let mut rendered = serde_json::to_string_pretty(document)?;
    rendered.push('\n');
    Ok(rendered)
}

/// Read a manifest as JSON
pub async fn read_manifest(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| ScaffoldError::ManifestRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    serde_json::from_str(&content).map_err(|e| ScaffoldError::ManifestRead {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Write a manifest with stable formatting
pub async fn write_manifest(path: &Path, document: &Value) -> Result<()> {
    let rendered = to_manifest_string(document).map_err(|e| ScaffoldError::ManifestWrite {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    write_atomic(path, rendered.as_bytes())
        .await
        .map_err(|e| ScaffoldError::ManifestWrite {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// Patch an existing manifest in place. Untouched fields keep their order and values.
pub async fn patch_manifest(path: &Path, patch: &ManifestPatch) -> Result<()> {
    let mut document = read_manifest(path).await?;
    patch.apply_to(&mut document);
    write_manifest(path, &document).await?;
    tracing::debug!(manifest = %path.display(), "patched manifest");
    Ok(())
}

/// Patch the manifest at `path`, creating it from the patch alone when absent
pub async fn upsert_manifest(path: &Path, patch: &ManifestPatch) -> Result<()> {
    let exists = crate::fs::exists(path)
        .await
        .map_err(|e| ScaffoldError::ManifestRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    if exists {
        return patch_manifest(path, patch).await;
    }

    let mut document = Value::Object(Map::new());
    patch.apply_to(&mut document);
    write_manifest(path, &document).await?;
    tracing::debug!(manifest = %path.display(), "created manifest");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_patch_preserves_unknown_fields_and_order() {
        let mut doc = json!({
            "name": "template",
            "version": "0.1.0",
            "scripts": { "dev": "next dev" }
        });

        ManifestPatch::name("demo").apply_to(&mut doc);

        let keys: Vec<&String> = doc.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["name", "version", "scripts"]);
        assert_eq!(doc["name"], "demo");
        assert_eq!(doc["scripts"]["dev"], "next dev");
    }

    #[test]
    fn test_expo_patch_deep_merges() {
        let mut doc = json!({
            "expo": {
                "name": "expo-template",
                "slug": "expo-template",
                "scheme": "saas",
                "ios": { "supportsTablet": true }
            }
        });

        ManifestPatch::expo_app("demo3").apply_to(&mut doc);

        assert_eq!(doc["expo"]["name"], "demo3");
        assert_eq!(doc["expo"]["slug"], "demo3");
        assert_eq!(doc["expo"]["scheme"], "saas");
        assert_eq!(doc["expo"]["ios"]["supportsTablet"], true);
    }

    #[test]
    fn test_arrays_are_replaced() {
        let mut doc = json!({ "workspaces": ["old"] });
        ManifestPatch::workspace_root("demo", &["web", "native"]).apply_to(&mut doc);
        assert_eq!(doc["workspaces"], json!(["web", "native"]));
        assert_eq!(doc["private"], true);
    }

    #[test]
    fn test_rendering_uses_two_spaces() {
        let rendered = to_manifest_string(&json!({ "name": "demo", "private": true })).unwrap();
        assert_eq!(rendered, "{\n  \"name\": \"demo\",\n  \"private\": true\n}\n");
    }

    #[tokio::test]
    async fn test_patch_manifest_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = patch_manifest(&dir.path().join("package.json"), &ManifestPatch::name("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, ScaffoldError::ManifestRead { .. }));
    }

    #[tokio::test]
    async fn test_patch_manifest_unparseable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("package.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = patch_manifest(&path, &ManifestPatch::name("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, ScaffoldError::ManifestRead { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[tokio::test]
    async fn test_upsert_creates_missing_manifest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("package.json");

        upsert_manifest(&path, &ManifestPatch::workspace_root("demo", &["web"]))
            .await
            .unwrap();

        let doc = read_manifest(&path).await.unwrap();
        assert_eq!(doc, json!({ "name": "demo", "private": true, "workspaces": ["web"] }));
    }
}
