//! Scaffold request and its validation

use crate::error::{Result, ScaffoldError};
use std::collections::HashSet;

/// Check a project name against `[A-Za-z0-9-_]+`
pub fn is_valid_project_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Prompt-facing validation message, `None` when the name is acceptable
pub fn project_name_problem(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        Some("Project name is required!")
    } else if !is_valid_project_name(name) {
        Some("Project name can only contain letters, numbers, dashes, and underscores.")
    } else {
        None
    }
}

/// Everything the coordinator needs to know about what to generate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldRequest {
    project_name: String,
    modules: Vec<String>,
    with_mobile: bool,
}

impl ScaffoldRequest {
    /// Build a validated request. Module order is kept as given.
    pub fn new(
        project_name: impl Into<String>,
        modules: impl IntoIterator<Item = impl Into<String>>,
        with_mobile: bool,
    ) -> Result<Self> {
        let project_name = project_name.into();
        if !is_valid_project_name(&project_name) {
            return Err(ScaffoldError::InvalidProjectName(project_name));
        }

        let modules: Vec<String> = modules.into_iter().map(Into::into).collect();
        let mut seen = HashSet::new();
        for module in &modules {
            if !seen.insert(module.as_str()) {
                return Err(ScaffoldError::DuplicateModule(module.clone()));
            }
        }

        Ok(Self {
            project_name,
            modules,
            with_mobile,
        })
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// Selected modules in selection order
    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    pub fn with_mobile(&self) -> bool {
        self.with_mobile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_project_names() {
        assert!(is_valid_project_name("demo"));
        assert!(is_valid_project_name("my-saas_app2"));
        assert!(!is_valid_project_name(""));
        assert!(!is_valid_project_name("my app"));
        assert!(!is_valid_project_name("../escape"));
        assert!(!is_valid_project_name("café"));
    }

    #[test]
    fn test_project_name_problem_messages() {
        assert_eq!(project_name_problem(""), Some("Project name is required!"));
        assert!(project_name_problem("a/b").is_some());
        assert_eq!(project_name_problem("ok-name"), None);
    }

    #[test]
    fn test_request_keeps_selection_order() {
        let request = ScaffoldRequest::new("demo", ["resend", "stripe"], false).unwrap();
        assert_eq!(request.modules(), ["resend", "stripe"]);
        assert_eq!(request.project_name(), "demo");
        assert!(!request.with_mobile());
    }

    #[test]
    fn test_request_rejects_duplicates() {
        let err = ScaffoldRequest::new("demo", ["stripe", "stripe"], false).unwrap_err();
        assert!(matches!(err, ScaffoldError::DuplicateModule(id) if id == "stripe"));
    }

    #[test]
    fn test_request_rejects_bad_name() {
        let err = ScaffoldRequest::new("bad name", Vec::<String>::new(), true).unwrap_err();
        assert!(matches!(err, ScaffoldError::InvalidProjectName(_)));
    }
}
