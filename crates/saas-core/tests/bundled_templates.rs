//! Checks on the template library shipped with the repository

use saas_core::templates::ModuleLayout;
use saas_core::{ScaffoldConfig, ScaffoldRequest, Scaffolder, TemplateCatalog, TemplatePaths};
use std::path::PathBuf;
use tempfile::TempDir;

fn bundled_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("templates")
}

#[tokio::test]
async fn test_catalog_modules_all_have_templates() {
    let paths = TemplatePaths::from_root(&bundled_root());
    let catalog = TemplateCatalog::load(&paths.catalog).await.unwrap();

    assert!(catalog.version.is_some());
    assert!(!catalog.modules.is_empty());
    for entry in &catalog.modules {
        assert!(
            paths.load_module(&entry.id).await.is_some(),
            "module {} has no template",
            entry.id
        );
    }
}

#[tokio::test]
async fn test_module_layouts() {
    let paths = TemplatePaths::from_root(&bundled_root());

    let stripe = paths.load_module("stripe").await.unwrap();
    assert!(matches!(
        stripe.layout,
        ModuleLayout::PerTarget {
            web: Some(_),
            native: Some(_)
        }
    ));

    let resend = paths.load_module("resend").await.unwrap();
    assert!(matches!(resend.layout, ModuleLayout::Legacy { .. }));
}

#[tokio::test]
async fn test_full_stack_scaffold() {
    let output = TempDir::new().unwrap();
    let config = ScaffoldConfig::new(output.path(), &bundled_root())
        .with_git(false)
        .with_install(false);

    let request = ScaffoldRequest::new("acme", ["stripe", "resend", "openai"], true).unwrap();
    let report = Scaffolder::new(config).run(&request).await.unwrap();

    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    assert_eq!(report.applied_modules, vec!["stripe", "resend", "openai"]);

    let acme = output.path().join("acme");
    assert!(acme.join("supabase/config.toml").exists());
    assert!(acme.join("web/app/api/chat/route.ts").exists());
    assert!(acme.join("web/lib/email.ts").exists());
    assert!(acme.join("native/components/Paywall.tsx").exists());

    let env = std::fs::read_to_string(acme.join("web/.env.example")).unwrap();
    let headers: Vec<&str> = env.lines().filter(|l| l.starts_with("# Module: ")).collect();
    assert_eq!(
        headers,
        vec!["# Module: stripe", "# Module: resend", "# Module: openai"]
    );
}
