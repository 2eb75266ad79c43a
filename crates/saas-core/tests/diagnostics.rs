//! The library reports warnings through the returned report, not the log

use saas_core::{ScaffoldConfig, ScaffoldRequest, Scaffolder, Warning};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::registry;

/// Counts events at WARN or ERROR
#[derive(Clone, Default)]
struct LoudEvents(Arc<AtomicUsize>);

impl<S: Subscriber> Layer<S> for LoudEvents {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() <= Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn test_warnings_stay_below_default_filter() {
    let templates = TempDir::new().unwrap();
    write(templates.path(), "web/nextjs/package.json", "{ \"name\": \"nextjs-template\" }\n");
    let output = TempDir::new().unwrap();

    let config = ScaffoldConfig::new(output.path(), templates.path())
        .with_git(true)
        .with_git_program("saas-no-such-git")
        .with_install(false);
    let request = ScaffoldRequest::new("demo", ["no-such-module"], false).unwrap();

    let loud = LoudEvents::default();
    let subscriber = registry().with(loud.clone());
    let report = tracing::subscriber::with_default(subscriber, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(Scaffolder::new(config).run(&request))
            .unwrap()
    });

    // Missing infra base, missing module and failed git init
    assert!(report
        .warnings
        .iter()
        .any(|w| matches!(w, Warning::Subprocess { .. })));
    assert!(report
        .warnings
        .iter()
        .any(|w| matches!(w, Warning::ModuleNotFound { .. })));
    assert_eq!(loud.0.load(Ordering::SeqCst), 0);
}
