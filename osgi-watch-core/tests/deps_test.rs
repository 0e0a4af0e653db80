mod common;

use std::sync::Arc;
use tempfile::TempDir;

use osgi_watch_core::deps::{parse_project_dependencies, DependencyCache, DependencyResolver};
use osgi_watch_core::mode::ProjectMode;

use common::{RecordingRunner, GRADLE_REPORT};

fn resolver(mode: ProjectMode, runner: Arc<RecordingRunner>, cache: Arc<DependencyCache>) -> DependencyResolver {
    DependencyResolver::new(mode, "gradle", std::env::temp_dir(), runner, cache)
}

#[test]
fn test_parse_project_dependencies() {
    let projects = parse_project_dependencies(GRADLE_REPORT);

    assert_eq!(projects, vec![":modules:foo-api", ":modules:foo-util"]);
}

#[test]
fn test_parse_ignores_external_dependencies() {
    let report = "+--- org.osgi:org.osgi.core:6.0.0\n\\--- javax.portlet:portlet-api:3.0.0\n";

    assert!(parse_project_dependencies(report).is_empty());
}

#[tokio::test]
async fn test_resolve_is_cached() {
    let runner = Arc::new(RecordingRunner::new().with_report(GRADLE_REPORT));
    let cache = Arc::new(DependencyCache::new());
    let resolver = resolver(ProjectMode::OsgiGradle, Arc::clone(&runner), Arc::clone(&cache));

    let first = resolver.resolve().await;
    let second = resolver.resolve().await;

    assert_eq!(&first[..], &[":modules:foo-api".to_string(), ":modules:foo-util".to_string()]);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(runner.calls().len(), 1);

    let call = &runner.calls()[0];
    assert_eq!(call.args, vec!["dependencies", "--configuration", "compile"]);
}

#[tokio::test]
async fn test_cache_shared_between_resolvers() {
    let runner = Arc::new(RecordingRunner::new().with_report(GRADLE_REPORT));
    let cache = Arc::new(DependencyCache::new());

    let first = resolver(ProjectMode::OsgiGradle, Arc::clone(&runner), Arc::clone(&cache))
        .resolve()
        .await;
    let second = resolver(ProjectMode::OsgiGradle, Arc::clone(&runner), Arc::clone(&cache))
        .resolve()
        .await;

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(runner.calls().len(), 1);
}

#[tokio::test]
async fn test_concurrent_first_calls_invoke_gradle_once() {
    let runner = Arc::new(RecordingRunner::new().with_report(GRADLE_REPORT));
    let cache = Arc::new(DependencyCache::new());
    let resolver = Arc::new(resolver(ProjectMode::OsgiGradle, Arc::clone(&runner), cache));

    let a = tokio::spawn({
        let resolver = Arc::clone(&resolver);
        async move { resolver.resolve().await }
    });
    let b = tokio::spawn({
        let resolver = Arc::clone(&resolver);
        async move { resolver.resolve().await }
    });
    let (a, b) = (a.await.unwrap(), b.await.unwrap());

    assert_eq!(a, b);
    assert_eq!(runner.calls().len(), 1);
}

#[tokio::test]
async fn test_failure_resolves_to_empty() {
    let runner = Arc::new(RecordingRunner::new().failing_on("dependencies"));
    let cache = Arc::new(DependencyCache::new());
    let resolver = resolver(ProjectMode::OsgiGradle, Arc::clone(&runner), Arc::clone(&cache));

    let projects = resolver.resolve().await;

    assert!(projects.is_empty());
    assert!(cache.get().await.is_none());

    // Nothing was cached, so the next call asks Gradle again.
    resolver.resolve().await;
    assert_eq!(runner.calls().len(), 2);
}

#[tokio::test]
async fn test_legacy_project_skips_gradle() {
    let runner = Arc::new(RecordingRunner::new().with_report(GRADLE_REPORT));
    let cache = Arc::new(DependencyCache::new());

    for mode in [ProjectMode::LegacyAnt, ProjectMode::None] {
        let projects = resolver(mode, Arc::clone(&runner), Arc::clone(&cache))
            .resolve()
            .await;
        assert!(projects.is_empty());
    }

    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_clear_resets_cache() {
    let temp_dir = TempDir::new().unwrap();
    let runner = Arc::new(RecordingRunner::new().with_report(GRADLE_REPORT));
    let cache = Arc::new(DependencyCache::new());
    let resolver = DependencyResolver::new(
        ProjectMode::OsgiGradle,
        "gradle",
        temp_dir.path(),
        Arc::clone(&runner) as Arc<dyn osgi_watch_core::ToolRunner>,
        Arc::clone(&cache),
    );

    resolver.resolve().await;
    cache.clear().await;
    resolver.resolve().await;

    assert_eq!(runner.calls().len(), 2);
}
