mod common;

use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use osgi_watch_core::category::Category;
use osgi_watch_core::config::GlobConfig;
use osgi_watch_core::mode::ProjectMode;
use osgi_watch_core::sequence::{watch_table, SequenceRunner, READY_MESSAGE};
use osgi_watch_core::task::TaskPipeline;
use osgi_watch_core::watch::{Dispatcher, SequenceRun, WatchOrchestrator, WatchState};
use osgi_watch_core::watcher::{watch_roots, CategoryMatcher};
use tokio::sync::mpsc;

use common::{context, RecordingNotifier, RecordingRunner};

struct Fixture {
    _temp_dir: TempDir,
    root: std::path::PathBuf,
    runner: Arc<RecordingRunner>,
    notifier: Arc<RecordingNotifier>,
    dispatcher: Dispatcher,
    runs: mpsc::UnboundedReceiver<SequenceRun>,
}

fn fixture(mode: ProjectMode, debounce: Duration) -> Fixture {
    fixture_with_runner(mode, debounce, RecordingRunner::new())
}

fn fixture_with_runner(mode: ProjectMode, debounce: Duration, runner: RecordingRunner) -> Fixture {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().to_path_buf();
    let runner = Arc::new(runner);
    let notifier = Arc::new(RecordingNotifier::default());
    let ctx = context(&root, mode, Arc::clone(&runner));

    let table = watch_table(mode);
    let categories: Vec<Category> = table.iter().map(|(c, _)| *c).collect();
    let matcher = CategoryMatcher::new(&root, &ctx.config.globs, &categories).unwrap();
    let sequence = SequenceRunner::new(TaskPipeline::new(ctx), notifier.clone());
    let (tx, runs) = mpsc::unbounded_channel();
    let dispatcher = Dispatcher::spawn(matcher, table, sequence, debounce, Some(tx));

    Fixture {
        _temp_dir: temp_dir,
        root,
        runner,
        notifier,
        dispatcher,
        runs,
    }
}

async fn next_run(runs: &mut mpsc::UnboundedReceiver<SequenceRun>) -> SequenceRun {
    tokio::time::timeout(Duration::from_secs(5), runs.recv())
        .await
        .expect("rebuild did not finish in time")
        .expect("reporter closed")
}

#[test]
fn test_classify_es6_is_not_javascript() {
    let root = std::path::Path::new("/project");
    let globs = GlobConfig::defaults_for(ProjectMode::OsgiGradle);
    let matcher = CategoryMatcher::new(root, &globs, &Category::ALL).unwrap();

    assert_eq!(
        matcher.classify(&root.join("src/main/resources/META-INF/resources/js/a.es.js")),
        Some(Category::JavaScriptEs6)
    );
    assert_eq!(
        matcher.classify(&root.join("src/main/resources/META-INF/resources/js/a.js")),
        Some(Category::JavaScript)
    );
    assert_eq!(
        matcher.classify(&root.join("src/main/java/com/acme/Portlet.java")),
        Some(Category::Java)
    );
    assert_eq!(
        matcher.classify(&root.join("src/main/resources/META-INF/resources/css/main.scss")),
        Some(Category::Sass)
    );
    assert_eq!(matcher.classify(&root.join("build/exploded/a.js")), None);
}

#[test]
fn test_classify_under_root_with_glob_characters() {
    let root = std::path::Path::new("/home/dev/work[1]/portlet");
    let globs = GlobConfig::defaults_for(ProjectMode::OsgiGradle);
    let matcher = CategoryMatcher::new(root, &globs, &Category::ALL).unwrap();

    assert_eq!(
        matcher.classify(&root.join("src/main/java/com/acme/Portlet.java")),
        Some(Category::Java)
    );
    assert_eq!(
        matcher.classify(&root.join("src/main/resources/META-INF/resources/a.es.js")),
        Some(Category::JavaScriptEs6)
    );
    assert_eq!(
        matcher.classify(std::path::Path::new("/home/dev/work1/portlet/src/main/java/A.java")),
        None
    );
}

#[test]
fn test_watch_roots_for_existing_sources() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    std::fs::create_dir_all(root.join("src/main/java")).unwrap();
    std::fs::create_dir_all(root.join("src/main/resources")).unwrap();
    let globs = GlobConfig::defaults_for(ProjectMode::OsgiGradle);

    let roots = watch_roots(root, &globs, &Category::ALL);

    assert_eq!(
        roots,
        vec![root.join("src/main/java"), root.join("src/main/resources")]
    );
}

#[test]
fn test_watch_roots_fall_back_to_existing_ancestor() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    std::fs::create_dir_all(root.join("src/main/java")).unwrap();
    let globs = GlobConfig::defaults_for(ProjectMode::OsgiGradle);

    // The resources directory does not exist yet; its parent covers both.
    assert_eq!(
        watch_roots(root, &globs, &Category::ALL),
        vec![root.join("src/main")]
    );

    let empty = TempDir::new().unwrap();
    assert_eq!(
        watch_roots(empty.path(), &globs, &[Category::Jsp]),
        vec![empty.path().to_path_buf()]
    );
}

#[test]
fn test_legacy_es6_change_triggers_nothing() {
    let root = std::path::Path::new("/project");
    let globs = GlobConfig::defaults_for(ProjectMode::LegacyAnt);
    let categories: Vec<Category> = watch_table(ProjectMode::LegacyAnt)
        .into_iter()
        .map(|(c, _)| c)
        .collect();
    let matcher = CategoryMatcher::new(root, &globs, &categories).unwrap();

    assert_eq!(matcher.classify(&root.join("docroot/js/a.es.js")), None);
    assert_eq!(
        matcher.classify(&root.join("docroot/js/a.js")),
        Some(Category::JavaScript)
    );
}

#[tokio::test]
async fn test_java_change_runs_java_sequence() {
    let mut fx = fixture(ProjectMode::OsgiGradle, Duration::from_millis(10));

    let dispatched = fx
        .dispatcher
        .dispatch(&fx.root.join("src/main/java/com/acme/Portlet.java"));
    assert_eq!(dispatched, Some(Category::Java));

    let run = next_run(&mut fx.runs).await;
    assert_eq!(run.category, Category::Java);
    assert_eq!(run.steps(), vec!["build-java", "install", "notify"]);
    assert_eq!(fx.runner.calls_to("compileJava"), 1);
    assert_eq!(fx.runner.calls_to("buildCSS"), 0);
    assert_eq!(fx.runner.calls_with("buildCSS"), 1);
    assert_eq!(fx.notifier.messages().len(), 1);
    fx.dispatcher.shutdown();
}

#[tokio::test]
async fn test_sass_change_skips_install_for_osgi() {
    let mut fx = fixture(ProjectMode::OsgiGradle, Duration::from_millis(10));

    fx.dispatcher
        .dispatch(&fx.root.join("src/main/resources/META-INF/resources/css/main.scss"));

    let run = next_run(&mut fx.runs).await;
    assert_eq!(run.steps(), vec!["build-sass", "notify"]);
    fx.dispatcher.shutdown();
}

#[tokio::test]
async fn test_sass_change_installs_for_legacy() {
    let mut fx = fixture(ProjectMode::LegacyAnt, Duration::from_millis(10));

    fx.dispatcher.dispatch(&fx.root.join("docroot/css/main.scss"));

    let run = next_run(&mut fx.runs).await;
    assert_eq!(run.steps(), vec!["build-sass", "install", "notify"]);
    fx.dispatcher.shutdown();
}

#[tokio::test]
async fn test_burst_of_changes_is_coalesced() {
    let mut fx = fixture(ProjectMode::OsgiGradle, Duration::from_millis(200));
    let path = fx.root.join("src/main/java/com/acme/Portlet.java");

    for _ in 0..5 {
        fx.dispatcher.dispatch(&path);
    }

    let run = next_run(&mut fx.runs).await;
    assert_eq!(run.category, Category::Java);

    let second = tokio::time::timeout(Duration::from_millis(500), fx.runs.recv()).await;
    assert!(second.is_err(), "burst triggered more than one rebuild");
    assert_eq!(fx.runner.calls_to("compileJava"), 1);
    fx.dispatcher.shutdown();
}

#[tokio::test]
async fn test_changes_during_rebuild_schedule_one_follow_up() {
    let runner = RecordingRunner::new().with_delay(Duration::from_millis(200));
    let mut fx = fixture_with_runner(ProjectMode::OsgiGradle, Duration::from_millis(20), runner);
    let path = fx.root.join("src/main/java/com/acme/Portlet.java");

    fx.dispatcher.dispatch(&path);
    // Past the debounce window, so the first rebuild is already running.
    tokio::time::sleep(Duration::from_millis(60)).await;
    for _ in 0..5 {
        fx.dispatcher.dispatch(&path);
    }

    let first = next_run(&mut fx.runs).await;
    let second = next_run(&mut fx.runs).await;
    assert_eq!(first.category, Category::Java);
    assert_eq!(second.category, Category::Java);

    let third = tokio::time::timeout(Duration::from_millis(600), fx.runs.recv()).await;
    assert!(third.is_err(), "changes during a rebuild ran more than one follow-up");
    assert_eq!(fx.runner.calls_to("compileJava"), 2);
    fx.dispatcher.shutdown();
}

#[tokio::test]
async fn test_unrelated_path_is_ignored() {
    let fx = fixture(ProjectMode::OsgiGradle, Duration::from_millis(10));

    assert_eq!(fx.dispatcher.dispatch(&fx.root.join("README.md")), None);
    assert_eq!(fx.dispatcher.categories().len(), 6);
    fx.dispatcher.shutdown();
}

#[tokio::test]
async fn test_start_reaches_watching() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::create_dir_all(temp_dir.path().join("src/main/java")).unwrap();
    let runner = Arc::new(RecordingRunner::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let ctx = context(temp_dir.path(), ProjectMode::OsgiGradle, Arc::clone(&runner));
    let orchestrator = WatchOrchestrator::new(SequenceRunner::new(
        TaskPipeline::new(ctx),
        notifier.clone(),
    ));
    assert_eq!(orchestrator.state(), WatchState::Starting);

    let session = orchestrator.start().await.unwrap();

    assert_eq!(orchestrator.state(), WatchState::Watching);
    assert!(temp_dir.path().join("build/exploded").is_dir());
    assert_eq!(runner.calls_to("compileJava"), 1);
    assert_eq!(notifier.messages(), vec![READY_MESSAGE.to_string()]);

    session.run(async {}).await.unwrap();
}
