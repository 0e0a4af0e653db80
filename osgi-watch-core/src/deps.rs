//! Sibling project discovery through `gradle dependencies`.

use std::path::PathBuf;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tokio::sync::Mutex;

use crate::mode::ProjectMode;
use crate::tool::{Invocation, ToolRunner};

static PROJECT_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\s|]*[+\\]--- project (\S+)").expect("project dependency pattern is valid")
});

/// Extracts in-workspace project paths from a Gradle dependency report.
///
/// Nested entries are flattened, repeats marked `(*)` are dropped and the
/// first-seen order is kept.
pub fn parse_project_dependencies(report: &str) -> Vec<String> {
    let mut projects: Vec<String> = Vec::new();

    for line in report.lines().filter(|line| line.contains("project :")) {
        if let Some(captures) = PROJECT_LINE.captures(line) {
            let project = captures[1].to_string();
            if !projects.contains(&project) {
                projects.push(project);
            }
        }
    }

    projects
}

/// Memoized dependency list shared by every Java build of a run.
///
/// Only successful resolutions are stored. The value is never invalidated
/// while the owner lives; [`DependencyCache::clear`] starts over.
#[derive(Debug, Default)]
pub struct DependencyCache {
    projects: Mutex<Option<Arc<[String]>>>,
}

impl DependencyCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self) -> Option<Arc<[String]>> {
        self.projects.lock().await.clone()
    }

    pub async fn clear(&self) {
        *self.projects.lock().await = None;
    }
}

/// Asks Gradle which sibling projects the module compiles against.
pub struct DependencyResolver {
    mode: ProjectMode,
    gradle: String,
    project_dir: PathBuf,
    runner: Arc<dyn ToolRunner>,
    cache: Arc<DependencyCache>,
}

impl DependencyResolver {
    pub fn new(
        mode: ProjectMode,
        gradle: impl Into<String>,
        project_dir: impl Into<PathBuf>,
        runner: Arc<dyn ToolRunner>,
        cache: Arc<DependencyCache>,
    ) -> Self {
        Self {
            mode,
            gradle: gradle.into(),
            project_dir: project_dir.into(),
            runner,
            cache,
        }
    }

    /// Returns the compile-scope project dependencies.
    ///
    /// Never fails: legacy projects and failed Gradle runs yield an empty
    /// list. The cache lock is held while Gradle runs, so concurrent callers
    /// share a single invocation.
    pub async fn resolve(&self) -> Arc<[String]> {
        let mut cached = self.cache.projects.lock().await;
        if let Some(projects) = cached.as_ref() {
            return Arc::clone(projects);
        }

        if self.mode != ProjectMode::OsgiGradle {
            return Arc::from(Vec::new());
        }

        let invocation = Invocation::new(&self.gradle, &self.project_dir).args([
            "dependencies",
            "--configuration",
            "compile",
        ]);

        match self.runner.run(&invocation).await {
            Ok(report) => {
                let projects: Arc<[String]> = Arc::from(parse_project_dependencies(&report));
                tracing::debug!("Project dependencies: {:?}", projects);
                *cached = Some(Arc::clone(&projects));
                projects
            }
            Err(e) => {
                tracing::warn!(
                    "Unable to get compile dependencies from gradle ({}). Trying to continue without it...",
                    e
                );
                Arc::from(Vec::new())
            }
        }
    }
}
