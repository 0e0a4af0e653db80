//! Per-run state shared by every orchestrator.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::copy::copy_glob;
use crate::deps::{DependencyCache, DependencyResolver};
use crate::error::{Error, Result};
use crate::mode::ProjectMode;
use crate::tool::{BuildTools, ToolRunner};

/// Everything one build or watch session needs, created once at startup.
pub struct Context {
    pub project_dir: PathBuf,
    pub mode: ProjectMode,
    pub config: Config,
    pub tools: BuildTools,
    pub runner: Arc<dyn ToolRunner>,
    pub deps: DependencyResolver,
    exploded_lock: Mutex<()>,
}

impl Context {
    pub fn new(
        project_dir: impl Into<PathBuf>,
        mode: ProjectMode,
        config: Config,
        runner: Arc<dyn ToolRunner>,
    ) -> Self {
        Self::with_dependency_cache(
            project_dir,
            mode,
            config,
            runner,
            Arc::new(DependencyCache::new()),
        )
    }

    pub fn with_dependency_cache(
        project_dir: impl Into<PathBuf>,
        mode: ProjectMode,
        config: Config,
        runner: Arc<dyn ToolRunner>,
        cache: Arc<DependencyCache>,
    ) -> Self {
        let project_dir = project_dir.into();
        let tools = BuildTools::locate(&project_dir, &config);
        let deps = DependencyResolver::new(
            mode,
            tools.gradle.clone(),
            project_dir.clone(),
            Arc::clone(&runner),
            cache,
        );

        Self {
            project_dir,
            mode,
            config,
            tools,
            runner,
            deps,
            exploded_lock: Mutex::new(()),
        }
    }

    /// Detects the project mode of `project_dir` and loads its config.
    pub fn detect(
        project_dir: impl Into<PathBuf>,
        config_path: Option<&Path>,
        runner: Arc<dyn ToolRunner>,
    ) -> Result<Self> {
        let project_dir = project_dir.into();
        let mode = ProjectMode::detect(&project_dir);
        let config = Config::load(&project_dir, mode, config_path)?;
        Ok(Self::new(project_dir, mode, config, runner))
    }

    /// Absolute location of the exploded deployment directory.
    pub fn exploded_dir(&self) -> PathBuf {
        self.project_dir.join(&self.config.path_exploded)
    }

    /// Holds the exploded-directory lock for the duration of `f`.
    ///
    /// Copies and installs all write into the same tree, so they run one at
    /// a time across categories.
    pub async fn with_exploded_lock<F, Fut, T>(&self, f: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = T>,
    {
        let _guard = self.exploded_lock.lock().await;
        f().await
    }

    /// Copies files matching `pattern` (minus `exclude`) into the exploded
    /// directory.
    pub async fn copy_to_exploded(&self, pattern: &str, exclude: Option<&str>) -> Result<usize> {
        let root = self.project_dir.clone();
        let dest = self.exploded_dir();
        let pattern_owned = pattern.to_string();
        let exclude = exclude.map(str::to_string);

        let start = Instant::now();
        let copied = self
            .with_exploded_lock(|| async move {
                tokio::task::spawn_blocking(move || {
                    copy_glob(&root, &pattern_owned, exclude.as_deref(), &dest)
                })
                .await
                .map_err(|e| Error::Io(std::io::Error::other(e.to_string())))?
            })
            .await?;

        tracing::debug!(
            "Copied {} file(s) matching {} in {:.2?}",
            copied,
            pattern,
            start.elapsed()
        );
        Ok(copied)
    }
}
