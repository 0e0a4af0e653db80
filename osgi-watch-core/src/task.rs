//! Build tasks, one per artifact category.
//!
//! A task is an optional build-tool invocation followed by a copy of its
//! output into the exploded directory. Tasks never return errors: failures
//! are logged and reported through [`TaskOutcome`], so one broken step never
//! holds up the rest of a build or a watch session.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::category::Category;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::mode::ProjectMode;
use crate::tool::Invocation;

/// Gradle tasks skipped during a Java-only compile, both in the module
/// itself and in every sibling project it depends on.
pub const SKIPPED_TASKS: [&str; 7] = [
    "transpileJS",
    "configJSModules",
    "npmInstall",
    "downloadMetalCli",
    "buildCSS",
    "downloadNode",
    "jar",
];

/// Builds the `gradle compileJava` argument list, excluding each of `skips`
/// per project and then globally.
pub fn build_gradle_args<P, S>(projects: &[P], skips: &[S]) -> Vec<String>
where
    P: AsRef<str>,
    S: AsRef<str>,
{
    let mut args = Vec::with_capacity(1 + 2 * (projects.len() * skips.len() + skips.len()));
    args.push("compileJava".to_string());

    for project in projects {
        for skip in skips {
            args.push("-x".to_string());
            args.push(format!("{}:{}", project.as_ref(), skip.as_ref()));
        }
    }
    for skip in skips {
        args.push("-x".to_string());
        args.push(skip.as_ref().to_string());
    }

    args
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    Succeeded,
    Failed { detail: String },
}

/// Result of running one pipeline step.
#[derive(Debug, Clone)]
pub struct TaskOutcome {
    pub task: String,
    pub status: TaskStatus,
    pub elapsed: Duration,
    /// Files copied into the exploded directory.
    pub copied: usize,
}

impl TaskOutcome {
    pub fn succeeded(task: impl Into<String>, elapsed: Duration, copied: usize) -> Self {
        Self {
            task: task.into(),
            status: TaskStatus::Succeeded,
            elapsed,
            copied,
        }
    }

    pub fn failed(task: impl Into<String>, elapsed: Duration, detail: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            status: TaskStatus::Failed {
                detail: detail.into(),
            },
            elapsed,
            copied: 0,
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        self.status == TaskStatus::Succeeded
    }
}

struct CopySpec<'a> {
    pattern: &'a str,
    exclude: Option<&'a str>,
}

/// Runs the per-category build tasks against a [`Context`].
#[derive(Clone)]
pub struct TaskPipeline {
    ctx: Arc<Context>,
}

impl TaskPipeline {
    pub fn new(ctx: Arc<Context>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &Arc<Context> {
        &self.ctx
    }

    /// Runs `build-<category>`.
    pub async fn run(&self, category: Category) -> TaskOutcome {
        let task = category.build_task();
        let start = Instant::now();

        match self.execute(category).await {
            Ok(copied) => {
                tracing::info!(
                    "[{}] Finished '{}' after {:.2?}",
                    category,
                    task,
                    start.elapsed()
                );
                TaskOutcome::succeeded(task, start.elapsed(), copied)
            }
            Err(e) => {
                report_failure(category, &e);
                TaskOutcome::failed(task, start.elapsed(), e.to_string())
            }
        }
    }

    async fn execute(&self, category: Category) -> Result<usize> {
        let mode = self.ctx.mode;
        if !mode.supports(category) {
            return Err(Error::TaskUnavailable {
                task: category.build_task(),
                mode: mode.to_string(),
            });
        }

        if let Some(invocation) = self.invocation(category).await {
            tracing::info!("[{}] {}", category, describe(category));
            let output = self.ctx.runner.run(&invocation).await?;
            if !output.trim().is_empty() {
                tracing::debug!("[{}] {}", category, output.trim_end());
            }
        }

        let spec = self.copy_spec(category);
        self.ctx.copy_to_exploded(spec.pattern, spec.exclude).await
    }

    /// The build-tool command for `category`, if it needs one.
    pub async fn invocation(&self, category: Category) -> Option<Invocation> {
        let ctx = &self.ctx;
        let gradle = || Invocation::new(&ctx.tools.gradle, &ctx.project_dir);

        match (ctx.mode, category) {
            (ProjectMode::OsgiGradle, Category::Java) => {
                let projects = ctx.deps.resolve().await;
                Some(gradle().args(build_gradle_args(&projects[..], &SKIPPED_TASKS[..])))
            }
            (ProjectMode::LegacyAnt, Category::Java) => {
                Some(Invocation::new(&ctx.tools.ant, &ctx.project_dir).arg("compile"))
            }
            (ProjectMode::OsgiGradle, Category::JavaScriptEs6) => Some(gradle().arg("transpileJS")),
            (ProjectMode::OsgiGradle, Category::Sass) => Some(gradle().arg("buildCSS")),
            (ProjectMode::OsgiGradle, Category::Soy) => Some(gradle().arg("buildSoy")),
            _ => None,
        }
    }

    fn copy_spec(&self, category: Category) -> CopySpec<'_> {
        let globs = &self.ctx.config.globs;
        let (pattern, exclude) = match (self.ctx.mode, category) {
            (_, Category::Java) => (globs.glob_class.as_str(), None),
            (_, Category::JavaScript) => (globs.glob_js.as_str(), Some(globs.glob_es6.as_str())),
            (_, Category::JavaScriptEs6) => (globs.glob_transpiled_js.as_str(), None),
            (_, Category::Jsp) => (globs.glob_jsp.as_str(), None),
            // Legacy portals compile Sass at runtime, so the sources ship as-is.
            (ProjectMode::LegacyAnt, Category::Sass) => (globs.glob_sass.as_str(), None),
            (_, Category::Sass) => (globs.glob_css.as_str(), None),
            (_, Category::Soy) => (globs.glob_soy_js.as_str(), None),
        };
        CopySpec { pattern, exclude }
    }
}

impl TaskPipeline {
    /// Prepares the exploded directory before the first build.
    ///
    /// Runs `unjarCommand` when configured; otherwise just makes sure the
    /// directory exists.
    pub async fn unjar(&self) -> TaskOutcome {
        let command = self.ctx.config.unjar_command.clone();
        if command.is_none() {
            let start = Instant::now();
            return match tokio::fs::create_dir_all(self.ctx.exploded_dir()).await {
                Ok(()) => TaskOutcome::succeeded("unjar", start.elapsed(), 0),
                Err(e) => {
                    tracing::error!("[unjar] {}", e);
                    TaskOutcome::failed("unjar", start.elapsed(), e.to_string())
                }
            };
        }
        self.run_hook("unjar", command.as_deref()).await
    }

    /// Pushes the exploded directory to the running container through
    /// `installCommand`.
    pub async fn install(&self) -> TaskOutcome {
        let command = self.ctx.config.install_command.clone();
        self.run_hook("install", command.as_deref()).await
    }

    async fn run_hook(&self, name: &str, command: Option<&str>) -> TaskOutcome {
        let start = Instant::now();
        let Some(command) = command else {
            tracing::debug!("[{}] No command configured, skipping", name);
            return TaskOutcome::succeeded(name, start.elapsed(), 0);
        };

        let exploded = self.ctx.exploded_dir();
        let command = command.replace("{exploded}", &exploded.to_string_lossy());
        let invocation = Invocation::shell(&command, &self.ctx.project_dir);

        let result = self
            .ctx
            .with_exploded_lock(|| self.ctx.runner.run(&invocation))
            .await;

        match result {
            Ok(_) => {
                tracing::info!("[{}] Finished after {:.2?}", name, start.elapsed());
                TaskOutcome::succeeded(name, start.elapsed(), 0)
            }
            Err(e) => {
                if let Error::ToolFailed { output, .. } = &e {
                    for line in output.lines().filter(|line| !line.trim().is_empty()) {
                        tracing::error!("[{}] {}", name, line);
                    }
                }
                tracing::error!("[{}] {}", name, e);
                TaskOutcome::failed(name, start.elapsed(), e.to_string())
            }
        }
    }
}

fn describe(category: Category) -> &'static str {
    match category {
        Category::Java => "Compiling Java",
        Category::JavaScript => "Copying JavaScript",
        Category::JavaScriptEs6 => "Transpiling ES6",
        Category::Jsp => "Copying JSP",
        Category::Sass => "Compiling Sass",
        Category::Soy => "Compiling Soy",
    }
}

fn report_failure(category: Category, error: &Error) {
    match error {
        Error::ToolFailed { output, .. } => {
            for line in output.lines().filter(|line| !line.trim().is_empty()) {
                tracing::error!("[{}] {}", category, line);
            }
            if category == Category::Java {
                tracing::error!("[java] Errors compiling Java. Check compiler output.");
            } else {
                tracing::error!("[{}] {}", category, error);
            }
        }
        Error::TaskUnavailable { .. } => tracing::warn!("[{}] {}", category, error),
        _ => tracing::error!("[{}] {}", category, error),
    }
}
