//! Full project build: every task for the project type, concurrently.

use std::time::{Duration, Instant};

use tokio::task::JoinSet;

use crate::category::Category;
use crate::mode::ProjectMode;
use crate::task::{TaskOutcome, TaskPipeline};

/// Outcomes of one full build.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub mode: ProjectMode,
    pub outcomes: Vec<TaskOutcome>,
    pub elapsed: Duration,
}

impl BuildReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(TaskOutcome::is_success)
    }
}

pub struct BuildOrchestrator {
    pipeline: TaskPipeline,
}

impl BuildOrchestrator {
    pub fn new(pipeline: TaskPipeline) -> Self {
        Self { pipeline }
    }

    /// Tasks a full build runs for the detected project type.
    pub fn selected(&self) -> &'static [Category] {
        self.pipeline.context().mode.build_categories()
    }

    /// Runs the selected tasks concurrently and waits until all of them have
    /// settled. Never fails; outcomes are sorted in task order.
    pub async fn build(&self) -> BuildReport {
        let start = Instant::now();
        let mode = self.pipeline.context().mode;

        tracing::info!("[build] Building entire project");
        match mode {
            ProjectMode::OsgiGradle => tracing::info!("[build] OSGi project detected"),
            ProjectMode::LegacyAnt => tracing::info!("[build] Legacy WAR project detected"),
            ProjectMode::None => tracing::warn!(
                "[build] Neither build.gradle nor build.xml found, nothing to build"
            ),
        }

        let mut set = JoinSet::new();
        for &category in self.selected() {
            let pipeline = self.pipeline.clone();
            set.spawn(async move { (category, pipeline.run(category).await) });
        }

        let mut results: Vec<(Category, TaskOutcome)> = Vec::with_capacity(set.len());
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => tracing::error!("[build] Task panicked: {}", e),
            }
        }

        // A panicked task leaves no outcome behind; record it as failed.
        for &category in self.selected() {
            if !results.iter().any(|(c, _)| *c == category) {
                results.push((
                    category,
                    TaskOutcome::failed(category.build_task(), start.elapsed(), "task panicked"),
                ));
            }
        }
        results.sort_by_key(|(category, _)| *category);

        let elapsed = start.elapsed();
        tracing::info!("[build] Finished after {:.2?}", elapsed);

        BuildReport {
            mode,
            outcomes: results.into_iter().map(|(_, outcome)| outcome).collect(),
            elapsed,
        }
    }
}
