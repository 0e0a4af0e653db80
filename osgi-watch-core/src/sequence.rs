//! Ordered step sequences and the table of rebuild sequences per category.

use std::fmt;
use std::sync::Arc;

use crate::category::Category;
use crate::mode::ProjectMode;
use crate::notifier::Notifier;
use crate::task::{TaskOutcome, TaskPipeline};

pub const LIVE_MESSAGE: &str = "Your changes are live. Reload the page.";
pub const READY_MESSAGE: &str = "Ready! Waiting for changes.";

/// One step of a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Unjar,
    Build(Category),
    Install,
    Notify,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Unjar => f.write_str("unjar"),
            Step::Build(category) => write!(f, "build-{}", category),
            Step::Install => f.write_str("install"),
            Step::Notify => f.write_str("notify"),
        }
    }
}

/// The rebuild sequence run when a `category` source changes, or `None` if
/// the category is not watched in `mode`.
///
/// Steps that write straight into the exploded directory in OSGi mode skip
/// the install.
pub fn rebuild_sequence(category: Category, mode: ProjectMode) -> Option<Vec<Step>> {
    use Step::{Build, Install, Notify};

    let osgi = match mode {
        ProjectMode::OsgiGradle => true,
        ProjectMode::LegacyAnt => false,
        ProjectMode::None => return None,
    };

    let steps = match category {
        Category::Java => vec![Build(category), Install, Notify],
        Category::JavaScript | Category::Sass if osgi => vec![Build(category), Notify],
        Category::JavaScript | Category::Sass => vec![Build(category), Install, Notify],
        Category::JavaScriptEs6 | Category::Soy if osgi => vec![Build(category), Notify],
        Category::JavaScriptEs6 | Category::Soy => return None,
        Category::Jsp => vec![Build(category), Install, Notify],
    };

    Some(steps)
}

/// Every watched category in `mode` with its rebuild sequence.
pub fn watch_table(mode: ProjectMode) -> Vec<(Category, Vec<Step>)> {
    Category::ALL
        .iter()
        .filter_map(|&category| rebuild_sequence(category, mode).map(|steps| (category, steps)))
        .collect()
}

/// Executes sequences one step at a time.
#[derive(Clone)]
pub struct SequenceRunner {
    pipeline: TaskPipeline,
    notifier: Arc<dyn Notifier>,
}

impl SequenceRunner {
    pub fn new(pipeline: TaskPipeline, notifier: Arc<dyn Notifier>) -> Self {
        Self { pipeline, notifier }
    }

    pub fn pipeline(&self) -> &TaskPipeline {
        &self.pipeline
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Runs `steps` in order. A failed step does not stop the sequence, so
    /// the user is still told once the remaining steps are done.
    pub async fn run(&self, steps: &[Step]) -> Vec<TaskOutcome> {
        let mut outcomes = Vec::with_capacity(steps.len());
        for step in steps {
            outcomes.push(self.run_step(*step).await);
        }
        outcomes
    }

    pub async fn run_step(&self, step: Step) -> TaskOutcome {
        match step {
            Step::Unjar => self.pipeline.unjar().await,
            Step::Build(category) => self.pipeline.run(category).await,
            Step::Install => self.pipeline.install().await,
            Step::Notify => {
                self.notifier.notify(LIVE_MESSAGE);
                TaskOutcome::succeeded("notify", Default::default(), 0)
            }
        }
    }
}
