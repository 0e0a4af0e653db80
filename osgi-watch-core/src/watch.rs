//! Watch mode: initial build and install, then per-category rebuilds on
//! change.
//!
//! Each watched category owns one worker task. Changes are coalesced for the
//! debounce window, and changes that arrive while a category is rebuilding
//! schedule exactly one follow-up run. Categories rebuild independently of
//! each other; writes into the exploded directory are serialized by the
//! [`Context`](crate::context::Context).

use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::build::BuildOrchestrator;
use crate::category::Category;
use crate::error::{Error, Result};
use crate::live_reload::{LiveReloadOptions, LiveReloadServer};
use crate::sequence::{watch_table, SequenceRunner, Step, READY_MESSAGE};
use crate::task::TaskOutcome;
use crate::watcher::{is_change, watch_roots, CategoryMatcher, FileWatcher};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Starting,
    InitialBuild,
    Installing,
    Watching,
}

/// One completed rebuild sequence.
#[derive(Debug, Clone)]
pub struct SequenceRun {
    pub category: Category,
    pub outcomes: Vec<TaskOutcome>,
}

impl SequenceRun {
    /// Names of the steps that ran, in order.
    pub fn steps(&self) -> Vec<&str> {
        self.outcomes.iter().map(|o| o.task.as_str()).collect()
    }
}

struct Worker {
    trigger: mpsc::UnboundedSender<()>,
    handle: JoinHandle<()>,
}

/// Routes changed paths to the worker of their category.
pub struct Dispatcher {
    matcher: CategoryMatcher,
    workers: HashMap<Category, Worker>,
}

impl Dispatcher {
    /// Spawns one worker per entry of `table`.
    pub fn spawn(
        matcher: CategoryMatcher,
        table: Vec<(Category, Vec<Step>)>,
        runner: SequenceRunner,
        debounce: Duration,
        reporter: Option<mpsc::UnboundedSender<SequenceRun>>,
    ) -> Self {
        let workers = table
            .into_iter()
            .map(|(category, steps)| {
                let (trigger, rx) = mpsc::unbounded_channel();
                let handle = tokio::spawn(worker_loop(
                    category,
                    steps,
                    runner.clone(),
                    debounce,
                    rx,
                    reporter.clone(),
                ));
                (category, Worker { trigger, handle })
            })
            .collect();

        Self { matcher, workers }
    }

    /// Schedules a rebuild for the category owning `path`, if any.
    pub fn dispatch(&self, path: &Path) -> Option<Category> {
        let category = self.matcher.classify(path)?;
        let worker = self.workers.get(&category)?;
        tracing::debug!("[watch-{}] {} changed", category, path.display());
        worker.trigger.send(()).ok()?;
        Some(category)
    }

    pub fn categories(&self) -> Vec<Category> {
        let mut categories: Vec<Category> = self.workers.keys().copied().collect();
        categories.sort();
        categories
    }

    /// Stops every worker, abandoning in-flight rebuilds.
    pub fn shutdown(self) {
        for worker in self.workers.into_values() {
            worker.handle.abort();
        }
    }
}

async fn worker_loop(
    category: Category,
    steps: Vec<Step>,
    runner: SequenceRunner,
    debounce: Duration,
    mut rx: mpsc::UnboundedReceiver<()>,
    reporter: Option<mpsc::UnboundedSender<SequenceRun>>,
) {
    while rx.recv().await.is_some() {
        // Swallow everything that arrives within the window.
        while let Ok(Some(())) = tokio::time::timeout(debounce, rx.recv()).await {}

        tracing::info!("[{}] Change detected, rebuilding", category.watch_task());
        let outcomes = runner.run(&steps).await;

        if let Some(ref reporter) = reporter {
            let _ = reporter.send(SequenceRun { category, outcomes });
        }
    }
}

pub struct WatchOrchestrator {
    runner: SequenceRunner,
    state: watch::Sender<WatchState>,
    reporter: Option<mpsc::UnboundedSender<SequenceRun>>,
}

impl WatchOrchestrator {
    pub fn new(runner: SequenceRunner) -> Self {
        let (state, _) = watch::channel(WatchState::Starting);
        Self {
            runner,
            state,
            reporter: None,
        }
    }

    /// Receives every completed rebuild sequence.
    pub fn with_reporter(mut self, reporter: mpsc::UnboundedSender<SequenceRun>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<WatchState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> WatchState {
        *self.state.borrow()
    }

    fn enter(&self, state: WatchState) {
        tracing::debug!("[watch] {:?}", state);
        self.state.send_replace(state);
    }

    /// Unjar, build, install, then start listening.
    pub async fn start(&self) -> Result<WatchSession> {
        let start = Instant::now();
        let pipeline = self.runner.pipeline().clone();
        let ctx = Arc::clone(pipeline.context());

        self.enter(WatchState::Starting);
        self.runner.run_step(Step::Unjar).await;

        self.enter(WatchState::InitialBuild);
        BuildOrchestrator::new(pipeline).build().await;

        self.enter(WatchState::Installing);
        self.runner.run_step(Step::Install).await;

        tracing::info!("[startup] Finished after {:.2?}", start.elapsed());
        tracing::info!("[build] Listening for changes");

        let live_reload = if ctx.config.live_reload {
            let options = LiveReloadOptions::from_config(&ctx.config, &ctx.exploded_dir());
            match LiveReloadServer::start(&ctx.config.browser_sync, &options) {
                Ok(server) => Some(server),
                Err(e) => {
                    tracing::warn!("{}", e);
                    None
                }
            }
        } else {
            None
        };

        let table = watch_table(ctx.mode);
        if table.is_empty() {
            tracing::warn!("[watch] Nothing to watch for {} projects", ctx.mode);
        }
        let categories: Vec<Category> = table.iter().map(|(category, _)| *category).collect();
        let matcher = CategoryMatcher::new(&ctx.project_dir, &ctx.config.globs, &categories)?;
        let roots = watch_roots(&ctx.project_dir, &ctx.config.globs, &categories);
        let watcher = FileWatcher::new(&roots)?;

        let dispatcher = Dispatcher::spawn(
            matcher,
            table,
            self.runner.clone(),
            Duration::from_millis(ctx.config.debounce_ms),
            self.reporter.clone(),
        );

        self.enter(WatchState::Watching);
        self.runner.notifier().notify(READY_MESSAGE);

        Ok(WatchSession {
            watcher,
            dispatcher,
            live_reload,
        })
    }

    /// Runs the whole session until `shutdown` resolves.
    pub async fn run<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        self.start().await?.run(shutdown).await
    }
}

/// A started watch session, resident until shut down.
pub struct WatchSession {
    watcher: FileWatcher,
    dispatcher: Dispatcher,
    live_reload: Option<LiveReloadServer>,
}

impl WatchSession {
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Forwards file events to the category workers until `shutdown`
    /// resolves or the watcher stops.
    pub async fn run<F>(mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let result = loop {
            tokio::select! {
                _ = &mut shutdown => break Ok(()),
                event = self.watcher.next_event() => match event {
                    Some(Ok(event)) if is_change(&event) => {
                        for path in &event.paths {
                            self.dispatcher.dispatch(path);
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => tracing::warn!("{}", e),
                    None => break Err(Error::Watcher("Watcher channel disconnected".to_string())),
                },
            }
        };

        if let Some(server) = self.live_reload.take() {
            server.stop().await;
        }
        self.dispatcher.shutdown();
        result
    }
}
