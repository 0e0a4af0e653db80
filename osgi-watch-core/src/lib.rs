//! Core library for building and watching Liferay OSGi modules and legacy
//! WAR plugins.

pub mod build;
pub mod category;
pub mod config;
pub mod context;
pub mod copy;
pub mod deps;
pub mod error;
pub mod live_reload;
pub mod mode;
pub mod notifier;
pub mod sequence;
pub mod task;
pub mod tool;
pub mod watch;
pub mod watcher;

pub use build::{BuildOrchestrator, BuildReport};
pub use category::Category;
pub use config::{Config, ConfigFile, GlobConfig};
pub use context::Context;
pub use deps::{DependencyCache, DependencyResolver};
pub use error::{Error, Result};
pub use live_reload::{LiveReloadOptions, LiveReloadServer};
pub use mode::ProjectMode;
pub use notifier::{DesktopNotifier, Notifier};
pub use sequence::{rebuild_sequence, watch_table, SequenceRunner, Step};
pub use task::{build_gradle_args, TaskOutcome, TaskPipeline, TaskStatus, SKIPPED_TASKS};
pub use tool::{BuildTools, Invocation, ProcessRunner, ToolRunner};
pub use watch::{Dispatcher, SequenceRun, WatchOrchestrator, WatchSession, WatchState};
pub use watcher::{CategoryMatcher, FileWatcher};
