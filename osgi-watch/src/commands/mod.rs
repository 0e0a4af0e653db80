//! Command implementations for the CLI.

mod build;
mod info;
mod watch;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use osgi_watch_core::{Context, ProcessRunner};

pub use build::cmd_build;
pub use info::{cmd_config, cmd_deps};
pub use watch::{cmd_watch, WatchOverrides};

fn create_context(project_dir: &Path, config: Option<&Path>) -> Result<Context> {
    let project_dir = project_dir
        .canonicalize()
        .with_context(|| format!("Project directory not found: {}", project_dir.display()))?;
    let ctx = Context::detect(project_dir, config, Arc::new(ProcessRunner))?;
    Ok(ctx)
}
