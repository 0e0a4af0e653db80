//! Watch mode command.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use osgi_watch_core::{
    Context, DesktopNotifier, SequenceRunner, TaskPipeline, WatchOrchestrator,
};
use tokio::signal;

use crate::formatting::{print_key_value, print_section_header, print_warning, SectionStyle};

use super::create_context;

/// Command-line settings that take precedence over the config file.
pub struct WatchOverrides {
    pub no_notifications: bool,
    pub live_reload: bool,
    pub debounce_ms: Option<u64>,
}

fn apply_overrides(ctx: Context, overrides: &WatchOverrides) -> Context {
    let mut config = ctx.config.clone();
    if overrides.no_notifications {
        config = config.with_notifications(false);
    }
    if overrides.live_reload {
        config = config.with_live_reload(true);
    }
    if let Some(debounce_ms) = overrides.debounce_ms {
        config = config.with_debounce_ms(debounce_ms);
    }
    Context::new(ctx.project_dir, ctx.mode, config, ctx.runner)
}

pub async fn cmd_watch(
    project_dir: &Path,
    config: Option<&Path>,
    overrides: WatchOverrides,
) -> Result<()> {
    let ctx = Arc::new(apply_overrides(create_context(project_dir, config)?, &overrides));

    print_section_header("Watch Mode", SectionStyle::Primary);
    print_key_value("Project", &ctx.project_dir.display().to_string());
    print_key_value("Type", ctx.mode.as_str());
    print_key_value("Exploded", &ctx.exploded_dir().display().to_string());
    if ctx.config.live_reload {
        print_key_value(
            "Proxy",
            &format!("{} -> :{}", ctx.config.proxy_target, ctx.config.proxy_port),
        );
    }
    println!("  Press Ctrl+C to stop");
    println!();

    let notifier = Arc::new(DesktopNotifier::new(
        ctx.config.notifications,
        ctx.config.icon.clone(),
    ));
    let runner = SequenceRunner::new(TaskPipeline::new(Arc::clone(&ctx)), notifier);
    let orchestrator = WatchOrchestrator::new(runner);

    orchestrator.run(shutdown_signal()).await?;

    println!();
    print_warning("Stopping watch mode...");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
