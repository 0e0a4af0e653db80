mod commands;
mod formatting;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;

#[derive(Parser)]
#[command(name = "osgi-watch")]
#[command(about = "Build and watch Liferay OSGi modules and legacy WAR plugins")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project directory containing build.gradle or build.xml
    #[arg(long, default_value = ".")]
    project_dir: PathBuf,

    /// Configuration file (defaults to osgi-watch.toml in the project)
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[arg(short, long, action)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build every artifact of the project once
    Build {
        #[arg(long, action)]
        json: bool,
    },
    /// Build, install, then rebuild on every change
    Watch {
        #[arg(long, action)]
        no_notifications: bool,
        #[arg(long, action)]
        live_reload: bool,
        #[arg(long)]
        debounce_ms: Option<u64>,
    },
    /// List the sibling projects the module compiles against
    Deps {
        #[arg(long, action)]
        json: bool,
    },
    /// Show the detected project type and resolved configuration
    Config {
        #[arg(long, action)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Build { json } => commands::cmd_build(&cli.project_dir, config, json).await?,
        Commands::Watch {
            no_notifications,
            live_reload,
            debounce_ms,
        } => {
            let overrides = commands::WatchOverrides {
                no_notifications,
                live_reload,
                debounce_ms,
            };
            commands::cmd_watch(&cli.project_dir, config, overrides).await?
        }
        Commands::Deps { json } => commands::cmd_deps(&cli.project_dir, config, json).await?,
        Commands::Config { json } => commands::cmd_config(&cli.project_dir, config, json)?,
    }

    Ok(())
}
