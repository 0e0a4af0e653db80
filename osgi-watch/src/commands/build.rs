//! One-shot build command.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use osgi_watch_core::{BuildOrchestrator, ProjectMode, TaskPipeline, TaskStatus};

use crate::formatting::{
    format_duration, print_key_value, print_outcome_table, print_section_header, print_success,
    print_summary_box, print_warning, SectionStyle,
};

use super::create_context;

pub async fn cmd_build(project_dir: &Path, config: Option<&Path>, json: bool) -> Result<()> {
    let ctx = Arc::new(create_context(project_dir, config)?);

    if !json {
        print_section_header("Build", SectionStyle::Primary);
        print_key_value("Project", &ctx.project_dir.display().to_string());
        print_key_value("Type", ctx.mode.as_str());
        println!();
    }

    let orchestrator = BuildOrchestrator::new(TaskPipeline::new(Arc::clone(&ctx)));
    let report = orchestrator.build().await;

    if json {
        let outcomes: Vec<_> = report
            .outcomes
            .iter()
            .map(|outcome| {
                let (status, detail) = match &outcome.status {
                    TaskStatus::Succeeded => ("succeeded", None),
                    TaskStatus::Failed { detail } => ("failed", Some(detail.as_str())),
                };
                serde_json::json!({
                    "task": outcome.task,
                    "status": status,
                    "detail": detail,
                    "elapsedMs": outcome.elapsed.as_millis() as u64,
                    "copied": outcome.copied,
                })
            })
            .collect();
        let data = serde_json::json!({
            "mode": report.mode.as_str(),
            "elapsedMs": report.elapsed.as_millis() as u64,
            "tasks": outcomes,
        });
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    if report.mode == ProjectMode::None {
        print_warning("No build.gradle or build.xml found, nothing was built");
        println!();
        return Ok(());
    }

    print_outcome_table(&report.outcomes);
    println!();
    print_summary_box(
        "Build Summary",
        &[
            ("Succeeded", &report.succeeded().to_string()),
            ("Failed", &report.failed().to_string()),
            ("Duration", &format_duration(report.elapsed.as_secs_f64())),
        ],
    );
    println!();

    if report.is_success() {
        print_success("Build complete");
    } else {
        print_warning("Build finished with errors, see the log above");
    }

    Ok(())
}
