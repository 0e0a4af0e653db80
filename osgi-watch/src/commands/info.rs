//! Informational commands.

use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use osgi_watch_core::ProjectMode;

use crate::formatting::{print_key_value, print_project_list, print_section_header, SectionStyle};

use super::create_context;

pub async fn cmd_deps(project_dir: &Path, config: Option<&Path>, json: bool) -> Result<()> {
    let ctx = create_context(project_dir, config)?;
    let projects = ctx.deps.resolve().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&projects[..])?);
        return Ok(());
    }

    print_section_header("Project Dependencies", SectionStyle::Primary);
    if ctx.mode != ProjectMode::OsgiGradle {
        println!(
            "  {} Only Gradle projects have project dependencies ({} project)",
            "→".cyan(),
            ctx.mode
        );
    } else {
        print_project_list(&projects);
    }
    println!();

    Ok(())
}

pub fn cmd_config(project_dir: &Path, config: Option<&Path>, json: bool) -> Result<()> {
    let ctx = create_context(project_dir, config)?;

    if json {
        let data = serde_json::json!({
            "projectDir": ctx.project_dir,
            "mode": ctx.mode.as_str(),
            "gradle": ctx.tools.gradle,
            "ant": ctx.tools.ant,
            "config": ctx.config,
        });
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    print_section_header("Configuration", SectionStyle::Primary);
    print_key_value("Project", &ctx.project_dir.display().to_string());
    print_key_value("Type", ctx.mode.as_str());
    print_key_value("Gradle", &ctx.tools.gradle);
    print_key_value("Ant", &ctx.tools.ant);
    println!();

    let globs = &ctx.config.globs;
    for (key, value) in [
        ("globJava", &globs.glob_java),
        ("globJs", &globs.glob_js),
        ("globEs6", &globs.glob_es6),
        ("globJsp", &globs.glob_jsp),
        ("globSass", &globs.glob_sass),
        ("globSoy", &globs.glob_soy),
        ("globClass", &globs.glob_class),
        ("globTranspiledJs", &globs.glob_transpiled_js),
        ("globCss", &globs.glob_css),
        ("globSoyJs", &globs.glob_soy_js),
    ] {
        print_key_value(key, value);
    }
    print_key_value(
        "pathExploded",
        &ctx.config.path_exploded.display().to_string(),
    );
    print_key_value("notifications", &ctx.config.notifications.to_string());
    print_key_value("liveReload", &ctx.config.live_reload.to_string());
    print_key_value("debounceMs", &ctx.config.debounce_ms.to_string());
    println!();

    Ok(())
}
