//! Table formatting utilities using comfy-table.

use comfy_table::{Cell, Table};
use osgi_watch_core::{TaskOutcome, TaskStatus};
use owo_colors::OwoColorize;

use super::output::format_duration;
use super::status::Status;

/// Prints one row per task with its status, duration and copy count.
pub fn print_outcome_table(outcomes: &[TaskOutcome]) {
    let mut table = Table::new();
    table
        .set_header(vec![
            Cell::new("Status").add_attribute(comfy_table::Attribute::Bold),
            Cell::new("Task").add_attribute(comfy_table::Attribute::Bold),
            Cell::new("Duration").add_attribute(comfy_table::Attribute::Bold),
            Cell::new("Details").add_attribute(comfy_table::Attribute::Bold),
        ])
        .load_preset(comfy_table::presets::UTF8_FULL)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS)
        .set_content_arrangement(comfy_table::ContentArrangement::Dynamic);

    for outcome in outcomes {
        let duration = format_duration(outcome.elapsed.as_secs_f64());
        match &outcome.status {
            TaskStatus::Succeeded => table.add_row(vec![
                Cell::new(Status::Success.symbol()).fg(comfy_table::Color::Green),
                Cell::new(&outcome.task).fg(comfy_table::Color::White),
                Cell::new(duration).fg(comfy_table::Color::DarkGrey),
                Cell::new(format!("{} file(s) copied", outcome.copied)),
            ]),
            TaskStatus::Failed { detail } => table.add_row(vec![
                Cell::new(Status::Error.symbol()).fg(comfy_table::Color::Red),
                Cell::new(&outcome.task).fg(comfy_table::Color::Red),
                Cell::new(duration).fg(comfy_table::Color::DarkGrey),
                Cell::new(detail).fg(comfy_table::Color::Red),
            ]),
        };
    }

    println!("{}", table);
}

/// Prints a simple list of projects (one per line).
pub fn print_project_list(projects: &[String]) {
    if projects.is_empty() {
        println!("  {} {}", "→".cyan(), "(none)".bright_black());
        return;
    }

    for project in projects {
        println!("  {} {}", "→".cyan(), project.bold().white());
    }
}
