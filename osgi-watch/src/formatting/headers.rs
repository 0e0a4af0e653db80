//! Section headers.

use owo_colors::OwoColorize;

/// Style options for section headers.
#[derive(Debug, Clone, Copy)]
#[allow(dead_code)]
pub enum SectionStyle {
    Primary,
    Secondary,
    Success,
    Warning,
    Error,
}

impl SectionStyle {
    fn colorize(&self, text: &str) -> String {
        match self {
            SectionStyle::Primary => text.cyan().bold().to_string(),
            SectionStyle::Secondary => text.bright_black().bold().to_string(),
            SectionStyle::Success => text.green().bold().to_string(),
            SectionStyle::Warning => text.yellow().bold().to_string(),
            SectionStyle::Error => text.red().bold().to_string(),
        }
    }
}

pub fn print_section_header(title: &str, style: SectionStyle) {
    println!("{}", style.colorize(title));
    println!();
}
