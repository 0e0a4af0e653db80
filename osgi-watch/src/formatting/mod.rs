//! CLI formatting utilities.
//!
//! Colors and layout shared by every command, so build and watch output
//! look the same.

mod headers;
mod output;
mod status;
mod tables;

pub use headers::{print_section_header, SectionStyle};
pub use output::{format_duration, print_key_value, print_summary_box};
pub use status::{print_success, print_warning};
pub use tables::{print_outcome_table, print_project_list};
