//! CLI domain: parse, route, help, output, and presentation only.
//! No replication logic; a single route table dispatches to domain services.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::{command_name, needs_drive};
pub use output::{map_error, EXIT_FAILURE, EXIT_INCOMPLETE};
pub use parse::{Cli, Commands};
pub use presentation::{
    format_drives_json, format_drives_text, format_inspect_json, format_inspect_text,
    format_report_json, format_report_text, format_section_heading, format_validated_json,
    format_validated_text,
};
pub use route::{CommandOutput, ReplicateOptions, RunContext};
