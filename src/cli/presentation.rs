//! CLI presentation: text and json formatters per command family.

mod folder;
mod report;
mod shared;

pub use folder::{
    format_drives_json, format_drives_text, format_inspect_json, format_inspect_text,
    format_validated_json, format_validated_text,
};
pub use report::{format_report_json, format_report_text};
pub use shared::format_section_heading;
