//! CLI parse: clap types for treeclone. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// treeclone - replicate a drive folder hierarchy without its files
#[derive(Parser, Debug)]
#[command(name = "treeclone")]
#[command(about = "Recreate a cloud-drive folder hierarchy under another folder")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory searched for treeclone.toml
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (replaces the global and workspace files)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Suppress progress lines and logs
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Copy the folder hierarchy under SOURCE into DESTINATION
    Replicate {
        /// Source folder id
        source: String,
        /// Destination folder id
        destination: String,
        /// Request shared-drive visibility
        #[arg(long)]
        shared_drive: bool,
        /// Shared drive holding the source folder
        #[arg(long)]
        source_drive_id: Option<String>,
        /// Shared drive holding the destination folder
        #[arg(long)]
        destination_drive_id: Option<String>,
        /// Read the source but only simulate folder creation
        #[arg(long)]
        dry_run: bool,
        /// Resume from an id map written by --id-map-out
        #[arg(long)]
        resume: Option<PathBuf>,
        /// Write the final path to folder id map as JSON
        #[arg(long)]
        id_map_out: Option<PathBuf>,
        /// Print the source tree before writing
        #[arg(long)]
        show_tree: bool,
        /// Report per-path parent resolution
        #[arg(long)]
        debug: bool,
        /// Exit with status 2 if any folder failed
        #[arg(long)]
        strict: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
    /// Read and print a folder tree without writing anything
    Inspect {
        /// Folder id
        folder: String,
        /// Request shared-drive visibility
        #[arg(long)]
        shared_drive: bool,
        /// Shared drive holding the folder
        #[arg(long)]
        drive_id: Option<String>,
        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
    /// Check that a folder id is an accessible, non-trashed folder
    Validate {
        /// Folder id
        folder: String,
        /// Request shared-drive visibility
        #[arg(long)]
        shared_drive: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
    /// List shared drives visible to the credentials
    Drives {
        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
    /// Prompt for source and destination, then replicate
    Interactive,
    /// Print the effective configuration as TOML (secrets masked)
    Config,
}
