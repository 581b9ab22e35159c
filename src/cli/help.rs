//! CLI help and command-name contract for logging.

use crate::cli::parse::Commands;

/// Command name string for log fields (e.g. "replicate", "drives").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Replicate { .. } => "replicate",
        Commands::Inspect { .. } => "inspect",
        Commands::Validate { .. } => "validate",
        Commands::Drives { .. } => "drives",
        Commands::Interactive => "interactive",
        Commands::Config => "config",
    }
}

/// Whether the command talks to the drive and so needs credentials.
pub fn needs_drive(command: &Commands) -> bool {
    !matches!(command, Commands::Config)
}
