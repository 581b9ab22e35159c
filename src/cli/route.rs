//! CLI route: single route table and run context. Dispatches to domain services and presentation.

use crate::auth::authenticate;
use crate::cli::help::{command_name, needs_drive};
use crate::cli::output::EXIT_INCOMPLETE;
use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_drives_json, format_drives_text, format_inspect_json, format_inspect_text,
    format_report_json, format_report_text, format_validated_json, format_validated_text,
};
use crate::config::{ConfigLoader, TreecloneConfig};
use crate::drive::{DriveClient, DriveScope, DryRunDrive, GoogleDriveClient};
use crate::error::ReplicaError;
use crate::progress::{ConsoleSink, FanoutSink, TracingSink};
use crate::replicate::{inspect, replicate, validate_folder, ReplicationReport, ReplicationRequest};
use crate::tree::FolderIdMap;
use crate::types::FolderId;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;
use tracing::{info, warn};

/// Text to print plus the exit status the process should end with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub text: String,
    pub exit_code: i32,
}

impl CommandOutput {
    fn ok(text: String) -> Self {
        Self { text, exit_code: 0 }
    }
}

/// Options for one `replicate` invocation, shared with the interactive form
#[derive(Debug, Clone, Default)]
pub struct ReplicateOptions {
    pub source: String,
    pub destination: String,
    pub shared_drive: bool,
    pub source_drive_id: Option<String>,
    pub destination_drive_id: Option<String>,
    pub dry_run: bool,
    pub resume: Option<PathBuf>,
    pub id_map_out: Option<PathBuf>,
    pub show_tree: bool,
    pub debug: bool,
    pub strict: bool,
    pub json: bool,
}

/// Runtime context for CLI execution: loaded config and the async runtime
/// commands block on.
pub struct RunContext {
    config: TreecloneConfig,
    runtime: Runtime,
    quiet: bool,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(
        workspace_root: PathBuf,
        config_path: Option<PathBuf>,
        quiet: bool,
    ) -> Result<Self, ReplicaError> {
        let config = ConfigLoader::resolve(&workspace_root, config_path.as_deref())?;
        Self::from_config(config, quiet)
    }

    pub fn from_config(config: TreecloneConfig, quiet: bool) -> Result<Self, ReplicaError> {
        config.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ReplicaError::Config(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            config,
            runtime,
            quiet,
        })
    }

    pub fn config(&self) -> &TreecloneConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table, authenticating first
    /// when the command talks to the drive.
    pub fn execute(&self, command: &Commands) -> Result<CommandOutput, ReplicaError> {
        info!(command = command_name(command), "Executing command");
        if !needs_drive(command) {
            return self.execute_offline(command);
        }
        let token = self
            .runtime
            .block_on(authenticate(&self.config.credentials, &self.config.drive))?;
        let client = GoogleDriveClient::new(token, &self.config.drive)?;
        self.execute_with(command, &client)
    }

    /// Execute against an already constructed drive client.
    pub fn execute_with(
        &self,
        command: &Commands,
        client: &dyn DriveClient,
    ) -> Result<CommandOutput, ReplicaError> {
        match command {
            Commands::Replicate {
                source,
                destination,
                shared_drive,
                source_drive_id,
                destination_drive_id,
                dry_run,
                resume,
                id_map_out,
                show_tree,
                debug,
                strict,
                format,
            } => self.handle_replicate(
                client,
                ReplicateOptions {
                    source: source.clone(),
                    destination: destination.clone(),
                    shared_drive: *shared_drive,
                    source_drive_id: source_drive_id.clone(),
                    destination_drive_id: destination_drive_id.clone(),
                    dry_run: *dry_run,
                    resume: resume.clone(),
                    id_map_out: id_map_out.clone(),
                    show_tree: *show_tree,
                    debug: *debug,
                    strict: *strict,
                    json: format == "json",
                },
            ),
            Commands::Inspect {
                folder,
                shared_drive,
                drive_id,
                format,
            } => self.handle_inspect(client, folder, *shared_drive, drive_id.as_deref(), format),
            Commands::Validate {
                folder,
                shared_drive,
                format,
            } => self.handle_validate(client, folder, *shared_drive, format),
            Commands::Drives { format } => self.handle_drives(client, format),
            Commands::Interactive => self.handle_interactive(client),
            Commands::Config => self.execute_offline(command),
        }
    }

    fn execute_offline(&self, command: &Commands) -> Result<CommandOutput, ReplicaError> {
        match command {
            Commands::Config => self
                .config
                .to_redacted_toml()
                .map(CommandOutput::ok)
                .map_err(|e| ReplicaError::Config(format!("Failed to render config: {}", e))),
            other => Err(ReplicaError::Config(format!(
                "'{}' needs a drive connection",
                command_name(other)
            ))),
        }
    }

    fn console(&self, show_debug: bool) -> Option<ConsoleSink> {
        if self.quiet {
            None
        } else {
            Some(ConsoleSink::new(show_debug, std::io::stderr().is_terminal()))
        }
    }

    fn shared_drive(&self, flag: bool) -> bool {
        flag || self.config.drive.shared_drive
    }

    pub fn handle_replicate(
        &self,
        client: &dyn DriveClient,
        options: ReplicateOptions,
    ) -> Result<CommandOutput, ReplicaError> {
        let prior = options
            .resume
            .as_deref()
            .map(FolderIdMap::load)
            .transpose()?;
        if let Some(prior) = &prior {
            info!(paths = prior.len(), "Resuming from earlier id map");
        }

        let request = ReplicationRequest {
            source: FolderId::new(options.source.trim()),
            destination: FolderId::new(options.destination.trim()),
            shared_drive: self.shared_drive(options.shared_drive),
            source_drive_id: options
                .source_drive_id
                .clone()
                .or_else(|| self.config.drive.source_drive_id.clone()),
            destination_drive_id: options
                .destination_drive_id
                .clone()
                .or_else(|| self.config.drive.destination_drive_id.clone()),
            prior,
            debug: options.debug,
        };

        let console = self.console(options.debug);
        let mut progress = FanoutSink::new().with(&TracingSink);
        if let Some(console) = &console {
            progress = progress.with(console);
        }

        let report = if options.dry_run {
            let dry = DryRunDrive::new(client);
            self.runtime.block_on(replicate(&dry, &progress, request))?
        } else {
            self.runtime.block_on(replicate(client, &progress, request))?
        };

        if let Some(path) = &options.id_map_out {
            write_id_map(&report, path, options.dry_run)?;
        }

        let mut text = String::new();
        if options.json {
            text.push_str(&format_report_json(&report)?);
        } else {
            if options.show_tree {
                text.push_str(&report.structure.render_tree());
                text.push('\n');
            }
            text.push_str(&format_report_text(&report, options.dry_run));
        }

        let exit_code = if options.strict && !report.is_complete() {
            warn!(failures = report.failure_count(), "Replication incomplete");
            EXIT_INCOMPLETE
        } else {
            0
        };
        Ok(CommandOutput { text, exit_code })
    }

    fn handle_inspect(
        &self,
        client: &dyn DriveClient,
        folder: &str,
        shared_drive: bool,
        drive_id: Option<&str>,
        format: &str,
    ) -> Result<CommandOutput, ReplicaError> {
        let console = self.console(false);
        let mut progress = FanoutSink::new().with(&TracingSink);
        if let Some(console) = &console {
            progress = progress.with(console);
        }
        let (validated, outcome) = self.runtime.block_on(inspect(
            client,
            &progress,
            &FolderId::new(folder.trim()),
            self.shared_drive(shared_drive),
            drive_id,
        ))?;
        let text = if format == "json" {
            format_inspect_json(&validated, &outcome)?
        } else {
            format_inspect_text(&validated, &outcome)
        };
        Ok(CommandOutput::ok(text))
    }

    fn handle_validate(
        &self,
        client: &dyn DriveClient,
        folder: &str,
        shared_drive: bool,
        format: &str,
    ) -> Result<CommandOutput, ReplicaError> {
        let scope = if self.shared_drive(shared_drive) {
            DriveScope::shared(None)
        } else {
            DriveScope::my_drive()
        };
        let validated = self.runtime.block_on(validate_folder(
            client,
            &scope,
            &FolderId::new(folder.trim()),
        ))?;
        let text = if format == "json" {
            format_validated_json(&validated)?
        } else {
            format_validated_text(&validated)
        };
        Ok(CommandOutput::ok(text))
    }

    fn handle_drives(
        &self,
        client: &dyn DriveClient,
        format: &str,
    ) -> Result<CommandOutput, ReplicaError> {
        let drives = self.runtime.block_on(client.list_shared_drives())?;
        let text = if format == "json" {
            format_drives_json(&drives)?
        } else {
            format_drives_text(&drives)
        };
        Ok(CommandOutput::ok(text))
    }

    fn handle_interactive(&self, client: &dyn DriveClient) -> Result<CommandOutput, ReplicaError> {
        use dialoguer::{Confirm, Input};

        let source: String = Input::new()
            .with_prompt("Source folder ID")
            .interact_text()
            .map_err(prompt_error)?;
        let destination: String = Input::new()
            .with_prompt("Destination folder ID")
            .interact_text()
            .map_err(prompt_error)?;
        let shared_drive = Confirm::new()
            .with_prompt("Are the folders in a shared drive?")
            .default(self.config.drive.shared_drive)
            .interact()
            .map_err(prompt_error)?;

        let (source_drive_id, destination_drive_id) = if shared_drive {
            let source_drive: String = Input::new()
                .with_prompt("Source drive ID (optional, press Enter to detect)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_error)?;
            let destination_drive: String = Input::new()
                .with_prompt("Destination drive ID (optional, press Enter to detect)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_error)?;
            (non_empty(source_drive), non_empty(destination_drive))
        } else {
            (None, None)
        };

        let scope = if shared_drive {
            DriveScope::shared(None)
        } else {
            DriveScope::my_drive()
        };
        let source_folder = self.runtime.block_on(validate_folder(
            client,
            &scope,
            &FolderId::new(source.trim()),
        ))?;
        let destination_folder = self.runtime.block_on(validate_folder(
            client,
            &scope,
            &FolderId::new(destination.trim()),
        ))?;

        let proceed = Confirm::new()
            .with_prompt(format!(
                "Replicate folders of '{}' into '{}'?",
                source_folder.name, destination_folder.name
            ))
            .default(true)
            .interact()
            .map_err(prompt_error)?;
        if !proceed {
            return Ok(CommandOutput::ok("Cancelled.".to_string()));
        }

        self.handle_replicate(
            client,
            ReplicateOptions {
                source,
                destination,
                shared_drive,
                source_drive_id,
                destination_drive_id,
                ..ReplicateOptions::default()
            },
        )
    }
}

fn write_id_map(report: &ReplicationReport, path: &Path, dry_run: bool) -> Result<(), ReplicaError> {
    if dry_run {
        warn!(path = %path.display(), "Dry run ids are synthetic; id map not written");
        return Ok(());
    }
    report.id_map.save(path)?;
    info!(path = %path.display(), entries = report.id_map.len(), "Wrote id map");
    Ok(())
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn prompt_error(e: dialoguer::Error) -> ReplicaError {
    ReplicaError::Config(format!("Failed to get user input: {}", e))
}
