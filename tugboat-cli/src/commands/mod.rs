//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod check;
mod defaults;
mod deploy;
mod stage;

pub use deploy::DeployArgs;
pub use stage::StageCommands;

use anyhow::Result;
use clap::Subcommand;
use tugboat_core::{Addon, Cancellation};

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run every enabled stage of an add-on in order
    Deploy(DeployArgs),
    /// Run a single stage of an add-on
    Stage {
        /// Add-on the stage belongs to
        #[arg(long, env = "TUGBOAT_ADDON", default_value = "crossplane")]
        addon: Addon,

        #[command(subcommand)]
        command: StageCommands,
    },
    /// Show the stages and defaults of the supported add-ons
    Defaults {
        /// Only show this add-on
        addon: Option<Addon>,
    },
    /// Verify that the deployment tools can be started
    Check,
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
/// * `cancellation` - Fires on Ctrl-C or when the command deadline passes
pub async fn handle_command(
    command: Commands,
    config: &Config,
    cancellation: &Cancellation,
) -> Result<()> {
    match command {
        Commands::Deploy(args) => deploy::handle_deploy(args, config, cancellation).await,
        Commands::Stage { addon, command } => {
            stage::handle_stage_command(addon, command, config, cancellation).await
        }
        Commands::Defaults { addon } => defaults::show_defaults(addon, config),
        Commands::Check => check::check_tools(config).await,
    }
}
