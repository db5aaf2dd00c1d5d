//! Tugboat CLI
//!
//! Command-line interface for staged add-on deployment.

mod commands;
mod config;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::{Config, OutputFormat};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tugboat_core::Cancellation;

#[derive(Parser)]
#[command(name = "tugboat")]
#[command(about = "Staged add-on deployment for Kubernetes", long_about = None)]
struct Cli {
    /// Kubeconfig used for every cluster call (default: ambient KUBECONFIG)
    #[arg(long, global = true, env = "TUGBOAT_KUBECONFIG")]
    kubeconfig: Option<PathBuf>,

    /// Deadline for the whole command in seconds
    #[arg(long, global = true, env = "TUGBOAT_TIMEOUT")]
    timeout: Option<u64>,

    /// Output format
    #[arg(
        long,
        global = true,
        value_enum,
        env = "TUGBOAT_OUTPUT",
        default_value_t = OutputFormat::Text
    )]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            kubeconfig: self.kubeconfig.clone(),
            timeout: self.timeout.map(Duration::from_secs),
            output: self.output,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so JSON output on stdout stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tugboat=info,tugboat_runner=info,tugboat_backend=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.config();

    let (handle, mut cancellation) = Cancellation::new();
    if let Some(timeout) = config.timeout {
        cancellation = cancellation.with_deadline(timeout);
    }

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling");
            handle.cancel();
        }
    });

    handle_command(cli.command, &config, &cancellation).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::StageCommands;

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from([
            "tugboat",
            "deploy",
            "--kubeconfig",
            "/tmp/kind.yaml",
            "--timeout",
            "900",
            "--output",
            "json",
        ])
        .unwrap();

        let config = cli.config();
        assert_eq!(config.kubeconfig, Some(PathBuf::from("/tmp/kind.yaml")));
        assert_eq!(config.timeout, Some(Duration::from_secs(900)));
        assert_eq!(config.output, OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Deploy(_)));
    }

    #[test]
    fn test_defaults_without_flags() {
        let cli = Cli::try_parse_from(["tugboat", "check"]).unwrap();

        let config = cli.config();
        assert!(config.kubeconfig.is_none());
        assert!(config.timeout.is_none());
        assert_eq!(config.output, OutputFormat::Text);
    }

    #[test]
    fn test_stage_subcommand() {
        let cli = Cli::try_parse_from([
            "tugboat",
            "stage",
            "--addon",
            "cilium",
            "chart",
            "--state-values",
            "version=1.16.0",
        ])
        .unwrap();

        match cli.command {
            Commands::Stage { addon, command } => {
                assert_eq!(addon, tugboat_core::Addon::Cilium);
                assert!(matches!(command, StageCommands::Chart { .. }));
            }
            _ => panic!("expected stage command"),
        }
    }

    #[test]
    fn test_unknown_output_format_is_rejected() {
        let result = Cli::try_parse_from(["tugboat", "check", "--output", "yaml"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(Cli::try_parse_from(["tugboat"]).is_err());
    }
}
