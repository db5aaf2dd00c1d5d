//! Single-stage commands
//!
//! Each subcommand resolves and runs one stage through the same path the
//! full pipeline uses.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use tugboat_core::{Addon, Cancellation, StageInput, StageKind};
use tugboat_runner::{StageDeployer, StageOutput};

use crate::config::{Config, OutputFormat};

/// Stage subcommands
#[derive(Subcommand, Debug)]
pub enum StageCommands {
    /// Install the custom resource definitions
    Crds {
        /// Comma-separated CRD bundle locations
        #[arg(long, env = "TUGBOAT_CRD_SOURCES")]
        sources: Option<String>,
    },
    /// Deploy the core chart
    Chart {
        /// Chart reference
        #[arg(long, env = "TUGBOAT_CHART_REF")]
        chart_ref: Option<String>,

        /// Override values as key=value pairs (e.g., version=1.17.1)
        #[arg(long, env = "TUGBOAT_STATE_VALUES")]
        state_values: Option<String>,
    },
    /// Apply the configuration packages
    Configurations {
        /// Comma-separated manifest locations
        #[arg(long, env = "TUGBOAT_CONFIGURATION_SOURCES")]
        sources: Option<String>,

        /// Target namespace
        #[arg(long, env = "TUGBOAT_NAMESPACE")]
        namespace: Option<String>,
    },
    /// Apply the function packages
    Functions {
        /// Comma-separated manifest locations
        #[arg(long, env = "TUGBOAT_FUNCTION_SOURCES")]
        sources: Option<String>,

        /// Target namespace
        #[arg(long, env = "TUGBOAT_NAMESPACE")]
        namespace: Option<String>,
    },
}

impl StageCommands {
    /// The stage this command runs and its caller input
    pub fn into_stage(self) -> (StageKind, StageInput) {
        let input = StageInput::new();
        match self {
            StageCommands::Crds { sources } => (StageKind::Crds, with_sources(input, sources)),
            StageCommands::Chart {
                chart_ref,
                state_values,
            } => {
                let input = with_sources(input, chart_ref);
                let input = match state_values {
                    Some(values) => input.with_overrides(values),
                    None => input,
                };
                (StageKind::CoreChart, input)
            }
            StageCommands::Configurations { sources, namespace } => (
                StageKind::Configurations,
                with_namespace(with_sources(input, sources), namespace),
            ),
            StageCommands::Functions { sources, namespace } => (
                StageKind::Functions,
                with_namespace(with_sources(input, sources), namespace),
            ),
        }
    }
}

fn with_sources(input: StageInput, sources: Option<String>) -> StageInput {
    match sources {
        Some(sources) => input.with_sources(sources),
        None => input,
    }
}

fn with_namespace(input: StageInput, namespace: Option<String>) -> StageInput {
    match namespace {
        Some(namespace) => input.with_namespace(namespace),
        None => input,
    }
}

/// Handle a single-stage command
pub async fn handle_stage_command(
    addon: Addon,
    command: StageCommands,
    config: &Config,
    cancellation: &Cancellation,
) -> Result<()> {
    let (kind, input) = command.into_stage();
    let credential = config.credential()?;

    let deployer = StageDeployer::new(Arc::new(config.backend()?));
    let output = deployer
        .deploy(addon, kind, &input, credential.as_ref(), cancellation)
        .await
        .with_context(|| format!("stage '{}' of {} failed", kind, addon))?;

    match config.output {
        OutputFormat::Json => {
            let report = serde_json::json!({
                "addon": addon,
                "stage": kind,
                "output": output,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => print_output(addon, kind, &output),
    }

    Ok(())
}

fn print_output(addon: Addon, kind: StageKind, output: &StageOutput) {
    match output {
        StageOutput::Applied(summary) => {
            println!(
                "{}",
                format!("✓ Stage '{}' of {} applied", kind, addon)
                    .green()
                    .bold()
            );
            for line in summary.lines() {
                println!("  {}", line.dimmed());
            }
        }
        StageOutput::Deployed => println!(
            "{}",
            format!("✓ Stage '{}' of {} deployed", kind, addon)
                .green()
                .bold()
        ),
        StageOutput::Skipped => println!(
            "{}",
            format!("Stage '{}' of {} is disabled", kind, addon).yellow()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: StageCommands,
    }

    fn parse(flags: &[&str]) -> (StageKind, StageInput) {
        let argv = std::iter::once("tugboat").chain(flags.iter().copied());
        TestCli::try_parse_from(argv).unwrap().command.into_stage()
    }

    #[test]
    fn test_crds_without_flags_uses_defaults() {
        let (kind, input) = parse(&["crds"]);

        assert_eq!(kind, StageKind::Crds);
        assert_eq!(input, StageInput::new());
    }

    #[test]
    fn test_chart_flags() {
        let (kind, input) = parse(&[
            "chart",
            "--chart-ref",
            "charts/crossplane.yaml",
            "--state-values",
            "version=1.17.1,replicas=2",
        ]);

        assert_eq!(kind, StageKind::CoreChart);
        assert_eq!(input.sources.as_deref(), Some("charts/crossplane.yaml"));
        assert_eq!(
            input.overrides.as_deref(),
            Some("version=1.17.1,replicas=2")
        );
    }

    #[test]
    fn test_functions_namespace() {
        let (kind, input) = parse(&["functions", "--namespace", "platform"]);

        assert_eq!(kind, StageKind::Functions);
        assert!(input.sources.is_none());
        assert_eq!(input.namespace.as_deref(), Some("platform"));
    }

    #[test]
    fn test_stage_input_resolves_like_the_pipeline() {
        let (kind, input) = parse(&["configurations", "--sources", "a.yaml,,b.yaml"]);

        let defaults = Addon::Crossplane.require(kind).unwrap();
        assert!(input.resolve(kind, defaults).is_err());
    }

    #[test]
    fn test_namespace_is_not_a_crds_flag() {
        let result = TestCli::try_parse_from(["tugboat", "crds", "--namespace", "x"]);
        assert!(result.is_err());
    }
}
