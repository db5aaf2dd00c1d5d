//! Full pipeline command
//!
//! Maps the deploy flags onto a [`PipelineInput`], runs every enabled stage
//! in the add-on's order and prints the final run.

use std::sync::Arc;

use anyhow::Result;
use clap::{ArgAction, Args};
use colored::*;
use tugboat_core::{
    Addon, Cancellation, Credential, PipelineInput, PipelineRun, RunStatus, StageInput, StageKind,
};
use tugboat_runner::{RunOutcome, StandardPipelineService};

use crate::config::{Config, OutputFormat};

/// Flags of the `deploy` command
#[derive(Args, Debug)]
pub struct DeployArgs {
    /// Add-on to deploy
    #[arg(long, env = "TUGBOAT_ADDON", default_value = "crossplane")]
    pub addon: Addon,

    /// Install the custom resource definitions
    #[arg(
        long,
        env = "TUGBOAT_DEPLOY_CRDS",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub deploy_crds: bool,

    /// Deploy the core chart
    #[arg(
        long,
        env = "TUGBOAT_DEPLOY_CORE",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub deploy_core: bool,

    /// Apply the configuration packages
    #[arg(
        long,
        env = "TUGBOAT_DEPLOY_CONFIGURATIONS",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub deploy_configurations: bool,

    /// Apply the function packages
    #[arg(
        long,
        env = "TUGBOAT_DEPLOY_FUNCTIONS",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub deploy_functions: bool,

    /// Comma-separated CRD bundle locations
    #[arg(long, env = "TUGBOAT_CRD_SOURCES")]
    pub crd_sources: Option<String>,

    /// Chart reference for the core chart
    #[arg(long, env = "TUGBOAT_CHART_REF")]
    pub chart_ref: Option<String>,

    /// Comma-separated configuration package manifests
    #[arg(long, env = "TUGBOAT_CONFIGURATION_SOURCES")]
    pub configuration_sources: Option<String>,

    /// Comma-separated function package manifests
    #[arg(long, env = "TUGBOAT_FUNCTION_SOURCES")]
    pub function_sources: Option<String>,

    /// Namespace for configuration and function packages
    #[arg(long, env = "TUGBOAT_NAMESPACE")]
    pub namespace: Option<String>,

    /// Chart override values as key=value pairs (e.g., version=1.17.1,replicas=2)
    #[arg(long, env = "TUGBOAT_STATE_VALUES")]
    pub state_values: Option<String>,
}

impl DeployArgs {
    fn stage_input(&self, kind: StageKind) -> StageInput {
        let (enabled, sources) = match kind {
            StageKind::Crds => (self.deploy_crds, &self.crd_sources),
            StageKind::CoreChart => (self.deploy_core, &self.chart_ref),
            StageKind::Configurations => (self.deploy_configurations, &self.configuration_sources),
            StageKind::Functions => (self.deploy_functions, &self.function_sources),
        };
        let overrides = self.state_values.clone();

        StageInput {
            enabled: Some(enabled),
            sources: sources.clone(),
            namespace: self.namespace.clone().filter(|_| kind.is_namespaced()),
            overrides: overrides.filter(|_| kind.accepts_overrides()),
        }
    }

    /// Builds the pipeline input for the selected add-on
    ///
    /// Stages the add-on does not define are left out unless sources were
    /// given for them, so planning reports the mismatch.
    pub fn into_input(self, credential: Option<Credential>) -> PipelineInput {
        let definition = self.addon.definition();
        let mut input = PipelineInput::new(self.addon);

        for kind in StageKind::ALL {
            let stage = self.stage_input(kind);
            if definition.has_stage(kind) || stage.sources.is_some() {
                input = input.with_stage(kind, stage);
            }
        }

        match credential {
            Some(credential) => input.with_credential(credential),
            None => input,
        }
    }
}

/// Handle the deploy command
pub async fn handle_deploy(
    args: DeployArgs,
    config: &Config,
    cancellation: &Cancellation,
) -> Result<()> {
    let input = args.into_input(config.credential()?);
    let run = PipelineRun::plan(input)?;

    let service = StandardPipelineService::new(Arc::new(config.backend()?));
    let RunOutcome { run, result } = service.execute(run, cancellation).await;

    match config.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&run)?),
        OutputFormat::Text => print_run(&run),
    }

    result?;
    Ok(())
}

fn print_run(run: &PipelineRun) {
    match run.status() {
        RunStatus::Succeeded => println!(
            "{}",
            format!("✓ {} deployed successfully!", run.addon)
                .green()
                .bold()
        ),
        RunStatus::Failed { stage, .. } => println!(
            "{}",
            format!("✗ {} deployment failed at stage '{}'", run.addon, stage)
                .red()
                .bold()
        ),
        other => println!("{}", format!("Run ended as {:?}", other).yellow()),
    }
    println!("  Run ID:  {}", run.id.to_string().cyan());

    let failed_stage = match run.status() {
        RunStatus::Failed { stage, .. } => Some(*stage),
        _ => None,
    };

    for (kind, config) in run.stages() {
        let state = if !config.enabled {
            "skipped".dimmed()
        } else {
            match failed_stage {
                Some(failed) if *kind == failed => "failed".red(),
                Some(failed) if *kind > failed => "not run".yellow(),
                _ => "done".green(),
            }
        };
        println!("  {} {:<16} {}", "▸".cyan(), kind.to_string().bold(), state);
    }

    if let RunStatus::Failed { cause, .. } = run.status() {
        println!("  Cause:   {}", cause);
    }
    if let (Some(started), Some(finished)) = (run.started_at, run.finished_at) {
        println!(
            "  Elapsed: {}",
            format!("{}ms", (finished - started).num_milliseconds()).dimmed()
        );
    }
}
