//! Pipeline service
//!
//! Handles add-on pipeline execution:
//! - Planning the run (merging caller input over add-on defaults)
//! - Executing enabled stages strictly one after another in the add-on's order
//! - Stopping at the first failure and naming the failed stage
//!
//! Nothing is retried or rolled back. Stages that ran before a failure are
//! not reported individually.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info};
use tugboat_core::{
    Cancellation, DeploymentPrimitive, PipelineError, PipelineInput, PipelineRun, error_chain,
};

use crate::service::stage::run_stage;

/// Service trait for running add-on pipelines
#[async_trait]
pub trait PipelineService: Send + Sync {
    /// Runs every enabled stage of the input's add-on
    ///
    /// # Arguments
    /// * `input` - Per-stage toggles and parameters plus the shared credential
    /// * `cancellation` - Cancellation/deadline signal shared by all stages
    ///
    /// # Returns
    /// `Ok(())` once all enabled stages succeeded, or the first failure
    async fn run_pipeline(
        &self,
        input: PipelineInput,
        cancellation: &Cancellation,
    ) -> Result<(), PipelineError>;
}

/// A finished run together with its result
#[derive(Debug)]
pub struct RunOutcome {
    pub run: PipelineRun,
    pub result: Result<(), PipelineError>,
}

/// Standard implementation of PipelineService
pub struct StandardPipelineService {
    primitive: Arc<dyn DeploymentPrimitive>,
}

impl StandardPipelineService {
    /// Creates a pipeline service bound to `primitive`
    pub fn new(primitive: Arc<dyn DeploymentPrimitive>) -> Self {
        Self { primitive }
    }

    /// Executes a planned run and returns it with its final status
    pub async fn execute(&self, mut run: PipelineRun, cancellation: &Cancellation) -> RunOutcome {
        run.start();
        info!(
            "Starting pipeline run {} for {} ({} of {} stage(s) enabled)",
            run.id,
            run.addon,
            run.enabled_stages().count(),
            run.stages().len()
        );

        let result = self.execute_stages(&run, cancellation).await;

        match &result {
            Ok(()) => {
                run.succeed();
                let elapsed = run
                    .started_at
                    .zip(run.finished_at)
                    .map(|(started, finished)| (finished - started).num_milliseconds())
                    .unwrap_or_default();
                info!("Pipeline run {} succeeded in {} ms", run.id, elapsed);
            }
            Err(e) => {
                run.fail(e.stage, error_chain(&e.source));
                error!("Pipeline run {} aborted: {}", run.id, error_chain(e));
            }
        }

        RunOutcome { run, result }
    }

    async fn execute_stages(
        &self,
        run: &PipelineRun,
        cancellation: &Cancellation,
    ) -> Result<(), PipelineError> {
        let total = run.stages().len();

        for (idx, (kind, config)) in run.stages().iter().enumerate() {
            if !config.enabled {
                debug!("Skipping disabled stage {}/{}: {}", idx + 1, total, kind);
                continue;
            }

            info!("Executing stage {}/{}: {}", idx + 1, total, kind);

            run_stage(
                self.primitive.as_ref(),
                run.addon,
                *kind,
                config,
                run.credential(),
                cancellation,
            )
            .await
            .map_err(|e| PipelineError::new(*kind, e))?;
        }

        Ok(())
    }
}

#[async_trait]
impl PipelineService for StandardPipelineService {
    async fn run_pipeline(
        &self,
        input: PipelineInput,
        cancellation: &Cancellation,
    ) -> Result<(), PipelineError> {
        let run = PipelineRun::plan(input).inspect_err(|e| {
            error!("Pipeline rejected before any stage ran: {}", error_chain(e));
        })?;

        self.execute(run, cancellation).await.result
    }
}
