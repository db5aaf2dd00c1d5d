//! Stage invocation
//!
//! Both the full pipeline and the single-stage commands go through
//! [`run_stage`], so defaults, validation and error surface cannot drift
//! between the two paths.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info};
use tugboat_core::{
    Addon, Cancellation, ConfigurationError, Credential, DeploymentPrimitive, StageConfig,
    StageError, StageInput, StageKind, error_chain,
};

/// What a completed stage produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "summary", rename_all = "snake_case")]
pub enum StageOutput {
    /// CRDs or manifests were applied; carries the primitive's summary
    Applied(String),
    /// The chart was deployed
    Deployed,
    /// The stage was disabled
    Skipped,
}

/// Invokes the primitive operation behind one enabled stage
///
/// The call races the cancellation signal. When the signal wins, the
/// in-flight call is dropped and the stage fails.
pub(crate) async fn run_stage(
    primitive: &dyn DeploymentPrimitive,
    addon: Addon,
    kind: StageKind,
    config: &StageConfig,
    credential: Option<&Credential>,
    cancellation: &Cancellation,
) -> Result<StageOutput, StageError> {
    if let Some(interrupt) = cancellation.check() {
        error!("Stage '{}' of {} not started: {:?}", kind, addon, interrupt);
        return Err(interrupt.into());
    }

    info!(
        "Starting stage '{}' of {}: {} source(s) via {}",
        kind,
        addon,
        config.sources.len(),
        kind.operation()
    );
    debug!("Stage '{}' sources: {}", kind, config.sources);

    let call = async {
        let result = match kind {
            StageKind::Crds => primitive
                .install_crds(&config.sources, credential, true)
                .await
                .map(StageOutput::Applied),
            StageKind::CoreChart => {
                let Some(chart) = config.chart_reference() else {
                    return Err(StageError::Configuration(
                        ConfigurationError::MultipleChartReferences { count: 0 },
                    ));
                };
                primitive
                    .deploy_chart(chart, credential, &config.overrides.encode())
                    .await
                    .map(|()| StageOutput::Deployed)
            }
            StageKind::Configurations | StageKind::Functions => primitive
                .apply_manifests(&config.sources, credential, config.namespace.as_deref())
                .await
                .map(StageOutput::Applied),
        };
        result.map_err(StageError::from)
    };

    let result = tokio::select! {
        biased;
        result = call => result,
        interrupt = cancellation.interrupted() => Err(interrupt.into()),
    };

    match &result {
        Ok(_) => info!("Stage '{}' of {} completed", kind, addon),
        Err(e) => {
            let cause = error_chain(e);
            error!("Stage '{}' of {} failed: {}", kind, addon, cause);
        }
    }
    result
}

/// Deploys a single stage of an add-on, bypassing the pipeline
pub struct StageDeployer {
    primitive: Arc<dyn DeploymentPrimitive>,
}

impl StageDeployer {
    /// Creates a deployer bound to `primitive`
    pub fn new(primitive: Arc<dyn DeploymentPrimitive>) -> Self {
        Self { primitive }
    }

    /// Resolves `input` over the add-on defaults for `kind` and runs it
    ///
    /// # Returns
    /// `StageOutput::Skipped` if the input disables the stage
    pub async fn deploy(
        &self,
        addon: Addon,
        kind: StageKind,
        input: &StageInput,
        credential: Option<&Credential>,
        cancellation: &Cancellation,
    ) -> Result<StageOutput, StageError> {
        let defaults = addon.require(kind)?;
        let config = input.resolve(kind, defaults)?;

        if !config.enabled {
            debug!("Stage '{}' of {} is disabled, skipping", kind, addon);
            return Ok(StageOutput::Skipped);
        }

        run_stage(
            self.primitive.as_ref(),
            addon,
            kind,
            &config,
            credential,
            cancellation,
        )
        .await
    }
}
