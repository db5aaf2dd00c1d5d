//! Error types for pipeline and stage execution

use std::error::Error as StdError;
use std::time::Duration;

use thiserror::Error;

use crate::cancel::Interrupt;
use crate::domain::addon::Addon;
use crate::domain::stage::StageKind;
use crate::primitive::PrimitiveError;

/// Malformed caller input
///
/// Always detected before the deployment primitive is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// A comma-separated source list has a blank entry
    #[error("source list has an empty entry at position {position}")]
    EmptySource { position: usize },

    #[error("the core chart stage takes exactly one chart reference, got {count}")]
    MultipleChartReferences { count: usize },

    /// An override list has a blank entry (e.g. "a=1,,b=2")
    #[error("override values have an empty entry at position {position}")]
    EmptyOverride { position: usize },

    #[error("override entry '{entry}' is missing '='")]
    MissingSeparator { entry: String },

    #[error("override entry '{entry}' has an empty key")]
    EmptyKey { entry: String },

    #[error("override key '{key}' is given more than once")]
    DuplicateKey { key: String },

    #[error("stage '{stage}' is cluster-scoped and does not take a namespace")]
    NamespaceNotSupported { stage: StageKind },

    #[error("stage '{stage}' does not take override values")]
    OverridesNotSupported { stage: StageKind },

    #[error("addon '{addon}' does not define a '{stage}' stage")]
    StageNotDefined { addon: Addon, stage: StageKind },

    #[error("unknown addon '{0}'")]
    UnknownAddon(String),

    #[error("unknown stage '{0}'")]
    UnknownStage(String),
}

/// Why a single stage did not complete
#[derive(Debug, Error)]
pub enum StageError {
    #[error("invalid configuration")]
    Configuration(#[from] ConfigurationError),

    /// The deployment primitive reported a failure
    #[error(transparent)]
    Primitive(#[from] PrimitiveError),

    #[error("cancelled")]
    Cancelled,

    #[error("deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),
}

impl From<Interrupt> for StageError {
    fn from(interrupt: Interrupt) -> Self {
        match interrupt {
            Interrupt::Cancelled => StageError::Cancelled,
            Interrupt::DeadlineExceeded(timeout) => StageError::DeadlineExceeded(timeout),
        }
    }
}

/// A pipeline run halted at `stage`
#[derive(Debug, Error)]
#[error("stage '{stage}' failed")]
pub struct PipelineError {
    pub stage: StageKind,
    #[source]
    pub source: StageError,
}

impl PipelineError {
    pub fn new(stage: StageKind, source: impl Into<StageError>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }

    /// Check if the run never reached the cluster because of bad input
    pub fn is_configuration(&self) -> bool {
        matches!(self.source, StageError::Configuration(_))
    }

    /// Check if the run was stopped by cancellation or its deadline
    pub fn is_interrupted(&self) -> bool {
        matches!(
            self.source,
            StageError::Cancelled | StageError::DeadlineExceeded(_)
        )
    }
}

/// Renders an error followed by each of its causes, joined with ": "
///
/// Every error in this crate keeps its cause out of its own message, so each
/// level appears once.
pub fn error_chain(err: &(dyn StdError + 'static)) -> String {
    std::iter::successors(Some(err), |e: &&(dyn StdError + 'static)| (*e).source())
        .map(|cause| cause.to_string())
        .collect::<Vec<_>>()
        .join(": ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::Operation;

    #[test]
    fn test_pipeline_error_names_stage() {
        let err = PipelineError::new(
            StageKind::Crds,
            PrimitiveError::new(Operation::InstallCrds, "cluster unreachable"),
        );

        assert_eq!(err.stage, StageKind::Crds);
        assert_eq!(err.to_string(), "stage 'CRDs' failed");
        assert_eq!(
            error_chain(&err),
            "stage 'CRDs' failed: install-crds failed: cluster unreachable"
        );
        assert!(!err.is_configuration());
        assert!(!err.is_interrupted());
    }

    #[test]
    fn test_each_cause_is_reported_once() {
        let err = PipelineError::new(
            StageKind::Functions,
            PrimitiveError::new(Operation::ApplyManifests, "stderr line"),
        );

        let top: &(dyn StdError + 'static) = &err;
        let levels: Vec<String> = std::iter::successors(Some(top), |e: &&(dyn StdError + 'static)| (*e).source())
            .map(|e| e.to_string())
            .collect();
        assert_eq!(
            levels,
            vec![
                "stage 'functions' failed",
                "apply-manifests failed",
                "stderr line",
            ]
        );

        let err = PipelineError::new(
            StageKind::CoreChart,
            ConfigurationError::MultipleChartReferences { count: 2 },
        );
        let rendered = error_chain(&err);
        assert_eq!(rendered.matches("exactly one chart reference").count(), 1);
        assert_eq!(
            rendered,
            "stage 'core-chart' failed: invalid configuration: \
             the core chart stage takes exactly one chart reference, got 2"
        );
    }

    #[test]
    fn test_pipeline_error_classification() {
        let err = PipelineError::new(
            StageKind::CoreChart,
            ConfigurationError::DuplicateKey {
                key: "domain".to_string(),
            },
        );
        assert!(err.is_configuration());

        let err = PipelineError::new(StageKind::Functions, Interrupt::Cancelled);
        assert!(err.is_interrupted());
        assert!(matches!(err.source, StageError::Cancelled));
    }
}
