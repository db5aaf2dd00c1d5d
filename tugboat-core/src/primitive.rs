//! Deployment primitive boundary
//!
//! The primitive is the backend that actually talks to the cluster. The
//! pipeline only ever calls one of its three operations per stage and never
//! interprets the result beyond success or failure.

use std::error::Error as StdError;
use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::credential::Credential;
use crate::values::SourceList;

/// Operations exposed by a deployment primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    InstallCrds,
    DeployChart,
    ApplyManifests,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::InstallCrds => "install-crds",
            Operation::DeployChart => "deploy-chart",
            Operation::ApplyManifests => "apply-manifests",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Failure reported by a deployment primitive
///
/// Carries the backend's own error untouched as its source. The message
/// names the operation only, the backend error is reached through
/// `Error::source`.
#[derive(Debug, Error)]
#[error("{operation} failed")]
pub struct PrimitiveError {
    operation: Operation,
    #[source]
    source: Box<dyn StdError + Send + Sync + 'static>,
}

impl PrimitiveError {
    pub fn new(
        operation: Operation,
        source: impl Into<Box<dyn StdError + Send + Sync + 'static>>,
    ) -> Self {
        Self {
            operation,
            source: source.into(),
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// The backend error, for callers that want to downcast it
    pub fn inner(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.source.as_ref()
    }
}

/// Backend that applies deployment artifacts to a cluster
///
/// Implementations must pass `sources` through in the given order. When
/// `credential` is `None` the backend falls back to its ambient credential.
#[async_trait]
pub trait DeploymentPrimitive: Send + Sync {
    /// Installs custom resource definition bundles
    ///
    /// # Returns
    /// A summary of the applied resources
    async fn install_crds(
        &self,
        sources: &SourceList,
        credential: Option<&Credential>,
        server_side: bool,
    ) -> Result<String, PrimitiveError>;

    /// Deploys a templated chart with `key=value,key=value` overrides
    ///
    /// An empty `override_values` means no overrides.
    async fn deploy_chart(
        &self,
        chart_reference: &str,
        credential: Option<&Credential>,
        override_values: &str,
    ) -> Result<(), PrimitiveError>;

    /// Applies manifests into `namespace`, or the backend default when `None`
    ///
    /// # Returns
    /// A summary of the applied resources
    async fn apply_manifests(
        &self,
        sources: &SourceList,
        credential: Option<&Credential>,
        namespace: Option<&str>,
    ) -> Result<String, PrimitiveError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("exit status 1")]
    struct ExitError;

    #[test]
    fn test_primitive_error_keeps_source() {
        let err = PrimitiveError::new(Operation::ApplyManifests, ExitError);

        assert_eq!(err.operation(), Operation::ApplyManifests);
        assert_eq!(err.to_string(), "apply-manifests failed");
        assert!(err.inner().downcast_ref::<ExitError>().is_some());
        let cause = err.source().map(|e| e.to_string());
        assert_eq!(cause.as_deref(), Some("exit status 1"));
    }
}
