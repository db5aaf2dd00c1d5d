//! Tugboat Command Backend
//!
//! A deployment primitive that drives the standard Kubernetes tooling as
//! child processes:
//! - CRD bundles: `kubectl apply -k <bundle> --server-side`
//! - Charts: `helmfile -f <reference> apply --state-values-set <overrides>`
//! - Manifests: `kubectl apply -f <source> -n <namespace>`
//!
//! # Example
//!
//! ```no_run
//! use tugboat_backend::{BackendConfig, CommandBackend};
//! use tugboat_core::{DeploymentPrimitive, SourceList};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let backend = CommandBackend::new(BackendConfig::from_env()?);
//! let sources = SourceList::parse("https://example.com/crds")?;
//!
//! let summary = backend.install_crds(&sources, None, true).await?;
//! println!("{}", summary);
//! # Ok(())
//! # }
//! ```

mod charts;
pub mod command;
pub mod config;
mod crds;
pub mod error;
pub mod kubeconfig;
mod manifests;

// Re-export commonly used types
pub use config::BackendConfig;
pub use error::{BackendError, Result};

use async_trait::async_trait;
use tracing::info;
use tugboat_core::{Credential, DeploymentPrimitive, Operation, PrimitiveError, SourceList};

use crate::command::Invocation;
use crate::kubeconfig::KubeconfigFile;

/// Deployment primitive backed by kubectl and helmfile
#[derive(Debug, Clone)]
pub struct CommandBackend {
    config: BackendConfig,
}

impl CommandBackend {
    /// Create a new command backend
    ///
    /// # Example
    /// ```
    /// use tugboat_backend::{BackendConfig, CommandBackend};
    ///
    /// let backend = CommandBackend::new(BackendConfig::default());
    /// assert_eq!(backend.config().kubectl, "kubectl");
    /// ```
    pub fn new(config: BackendConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Checks that every tool can be started
    ///
    /// # Returns
    /// Each tool's program name with its reported version
    pub async fn check_tools(&self) -> Result<Vec<(String, String)>> {
        let probes = [
            Invocation::new(&self.config.kubectl)
                .arg("version")
                .arg("--client"),
            Invocation::new(&self.config.helmfile).arg("--version"),
        ];

        let mut versions = Vec::with_capacity(probes.len());
        for probe in &probes {
            let version = command::run(probe, None, self.config.command_timeout).await?;
            info!("{} is available: {}", probe.program, version);
            versions.push((probe.program.clone(), version));
        }
        Ok(versions)
    }

    /// Materializes the credential, if any, for one primitive call
    fn kubeconfig_for(&self, credential: Option<&Credential>) -> Result<Option<KubeconfigFile>> {
        credential.map(KubeconfigFile::write).transpose()
    }
}

#[async_trait]
impl DeploymentPrimitive for CommandBackend {
    async fn install_crds(
        &self,
        sources: &SourceList,
        credential: Option<&Credential>,
        server_side: bool,
    ) -> std::result::Result<String, PrimitiveError> {
        self.apply_crd_bundles(sources, credential, server_side)
            .await
            .map_err(|e| PrimitiveError::new(Operation::InstallCrds, e))
    }

    async fn deploy_chart(
        &self,
        chart_reference: &str,
        credential: Option<&Credential>,
        override_values: &str,
    ) -> std::result::Result<(), PrimitiveError> {
        self.apply_chart(chart_reference, credential, override_values)
            .await
            .map_err(|e| PrimitiveError::new(Operation::DeployChart, e))
    }

    async fn apply_manifests(
        &self,
        sources: &SourceList,
        credential: Option<&Credential>,
        namespace: Option<&str>,
    ) -> std::result::Result<String, PrimitiveError> {
        self.apply_manifest_sources(sources, credential, namespace)
            .await
            .map_err(|e| PrimitiveError::new(Operation::ApplyManifests, e))
    }
}
