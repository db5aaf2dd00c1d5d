//! Custom resource definition bundles

use tracing::info;
use tugboat_core::{Credential, SourceList};

use crate::CommandBackend;
use crate::command::{self, Invocation};
use crate::error::Result;

impl CommandBackend {
    /// One `kubectl apply -k` per kustomize bundle, in source order
    pub fn crd_invocations(&self, sources: &SourceList, server_side: bool) -> Vec<Invocation> {
        sources
            .iter()
            .map(|source| {
                let invocation = Invocation::new(&self.config.kubectl)
                    .arg("apply")
                    .arg("-k")
                    .arg(source);
                if server_side {
                    invocation.arg("--server-side")
                } else {
                    invocation
                }
            })
            .collect()
    }

    /// Applies CRD bundles and returns kubectl's combined summary
    pub async fn apply_crd_bundles(
        &self,
        sources: &SourceList,
        credential: Option<&Credential>,
        server_side: bool,
    ) -> Result<String> {
        info!("Installing CRDs from {} bundle(s)", sources.len());

        let kubeconfig = self.kubeconfig_for(credential)?;
        command::run_all(
            &self.crd_invocations(sources, server_side),
            kubeconfig.as_ref(),
            self.config.command_timeout,
        )
        .await
    }
}
