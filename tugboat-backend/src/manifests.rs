//! Plain manifest application

use tracing::info;
use tugboat_core::{Credential, SourceList};

use crate::CommandBackend;
use crate::command::{self, Invocation};
use crate::error::Result;

impl CommandBackend {
    /// One `kubectl apply -f` per source, in order
    pub fn manifest_invocations(
        &self,
        sources: &SourceList,
        namespace: Option<&str>,
    ) -> Vec<Invocation> {
        sources
            .iter()
            .map(|source| {
                let invocation = Invocation::new(&self.config.kubectl)
                    .arg("apply")
                    .arg("-f")
                    .arg(source);
                match namespace {
                    Some(namespace) => invocation.arg("-n").arg(namespace),
                    None => invocation,
                }
            })
            .collect()
    }

    /// Applies manifests and returns kubectl's combined summary
    pub async fn apply_manifest_sources(
        &self,
        sources: &SourceList,
        credential: Option<&Credential>,
        namespace: Option<&str>,
    ) -> Result<String> {
        info!(
            "Applying {} manifest(s) into {}",
            sources.len(),
            namespace.unwrap_or("the default namespace")
        );

        let kubeconfig = self.kubeconfig_for(credential)?;
        command::run_all(
            &self.manifest_invocations(sources, namespace),
            kubeconfig.as_ref(),
            self.config.command_timeout,
        )
        .await
    }
}
