//! Templated chart deployments

use tracing::info;
use tugboat_core::Credential;

use crate::CommandBackend;
use crate::command::{self, Invocation};
use crate::error::Result;

impl CommandBackend {
    /// `helmfile -f <reference> apply`, with `--state-values-set` when overrides are given
    pub fn chart_invocation(&self, chart_reference: &str, override_values: &str) -> Invocation {
        let invocation = Invocation::new(&self.config.helmfile)
            .arg("-f")
            .arg(chart_reference)
            .arg("apply");

        if override_values.is_empty() {
            invocation
        } else {
            invocation.arg("--state-values-set").arg(override_values)
        }
    }

    /// Deploys a chart reference with the given override values
    pub async fn apply_chart(
        &self,
        chart_reference: &str,
        credential: Option<&Credential>,
        override_values: &str,
    ) -> Result<()> {
        info!("Deploying chart {}", chart_reference);

        let kubeconfig = self.kubeconfig_for(credential)?;
        command::run(
            &self.chart_invocation(chart_reference, override_values),
            kubeconfig.as_ref(),
            self.config.command_timeout,
        )
        .await
        .map(|_| ())
    }
}
