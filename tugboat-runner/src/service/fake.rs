//! Recording deployment primitive for service tests

use std::sync::Mutex;

use async_trait::async_trait;
use tugboat_core::{Credential, DeploymentPrimitive, Operation, PrimitiveError, SourceList};

/// One recorded primitive invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    InstallCrds {
        sources: Vec<String>,
        server_side: bool,
        credential: Option<String>,
    },
    DeployChart {
        chart: String,
        overrides: String,
        credential: Option<String>,
    },
    ApplyManifests {
        sources: Vec<String>,
        namespace: Option<String>,
        credential: Option<String>,
    },
}

impl Call {
    pub fn operation(&self) -> Operation {
        match self {
            Call::InstallCrds { .. } => Operation::InstallCrds,
            Call::DeployChart { .. } => Operation::DeployChart,
            Call::ApplyManifests { .. } => Operation::ApplyManifests,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Behaviour {
    Succeed,
    /// Fail the first call of this operation
    FailOn(Operation),
    /// Fail the n-th call overall (1-based)
    FailCall(usize),
    /// Never return from calls of this operation
    HangOn(Operation),
}

pub struct FakePrimitive {
    calls: Mutex<Vec<Call>>,
    behaviour: Behaviour,
}

impl FakePrimitive {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            behaviour: Behaviour::Succeed,
        }
    }

    pub fn fail_on(mut self, operation: Operation) -> Self {
        self.behaviour = Behaviour::FailOn(operation);
        self
    }

    pub fn fail_call(mut self, n: usize) -> Self {
        self.behaviour = Behaviour::FailCall(n);
        self
    }

    pub fn hang_on(mut self, operation: Operation) -> Self {
        self.behaviour = Behaviour::HangOn(operation);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn operations(&self) -> Vec<Operation> {
        self.calls().iter().map(Call::operation).collect()
    }

    async fn record(&self, call: Call) -> Result<(), PrimitiveError> {
        let operation = call.operation();
        let (position, first_of_kind) = {
            let mut calls = self.calls.lock().unwrap();
            let first_of_kind = !calls.iter().any(|c| c.operation() == operation);
            calls.push(call);
            (calls.len(), first_of_kind)
        };

        match self.behaviour {
            Behaviour::FailOn(failing) if failing == operation && first_of_kind => Err(
                PrimitiveError::new(operation, format!("simulated {} failure", operation)),
            ),
            Behaviour::FailCall(n) if n == position => Err(PrimitiveError::new(
                operation,
                format!("simulated failure of call {}", n),
            )),
            Behaviour::HangOn(hanging) if hanging == operation => {
                std::future::pending::<()>().await;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

fn owned(credential: Option<&Credential>) -> Option<String> {
    credential.map(|c| c.kubeconfig().to_string())
}

#[async_trait]
impl DeploymentPrimitive for FakePrimitive {
    async fn install_crds(
        &self,
        sources: &SourceList,
        credential: Option<&Credential>,
        server_side: bool,
    ) -> Result<String, PrimitiveError> {
        self.record(Call::InstallCrds {
            sources: sources.as_slice().to_vec(),
            server_side,
            credential: owned(credential),
        })
        .await?;
        Ok(format!("applied {} source(s)", sources.len()))
    }

    async fn deploy_chart(
        &self,
        chart_reference: &str,
        credential: Option<&Credential>,
        override_values: &str,
    ) -> Result<(), PrimitiveError> {
        self.record(Call::DeployChart {
            chart: chart_reference.to_string(),
            overrides: override_values.to_string(),
            credential: owned(credential),
        })
        .await
    }

    async fn apply_manifests(
        &self,
        sources: &SourceList,
        credential: Option<&Credential>,
        namespace: Option<&str>,
    ) -> Result<String, PrimitiveError> {
        self.record(Call::ApplyManifests {
            sources: sources.as_slice().to_vec(),
            namespace: namespace.map(str::to_string),
            credential: owned(credential),
        })
        .await?;
        Ok(format!("applied {} source(s)", sources.len()))
    }
}
