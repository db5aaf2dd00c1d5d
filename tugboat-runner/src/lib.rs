//! Tugboat Runner
//!
//! Executes add-on pipelines against a deployment primitive.
//!
//! Architecture:
//! - `PipelineService`: runs every enabled stage of an add-on in its fixed
//!   order and stops at the first failure
//! - `StageDeployer`: runs one stage on its own, through the same resolution
//!   and invocation code the pipeline uses
//!
//! The primitive is injected as an `Arc<dyn DeploymentPrimitive>` so callers
//! choose the backend and tests can substitute a fake.

pub mod service;

pub use service::{
    PipelineService, RunOutcome, StageDeployer, StageOutput, StandardPipelineService,
};
