//! Service layer
//!
//! Services hold the sequencing logic. They only talk to the cluster through
//! the injected `DeploymentPrimitive`.

mod pipeline;
mod stage;

#[cfg(test)]
mod fake;

// Re-export traits
pub use pipeline::PipelineService;

// Re-export implementations
pub use pipeline::{RunOutcome, StandardPipelineService};
pub use stage::{StageDeployer, StageOutput};
