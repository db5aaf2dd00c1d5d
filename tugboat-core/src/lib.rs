//! Tugboat Core
//!
//! Core types and abstractions for staged add-on deployment.
//!
//! This crate contains:
//! - Domain types: stages, add-ons, and the pipeline run model
//! - Typed values: source locator lists and chart override values
//! - The `DeploymentPrimitive` trait implemented by deployment backends
//! - Cancellation and the shared error taxonomy

pub mod cancel;
pub mod credential;
pub mod domain;
pub mod error;
pub mod primitive;
pub mod values;

pub use cancel::{CancelHandle, Cancellation, Interrupt};
pub use credential::Credential;
pub use domain::addon::{Addon, AddonDefinition};
pub use domain::run::{PipelineInput, PipelineRun, RunStatus};
pub use domain::stage::{StageConfig, StageDefaults, StageInput, StageKind};
pub use error::{ConfigurationError, PipelineError, StageError, error_chain};
pub use primitive::{DeploymentPrimitive, Operation, PrimitiveError};
pub use values::{OverrideValues, SourceList};
