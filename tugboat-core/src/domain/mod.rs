//! Core domain types
//!
//! Stage kinds and their defaults, the add-on catalogue, and the model of a
//! single pipeline run. These are shared by the runner (which executes them)
//! and the CLI (which builds them from flags).

pub mod addon;
pub mod run;
pub mod stage;
