//! Error types for the command backend

use std::time::Duration;

use thiserror::Error;

/// Result type alias for backend operations
pub type Result<T> = std::result::Result<T, BackendError>;

/// Errors that can occur when driving the deployment tools
#[derive(Debug, Error)]
pub enum BackendError {
    /// The tool could not be started at all
    #[error("failed to run '{program}'")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The tool exited with a non-zero status
    #[error("'{command}' exited with code {exit_code}: {stderr}")]
    CommandFailed {
        /// Command line that failed
        command: String,
        exit_code: i32,
        /// Trimmed standard error of the tool
        stderr: String,
    },

    /// The tool ran longer than the configured command timeout
    #[error("'{command}' did not finish within {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    /// The credential could not be handed to the tool
    #[error("failed to write kubeconfig")]
    Kubeconfig(#[source] std::io::Error),
}

impl BackendError {
    /// Check if the tool ran and reported a failure (as opposed to not running)
    pub fn is_command_failure(&self) -> bool {
        matches!(self, Self::CommandFailed { .. })
    }

    /// Exit code of a failed command, if it got that far
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::CommandFailed { exit_code, .. } => Some(*exit_code),
            _ => None,
        }
    }
}
