//! Tool invocation
//!
//! Command lines are built as plain [`Invocation`] values so they can be
//! checked without spawning anything, then executed by [`run`].

use std::fmt;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, error};

use crate::error::{BackendError, Result};
use crate::kubeconfig::KubeconfigFile;

/// A program and its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Runs one invocation to completion and returns its trimmed stdout
///
/// The child is killed if the returned future is dropped (cancellation) or
/// the timeout expires. With `kubeconfig` set the child sees it through
/// `KUBECONFIG`; otherwise it inherits the ambient environment.
pub async fn run(
    invocation: &Invocation,
    kubeconfig: Option<&KubeconfigFile>,
    timeout: Duration,
) -> Result<String> {
    debug!("Running: {}", invocation);

    let mut command = Command::new(&invocation.program);
    command
        .args(&invocation.args)
        .stdin(Stdio::null())
        .kill_on_drop(true);

    if let Some(file) = kubeconfig {
        command.env("KUBECONFIG", file.path());
    }

    let output = tokio::time::timeout(timeout, command.output())
        .await
        .map_err(|_| BackendError::Timeout {
            command: invocation.to_string(),
            timeout,
        })?
        .map_err(|source| BackendError::Spawn {
            program: invocation.program.clone(),
            source,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    if !stdout.trim().is_empty() {
        debug!("{} stdout: {}", invocation.program, stdout.trim());
    }
    if !stderr.trim().is_empty() {
        debug!("{} stderr: {}", invocation.program, stderr.trim());
    }

    if !output.status.success() {
        let exit_code = output.status.code().unwrap_or(-1);
        error!("'{}' failed with exit code {}", invocation, exit_code);
        return Err(BackendError::CommandFailed {
            command: invocation.to_string(),
            exit_code,
            stderr: stderr.trim().to_string(),
        });
    }

    Ok(stdout.trim().to_string())
}

/// Runs invocations in order, stopping at the first failure
///
/// # Returns
/// The non-empty outputs joined by newlines
pub async fn run_all(
    invocations: &[Invocation],
    kubeconfig: Option<&KubeconfigFile>,
    timeout: Duration,
) -> Result<String> {
    let mut outputs = Vec::with_capacity(invocations.len());
    for invocation in invocations {
        let output = run(invocation, kubeconfig, timeout).await?;
        if !output.is_empty() {
            outputs.push(output);
        }
    }
    Ok(outputs.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(10);

    fn sh(script: &str) -> Invocation {
        Invocation::new("sh").arg("-c").arg(script)
    }

    #[test]
    fn test_invocation_display() {
        let invocation = Invocation::new("kubectl")
            .arg("apply")
            .arg("-f")
            .arg("a.yaml");
        assert_eq!(invocation.to_string(), "kubectl apply -f a.yaml");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_captures_stdout() {
        let output = run(&sh("echo ' applied '"), None, TIMEOUT).await.unwrap();
        assert_eq!(output, "applied");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_reports_exit_code_and_stderr() {
        let err = run(&sh("echo denied >&2; exit 3"), None, TIMEOUT)
            .await
            .unwrap_err();

        assert!(err.is_command_failure());
        assert_eq!(err.exit_code(), Some(3));
        match err {
            BackendError::CommandFailed { stderr, .. } => assert_eq!(stderr, "denied"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_run_missing_program() {
        let err = run(
            &Invocation::new("tugboat-definitely-not-installed"),
            None,
            TIMEOUT,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, BackendError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_exposes_kubeconfig() {
        let credential = tugboat_core::Credential::from_kubeconfig("kind: Config");
        let file = KubeconfigFile::write(&credential).unwrap();

        let output = run(&sh("cat \"$KUBECONFIG\""), Some(&file), TIMEOUT)
            .await
            .unwrap();
        assert_eq!(output, "kind: Config");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_times_out() {
        let err = run(&sh("sleep 5"), None, Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Timeout { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_dropped_run_kills_child() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("late-write");
        let invocation = sh(&format!("sleep 1; touch {}", marker.display()));

        let abandoned = tokio::time::timeout(
            Duration::from_millis(100),
            run(&invocation, None, TIMEOUT),
        )
        .await;
        assert!(abandoned.is_err());

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!marker.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_all_stops_at_first_failure() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("third-ran");
        let invocations = vec![
            sh("echo first"),
            sh("exit 1"),
            sh(&format!("touch {}", marker.display())),
        ];

        let err = run_all(&invocations, None, TIMEOUT).await.unwrap_err();

        assert_eq!(err.exit_code(), Some(1));
        assert!(!marker.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_all_joins_outputs() {
        let invocations = vec![sh("echo one"), sh("true"), sh("echo two")];
        let output = run_all(&invocations, None, TIMEOUT).await.unwrap();
        assert_eq!(output, "one\ntwo");
    }
}
