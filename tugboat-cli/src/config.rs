//! Configuration module
//!
//! Settings shared by every command: the cluster credential, the overall
//! deadline and the output format.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::ValueEnum;
use tugboat_backend::{BackendConfig, CommandBackend};
use tugboat_core::Credential;

/// How command results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Kubeconfig handed to every tool call, ambient environment if unset
    pub kubeconfig: Option<PathBuf>,

    /// Deadline for the whole command
    pub timeout: Option<Duration>,

    pub output: OutputFormat,
}

impl Config {
    /// Reads the kubeconfig file into a credential
    pub fn credential(&self) -> Result<Option<Credential>> {
        let Some(path) = &self.kubeconfig else {
            return Ok(None);
        };

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read kubeconfig: {}", path.display()))?;
        if contents.trim().is_empty() {
            anyhow::bail!("Kubeconfig {} is empty", path.display());
        }

        Ok(Some(Credential::from_kubeconfig(contents)))
    }

    /// Builds the command backend from the TUGBOAT_* tool settings
    pub fn backend(&self) -> Result<CommandBackend> {
        let config = BackendConfig::from_env().context("Invalid backend configuration")?;
        Ok(CommandBackend::new(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config(kubeconfig: Option<PathBuf>) -> Config {
        Config {
            kubeconfig,
            timeout: None,
            output: OutputFormat::Text,
        }
    }

    #[test]
    fn test_no_kubeconfig_means_ambient_credential() {
        assert!(config(None).credential().unwrap().is_none());
    }

    #[test]
    fn test_kubeconfig_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "apiVersion: v1\nkind: Config\n").unwrap();

        let credential = config(Some(file.path().to_path_buf()))
            .credential()
            .unwrap()
            .unwrap();

        assert_eq!(credential.kubeconfig(), "apiVersion: v1\nkind: Config\n");
    }

    #[test]
    fn test_missing_kubeconfig_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = config(Some(dir.path().join("absent.yaml")))
            .credential()
            .unwrap_err();

        assert!(err.to_string().starts_with("Failed to read kubeconfig"));
    }

    #[test]
    fn test_empty_kubeconfig_is_an_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = config(Some(file.path().to_path_buf()));
        assert!(config.credential().is_err());
    }
}
