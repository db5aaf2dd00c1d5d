//! Backend configuration
//!
//! Names of the deployment tools and the per-command timeout.

use std::time::Duration;

use anyhow::Context;

/// Backend configuration
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// kubectl binary used for CRD bundles and manifests
    pub kubectl: String,

    /// helmfile binary used for chart deployments
    pub helmfile: String,

    /// Maximum time a single tool invocation may run
    pub command_timeout: Duration,
}

impl BackendConfig {
    /// Creates a configuration with the given tools and the default timeout
    pub fn new(kubectl: impl Into<String>, helmfile: impl Into<String>) -> Self {
        Self {
            kubectl: kubectl.into(),
            helmfile: helmfile.into(),
            command_timeout: Duration::from_secs(600), // 10 minutes
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - TUGBOAT_KUBECTL (optional, default: kubectl)
    /// - TUGBOAT_HELMFILE (optional, default: helmfile)
    /// - TUGBOAT_COMMAND_TIMEOUT (optional, seconds, default: 600)
    ///
    /// A timeout that is not a whole number of seconds is an error.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(kubectl) = lookup("TUGBOAT_KUBECTL") {
            config.kubectl = kubectl;
        }

        if let Some(helmfile) = lookup("TUGBOAT_HELMFILE") {
            config.helmfile = helmfile;
        }

        if let Some(raw) = lookup("TUGBOAT_COMMAND_TIMEOUT") {
            let seconds = raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("Invalid TUGBOAT_COMMAND_TIMEOUT '{}'", raw))?;
            config.command_timeout = Duration::from_secs(seconds);
        }

        config.validate()?;
        Ok(config)
    }

    /// Sets the per-command timeout
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.kubectl.trim().is_empty() {
            anyhow::bail!("kubectl binary cannot be empty");
        }

        if self.helmfile.trim().is_empty() {
            anyhow::bail!("helmfile binary cannot be empty");
        }

        if self.command_timeout.is_zero() {
            anyhow::bail!("command_timeout must be greater than 0");
        }

        Ok(())
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::new("kubectl", "helmfile")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BackendConfig::default();
        assert_eq!(config.kubectl, "kubectl");
        assert_eq!(config.helmfile, "helmfile");
        assert_eq!(config.command_timeout, Duration::from_secs(600));
        assert!(config.validate().is_ok());
    }

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn test_config_from_variables() {
        let config = BackendConfig::from_lookup(lookup(&[
            ("TUGBOAT_KUBECTL", "/opt/bin/kubectl"),
            ("TUGBOAT_COMMAND_TIMEOUT", "30"),
        ]))
        .unwrap();

        assert_eq!(config.kubectl, "/opt/bin/kubectl");
        assert_eq!(config.helmfile, "helmfile");
        assert_eq!(config.command_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_unparsable_timeout_is_rejected() {
        for raw in ["ten", "1.5", "-3", ""] {
            let vars = [("TUGBOAT_COMMAND_TIMEOUT", raw)];
            let err = BackendConfig::from_lookup(lookup(&vars)).unwrap_err();

            assert!(err.to_string().contains("TUGBOAT_COMMAND_TIMEOUT"));
        }
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let vars = [("TUGBOAT_COMMAND_TIMEOUT", "0")];
        assert!(BackendConfig::from_lookup(lookup(&vars)).is_err());
    }

    #[test]
    fn test_config_validation() {
        let mut config = BackendConfig::default();

        config.kubectl = String::new();
        assert!(config.validate().is_err());

        config.kubectl = "/usr/local/bin/kubectl".to_string();
        assert!(config.validate().is_ok());

        config.helmfile = "  ".to_string();
        assert!(config.validate().is_err());

        config.helmfile = "helmfile".to_string();
        config = config.with_command_timeout(Duration::ZERO);
        assert!(config.validate().is_err());
    }
}
