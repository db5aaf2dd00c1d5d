//! Cluster credential handle

use std::fmt;
use std::sync::Arc;

/// Opaque kubeconfig handle shared read-only by every stage of a run
///
/// The contents are never printed: `Debug` is redacted and there is no
/// `Display` or `Serialize` implementation.
#[derive(Clone)]
pub struct Credential {
    kubeconfig: Arc<str>,
}

impl Credential {
    /// Wraps the full text of a kubeconfig file
    pub fn from_kubeconfig(contents: impl Into<String>) -> Self {
        Self {
            kubeconfig: Arc::from(contents.into()),
        }
    }

    /// The kubeconfig text, for backends that hand it to a cluster client
    pub fn kubeconfig(&self) -> &str {
        &self.kubeconfig
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let credential = Credential::from_kubeconfig("apiVersion: v1\ntoken: s3cr3t\n");
        let printed = format!("{:?}", credential);

        assert_eq!(printed, "Credential(<redacted>)");
        assert!(!printed.contains("s3cr3t"));
    }

    #[test]
    fn test_clones_share_contents() {
        let credential = Credential::from_kubeconfig("kind: Config");
        let clone = credential.clone();

        assert_eq!(clone.kubeconfig(), "kind: Config");
        assert!(std::ptr::eq(credential.kubeconfig(), clone.kubeconfig()));
    }
}
