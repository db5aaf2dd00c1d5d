//! Kubeconfig materialization
//!
//! Tools read credentials from a file, so a [`Credential`] is written to a
//! private temporary file for the duration of one primitive call. The file is
//! created with owner-only permissions and removed when dropped.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tugboat_core::Credential;

use crate::error::{BackendError, Result};

/// Temporary kubeconfig file, deleted on drop
pub struct KubeconfigFile {
    file: NamedTempFile,
}

impl KubeconfigFile {
    /// Writes the credential's kubeconfig to a fresh temporary file
    pub fn write(credential: &Credential) -> Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("tugboat-kubeconfig-")
            .suffix(".yaml")
            .tempfile()
            .map_err(BackendError::Kubeconfig)?;

        file.write_all(credential.kubeconfig().as_bytes())
            .and_then(|()| file.flush())
            .map_err(BackendError::Kubeconfig)?;

        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
