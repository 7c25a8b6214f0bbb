//! # Install-Config Staging
//!
//! Writes the rendered install-config to a private per-invocation temp directory so helm
//! can read it with `--set-file` (avoids quoting and newline issues on the command line).

use super::error::ProvisionError;
use crate::constants::{INSTALL_CONFIG_FILE_NAME, STAGING_DIR_PREFIX};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// A rendered install-config on disk
///
/// The directory is unique to this invocation and owner-only; the file is created with mode
/// `0600`. Both are removed (best-effort) when the value is dropped.
#[derive(Debug)]
pub struct StagedInstallConfig {
    dir: TempDir,
    path: PathBuf,
}

impl StagedInstallConfig {
    /// Stage `rendered` under the OS temp directory
    pub async fn stage(rendered: &str) -> Result<Self, ProvisionError> {
        Self::stage_in(&std::env::temp_dir(), rendered).await
    }

    /// Stage `rendered` under `parent`
    pub async fn stage_in(parent: &Path, rendered: &str) -> Result<Self, ProvisionError> {
        let dir = tempfile::Builder::new()
            .prefix(STAGING_DIR_PREFIX)
            .tempdir_in(parent)
            .map_err(ProvisionError::Staging)?;
        let path = dir.path().join(INSTALL_CONFIG_FILE_NAME);

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&path).await.map_err(ProvisionError::Staging)?;
        file.write_all(rendered.as_bytes())
            .await
            .map_err(ProvisionError::Staging)?;
        file.flush().await.map_err(ProvisionError::Staging)?;

        debug!(
            "Staged install-config ({} bytes) at {}",
            rendered.len(),
            path.display()
        );
        Ok(Self { dir, path })
    }

    /// Path of the staged file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the staged file
    #[cfg(test)]
    pub(crate) fn dir(&self) -> &Path {
        self.dir.path()
    }
}
