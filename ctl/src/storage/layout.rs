//! Host directory layout
//!
//! The container bind-mounts a logs and a data directory from the host.
//! Both must exist before deploy; their contents are opaque to this tool.

use std::path::PathBuf;

use crate::config::target::DeploymentTarget;
use crate::errors::OpsError;

/// Host-side directories backing the container's bind mounts
#[derive(Debug, Clone)]
pub struct HostLayout {
    dirs: Vec<PathBuf>,
}

impl HostLayout {
    /// Derive the layout from the target's volume mounts
    pub fn from_target(target: &DeploymentTarget) -> Self {
        Self {
            dirs: target.volumes.iter().map(|v| v.host.clone()).collect(),
        }
    }

    /// Directories that will be created
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Create any missing directories
    pub async fn setup(&self) -> Result<(), OpsError> {
        for dir in &self.dirs {
            tokio::fs::create_dir_all(dir).await?;
        }
        Ok(())
    }
}
