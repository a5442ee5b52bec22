//! Container runtime abstraction
//!
//! The controller never talks to a concrete runtime directly; everything
//! goes through [`RuntimeClient`] so tests can substitute a recording mock.

pub mod docker;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::cancel::CancelToken;
use crate::errors::OpsError;

/// Observed state of the managed container.
/// Derived on demand; never cached, it can change externally at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerState {
    /// No container with the target name exists
    Absent,

    /// Container exists but its process has exited
    Stopped,

    /// Container exists and is running
    Running,
}

/// One host-to-container bind mount
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeMount {
    /// Host directory
    pub host: PathBuf,

    /// Mount point inside the container
    pub container: String,
}

/// Everything the runtime needs to create and start the container
#[derive(Debug, Clone)]
pub struct RunSpec {
    /// Container name
    pub name: String,

    /// Image to run
    pub image: String,

    /// Environment file injected at start
    pub env_file: PathBuf,

    /// Restart policy
    pub restart_policy: String,

    /// Bind mounts
    pub volumes: Vec<VolumeMount>,
}

/// Primitive operations required from the container runtime
#[async_trait]
pub trait RuntimeClient: Send + Sync {
    /// Verify the runtime is reachable and operational
    async fn ping(&self) -> Result<(), OpsError>;

    /// Build an image from `context`, optionally bypassing the layer cache
    async fn build_image(
        &self,
        image: &str,
        context: &Path,
        no_cache: bool,
    ) -> Result<(), OpsError>;

    /// Whether a container with `name` exists (running or stopped)
    async fn container_exists(&self, name: &str) -> Result<bool, OpsError>;

    /// Whether a container with `name` is currently running
    async fn container_running(&self, name: &str) -> Result<bool, OpsError>;

    /// Stop a container. No-op if it is already stopped or absent.
    async fn stop_container(&self, name: &str) -> Result<(), OpsError>;

    /// Remove a container. No-op if it is absent.
    async fn remove_container(&self, name: &str) -> Result<(), OpsError>;

    /// Create and start a container
    async fn run_container(&self, spec: &RunSpec) -> Result<(), OpsError>;

    /// Restart a container
    async fn restart_container(&self, name: &str) -> Result<(), OpsError>;

    /// Fetch log text, bounded to the last `tail` lines when given
    async fn fetch_logs(&self, name: &str, tail: Option<usize>) -> Result<String, OpsError>;

    /// Stream logs to the operator until `cancel` fires
    async fn follow_logs(&self, name: &str, cancel: &CancelToken) -> Result<(), OpsError>;

    /// Remove dangling images, keeping any carrying `exclude_label`
    async fn prune_dangling_images(&self, exclude_label: &str) -> Result<(), OpsError>;

    /// Derived container state
    async fn container_state(&self, name: &str) -> Result<ContainerState, OpsError> {
        if self.container_running(name).await? {
            Ok(ContainerState::Running)
        } else if self.container_exists(name).await? {
            Ok(ContainerState::Stopped)
        } else {
            Ok(ContainerState::Absent)
        }
    }
}
