//! Error types for the botops controller

use thiserror::Error;

/// Main error type for the deployment and diagnostics controller
#[derive(Error, Debug)]
pub enum OpsError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("container runtime is not available: {0}")]
    DependencyMissing(String),

    #[error("environment file not found: {0}")]
    ConfigMissing(String),

    #[error("required key missing or empty in environment file: {0}")]
    ConfigIncomplete(String),

    #[error("image build failed: {0}")]
    BuildFailure(String),

    #[error("container start failed: {0}")]
    RunFailure(String),

    #[error("container is not running: {0}")]
    ContainerNotRunning(String),

    #[error("no container to inspect: {0}")]
    NoContainer(String),

    #[error("runtime command error: {0}")]
    RuntimeError(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl From<anyhow::Error> for OpsError {
    fn from(err: anyhow::Error) -> Self {
        OpsError::RuntimeError(err.to_string())
    }
}
