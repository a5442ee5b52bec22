//! Deployment stages and outcome

use serde::{Deserialize, Serialize};

use crate::errors::OpsError;
use crate::runtime::ContainerState;

/// Stages of one deployment run, in execution order.
/// No stage runs if an earlier stage failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployStage {
    /// Verify the container runtime is reachable
    DependencyCheck,

    /// Validate the environment file
    ConfigValidate,

    /// Idempotent teardown of any previous deployment
    Clean,

    /// Full image rebuild
    Build,

    /// Create and start the new container
    Start,

    /// Grace-period health probe
    HealthVerify,
}

impl DeployStage {
    /// All stages in execution order
    pub const ORDER: &'static [DeployStage] = &[
        DeployStage::DependencyCheck,
        DeployStage::ConfigValidate,
        DeployStage::Clean,
        DeployStage::Build,
        DeployStage::Start,
        DeployStage::HealthVerify,
    ];

    /// Human-readable stage name
    pub fn describe(&self) -> &'static str {
        match self {
            DeployStage::DependencyCheck => "dependency check",
            DeployStage::ConfigValidate => "configuration validation",
            DeployStage::Clean => "cleanup",
            DeployStage::Build => "image build",
            DeployStage::Start => "container start",
            DeployStage::HealthVerify => "health verification",
        }
    }
}

/// Result of one lifecycle run, consumed once by the CLI
#[derive(Debug)]
pub enum DeploymentOutcome {
    /// Deploy completed; the container was observed in this state
    Success(ContainerState),

    /// Deploy aborted at `stage`
    Failed {
        stage: DeployStage,
        error: OpsError,
    },
}

impl DeploymentOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DeploymentOutcome::Success(_))
    }

    /// Process exit code the CLI should use
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}
