//! Deployment target descriptor

use std::path::PathBuf;
use std::time::Duration;

use crate::config::settings::Settings;
use crate::runtime::{RunSpec, VolumeMount};

/// Restart policy applied to the managed container
pub const RESTART_POLICY: &str = "unless-stopped";

/// Immutable identity and configuration of the single managed service.
/// Built once at startup and passed by reference everywhere; never mutated.
#[derive(Debug, Clone)]
pub struct DeploymentTarget {
    /// Image name to build and run
    pub image_name: String,

    /// Container name
    pub container_name: String,

    /// Path to the environment file injected at start
    pub env_file: PathBuf,

    /// Build context directory
    pub build_context: PathBuf,

    /// Host directories bind-mounted into the container
    pub volumes: Vec<VolumeMount>,

    /// Wait after start before the running-state is considered meaningful
    pub grace_period: Duration,

    /// Log tail size used for health probes and post-deploy scans
    pub tail_lines: usize,
}

impl DeploymentTarget {
    /// Build a target from settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            image_name: settings.image_name.clone(),
            container_name: settings.container_name.clone(),
            env_file: PathBuf::from(&settings.env_file),
            build_context: PathBuf::from(&settings.build_context),
            volumes: vec![
                VolumeMount {
                    host: PathBuf::from(&settings.logs_dir),
                    container: "/app/logs".to_string(),
                },
                VolumeMount {
                    host: PathBuf::from(&settings.data_dir),
                    container: "/app/data".to_string(),
                },
            ],
            grace_period: Duration::from_secs(settings.grace_period_secs),
            tail_lines: settings.tail_lines,
        }
    }

    /// Run specification handed to the runtime client
    pub fn run_spec(&self) -> RunSpec {
        RunSpec {
            name: self.container_name.clone(),
            image: self.image_name.clone(),
            env_file: self.env_file.clone(),
            restart_policy: RESTART_POLICY.to_string(),
            volumes: self.volumes.clone(),
        }
    }
}

impl Default for DeploymentTarget {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_spec_carries_restart_policy() {
        let target = DeploymentTarget::default();
        let spec = target.run_spec();
        assert_eq!(spec.restart_policy, "unless-stopped");
        assert_eq!(spec.name, target.container_name);
        assert_eq!(spec.volumes.len(), 2);
    }
}
