//! Deployment lifecycle controller
//!
//! Drives one deploy run stage-by-stage with short-circuit-on-failure
//! semantics. All side effects go through the runtime client; the controller
//! holds no state between stages beyond the target and the evolving outcome.

use colored::Colorize;
use tracing::{info, warn};

use crate::cancel::CancelToken;
use crate::config::env_file;
use crate::config::target::DeploymentTarget;
use crate::deploy::outcome::{DeployStage, DeploymentOutcome};
use crate::errors::OpsError;
use crate::health::{HealthProber, HealthVerdict};
use crate::runtime::{ContainerState, RuntimeClient};
use crate::storage::layout::HostLayout;

/// Images carrying this label survive the dangling-image prune
pub const PRUNE_KEEP_LABEL: &str = "keep=true";

/// Lifecycle controller for one deployment target
pub struct LifecycleController<'a, R: RuntimeClient + ?Sized> {
    runtime: &'a R,
    target: DeploymentTarget,
}

impl<'a, R: RuntimeClient + ?Sized> LifecycleController<'a, R> {
    pub fn new(runtime: &'a R, target: DeploymentTarget) -> Self {
        Self { runtime, target }
    }

    pub fn target(&self) -> &DeploymentTarget {
        &self.target
    }

    /// Run the full deploy sequence. Never returns Err; every failure is
    /// folded into the outcome together with the stage that produced it.
    pub async fn deploy(&self, cancel: &CancelToken) -> DeploymentOutcome {
        for stage in DeployStage::ORDER {
            if cancel.is_cancelled() {
                return DeploymentOutcome::Failed {
                    stage: *stage,
                    error: OpsError::Cancelled,
                };
            }

            println!("{} {}", "==>".cyan().bold(), stage.describe());
            if let Err(error) = self.run_stage(*stage, cancel).await {
                return DeploymentOutcome::Failed { stage: *stage, error };
            }
        }

        DeploymentOutcome::Success(ContainerState::Running)
    }

    async fn run_stage(&self, stage: DeployStage, cancel: &CancelToken) -> Result<(), OpsError> {
        match stage {
            DeployStage::DependencyCheck => self.check_dependency().await,
            DeployStage::ConfigValidate => self.validate_config().await,
            DeployStage::Clean => self.clean().await,
            DeployStage::Build => self.build().await,
            DeployStage::Start => self.start().await,
            DeployStage::HealthVerify => self.verify_health(cancel).await,
        }
    }

    async fn check_dependency(&self) -> Result<(), OpsError> {
        self.runtime.ping().await
    }

    async fn validate_config(&self) -> Result<(), OpsError> {
        let config = env_file::validate(&self.target.env_file).await?;
        info!(
            "Environment file {} validated ({} variables)",
            self.target.env_file.display(),
            config.len()
        );

        // Bind-mount sources must exist before any mutating runtime call
        let layout = HostLayout::from_target(&self.target);
        layout.setup().await?;
        Ok(())
    }

    /// Idempotent teardown: deploying into a clean host and deploying over
    /// an existing deployment converge to the same end state.
    async fn clean(&self) -> Result<(), OpsError> {
        let name = &self.target.container_name;

        if self.runtime.container_exists(name).await? {
            self.runtime.stop_container(name).await?;
            self.runtime.remove_container(name).await?;
            info!("Removed previous deployment of {}", name);
        } else {
            info!("No previous deployment of {}", name);
        }

        // Reclaiming build leftovers is best-effort
        if let Err(e) = self.runtime.prune_dangling_images(PRUNE_KEEP_LABEL).await {
            warn!("Dangling image prune failed: {}", e);
        }
        Ok(())
    }

    async fn build(&self) -> Result<(), OpsError> {
        self.runtime
            .build_image(&self.target.image_name, &self.target.build_context, true)
            .await
    }

    async fn start(&self) -> Result<(), OpsError> {
        self.runtime.run_container(&self.target.run_spec()).await
    }

    async fn verify_health(&self, cancel: &CancelToken) -> Result<(), OpsError> {
        let prober = HealthProber::new(self.runtime, self.target.tail_lines);
        let report = prober
            .probe(&self.target.container_name, self.target.grace_period, cancel)
            .await?;

        if report.verdict == HealthVerdict::NotRunning {
            // Left in place for inspection; rollback is out of scope
            return Err(OpsError::ContainerNotRunning(report.diagnosis().to_string()));
        }

        // A running container can still be logging fatal application errors;
        // that is reported, not treated as a deploy failure
        if let Some(analysis) = &report.analysis {
            if analysis.has_errors() {
                warn!(
                    "Container is running but logged {} error line(s) in the last {} lines",
                    analysis.error_count, self.target.tail_lines
                );
                println!(
                    "{} {} error line(s) and {} warning line(s) in recent logs:",
                    "warning:".yellow().bold(),
                    analysis.error_count,
                    analysis.warning_count
                );
                for line in &analysis.sample_errors {
                    println!("    {}", line.red());
                }
            } else if analysis.warning_count > 0 {
                println!(
                    "{} {} warning line(s) in recent logs",
                    "note:".yellow(),
                    analysis.warning_count
                );
            }
        }

        Ok(())
    }
}
