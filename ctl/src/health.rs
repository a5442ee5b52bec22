//! Health probing
//!
//! Single-shot check: wait out the grace period, then ask the runtime
//! whether the container is in the running set. Log analysis on a healthy
//! container is advisory and never changes the verdict.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::{self, LogAnalysis, LogScope};
use crate::cancel::CancelToken;
use crate::errors::OpsError;
use crate::runtime::RuntimeClient;

/// Binary health verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthVerdict {
    Running,
    NotRunning,
}

/// Result of one probe. Produced fresh each time; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    /// Pass/fail verdict
    pub verdict: HealthVerdict,

    /// Whether a container with the target name exists at all; only used to
    /// sharpen the diagnostic when the verdict is NotRunning
    pub container_exists: bool,

    /// Advisory log classification, populated only when running
    pub analysis: Option<LogAnalysis>,

    /// When the probe completed
    pub checked_at: DateTime<Utc>,
}

impl HealthReport {
    /// Operator-facing description of a NotRunning verdict
    pub fn diagnosis(&self) -> &'static str {
        match (self.verdict, self.container_exists) {
            (HealthVerdict::Running, _) => "container is running",
            (HealthVerdict::NotRunning, true) => "container exists but has stopped",
            (HealthVerdict::NotRunning, false) => "container was never created",
        }
    }
}

/// Health prober over an abstract runtime
pub struct HealthProber<'a, R: RuntimeClient + ?Sized> {
    runtime: &'a R,
    tail_lines: usize,
}

impl<'a, R: RuntimeClient + ?Sized> HealthProber<'a, R> {
    pub fn new(runtime: &'a R, tail_lines: usize) -> Self {
        Self { runtime, tail_lines }
    }

    /// Probe `name` after `grace_period`. Cancellation during the wait
    /// aborts with [`OpsError::Cancelled`] before any runtime query.
    pub async fn probe(
        &self,
        name: &str,
        grace_period: Duration,
        cancel: &CancelToken,
    ) -> Result<HealthReport, OpsError> {
        debug!("Waiting {:?} before probing {}", grace_period, name);
        tokio::select! {
            _ = cancel.cancelled() => return Err(OpsError::Cancelled),
            _ = tokio::time::sleep(grace_period) => {}
        }

        if self.runtime.container_running(name).await? {
            let logs = self.runtime.fetch_logs(name, Some(self.tail_lines)).await?;
            let analysis = analysis::analyze(&logs, LogScope::Full);
            return Ok(HealthReport {
                verdict: HealthVerdict::Running,
                container_exists: true,
                analysis: Some(analysis),
                checked_at: Utc::now(),
            });
        }

        // Stopped vs never created only changes the printed diagnosis
        let exists = self.runtime.container_exists(name).await?;
        Ok(HealthReport {
            verdict: HealthVerdict::NotRunning,
            container_exists: exists,
            analysis: None,
            checked_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(verdict: HealthVerdict, exists: bool) -> HealthReport {
        HealthReport {
            verdict,
            container_exists: exists,
            analysis: None,
            checked_at: Utc::now(),
        }
    }

    #[test]
    fn test_diagnosis_strings() {
        assert_eq!(
            report(HealthVerdict::Running, true).diagnosis(),
            "container is running"
        );
        assert_eq!(
            report(HealthVerdict::NotRunning, true).diagnosis(),
            "container exists but has stopped"
        );
        assert_eq!(
            report(HealthVerdict::NotRunning, false).diagnosis(),
            "container was never created"
        );
    }
}
