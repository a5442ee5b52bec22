//! Docker runtime client
//!
//! Shells out to the `docker` CLI. Build and run inherit the operator's
//! terminal so progress is visible; inspection commands capture output.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::cancel::CancelToken;
use crate::errors::OpsError;
use crate::runtime::{RunSpec, RuntimeClient};

/// Tail passed to `docker logs -f` so a follow starts with recent context
const FOLLOW_BACKLOG_LINES: usize = 50;

/// Docker CLI client
#[derive(Debug, Clone, Default)]
pub struct DockerClient;

impl DockerClient {
    pub fn new() -> Self {
        Self
    }

    /// Run docker with captured output, mapping spawn failures to `err`
    async fn capture(
        &self,
        args: &[&str],
        err: impl Fn(String) -> OpsError,
    ) -> Result<std::process::Output, OpsError> {
        Command::new("docker")
            .args(args)
            .output()
            .await
            .map_err(|e| err(format!("failed to run docker: {}", e)))
    }

    /// Exact-name match against a `docker ps` listing
    async fn name_listed(&self, name: &str, all: bool) -> Result<bool, OpsError> {
        let mut args = vec!["ps", "--format", "{{.Names}}"];
        if all {
            args.insert(1, "-a");
        }
        let output = self.capture(&args, OpsError::RuntimeError).await?;
        if !output.status.success() {
            return Err(OpsError::RuntimeError(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        let names = String::from_utf8_lossy(&output.stdout);
        Ok(names.lines().any(|line| line.trim() == name))
    }
}

#[async_trait]
impl RuntimeClient for DockerClient {
    async fn ping(&self) -> Result<(), OpsError> {
        let status = Command::new("docker")
            .args(["info"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| OpsError::DependencyMissing(format!("docker not found: {}", e)))?;

        if !status.success() {
            return Err(OpsError::DependencyMissing(
                "docker daemon is not responding".to_string(),
            ));
        }
        Ok(())
    }

    async fn build_image(
        &self,
        image: &str,
        context: &Path,
        no_cache: bool,
    ) -> Result<(), OpsError> {
        info!("Building image: {}", image);

        let mut command = Command::new("docker");
        command.arg("build");
        if no_cache {
            command.arg("--no-cache");
        }
        command.args(["-t", image]).arg(context);

        let status = command
            .status()
            .await
            .map_err(|e| OpsError::BuildFailure(format!("failed to run docker build: {}", e)))?;

        if !status.success() {
            return Err(OpsError::BuildFailure(format!(
                "docker build failed for {}",
                image
            )));
        }
        Ok(())
    }

    async fn container_exists(&self, name: &str) -> Result<bool, OpsError> {
        self.name_listed(name, true).await
    }

    async fn container_running(&self, name: &str) -> Result<bool, OpsError> {
        self.name_listed(name, false).await
    }

    async fn stop_container(&self, name: &str) -> Result<(), OpsError> {
        if !self.container_exists(name).await? {
            debug!("No container named {} to stop", name);
            return Ok(());
        }

        let output = self
            .capture(&["stop", name], OpsError::RuntimeError)
            .await?;
        if !output.status.success() {
            return Err(OpsError::RuntimeError(format!(
                "docker stop failed for {}: {}",
                name,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        info!("Stopped container: {}", name);
        Ok(())
    }

    async fn remove_container(&self, name: &str) -> Result<(), OpsError> {
        if !self.container_exists(name).await? {
            debug!("No container named {} to remove", name);
            return Ok(());
        }

        let output = self.capture(&["rm", name], OpsError::RuntimeError).await?;
        if !output.status.success() {
            return Err(OpsError::RuntimeError(format!(
                "docker rm failed for {}: {}",
                name,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        info!("Removed container: {}", name);
        Ok(())
    }

    async fn run_container(&self, spec: &RunSpec) -> Result<(), OpsError> {
        info!("Starting container {} from image {}", spec.name, spec.image);

        let mut command = Command::new("docker");
        command
            .args(["run", "-d", "--name", &spec.name])
            .args(["--restart", &spec.restart_policy])
            .arg("--env-file")
            .arg(&spec.env_file);

        for mount in &spec.volumes {
            command.arg("-v");
            command.arg(format!(
                "{}:{}",
                mount.host.display(),
                mount.container
            ));
        }
        command.arg(&spec.image);

        let output = command
            .output()
            .await
            .map_err(|e| OpsError::RunFailure(format!("failed to run docker run: {}", e)))?;

        if !output.status.success() {
            return Err(OpsError::RunFailure(format!(
                "docker run failed for {}: {}",
                spec.image,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }

    async fn restart_container(&self, name: &str) -> Result<(), OpsError> {
        if !self.container_exists(name).await? {
            return Err(OpsError::NoContainer(name.to_string()));
        }

        let output = self
            .capture(&["restart", name], OpsError::RuntimeError)
            .await?;
        if !output.status.success() {
            return Err(OpsError::RuntimeError(format!(
                "docker restart failed for {}: {}",
                name,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        info!("Restarted container: {}", name);
        Ok(())
    }

    async fn fetch_logs(&self, name: &str, tail: Option<usize>) -> Result<String, OpsError> {
        let tail_arg;
        let mut args = vec!["logs"];
        if let Some(n) = tail {
            tail_arg = n.to_string();
            args.push("--tail");
            args.push(&tail_arg);
        }
        args.push(name);

        let output = self.capture(&args, OpsError::RuntimeError).await?;
        if !output.status.success() {
            return Err(OpsError::NoContainer(name.to_string()));
        }

        // The application logs to both streams; merge them in order of
        // stdout then stderr, which is what the CLI shows anyway
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(text)
    }

    async fn follow_logs(&self, name: &str, cancel: &CancelToken) -> Result<(), OpsError> {
        let backlog = FOLLOW_BACKLOG_LINES.to_string();
        let mut child = Command::new("docker")
            .args(["logs", "-f", "--tail", &backlog, name])
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| OpsError::RuntimeError(format!("failed to run docker logs: {}", e)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| OpsError::RuntimeError("no stdout from docker logs".to_string()))?;
        let mut lines = BufReader::new(stdout).lines();

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    let _ = child.kill().await;
                    debug!("Log follow cancelled for {}", name);
                    return Ok(());
                }
                line = lines.next_line() => {
                    match line {
                        Ok(Some(line)) => println!("{}", line),
                        Ok(None) => return Ok(()),
                        Err(e) => {
                            let _ = child.kill().await;
                            return Err(OpsError::IoError(e));
                        }
                    }
                }
            }
        }
    }

    async fn prune_dangling_images(&self, exclude_label: &str) -> Result<(), OpsError> {
        let filter = format!("label!={}", exclude_label);
        let output = self
            .capture(
                &["image", "prune", "-f", "--filter", &filter],
                OpsError::RuntimeError,
            )
            .await?;

        if !output.status.success() {
            warn!(
                "Image prune failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Err(OpsError::RuntimeError("docker image prune failed".to_string()));
        }
        Ok(())
    }
}
