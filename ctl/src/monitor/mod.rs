//! Diagnostics monitor
//!
//! Pure routing plus formatting over the prober, analyzer, and runtime
//! client. No lifecycle or classification logic lives here.

pub mod commands;

use std::time::Duration;

use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::analysis::{self, LogScope};
use crate::cancel::CancelToken;
use crate::config::target::DeploymentTarget;
use crate::errors::OpsError;
use crate::health::{HealthProber, HealthVerdict};
use crate::monitor::commands::MonitorCommand;
use crate::runtime::{ContainerState, RuntimeClient};

/// Diagnostics monitor for one target
pub struct Monitor<'a, R: RuntimeClient + ?Sized> {
    runtime: &'a R,
    target: &'a DeploymentTarget,
}

impl<'a, R: RuntimeClient + ?Sized> Monitor<'a, R> {
    pub fn new(runtime: &'a R, target: &'a DeploymentTarget) -> Self {
        Self { runtime, target }
    }

    /// Dispatch one command
    pub async fn dispatch(
        &self,
        command: MonitorCommand,
        cancel: &CancelToken,
    ) -> Result<(), OpsError> {
        debug!("Dispatching monitor command: {}", command);
        match command {
            MonitorCommand::Status => self.status(cancel).await,
            MonitorCommand::Logs => self.logs().await,
            MonitorCommand::Errors => self.errors().await,
            MonitorCommand::Follow => self.follow(cancel).await,
            MonitorCommand::Restart => self.restart().await,
            MonitorCommand::Commands => {
                print_command_reference();
                Ok(())
            }
            MonitorCommand::Exit => Ok(()),
        }
    }

    /// Interactive loop; leaves only on the exit command or cancellation
    pub async fn interactive(&self, cancel: &CancelToken) -> Result<(), OpsError> {
        let stdin = BufReader::new(tokio::io::stdin());
        let mut lines = stdin.lines();

        loop {
            print_menu(&self.target.container_name);

            let line = tokio::select! {
                _ = cancel.cancelled() => {
                    println!("\n{}", "Monitor interrupted.".yellow());
                    return Err(OpsError::Cancelled);
                }
                line = lines.next_line() => line?,
            };

            let Some(line) = line else {
                // stdin closed
                return Ok(());
            };
            if line.trim().is_empty() {
                continue;
            }

            let Some(command) = MonitorCommand::from_menu(&line) else {
                println!("{} unknown selection: {}", "error:".red(), line.trim());
                continue;
            };

            if command == MonitorCommand::Exit {
                return Ok(());
            }

            // Diagnostic errors are reported inline; the session continues
            if let Err(e) = self.dispatch(command, cancel).await {
                match e {
                    OpsError::Cancelled => return Err(OpsError::Cancelled),
                    e => println!("{} {}", "error:".red(), e),
                }
            }
        }
    }

    async fn status(&self, cancel: &CancelToken) -> Result<(), OpsError> {
        let state = self.runtime.container_state(&self.target.container_name).await?;
        match state {
            ContainerState::Absent => {
                println!(
                    "{} container {} does not exist",
                    "status:".bold(),
                    self.target.container_name
                );
                return Ok(());
            }
            ContainerState::Stopped => {
                println!(
                    "{} container {} exists but is {}",
                    "status:".bold(),
                    self.target.container_name,
                    "stopped".red()
                );
                return Ok(());
            }
            ContainerState::Running => {}
        }

        // Running: add the advisory log summary, no grace wait needed
        let prober = HealthProber::new(self.runtime, self.target.tail_lines);
        let report = prober
            .probe(&self.target.container_name, Duration::ZERO, cancel)
            .await?;

        println!(
            "{} container {} is {}",
            "status:".bold(),
            self.target.container_name,
            "running".green()
        );
        if report.verdict == HealthVerdict::Running {
            if let Some(analysis) = &report.analysis {
                println!(
                    "  last {} lines: {} error(s), {} warning(s)",
                    self.target.tail_lines, analysis.error_count, analysis.warning_count
                );
            }
        }
        Ok(())
    }

    async fn logs(&self) -> Result<(), OpsError> {
        self.require_container().await?;
        let text = self
            .runtime
            .fetch_logs(&self.target.container_name, Some(self.target.tail_lines))
            .await?;
        if text.trim().is_empty() {
            println!("(no log output yet)");
        } else {
            print!("{}", text);
        }
        Ok(())
    }

    async fn errors(&self) -> Result<(), OpsError> {
        self.require_container().await?;
        let text = self
            .runtime
            .fetch_logs(&self.target.container_name, None)
            .await?;
        let analysis = analysis::analyze(&text, LogScope::Full);

        println!(
            "{} {} error line(s), {} warning line(s)",
            "analysis:".bold(),
            analysis.error_count,
            analysis.warning_count
        );
        if !analysis.sample_errors.is_empty() {
            println!("recent errors:");
            for line in &analysis.sample_errors {
                println!("  {}", line.red());
            }
        }
        if !analysis.sample_warnings.is_empty() {
            println!("recent warnings:");
            for line in &analysis.sample_warnings {
                println!("  {}", line.yellow());
            }
        }
        Ok(())
    }

    async fn follow(&self, cancel: &CancelToken) -> Result<(), OpsError> {
        self.require_container().await?;
        println!(
            "Following logs for {} (Ctrl-C to stop)...",
            self.target.container_name
        );
        self.runtime
            .follow_logs(&self.target.container_name, cancel)
            .await
    }

    async fn restart(&self) -> Result<(), OpsError> {
        self.runtime
            .restart_container(&self.target.container_name)
            .await?;
        println!("Container {} restarted.", self.target.container_name);
        Ok(())
    }

    async fn require_container(&self) -> Result<(), OpsError> {
        if !self
            .runtime
            .container_exists(&self.target.container_name)
            .await?
        {
            return Err(OpsError::NoContainer(self.target.container_name.clone()));
        }
        Ok(())
    }
}

fn print_menu(container: &str) {
    println!();
    println!("{} {}", "Monitoring".bold(), container);
    println!("  1) status    container state and log summary");
    println!("  2) logs      recent log tail");
    println!("  3) errors    error/warning analysis");
    println!("  4) follow    live log stream");
    println!("  5) restart   restart the container");
    println!("  6) commands  command reference");
    println!("  0) exit");
    print!("> ");
    use std::io::Write;
    let _ = std::io::stdout().flush();
}

fn print_command_reference() {
    println!("Available commands:");
    println!("  botops deploy                  run the full deployment sequence");
    println!("  botops monitor                 interactive diagnostics");
    println!("  botops monitor status          container state and log summary");
    println!("  botops monitor logs            recent log tail");
    println!("  botops monitor errors          error/warning analysis");
    println!("  botops monitor commands        this reference");
    println!("  botops --version               version info");
}
