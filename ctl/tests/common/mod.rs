//! Shared test support: a recording runtime mock

// Not every test target uses every helper
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use botops::cancel::CancelToken;
use botops::config::target::DeploymentTarget;
use botops::errors::OpsError;
use botops::runtime::{RunSpec, RuntimeClient, VolumeMount};

/// Internal container state tracked by the mock
#[derive(Debug, Default)]
struct MockState {
    exists: bool,
    running: bool,
}

/// Recording in-memory runtime
pub struct MockRuntime {
    state: Mutex<MockState>,
    calls: Mutex<Vec<String>>,

    /// Whether ping succeeds
    pub ping_ok: bool,

    /// Whether build succeeds
    pub build_ok: bool,

    /// Whether run succeeds
    pub run_ok: bool,

    /// Whether the container stays running after a successful run
    /// (false simulates an entry process that exits during the grace period)
    pub stays_running: bool,

    /// Log text returned by fetch_logs
    pub log_text: String,
}

impl Default for MockRuntime {
    fn default() -> Self {
        Self {
            state: Mutex::new(MockState::default()),
            calls: Mutex::new(Vec::new()),
            ping_ok: true,
            build_ok: true,
            run_ok: true,
            stays_running: true,
            log_text: String::new(),
        }
    }
}

impl MockRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a host that already has the named container running
    pub fn with_existing_running(mut self) -> Self {
        self.state = Mutex::new(MockState {
            exists: true,
            running: true,
        });
        self
    }

    /// Recorded calls, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Count of recorded calls whose name matches `op`
    pub fn count(&self, op: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.split_whitespace().next() == Some(op))
            .count()
    }

    /// Calls that mutate runtime state
    pub fn mutating_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| {
                let op = c.split_whitespace().next().unwrap_or("");
                matches!(op, "stop" | "remove" | "run" | "build" | "restart" | "prune")
            })
            .collect()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl RuntimeClient for MockRuntime {
    async fn ping(&self) -> Result<(), OpsError> {
        self.record("ping".to_string());
        if self.ping_ok {
            Ok(())
        } else {
            Err(OpsError::DependencyMissing("mock daemon down".to_string()))
        }
    }

    async fn build_image(
        &self,
        image: &str,
        _context: &Path,
        no_cache: bool,
    ) -> Result<(), OpsError> {
        self.record(format!("build {} no_cache={}", image, no_cache));
        if self.build_ok {
            Ok(())
        } else {
            Err(OpsError::BuildFailure(format!("mock build failed for {}", image)))
        }
    }

    async fn container_exists(&self, name: &str) -> Result<bool, OpsError> {
        self.record(format!("exists {}", name));
        Ok(self.state.lock().unwrap().exists)
    }

    async fn container_running(&self, name: &str) -> Result<bool, OpsError> {
        self.record(format!("running {}", name));
        Ok(self.state.lock().unwrap().running)
    }

    async fn stop_container(&self, name: &str) -> Result<(), OpsError> {
        self.record(format!("stop {}", name));
        self.state.lock().unwrap().running = false;
        Ok(())
    }

    async fn remove_container(&self, name: &str) -> Result<(), OpsError> {
        self.record(format!("remove {}", name));
        let mut state = self.state.lock().unwrap();
        state.exists = false;
        state.running = false;
        Ok(())
    }

    async fn run_container(&self, spec: &RunSpec) -> Result<(), OpsError> {
        self.record(format!("run {}", spec.name));
        if !self.run_ok {
            return Err(OpsError::RunFailure(format!("mock run failed for {}", spec.image)));
        }
        let mut state = self.state.lock().unwrap();
        state.exists = true;
        state.running = self.stays_running;
        Ok(())
    }

    async fn restart_container(&self, name: &str) -> Result<(), OpsError> {
        self.record(format!("restart {}", name));
        let mut state = self.state.lock().unwrap();
        if !state.exists {
            return Err(OpsError::NoContainer(name.to_string()));
        }
        state.running = true;
        Ok(())
    }

    async fn fetch_logs(&self, name: &str, tail: Option<usize>) -> Result<String, OpsError> {
        self.record(format!("logs {} tail={:?}", name, tail));
        if !self.state.lock().unwrap().exists {
            return Err(OpsError::NoContainer(name.to_string()));
        }
        Ok(self.log_text.clone())
    }

    async fn follow_logs(&self, name: &str, _cancel: &CancelToken) -> Result<(), OpsError> {
        self.record(format!("follow {}", name));
        Ok(())
    }

    async fn prune_dangling_images(&self, exclude_label: &str) -> Result<(), OpsError> {
        self.record(format!("prune {}", exclude_label));
        Ok(())
    }
}

/// Target pointing at temp-dir fixtures, with a zero grace period
pub fn test_target(root: &Path, env_file: PathBuf) -> DeploymentTarget {
    DeploymentTarget {
        image_name: "summarizer-bot".to_string(),
        container_name: "summarizer-bot".to_string(),
        env_file,
        build_context: root.to_path_buf(),
        volumes: vec![
            VolumeMount {
                host: root.join("logs"),
                container: "/app/logs".to_string(),
            },
            VolumeMount {
                host: root.join("data"),
                container: "/app/data".to_string(),
            },
        ],
        grace_period: Duration::ZERO,
        tail_lines: 50,
    }
}

/// Write a valid env file into `dir` and return its path
pub fn write_env_file(dir: &Path) -> PathBuf {
    let path = dir.join(".env");
    std::fs::write(&path, "TELEGRAM_BOT_TOKEN=token\nOPENAI_API_KEY=sk-test\n").unwrap();
    path
}
