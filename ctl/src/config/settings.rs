//! Settings file management
//!
//! Compiled defaults cover the standard layout; an optional `botops.json`
//! next to the build context overrides individual fields.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::OpsError;
use crate::logs::LogLevel;

/// Controller settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Image name to build and run
    #[serde(default = "default_image_name")]
    pub image_name: String,

    /// Container name
    #[serde(default = "default_container_name")]
    pub container_name: String,

    /// Path to the environment file
    #[serde(default = "default_env_file")]
    pub env_file: String,

    /// Build context directory
    #[serde(default = "default_build_context")]
    pub build_context: String,

    /// Host logs directory (bind-mounted)
    #[serde(default = "default_logs_dir")]
    pub logs_dir: String,

    /// Host data directory (bind-mounted)
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Seconds to wait after start before the health probe
    #[serde(default = "default_grace_period")]
    pub grace_period_secs: u64,

    /// Log tail size for probes and post-deploy scans
    #[serde(default = "default_tail_lines")]
    pub tail_lines: usize,
}

fn default_image_name() -> String {
    "summarizer-bot".to_string()
}

fn default_container_name() -> String {
    "summarizer-bot".to_string()
}

fn default_env_file() -> String {
    ".env".to_string()
}

fn default_build_context() -> String {
    ".".to_string()
}

fn default_logs_dir() -> String {
    "logs".to_string()
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_grace_period() -> u64 {
    10
}

fn default_tail_lines() -> usize {
    50
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            image_name: default_image_name(),
            container_name: default_container_name(),
            env_file: default_env_file(),
            build_context: default_build_context(),
            logs_dir: default_logs_dir(),
            data_dir: default_data_dir(),
            grace_period_secs: default_grace_period(),
            tail_lines: default_tail_lines(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults when the file is
    /// absent. A present but malformed file is an error.
    pub async fn load_or_default(path: &Path) -> Result<Self, OpsError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = tokio::fs::read_to_string(path).await?;
        let settings = serde_json::from_str(&contents)?;
        Ok(settings)
    }
}
