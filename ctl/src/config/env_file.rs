//! Environment file validation
//!
//! The deployed service reads its secrets from a `.env` style file which is
//! injected into the container at start. Deploy refuses to touch the runtime
//! until every required key is present and non-empty.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::errors::OpsError;

/// Keys that must be present and non-empty, checked in this order
pub const REQUIRED_KEYS: &[&str] = &["TELEGRAM_BOT_TOKEN", "OPENAI_API_KEY"];

/// Parsed environment file contents
#[derive(Debug, Clone, Default)]
pub struct EnvironmentConfig {
    vars: HashMap<String, String>,
}

impl EnvironmentConfig {
    /// Look up a variable
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Number of parsed variables
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// Load and validate the environment file at `path`
///
/// Fails with [`OpsError::ConfigMissing`] if the file does not exist, and
/// with [`OpsError::ConfigIncomplete`] naming the first required key that is
/// missing or empty.
pub async fn validate(path: &Path) -> Result<EnvironmentConfig, OpsError> {
    if !path.exists() {
        return Err(OpsError::ConfigMissing(path.display().to_string()));
    }

    let contents = tokio::fs::read_to_string(path).await?;
    let config = parse(&contents);
    debug!("Parsed {} variables from {}", config.len(), path.display());

    for key in REQUIRED_KEYS {
        match config.get(key) {
            Some(value) if !value.trim().is_empty() => {}
            _ => return Err(OpsError::ConfigIncomplete(key.to_string())),
        }
    }

    Ok(config)
}

/// Parse `key=value` lines. Blank lines and `#` comments are skipped;
/// later duplicates overwrite earlier ones.
fn parse(contents: &str) -> EnvironmentConfig {
    let mut vars = HashMap::new();

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim().to_string();
            let value = strip_quotes(value.trim()).to_string();
            vars.insert(key, value);
        }
    }

    EnvironmentConfig { vars }
}

fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}
