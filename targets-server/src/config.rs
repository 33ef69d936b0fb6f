use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Settings for a process that follows a published targets file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// File the control plane writes the routing table to.
    pub targets_path: PathBuf,

    /// How often the file is checked for drift.
    pub reload_interval_ms: u64,

    /// One of trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            targets_path: PathBuf::from("./data/targets.json"),
            reload_interval_ms: 5_000,
            log_level: "info".to_string(),
        }
    }
}

impl WatchConfig {
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => Self::read_from_file(p),
            None => Ok(Self::default()),
        }
    }

    fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("reading {:?}", path.as_ref()))?;
        let cfg: WatchConfig = toml::from_str(&raw)
            .with_context(|| "parsing watch config TOML")?;
        Ok(cfg)
    }

    pub fn reload_interval(&self) -> Duration {
        Duration::from_millis(self.reload_interval_ms.max(1))
    }

    pub fn level(&self) -> Result<tracing::Level> {
        self.log_level
            .parse()
            .with_context(|| format!("invalid log level {:?}", self.log_level))
    }
}
