use std::path::{Path, PathBuf};

use engine::WorkerConfig;
use serde::Deserialize;

/// Tunables for the solve loop. Defaults match the behavior the host was
/// tuned against: depth-18 searches, a 100 ms settle after each submission,
/// one second for a daily-puzzle navigation to load.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub search_depth: u8,
    /// Pause after submitting a move, letting host-side UI state (score
    /// counters, completion banners) update before it is read.
    pub settle_delay_ms: u64,
    /// Pause after each "next day" navigation before re-checking.
    pub daily_nav_delay_ms: u64,
    /// Engine binary path; conventional install locations are probed when
    /// unset.
    pub engine_path: Option<PathBuf>,
    pub engine_threads: Option<u32>,
    pub engine_hash_mb: Option<u32>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            search_depth: 18,
            settle_delay_ms: 100,
            daily_nav_delay_ms: 1000,
            engine_path: None,
            engine_threads: None,
            engine_hash_mb: None,
        }
    }
}

impl SolverConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn worker_config(&self) -> WorkerConfig {
        WorkerConfig {
            path: self.engine_path.clone(),
            threads: self.engine_threads,
            hash_mb: self.engine_hash_mb,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config file: {0}")]
    Parse(#[from] serde_json::Error),
}
