/// Learning configuration
///
/// Where the snapshot lives and how much history to keep.

use crate::error::{LearningError, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Snapshot file name inside the data directory
pub const SNAPSHOT_FILE: &str = "learning.json";

/// Default cap on stored actions
pub const DEFAULT_MAX_ACTIONS: usize = 1000;

/// Env var overriding the data directory
pub const DATA_DIR_ENV: &str = "HELPDESK_LEARNING_DIR";

/// Env var overriding the action cap
pub const MAX_ACTIONS_ENV: &str = "HELPDESK_MAX_ACTIONS";

const DEFAULT_DIR_NAME: &str = ".helpdesk-assistant";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearningConfig {
    pub data_dir: PathBuf,
    pub max_actions: usize,
}

impl Default for LearningConfig {
    fn default() -> Self {
        // No home dir (some CI sandboxes): fall back to the working directory
        let base = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));

        Self {
            data_dir: base.join(DEFAULT_DIR_NAME),
            max_actions: DEFAULT_MAX_ACTIONS,
        }
    }
}

impl LearningConfig {
    /// Config rooted at an explicit directory
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            max_actions: DEFAULT_MAX_ACTIONS,
        }
    }

    /// Defaults, overridden by `HELPDESK_LEARNING_DIR` / `HELPDESK_MAX_ACTIONS`
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(dir) = env::var(DATA_DIR_ENV) {
            if !dir.trim().is_empty() {
                config.data_dir = PathBuf::from(dir);
            }
        }

        if let Ok(raw) = env::var(MAX_ACTIONS_ENV) {
            config.max_actions = raw.trim().parse().map_err(|_| {
                LearningError::Config(format!("{} must be a positive integer, got '{}'", MAX_ACTIONS_ENV, raw))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_max_actions(mut self, max_actions: usize) -> Self {
        self.max_actions = max_actions;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_actions == 0 {
            return Err(LearningError::Config(
                "max_actions must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Full path of the persisted snapshot
    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(SNAPSHOT_FILE)
    }
}
