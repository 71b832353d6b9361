use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::app_dirs::AppDirs;
use crate::grader::GraderKind;
use crate::session::SessionConfig;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub time_limit_secs: u64,
    pub violation_limit: u32,
    pub violation_grace_ms: u64,
    pub submit_delay_ms: u64,
    pub min_cols: u16,
    pub min_rows: u16,
    pub grader: GraderKind,
    pub grader_seed: Option<u64>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_limit_secs: 3600,
            violation_limit: 3,
            violation_grace_ms: 2000,
            submit_delay_ms: 1500,
            min_cols: 80,
            min_rows: 24,
            grader: GraderKind::Random,
            grader_seed: None,
            log_level: "info".to_string(),
        }
    }
}

/// Command-line values that take precedence over the stored config
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub time_limit_secs: Option<u64>,
    pub violation_limit: Option<u32>,
    pub min_cols: Option<u16>,
    pub min_rows: Option<u16>,
    pub grader: Option<GraderKind>,
    pub grader_seed: Option<u64>,
    pub log_level: Option<String>,
}

impl Config {
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(v) = overrides.time_limit_secs {
            self.time_limit_secs = v;
        }
        if let Some(v) = overrides.violation_limit {
            self.violation_limit = v;
        }
        if let Some(v) = overrides.min_cols {
            self.min_cols = v;
        }
        if let Some(v) = overrides.min_rows {
            self.min_rows = v;
        }
        if let Some(v) = overrides.grader {
            self.grader = v;
        }
        if overrides.grader_seed.is_some() {
            self.grader_seed = overrides.grader_seed;
        }
        if let Some(v) = &overrides.log_level {
            self.log_level = v.clone();
        }
        self
    }

    /// Zero limits are raised to one: a session always gets at least a
    /// second on the clock and one violation.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            time_limit_secs: self.time_limit_secs.max(1),
            violation_limit: self.violation_limit.max(1),
            violation_grace: Duration::from_millis(self.violation_grace_ms),
            submit_delay: Duration::from_millis(self.submit_delay_ms),
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("proctor_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), error = %e, "invalid config, using defaults");
                    Config::default()
                }
            },
            Err(_) => Config::default(),
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
