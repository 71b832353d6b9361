//! Log setup. The terminal belongs to the UI, so events go to a file.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Error)]
pub enum LogError {
    #[error("invalid log filter: {0}")]
    InvalidFilter(String),
    #[error("failed to open log file {path}: {source}")]
    FileOpen {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("subscriber already initialized")]
    AlreadyInitialized,
}

/// `RUST_LOG` takes precedence over the configured level
pub fn build_filter(level: &str) -> Result<EnvFilter, LogError> {
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(env) if !env.is_empty() => {
            EnvFilter::try_new(env).map_err(|e| LogError::InvalidFilter(e.to_string()))
        }
        _ => EnvFilter::try_new(level).map_err(|e| LogError::InvalidFilter(e.to_string())),
    }
}

pub fn init_logging(level: &str, path: &Path) -> Result<(), LogError> {
    let filter = build_filter(level)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| LogError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LogError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(|_| LogError::AlreadyInitialized)
}
