use std::{fs::OpenOptions, path::Path, sync::Mutex};

use tracing_subscriber::EnvFilter;

use crate::{
    config::AppConfig,
    error::{AppError, Result},
};

/// Sends tracing output to the configured log file. The terminal is owned by
/// the UI, so nothing is ever written to stdout.
pub fn init(config: &AppConfig) -> Result<()> {
    let path = Path::new(&config.log_file);
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter(&config.log_level)?)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| AppError::Logging(err.to_string()))
}

fn filter(level: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(format!(
        "alarmist={level},engine={level}",
        level = level.trim()
    ))
    .map_err(|err| AppError::Logging(err.to_string()))
}
