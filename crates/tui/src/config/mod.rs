use chrono_tz::Tz;
use clap::{Parser, ValueEnum};
use serde::Deserialize;

use engine::Storage;

use crate::error::{AppError, Result};

const DEFAULT_CONFIG_PATH: &str = "config/alarmist.toml";
const MEMORY_STORAGE: &str = "memory";

/// Where the light/dark signal comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AppearanceSetting {
    /// Follow the desktop setting.
    System,
    Light,
    Dark,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Path of the store file, or `memory`.
    pub storage: String,
    /// IANA zone used for "today". Empty means local time.
    pub timezone: String,
    pub appearance: AppearanceSetting,
    pub appearance_poll_ms: u64,
    pub log_level: String,
    pub log_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: "data/alarmist_store.json".to_string(),
            timezone: String::new(),
            appearance: AppearanceSetting::System,
            appearance_poll_ms: 2000,
            log_level: "info".to_string(),
            log_file: "data/alarmist.log".to_string(),
        }
    }
}

impl AppConfig {
    pub fn storage(&self) -> Storage {
        if self.storage.trim().eq_ignore_ascii_case(MEMORY_STORAGE) {
            Storage::memory()
        } else {
            Storage::file(self.storage.trim())
        }
    }

    /// `None` means the local zone of the machine.
    pub fn reference_zone(&self) -> Result<Option<Tz>> {
        let name = self.timezone.trim();
        if name.is_empty() {
            return Ok(None);
        }
        name.parse::<Tz>()
            .map(Some)
            .map_err(|err| AppError::Timezone(format!("{name}: {err}")))
    }
}

#[derive(Debug, Parser)]
#[command(name = "alarmist", disable_version_flag = true)]
pub struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the store file path (`memory` keeps alarms in RAM only).
    #[arg(long)]
    storage: Option<String>,
    /// Override timezone (IANA name).
    #[arg(long)]
    timezone: Option<String>,
    /// Override the appearance source.
    #[arg(long, value_enum)]
    appearance: Option<AppearanceSetting>,
    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    load_from(Args::parse())
}

pub fn load_from(args: Args) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("ALARMIST"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(storage) = args.storage {
        settings.storage = storage;
    }
    if let Some(timezone) = args.timezone {
        settings.timezone = timezone;
    }
    if let Some(appearance) = args.appearance {
        settings.appearance = appearance;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }

    Ok(settings)
}
