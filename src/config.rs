/// Monitor configuration loader - parses auromon.toml
///
/// Observer location, language and timing live in the TOML file so they can
/// be changed without recompiling. Every key is optional; a missing file
/// means "all defaults". Push credentials are never read from the file, only
/// from the environment (`API_KEY`, `USER_KEY`, `.env` supported).

use std::env;
use std::fs;
use std::io;
use std::path::Path;

use chrono::NaiveTime;
use serde::Deserialize;
use thiserror::Error;

use crate::levels::Language;
use crate::monitor::daylight::DayWindow;

pub const DEFAULT_CONFIG_PATH: &str = "auromon.toml";
pub const CONFIG_PATH_VAR: &str = "AUROMON_CONFIG";

const SECOND: i64 = 1;
const MINUTE: i64 = 60 * SECOND;
const HOUR: i64 = 60 * MINUTE;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("environment variable {0} is not set or empty")]
    MissingCredential(&'static str),

    #[error("{0}")]
    InvalidLanguage(String),

    #[error("{field}: '{value}' is not a HH:MM time")]
    InvalidTime { field: &'static str, value: String },

    #[error("{field} = {value} is out of range")]
    OutOfRange { field: &'static str, value: i64 },
}

// ---------------------------------------------------------------------------
// File format
// ---------------------------------------------------------------------------

/// Raw TOML contents before validation.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct ConfigFile {
    latitude: i32,
    longitude: i32,
    language: String,
    check_interval_secs: i64,
    reset_delay_night_secs: i64,
    reset_delay_day_secs: i64,
    day_start: String,
    day_end: String,
    step_interval_secs: u64,
    keep_running_on_error: bool,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            latitude: 60,
            longitude: 18,
            language: "pl".to_string(),
            check_interval_secs: MINUTE,
            reset_delay_night_secs: HOUR,
            reset_delay_day_secs: 4 * HOUR,
            day_start: "06:00".to_string(),
            day_end: "19:00".to_string(),
            step_interval_secs: 3,
            keep_running_on_error: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Validated configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    /// Observer latitude, whole degrees.
    pub latitude: i32,
    /// Observer longitude, whole degrees east in 0..360 (OVATION grid).
    pub longitude: i32,
    pub language: Language,
    /// Seconds between feed checks.
    pub check_interval_secs: i64,
    /// Seconds between level resets at night.
    pub reset_delay_night_secs: i64,
    /// Seconds between level resets during the day.
    pub reset_delay_day_secs: i64,
    pub day_window: DayWindow,
    /// Sleep between loop iterations.
    pub step_interval_secs: u64,
    /// Log failed cycles and keep looping instead of stopping.
    pub keep_running_on_error: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            latitude: 60,
            longitude: 18,
            language: Language::Pl,
            check_interval_secs: MINUTE,
            reset_delay_night_secs: HOUR,
            reset_delay_day_secs: 4 * HOUR,
            day_window: DayWindow::default(),
            step_interval_secs: 3,
            keep_running_on_error: false,
        }
    }
}

impl TryFrom<ConfigFile> for MonitorConfig {
    type Error = ConfigError;

    fn try_from(file: ConfigFile) -> Result<Self, Self::Error> {
        if !(-90..=90).contains(&file.latitude) {
            return Err(ConfigError::OutOfRange {
                field: "latitude",
                value: file.latitude.into(),
            });
        }
        if !(-180..360).contains(&file.longitude) {
            return Err(ConfigError::OutOfRange {
                field: "longitude",
                value: file.longitude.into(),
            });
        }
        // A zero delay disarms its clock event; a zero step busy-loops.
        for (field, value) in [
            ("check_interval_secs", file.check_interval_secs),
            ("reset_delay_night_secs", file.reset_delay_night_secs),
            ("reset_delay_day_secs", file.reset_delay_day_secs),
        ] {
            if value <= 0 {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }
        if file.step_interval_secs == 0 {
            return Err(ConfigError::OutOfRange {
                field: "step_interval_secs",
                value: 0,
            });
        }

        let language = file
            .language
            .parse::<Language>()
            .map_err(ConfigError::InvalidLanguage)?;

        let start = parse_time("day_start", &file.day_start)?;
        let end = parse_time("day_end", &file.day_end)?;

        Ok(Self {
            latitude: file.latitude,
            // OVATION publishes 0..359 east; accept -180..-1 and wrap it.
            longitude: file.longitude.rem_euclid(360),
            language,
            check_interval_secs: file.check_interval_secs,
            reset_delay_night_secs: file.reset_delay_night_secs,
            reset_delay_day_secs: file.reset_delay_day_secs,
            day_window: DayWindow::new(start, end),
            step_interval_secs: file.step_interval_secs,
            keep_running_on_error: file.keep_running_on_error,
        })
    }
}

impl MonitorConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(contents)?;
        Self::try_from(file)
    }

    /// Loads and validates the file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Like `load`, but a file that does not exist yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Path from `AUROMON_CONFIG`, falling back to `auromon.toml`.
    pub fn default_path() -> String {
        env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
    }
}

fn parse_time(field: &'static str, value: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| ConfigError::InvalidTime {
        field,
        value: value.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Pushover application token and recipient user key.
#[derive(Clone, PartialEq)]
pub struct Credentials {
    pub api_key: String,
    pub user_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"***")
            .field("user_key", &"***")
            .finish()
    }
}

impl Credentials {
    pub fn new(api_key: &str, user_key: &str) -> Result<Self, ConfigError> {
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingCredential("API_KEY"));
        }
        if user_key.trim().is_empty() {
            return Err(ConfigError::MissingCredential("USER_KEY"));
        }
        Ok(Self {
            api_key: api_key.trim().to_string(),
            user_key: user_key.trim().to_string(),
        })
    }

    /// Reads `API_KEY` and `USER_KEY`, loading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let api_key = env::var("API_KEY").map_err(|_| ConfigError::MissingCredential("API_KEY"))?;
        let user_key = env::var("USER_KEY").map_err(|_| ConfigError::MissingCredential("USER_KEY"))?;
        Self::new(&api_key, &user_key)
    }
}
