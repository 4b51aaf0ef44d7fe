//! Configuration management
//!
//! Settings are resolved in this order of precedence:
//! 1. Environment variables
//! 2. `vault-calendar.toml`
//! 3. Defaults
//!
//! Inside the TOML file, `${VAR_NAME}` is replaced by the environment value.

use std::path::Path;
use std::time::Duration;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = "vault-calendar.toml";

/// Where the markdown vault lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Root directory scanned for tasks
    #[serde(default = "default_vault_root")]
    pub root: String,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            root: default_vault_root(),
        }
    }
}

/// Structured query settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct QueryConfig {
    /// Query source expression. Empty selects the default task scan.
    #[serde(default)]
    pub source: String,
}

/// Calendar display and refresh settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarSettings {
    /// Quiet period after a change before the calendar reloads
    #[serde(default = "default_update_delay_ms")]
    pub update_delay_ms: u64,

    /// First column of the grid (0 = Sunday .. 6 = Saturday)
    #[serde(default)]
    pub start_of_week: u8,

    /// Whether to print the row of day labels
    #[serde(default = "default_display_head")]
    pub display_head: bool,

    /// chrono format string for the month heading
    #[serde(default = "default_month_format")]
    pub month_format: String,

    /// Column labels, Sunday first
    #[serde(default = "default_day_labels")]
    pub day_labels: Vec<String>,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            update_delay_ms: default_update_delay_ms(),
            start_of_week: 0,
            display_head: default_display_head(),
            month_format: default_month_format(),
            day_labels: default_day_labels(),
        }
    }
}

impl CalendarSettings {
    /// Debounce delay as a `Duration`
    pub fn update_delay(&self) -> Duration {
        Duration::from_millis(self.update_delay_ms)
    }

    /// Weekday shown in the first column
    pub fn week_start(&self) -> Weekday {
        weekday_from_sunday(self.start_of_week)
    }

    /// Label for a weekday column
    pub fn day_label(&self, day: Weekday) -> &str {
        let index = day.num_days_from_sunday() as usize;
        self.day_labels.get(index).map(String::as_str).unwrap_or_default()
    }

    fn validate(&self) -> crate::Result<()> {
        if self.start_of_week > 6 {
            return Err(Error::Config(format!(
                "start_of_week must be 0-6, got {}",
                self.start_of_week
            )));
        }
        if self.day_labels.len() != 7 {
            return Err(Error::Config(format!(
                "day_labels needs 7 entries, got {}",
                self.day_labels.len()
            )));
        }
        Ok(())
    }
}

/// Main configuration for vault-calendar
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VaultCalendarConfig {
    #[serde(default)]
    pub vault: VaultConfig,

    #[serde(default)]
    pub query: QueryConfig,

    #[serde(default)]
    pub calendar: CalendarSettings,
}

fn default_vault_root() -> String {
    ".".to_string()
}

fn default_update_delay_ms() -> u64 {
    3000
}

fn default_display_head() -> bool {
    true
}

fn default_month_format() -> String {
    "%Y-%m".to_string()
}

fn default_day_labels() -> Vec<String> {
    ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn weekday_from_sunday(n: u8) -> Weekday {
    match n % 7 {
        0 => Weekday::Sun,
        1 => Weekday::Mon,
        2 => Weekday::Tue,
        3 => Weekday::Wed,
        4 => Weekday::Thu,
        5 => Weekday::Fri,
        _ => Weekday::Sat,
    }
}

impl VaultCalendarConfig {
    /// Expand `${VAR_NAME}` references. Unset variables expand to nothing.
    fn expand_env_vars(value: &str) -> String {
        let mut result = String::new();
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next(); // consume '{'

                let mut var_name = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    var_name.push(c);
                }

                if let Ok(env_value) = std::env::var(&var_name) {
                    result.push_str(&env_value);
                }
            } else {
                result.push(c);
            }
        }

        result
    }

    /// Load settings from a TOML file, then apply environment overrides
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();

        let toml_content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let mut cfg = Self::from_toml_str(&toml_content)?;
        cfg.apply_env_overrides();
        cfg.calendar.validate()?;

        Ok(cfg)
    }

    /// Parse settings from TOML text (after `${VAR}` expansion)
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        let expanded_content = Self::expand_env_vars(content);

        let config: TomlConfig = toml::from_str(&expanded_content)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))?;

        let cfg = Self::from_toml_config(config);
        cfg.calendar.validate()?;
        Ok(cfg)
    }

    /// Load from `./vault-calendar.toml` when present, otherwise from the environment.
    ///
    /// A `.env` file in the working directory is read first.
    pub fn load() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        if Path::new(CONFIG_FILE).exists() {
            return Self::from_toml_file(CONFIG_FILE);
        }

        Self::from_env()
    }

    /// Defaults plus environment overrides
    pub fn from_env() -> crate::Result<Self> {
        let mut cfg = Self::default();
        cfg.apply_env_overrides();
        cfg.calendar.validate()?;
        Ok(cfg)
    }

    fn from_toml_config(toml: TomlConfig) -> Self {
        let vault = toml.vault.unwrap_or_default();
        let query = toml.query.unwrap_or_default();
        let calendar = toml.calendar.unwrap_or_default();

        Self {
            vault: VaultConfig {
                root: vault.root.unwrap_or_else(default_vault_root),
            },
            query: QueryConfig {
                source: query.source.unwrap_or_default(),
            },
            calendar: CalendarSettings {
                update_delay_ms: calendar
                    .update_delay_ms
                    .unwrap_or_else(default_update_delay_ms),
                start_of_week: calendar.start_of_week.unwrap_or(0),
                display_head: calendar.display_head.unwrap_or_else(default_display_head),
                month_format: calendar.month_format.unwrap_or_else(default_month_format),
                day_labels: calendar.day_labels.unwrap_or_else(default_day_labels),
            },
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(root) = std::env::var("VAULT_ROOT") {
            if !root.is_empty() {
                self.vault.root = root;
            }
        }

        if let Ok(source) = std::env::var("CALENDAR_QUERY") {
            self.query.source = source;
        }

        if let Ok(delay) = std::env::var("CALENDAR_UPDATE_DELAY_MS") {
            if let Ok(ms) = delay.parse() {
                self.calendar.update_delay_ms = ms;
            }
        }

        if let Ok(day) = std::env::var("CALENDAR_START_OF_WEEK") {
            if let Ok(n) = day.parse() {
                self.calendar.start_of_week = n;
            }
        }
    }
}

// ============================================================================
// TOML file structures
// ============================================================================

#[derive(Debug, Deserialize)]
struct TomlConfig {
    vault: Option<TomlVaultConfig>,
    query: Option<TomlQueryConfig>,
    calendar: Option<TomlCalendarConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlVaultConfig {
    #[serde(default)]
    root: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlQueryConfig {
    #[serde(default)]
    source: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlCalendarConfig {
    #[serde(default)]
    update_delay_ms: Option<u64>,
    #[serde(default)]
    start_of_week: Option<u8>,
    #[serde(default)]
    display_head: Option<bool>,
    #[serde(default)]
    month_format: Option<String>,
    #[serde(default)]
    day_labels: Option<Vec<String>>,
}
