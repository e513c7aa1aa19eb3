//! Configuration loading
//!
//! Resolution priority, highest first:
//! 1. Environment variables (`ENCORE_*`)
//! 2. TOML config file (`ENCORE_CONFIG` or `./encore.toml`)
//! 3. Compiled defaults
//!
//! The resolved [`Config`] is passed explicitly to every component at
//! construction time; nothing reads configuration ambiently after startup.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Top-level service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    pub catalog: CatalogConfig,
    pub notifier: NotifierConfig,
    pub schedule: ScheduleConfig,
    pub workflow: WorkflowConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address for the API server
    pub bind_addr: String,
}

/// Database settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    pub path: PathBuf,
}

/// Music catalog API settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// OAuth client id for the client-credentials flow
    pub client_id: String,
    /// OAuth client secret for the client-credentials flow
    pub client_secret: String,
    /// Accounts endpoint issuing access tokens
    pub accounts_url: String,
    /// Base URL of the catalog web API
    pub api_base_url: String,
    /// Market parameter for catalog queries
    pub market: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

/// Outbound messaging channel settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    /// Webhook URL messages are POSTed to; fan-out to subscribers happens
    /// behind this endpoint
    pub webhook_url: String,
}

/// Weekly workflow schedule
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Whether the scheduled trigger is active
    pub enabled: bool,
    /// Day of week the workflow fires (e.g. "Mon")
    pub weekday: String,
    /// Hour of day (UTC, 0-23) the workflow fires
    pub hour: u32,
}

/// Workflow execution settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Timeout applied to each workflow step, in seconds
    pub step_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            database: DatabaseConfig::default(),
            catalog: CatalogConfig::default(),
            notifier: NotifierConfig::default(),
            schedule: ScheduleConfig::default(),
            workflow: WorkflowConfig::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5731".to_string(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("encore.db"),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            accounts_url: "https://accounts.spotify.com/api/token".to_string(),
            api_base_url: "https://api.spotify.com/v1".to_string(),
            market: "US".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            weekday: "Mon".to_string(),
            hour: 14,
        }
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            step_timeout_secs: 60,
        }
    }
}

impl Config {
    /// Load configuration following the documented priority order.
    ///
    /// `cli_path` wins over the `ENCORE_CONFIG` environment variable, which
    /// wins over `./encore.toml`. A missing file is not an error; defaults
    /// apply. Environment overrides are applied last.
    pub fn load(cli_path: Option<&Path>) -> Result<Self> {
        let file_path = cli_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("ENCORE_CONFIG").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("encore.toml"));

        let mut config = if file_path.exists() {
            let contents = std::fs::read_to_string(&file_path)?;
            toml::from_str(&contents)
                .map_err(|e| Error::Config(format!("{}: {}", file_path.display(), e)))?
        } else {
            Config::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply `ENCORE_*` environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("ENCORE_BIND_ADDR") {
            self.http.bind_addr = v;
        }
        if let Ok(v) = std::env::var("ENCORE_DATABASE_PATH") {
            self.database.path = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("ENCORE_CATALOG_CLIENT_ID") {
            self.catalog.client_id = v;
        }
        if let Ok(v) = std::env::var("ENCORE_CATALOG_CLIENT_SECRET") {
            self.catalog.client_secret = v;
        }
        if let Ok(v) = std::env::var("ENCORE_WEBHOOK_URL") {
            self.notifier.webhook_url = v;
        }
    }

    /// Validate cross-field constraints that serde defaults cannot express
    fn validate(&self) -> Result<()> {
        if self.schedule.hour > 23 {
            return Err(Error::Config(format!(
                "schedule.hour must be 0-23, got {}",
                self.schedule.hour
            )));
        }
        self.schedule
            .weekday
            .parse::<chrono::Weekday>()
            .map_err(|_| {
                Error::Config(format!(
                    "schedule.weekday is not a day of week: {}",
                    self.schedule.weekday
                ))
            })?;
        Ok(())
    }
}

impl ScheduleConfig {
    /// Parsed weekday; validated at load time
    pub fn weekday(&self) -> chrono::Weekday {
        self.weekday
            .parse()
            .unwrap_or(chrono::Weekday::Mon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.schedule.weekday(), chrono::Weekday::Mon);
    }

    #[test]
    fn parses_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [catalog]
            client_id = "abc"
            client_secret = "def"

            [schedule]
            weekday = "Fri"
            hour = 9
            "#,
        )
        .unwrap();

        assert_eq!(config.catalog.client_id, "abc");
        assert_eq!(config.schedule.weekday(), chrono::Weekday::Fri);
        assert_eq!(config.schedule.hour, 9);
        // Untouched sections fall back to defaults
        assert_eq!(config.http.bind_addr, "127.0.0.1:5731");
    }

    #[test]
    fn rejects_bad_weekday() {
        let config: Config = toml::from_str(
            r#"
            [schedule]
            weekday = "Someday"
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }
}
