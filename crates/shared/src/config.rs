//! Application configuration management.

use chrono_tz::Tz;
use serde::Deserialize;

use crate::error::AppError;
use crate::types::Currency;

/// Environment variable prefix, e.g. `FEEROLL__LEDGER__RECEIPT_PREFIX`.
const ENV_PREFIX: &str = "FEEROLL";

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Fee ledger configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Fee ledger configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Prefix for generated receipt numbers.
    #[serde(default = "default_receipt_prefix")]
    pub receipt_prefix: String,
    /// Currency all fees are charged in.
    #[serde(default = "default_currency")]
    pub currency: Currency,
    /// IANA timezone used to decide which calendar day "today" is.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_receipt_prefix() -> String {
    "RCP".to_string()
}

fn default_currency() -> Currency {
    Currency::Inr
}

fn default_timezone() -> String {
    "Asia/Kolkata".to_string()
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            receipt_prefix: default_receipt_prefix(),
            currency: default_currency(),
            timezone: default_timezone(),
        }
    }
}

impl LedgerConfig {
    /// Parses the configured timezone.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the name is not a known IANA timezone.
    pub fn tz(&self) -> Result<Tz, AppError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| AppError::Config(format!("Unknown timezone: {}", self.timezone)))
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `tracing-subscriber` env-filter directive, used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "feeroll=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or the configured
    /// timezone is unknown.
    pub fn load() -> Result<Self, AppError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let app_config: Self = config.try_deserialize()?;
        app_config.ledger.tz()?;
        Ok(app_config)
    }
}
