use crate::core::{AppError, Result};
use serde::Deserialize;
use std::env;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub email: EmailConfig,
    pub billing: BillingConfig,
    pub eligibility: EligibilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
}

/// Transactional email provider settings
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    pub api_url: String,
    pub api_key: String,
    pub from_address: String,
    pub from_name: String,
}

/// Billing policy knobs
#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    /// When true, any recorded payment settles the fee record even if the
    /// amount paid is below the total. Default: off (partial payments are
    /// recorded without a status transition).
    pub settle_on_partial: bool,
    /// Interval between overdue sweeps, in seconds.
    pub overdue_check_interval_secs: u64,
}

/// Graduation projection tuning. Thresholds are policy, not business rules
/// fixed by the domain, so they live here rather than in code.
#[derive(Debug, Clone, Deserialize)]
pub struct EligibilityConfig {
    /// Trailing window used to estimate current pace, in weeks.
    pub projection_window_weeks: u32,
    /// Confidence is "high" when the window attendance rate and pace both
    /// clear these bounds.
    pub high_confidence_min_rate: f64,
    pub high_confidence_min_pace: f64,
    /// "medium" bounds; anything below is "low".
    pub medium_confidence_min_rate: f64,
    pub medium_confidence_min_pace: f64,
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            projection_window_weeks: 12,
            high_confidence_min_rate: 0.80,
            high_confidence_min_pace: 2.0,
            medium_confidence_min_rate: 0.60,
            medium_confidence_min_pace: 1.0,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
            email: EmailConfig {
                api_url: env::var("EMAIL_API_URL")
                    .map_err(|_| AppError::Configuration("EMAIL_API_URL not set".to_string()))?,
                api_key: env::var("EMAIL_API_KEY")
                    .map_err(|_| AppError::Configuration("EMAIL_API_KEY not set".to_string()))?,
                from_address: env::var("EMAIL_FROM_ADDRESS").unwrap_or_else(|_| {
                    "financeiro@academia.example".to_string()
                }),
                from_name: env::var("EMAIL_FROM_NAME")
                    .unwrap_or_else(|_| "Academia".to_string()),
            },
            billing: BillingConfig {
                settle_on_partial: env_flag("BILLING_SETTLE_ON_PARTIAL", false)?,
                overdue_check_interval_secs: env_parsed(
                    "BILLING_OVERDUE_CHECK_INTERVAL_SECS",
                    3600,
                )?,
            },
            eligibility: EligibilityConfig {
                projection_window_weeks: env_parsed(
                    "ELIGIBILITY_PROJECTION_WINDOW_WEEKS",
                    EligibilityConfig::default().projection_window_weeks,
                )?,
                high_confidence_min_rate: env_parsed(
                    "ELIGIBILITY_HIGH_CONFIDENCE_MIN_RATE",
                    EligibilityConfig::default().high_confidence_min_rate,
                )?,
                high_confidence_min_pace: env_parsed(
                    "ELIGIBILITY_HIGH_CONFIDENCE_MIN_PACE",
                    EligibilityConfig::default().high_confidence_min_pace,
                )?,
                medium_confidence_min_rate: env_parsed(
                    "ELIGIBILITY_MEDIUM_CONFIDENCE_MIN_RATE",
                    EligibilityConfig::default().medium_confidence_min_rate,
                )?,
                medium_confidence_min_pace: env_parsed(
                    "ELIGIBILITY_MEDIUM_CONFIDENCE_MIN_PACE",
                    EligibilityConfig::default().medium_confidence_min_pace,
                )?,
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.database.min_connections > self.database.max_connections {
            return Err(AppError::Configuration(
                "Database min connections must not exceed max connections".to_string(),
            ));
        }

        if self.billing.overdue_check_interval_secs == 0 {
            return Err(AppError::Configuration(
                "Overdue check interval must be greater than 0".to_string(),
            ));
        }

        if self.eligibility.projection_window_weeks == 0 {
            return Err(AppError::Configuration(
                "Projection window must be at least one week".to_string(),
            ));
        }

        if self.eligibility.high_confidence_min_rate < self.eligibility.medium_confidence_min_rate
        {
            return Err(AppError::Configuration(
                "High confidence rate threshold must not be below the medium one".to_string(),
            ));
        }

        Ok(())
    }
}

pub(crate) fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| AppError::Configuration(format!("Invalid {}", key))),
        Err(_) => Ok(default),
    }
}

fn env_flag(key: &str, default: bool) -> Result<bool> {
    match env::var(key) {
        Ok(raw) => match raw.as_str() {
            "1" | "true" | "TRUE" | "yes" => Ok(true),
            "0" | "false" | "FALSE" | "no" => Ok(false),
            _ => Err(AppError::Configuration(format!("Invalid {}", key))),
        },
        Err(_) => Ok(default),
    }
}
