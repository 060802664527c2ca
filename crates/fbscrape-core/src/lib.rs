//! Configuration, credentials, and account-list loading shared by the
//! fbscrape crates.

pub mod accounts;
pub mod app_config;
pub mod config;
pub mod telemetry;

use thiserror::Error;

pub use accounts::{load_accounts, AccountConfig, AccountsFile};
pub use app_config::{
    CooldownPolicy, Credentials, ScrapeConfig, ScrapeWindow, Target, FLEET_LABEL,
};
pub use config::{load_scrape_config, load_scrape_config_from_env};
pub use telemetry::init_tracing;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read accounts file {path}: {source}")]
    AccountsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse accounts file: {0}")]
    AccountsFileParse(#[from] serde_yaml::Error),

    #[error("accounts validation failed: {0}")]
    Validation(String),
}
