use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::app_config::{ScrapeWindow, Target, FLEET_LABEL};
use crate::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccountConfig {
    /// Username, page name, or numeric id understood by the fetch provider.
    pub name: String,
    /// Overrides the global recency window for this account only.
    #[serde(default)]
    pub days_limit: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl AccountConfig {
    #[must_use]
    pub fn target(&self) -> Target {
        Target::new(self.name.trim())
    }

    /// The window to scrape this account with, given the run-wide default.
    #[must_use]
    pub fn window(&self, default: Option<ScrapeWindow>) -> Option<ScrapeWindow> {
        self.days_limit.map(ScrapeWindow::last_days).or(default)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccountsFile {
    pub accounts: Vec<AccountConfig>,
}

impl AccountsFile {
    /// Targets in file order, which is also fleet order.
    #[must_use]
    pub fn targets(&self) -> Vec<Target> {
        self.accounts.iter().map(AccountConfig::target).collect()
    }
}

/// Load and validate the account list from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_accounts(path: &Path) -> Result<AccountsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::AccountsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let accounts_file: AccountsFile =
        serde_yaml::from_str(&content).map_err(ConfigError::AccountsFileParse)?;

    validate_accounts(&accounts_file)?;

    Ok(accounts_file)
}

fn validate_accounts(accounts_file: &AccountsFile) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for account in &accounts_file.accounts {
        let name = account.name.trim();
        if name.is_empty() {
            return Err(ConfigError::Validation(
                "account name must be non-empty".to_string(),
            ));
        }

        // Names double as output file labels.
        if name.contains(['/', '\\']) {
            return Err(ConfigError::Validation(format!(
                "account '{name}' contains a path separator"
            )));
        }

        if name.eq_ignore_ascii_case(FLEET_LABEL) {
            return Err(ConfigError::Validation(format!(
                "account name '{name}' is reserved for the combined output"
            )));
        }

        if !seen.insert(name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate account name: '{name}'"
            )));
        }
    }

    Ok(())
}
