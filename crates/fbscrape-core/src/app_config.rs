use std::path::PathBuf;
use std::time::Duration;

/// Output label of the fleet-wide table. No account may use it as its name.
pub const FLEET_LABEL: &str = "combined_accounts";

/// One account or page identifier to scrape.
///
/// Targets are opaque: the only thing this crate does with the string is
/// hand it to the fetch provider and stamp it onto output rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target(String);

impl Target {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Target {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Recency filter passed to the fetch provider: only posts from the last
/// `days` days. An absent window means "all posts".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeWindow {
    pub days: u32,
}

impl ScrapeWindow {
    #[must_use]
    pub fn last_days(days: u32) -> Self {
        Self { days }
    }
}

/// Login handed to the fetch provider when it opens a session.
#[derive(Clone)]
pub struct Credentials {
    pub account: String,
    pub password: String,
    /// Browser driver executable, when the provider needs one.
    pub driver_path: Option<PathBuf>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("account", &self.account)
            .field("password", &"[redacted]")
            .field("driver_path", &self.driver_path)
            .finish()
    }
}

/// Fixed blocking delays used by the retry loop and the fleet sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownPolicy {
    /// Wait after an attempt whose fetch raised an error.
    pub error_cooldown: Duration,
    /// Wait after an attempt that returned no usable posts.
    pub empty_cooldown: Duration,
    /// Wait between two consecutive targets of a fleet.
    pub account_cooldown: Duration,
}

impl Default for CooldownPolicy {
    fn default() -> Self {
        Self {
            error_cooldown: Duration::from_secs(60),
            empty_cooldown: Duration::from_secs(30),
            account_cooldown: Duration::from_secs(120),
        }
    }
}

/// Immutable run configuration threaded from the sequencer down to each
/// retry loop.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub credentials: Credentials,
    /// Total fetch attempts per target, including the first. Always >= 1.
    pub max_attempts: u32,
    pub window: Option<ScrapeWindow>,
    pub cooldowns: CooldownPolicy,
    pub output_dir: PathBuf,
    pub accounts_path: Option<PathBuf>,
    pub log_level: String,
}

impl ScrapeConfig {
    /// Builds a configuration with default attempts, cool-downs and output
    /// directory around the given credentials.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            max_attempts: 3,
            window: None,
            cooldowns: CooldownPolicy::default(),
            output_dir: PathBuf::from("facebook_data"),
            accounts_path: None,
            log_level: "info".to_string(),
        }
    }
}
