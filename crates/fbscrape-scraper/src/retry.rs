//! Per-target retry loop around the fetch provider.
//!
//! Each attempt opens a fresh session, fetches, and releases the session
//! before anything else happens. The attempt is then classified as a
//! [`ScrapeOutcome`] and the loop either returns the batch, sleeps for the
//! matching cool-down, or gives up.
//!
//! | Outcome          | Attempts left | Next step                        |
//! |------------------|---------------|----------------------------------|
//! | `Success`        | any           | return the batch                 |
//! | `EmptyNoError`   | yes           | sleep `empty_cooldown` (30 s)    |
//! | `EmptyNoError`   | no            | `TargetFailure::ExhaustedEmpty`  |
//! | `TransientError` | yes           | sleep `error_cooldown` (60 s)    |
//! | `TransientError` | no            | `TargetFailure::ExhaustedError`  |
//!
//! No cool-down follows the final attempt.

use fbscrape_core::{ScrapeConfig, ScrapeWindow, Target};

use crate::clock::Clock;
use crate::error::FetchError;
use crate::provider::{FetchProvider, FetchSession, ScrapeOutcome};
use crate::types::RawBatch;

/// Why a target produced no data. Both variants are handled identically by
/// the sequencer; the distinction only matters for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetFailure {
    #[error("no posts returned after {attempts} attempts")]
    ExhaustedEmpty { attempts: u32 },

    #[error("fetch failed after {attempts} attempts: {last_error}")]
    ExhaustedError { attempts: u32, last_error: FetchError },
}

impl TargetFailure {
    #[must_use]
    pub fn attempts(&self) -> u32 {
        match self {
            Self::ExhaustedEmpty { attempts } | Self::ExhaustedError { attempts, .. } => *attempts,
        }
    }
}

/// Drives up to `config.max_attempts` fetches for one target.
pub struct RetryController<'a, P, C> {
    provider: &'a P,
    clock: &'a C,
    config: &'a ScrapeConfig,
}

impl<'a, P, C> RetryController<'a, P, C>
where
    P: FetchProvider,
    C: Clock,
{
    #[must_use]
    pub fn new(provider: &'a P, clock: &'a C, config: &'a ScrapeConfig) -> Self {
        Self {
            provider,
            clock,
            config,
        }
    }

    /// Fetches a non-empty batch for `target`, retrying empty and failed
    /// attempts with the configured cool-downs.
    ///
    /// # Errors
    ///
    /// Returns [`TargetFailure`] once every attempt has come back empty or
    /// failed; the variant reflects the last attempt.
    pub async fn attempt(
        &self,
        target: &Target,
        window: Option<ScrapeWindow>,
    ) -> Result<RawBatch, TargetFailure> {
        let max_attempts = self.config.max_attempts.max(1);
        let cooldowns = self.config.cooldowns;
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            let has_retries_left = attempt < max_attempts;
            tracing::info!(account = %target, attempt, max_attempts, "fetching posts");

            match self.attempt_once(target, window).await {
                ScrapeOutcome::Success(batch) => {
                    tracing::info!(
                        account = %target,
                        attempt,
                        posts = batch.posts.len(),
                        "retrieved posts"
                    );
                    return Ok(batch);
                }
                ScrapeOutcome::EmptyNoError => {
                    if !has_retries_left {
                        tracing::error!(account = %target, attempts = attempt, "no posts after all attempts");
                        return Err(TargetFailure::ExhaustedEmpty { attempts: attempt });
                    }
                    tracing::warn!(
                        account = %target,
                        attempt,
                        max_attempts,
                        delay_secs = cooldowns.empty_cooldown.as_secs(),
                        "no posts returned; retrying after cool-down"
                    );
                    self.clock.sleep(cooldowns.empty_cooldown).await;
                }
                ScrapeOutcome::TransientError(err) => {
                    if !has_retries_left {
                        tracing::error!(
                            account = %target,
                            attempts = attempt,
                            error = %err,
                            "fetch failed on every attempt"
                        );
                        return Err(TargetFailure::ExhaustedError {
                            attempts: attempt,
                            last_error: err,
                        });
                    }
                    tracing::warn!(
                        account = %target,
                        attempt,
                        max_attempts,
                        delay_secs = cooldowns.error_cooldown.as_secs(),
                        error = %err,
                        "fetch failed; retrying after cool-down"
                    );
                    self.clock.sleep(cooldowns.error_cooldown).await;
                }
            }
        }
    }

    /// One open → fetch → close cycle. The session is always closed before
    /// returning, and a failing close never changes the outcome.
    async fn attempt_once(&self, target: &Target, window: Option<ScrapeWindow>) -> ScrapeOutcome {
        let mut session = match self.provider.open_session(&self.config.credentials).await {
            Ok(session) => session,
            Err(err) => return ScrapeOutcome::TransientError(err),
        };

        let result = session.fetch_posts(target, window).await;

        if let Err(err) = session.close().await {
            tracing::debug!(account = %target, error = %err, "ignoring session release failure");
        }

        ScrapeOutcome::classify(result)
    }
}
