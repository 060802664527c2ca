//! Fleet orchestration: one target at a time, in list order.
//!
//! For each target the sequencer runs the retry loop, normalizes the batch
//! into a per-target table, persists that table, and keeps it for the final
//! merge. A target that produces nothing is logged and skipped. Between two
//! targets the sequencer waits `account_cooldown`; the last target is not
//! followed by a wait.

use std::path::PathBuf;

use fbscrape_core::{load_accounts, AccountsFile, ScrapeConfig, ScrapeWindow, Target};
use tracing::Instrument;
use uuid::Uuid;

use crate::aggregate::{combine, FleetResult};
use crate::clock::Clock;
use crate::error::ScraperError;
use crate::normalize::normalize_batch;
use crate::provider::FetchProvider;
use crate::retry::{RetryController, TargetFailure};
use crate::sink::{PersistenceSink, FLEET_LABEL};
use crate::table::PostTable;

/// Result of scraping a single target.
#[derive(Debug)]
pub enum AccountOutcome {
    Scraped {
        table: PostTable,
        /// Where the per-target table was written. `None` if the write
        /// failed; the table is still kept for the combined output.
        path: Option<PathBuf>,
    },
    Failed(TargetFailure),
}

/// Summary of one fleet run.
#[derive(Debug)]
pub struct FleetReport {
    pub run_id: Uuid,
    pub result: FleetResult,
    /// Targets that produced a table, in processing order.
    pub succeeded: Vec<Target>,
    pub failed: Vec<(Target, TargetFailure)>,
    pub combined_path: Option<PathBuf>,
}

impl FleetReport {
    #[must_use]
    pub fn total_rows(&self) -> usize {
        self.result.row_count()
    }

    /// `true` when no target produced any data.
    #[must_use]
    pub fn is_total_failure(&self) -> bool {
        self.result.is_no_data()
    }
}

pub struct AccountSequencer<'a, P, C, S> {
    provider: &'a P,
    clock: &'a C,
    sink: &'a S,
    config: &'a ScrapeConfig,
}

impl<'a, P, C, S> AccountSequencer<'a, P, C, S>
where
    P: FetchProvider,
    C: Clock,
    S: PersistenceSink,
{
    #[must_use]
    pub fn new(provider: &'a P, clock: &'a C, sink: &'a S, config: &'a ScrapeConfig) -> Self {
        Self {
            provider,
            clock,
            sink,
            config,
        }
    }

    /// Scrapes, normalizes and persists a single target.
    pub async fn scrape_account(
        &self,
        target: &Target,
        window: Option<ScrapeWindow>,
    ) -> AccountOutcome {
        let controller = RetryController::new(self.provider, self.clock, self.config);
        let batch = match controller.attempt(target, window).await {
            Ok(batch) => batch,
            Err(failure) => return AccountOutcome::Failed(failure),
        };

        let table = normalize_batch(batch, target, self.clock.now());

        let path = match self.sink.persist(&table, target.as_str(), self.clock.now()) {
            Ok(path) => {
                tracing::info!(account = %target, rows = table.len(), path = %path.display(), "saved account posts");
                Some(path)
            }
            Err(err) => {
                tracing::error!(account = %target, error = %err, "failed to save account posts");
                None
            }
        };

        AccountOutcome::Scraped { table, path }
    }

    /// Runs the fleet over `targets` using the configured window for all of
    /// them.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Persist`] only if the combined table cannot be
    /// written. Per-target failures are reported in the [`FleetReport`].
    pub async fn run(&self, targets: &[Target]) -> Result<FleetReport, ScraperError> {
        let fleet: Vec<(Target, Option<ScrapeWindow>)> = targets
            .iter()
            .map(|t| (t.clone(), self.config.window))
            .collect();
        self.run_fleet(fleet).await
    }

    /// Runs the fleet described by an accounts file, honouring per-account
    /// `days_limit` overrides.
    ///
    /// # Errors
    ///
    /// See [`Self::run`].
    pub async fn run_accounts(&self, accounts: &AccountsFile) -> Result<FleetReport, ScraperError> {
        let fleet = accounts
            .accounts
            .iter()
            .map(|a| (a.target(), a.window(self.config.window)))
            .collect();
        self.run_fleet(fleet).await
    }

    /// Runs the fleet listed in `config.accounts_path` when one is set,
    /// otherwise over `fallback` with the configured window.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Config`] if the accounts file cannot be loaded
    /// or fails validation. See [`Self::run`] for the rest.
    pub async fn run_configured(&self, fallback: &[Target]) -> Result<FleetReport, ScraperError> {
        let Some(path) = &self.config.accounts_path else {
            return self.run(fallback).await;
        };

        let accounts = load_accounts(path)?;
        tracing::info!(
            path = %path.display(),
            accounts = accounts.accounts.len(),
            "loaded account list"
        );
        self.run_accounts(&accounts).await
    }

    async fn run_fleet(
        &self,
        fleet: Vec<(Target, Option<ScrapeWindow>)>,
    ) -> Result<FleetReport, ScraperError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("fleet_run", %run_id, targets = fleet.len());
        self.run_fleet_inner(run_id, fleet).instrument(span).await
    }

    async fn run_fleet_inner(
        &self,
        run_id: Uuid,
        fleet: Vec<(Target, Option<ScrapeWindow>)>,
    ) -> Result<FleetReport, ScraperError> {
        let total = fleet.len();
        let mut tables: Vec<PostTable> = Vec::new();
        let mut succeeded: Vec<Target> = Vec::new();
        let mut failed: Vec<(Target, TargetFailure)> = Vec::new();

        for (i, (target, window)) in fleet.into_iter().enumerate() {
            tracing::info!(account = %target, position = i + 1, total, "scraping account");

            match self.scrape_account(&target, window).await {
                AccountOutcome::Scraped { table, .. } => {
                    tracing::info!(account = %target, rows = table.len(), "account scraped");
                    tables.push(table);
                    succeeded.push(target);
                }
                AccountOutcome::Failed(failure) => {
                    tracing::error!(account = %target, error = %failure, "account failed; continuing");
                    failed.push((target, failure));
                }
            }

            if i + 1 < total {
                let delay = self.config.cooldowns.account_cooldown;
                tracing::info!(delay_secs = delay.as_secs(), "waiting before next account");
                self.clock.sleep(delay).await;
            }
        }

        let result = combine(tables);
        let combined_path = match &result {
            FleetResult::NoData => {
                tracing::error!(failed = failed.len(), "no data scraped from any account");
                None
            }
            FleetResult::Combined(table) => {
                let path = self.sink.persist(table, FLEET_LABEL, self.clock.now())?;
                tracing::info!(
                    rows = table.len(),
                    accounts = succeeded.len(),
                    failed = failed.len(),
                    path = %path.display(),
                    "saved combined posts"
                );
                Some(path)
            }
        };

        Ok(FleetReport {
            run_id,
            result,
            succeeded,
            failed,
            combined_path,
        })
    }
}
