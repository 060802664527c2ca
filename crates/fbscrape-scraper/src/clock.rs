//! Time source for cool-downs and timestamps.
//!
//! Every wait and every `scrape_date` goes through a [`Clock`] so tests can
//! run the retry and fleet loops against virtual time.

use std::future::Future;
use std::time::Duration;

use chrono::NaiveDateTime;

pub trait Clock {
    /// Current local wall-clock time.
    fn now(&self) -> NaiveDateTime;

    /// Blocks the current execution path for `duration`.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()>;
}

/// Real time: `chrono::Local` for timestamps, `tokio::time::sleep` for waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn tokio_clock_sleep_advances_paused_time() {
        let start = tokio::time::Instant::now();
        TokioClock.sleep(Duration::from_secs(60)).await;
        assert!(start.elapsed() >= Duration::from_secs(60));
    }
}
