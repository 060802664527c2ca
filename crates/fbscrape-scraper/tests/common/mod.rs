//! Scripted fakes for the provider, clock and sink boundaries.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{json, Value};

use fbscrape_core::{Credentials, ScrapeConfig, ScrapeWindow, Target};
use fbscrape_scraper::{
    Clock, FetchError, FetchProvider, FetchResponse, FetchSession, PersistenceSink, PostTable,
    ProfileSidecar, RawPostRecord, ScraperError,
};

/// What the fake provider does for one attempt.
#[derive(Debug, Clone)]
pub enum Step {
    /// Returns these posts with a six-entry sidecar.
    Posts(Vec<Value>),
    /// Returns `{"data": []}`.
    Empty,
    /// Returns a response without `data`.
    NoData,
    /// `fetch_posts` raises.
    Fail(&'static str),
}

#[derive(Default)]
struct ProviderState {
    scripts: HashMap<String, VecDeque<Step>>,
    fetches: Vec<(String, Option<ScrapeWindow>)>,
    open_attempts: usize,
    open_failures: usize,
    opened: usize,
    closed: usize,
    fail_close: bool,
}

#[derive(Clone, Default)]
pub struct FakeProvider {
    state: Arc<Mutex<ProviderState>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `steps` for `target`. Once the queue runs dry the target
    /// returns [`Step::Empty`].
    pub fn script(self, target: &str, steps: Vec<Step>) -> Self {
        self.state
            .lock()
            .unwrap()
            .scripts
            .insert(target.to_owned(), steps.into());
        self
    }

    /// The next `n` calls to `open_session` fail.
    pub fn failing_opens(self, n: usize) -> Self {
        self.state.lock().unwrap().open_failures = n;
        self
    }

    pub fn failing_close(self) -> Self {
        self.state.lock().unwrap().fail_close = true;
        self
    }

    pub fn fetches(&self) -> Vec<(String, Option<ScrapeWindow>)> {
        self.state.lock().unwrap().fetches.clone()
    }

    pub fn fetch_count(&self, target: &str) -> usize {
        self.fetches().iter().filter(|(t, _)| t == target).count()
    }

    pub fn open_attempts(&self) -> usize {
        self.state.lock().unwrap().open_attempts
    }

    pub fn opened(&self) -> usize {
        self.state.lock().unwrap().opened
    }

    pub fn closed(&self) -> usize {
        self.state.lock().unwrap().closed
    }

    fn next_step(&self, target: &str) -> Step {
        self.state
            .lock()
            .unwrap()
            .scripts
            .get_mut(target)
            .and_then(VecDeque::pop_front)
            .unwrap_or(Step::Empty)
    }
}

pub struct FakeSession {
    provider: FakeProvider,
}

impl FetchProvider for FakeProvider {
    type Session = FakeSession;

    async fn open_session(&self, _credentials: &Credentials) -> Result<FakeSession, FetchError> {
        let mut state = self.state.lock().unwrap();
        state.open_attempts += 1;
        if state.open_failures > 0 {
            state.open_failures -= 1;
            return Err(FetchError::new("could not start browser"));
        }
        state.opened += 1;
        Ok(FakeSession {
            provider: self.clone(),
        })
    }
}

impl FetchSession for FakeSession {
    async fn fetch_posts(
        &mut self,
        target: &Target,
        window: Option<ScrapeWindow>,
    ) -> Result<FetchResponse, FetchError> {
        self.provider
            .state
            .lock()
            .unwrap()
            .fetches
            .push((target.as_str().to_owned(), window));

        match self.provider.next_step(target.as_str()) {
            Step::Posts(posts) => Ok(FetchResponse {
                data: Some(
                    posts
                        .into_iter()
                        .map(|p| RawPostRecord::from_value(p).unwrap())
                        .collect(),
                ),
                profile: Some(sidecar_for(target.as_str())),
            }),
            Step::Empty => Ok(FetchResponse {
                data: Some(Vec::new()),
                profile: None,
            }),
            Step::NoData => Ok(FetchResponse::default()),
            Step::Fail(msg) => Err(FetchError::new(msg)),
        }
    }

    async fn close(self) -> Result<(), FetchError> {
        let mut state = self.provider.state.lock().unwrap();
        state.closed += 1;
        if state.fail_close {
            Err(FetchError::new("driver already gone"))
        } else {
            Ok(())
        }
    }
}

pub fn sidecar_for(target: &str) -> ProfileSidecar {
    ProfileSidecar::new(vec![
        json!(target),
        json!(target.to_lowercase()),
        json!(" Page "),
        json!(" Museum "),
        json!("https://example.org"),
        json!("1K"),
    ])
}

/// `n` posts whose `post_id`s are `<prefix>-0`, `<prefix>-1`, ...
pub fn posts(prefix: &str, n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| {
            json!({
                "post_id": format!("{prefix}-{i}"),
                "context": format!("post {i} from {prefix}"),
                "sub_reactions": {"Like": i},
            })
        })
        .collect()
}

/// Virtual clock: `sleep` records the delay and advances `now`.
pub struct FakeClock {
    now: Mutex<NaiveDateTime>,
    sleeps: Mutex<Vec<Duration>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(
                NaiveDate::from_ymd_opt(2026, 10, 19)
                    .unwrap()
                    .and_hms_opt(12, 0, 0)
                    .unwrap(),
            ),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }

    pub fn sleeps_secs(&self) -> Vec<u64> {
        self.sleeps().iter().map(Duration::as_secs).collect()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap()
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
        let mut now = self.now.lock().unwrap();
        *now += chrono::Duration::from_std(duration).unwrap();
    }
}

/// Sink that records what it was asked to write instead of touching disk.
#[derive(Default)]
pub struct RecordingSink {
    writes: Mutex<Vec<(String, PostTable)>>,
    fail_labels: Vec<String>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(labels: &[&str]) -> Self {
        Self {
            writes: Mutex::new(Vec::new()),
            fail_labels: labels.iter().map(|l| (*l).to_owned()).collect(),
        }
    }

    pub fn labels(&self) -> Vec<String> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .map(|(l, _)| l.clone())
            .collect()
    }

    pub fn table(&self, label: &str) -> Option<PostTable> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, t)| t.clone())
    }
}

impl PersistenceSink for RecordingSink {
    fn persist(
        &self,
        table: &PostTable,
        label: &str,
        _stamped_at: NaiveDateTime,
    ) -> Result<PathBuf, ScraperError> {
        if self.fail_labels.iter().any(|l| l == label) {
            return Err(ScraperError::Persist {
                label: label.to_owned(),
                source: Box::new(ScraperError::Io(std::io::Error::other("disk full"))),
            });
        }
        self.writes
            .lock()
            .unwrap()
            .push((label.to_owned(), table.clone()));
        Ok(PathBuf::from(format!("{label}.csv")))
    }
}

/// Config with default cool-downs (60 / 30 / 120 s) and three attempts.
pub fn test_config() -> ScrapeConfig {
    ScrapeConfig::new(Credentials {
        account: "scraper@example.com".to_owned(),
        password: "secret".to_owned(),
        driver_path: None,
    })
}
