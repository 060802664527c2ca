//! Retry orchestration and record normalization for scraping social-media
//! posts across a fleet of accounts.
//!
//! The actual retrieval is delegated to a [`FetchProvider`]; this crate
//! decides when to retry, reshapes the irregular records it returns into a
//! stable flat schema, and merges per-account tables into one dataset.

pub mod aggregate;
pub mod clock;
pub mod error;
pub mod normalize;
pub mod provider;
pub mod retry;
pub mod sequencer;
pub mod sink;
pub mod table;
pub mod types;

pub use aggregate::{combine, FleetResult};
pub use clock::{Clock, TokioClock};
pub use error::{FetchError, ScraperError};
pub use normalize::{normalize_batch, normalize_record, CanonicalPostRecord, REACTION_KINDS};
pub use provider::{FetchProvider, FetchSession, ScrapeOutcome};
pub use retry::{RetryController, TargetFailure};
pub use sequencer::{AccountOutcome, AccountSequencer, FleetReport};
pub use sink::{CsvSink, PersistenceSink, FLEET_LABEL};
pub use table::{Cell, PostTable};
pub use types::{FetchResponse, ProfileSidecar, RawBatch, RawPostRecord};
