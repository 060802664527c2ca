//! Boundary to the external service that actually retrieves posts.
//!
//! The provider owns authentication, browser automation and protocol
//! traversal. This crate only opens a session, asks it for one target's
//! posts, and releases it again.

use std::future::Future;

use fbscrape_core::{Credentials, ScrapeWindow, Target};

use crate::error::FetchError;
use crate::types::{FetchResponse, RawBatch};

/// Hands out scraping sessions.
pub trait FetchProvider {
    type Session: FetchSession;

    /// Opens a fresh session (logs in, starts a browser, ...).
    fn open_session(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Self::Session, FetchError>>;
}

/// An exclusively-owned scraping session.
///
/// `close` consumes the session, so a session can be released at most once.
pub trait FetchSession {
    /// Fetches posts for `target`, optionally restricted to `window`.
    fn fetch_posts(
        &mut self,
        target: &Target,
        window: Option<ScrapeWindow>,
    ) -> impl Future<Output = Result<FetchResponse, FetchError>>;

    /// Releases the session.
    fn close(self) -> impl Future<Output = Result<(), FetchError>>;
}

/// Classification of a single fetch attempt.
#[derive(Debug)]
pub enum ScrapeOutcome {
    Success(RawBatch),
    /// The call succeeded but carried no posts.
    EmptyNoError,
    TransientError(FetchError),
}

impl ScrapeOutcome {
    /// Maps a raw provider result onto an attempt outcome.
    ///
    /// A response without `data`, or with an empty `data` array, is
    /// [`ScrapeOutcome::EmptyNoError`]. A missing sidecar becomes an empty one.
    #[must_use]
    pub fn classify(result: Result<FetchResponse, FetchError>) -> Self {
        match result {
            Err(err) => Self::TransientError(err),
            Ok(FetchResponse { data, profile }) => match data {
                Some(posts) if !posts.is_empty() => Self::Success(RawBatch {
                    posts,
                    profile: profile.unwrap_or_default(),
                }),
                _ => Self::EmptyNoError,
            },
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::EmptyNoError => "empty",
            Self::TransientError(_) => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::{ProfileSidecar, RawPostRecord};

    fn post() -> RawPostRecord {
        RawPostRecord::from_value(json!({"post_id": "1"})).unwrap()
    }

    #[test]
    fn error_is_transient() {
        let outcome = ScrapeOutcome::classify(Err(FetchError::new("login wall")));
        assert!(matches!(outcome, ScrapeOutcome::TransientError(ref e) if e.message() == "login wall"));
    }

    #[test]
    fn missing_data_is_empty() {
        let outcome = ScrapeOutcome::classify(Ok(FetchResponse::default()));
        assert!(matches!(outcome, ScrapeOutcome::EmptyNoError));
    }

    #[test]
    fn empty_data_is_empty() {
        let outcome = ScrapeOutcome::classify(Ok(FetchResponse {
            data: Some(Vec::new()),
            profile: Some(ProfileSidecar::new(vec![json!("x")])),
        }));
        assert!(matches!(outcome, ScrapeOutcome::EmptyNoError));
        assert_eq!(outcome.label(), "empty");
    }

    #[test]
    fn populated_data_is_success_with_default_sidecar() {
        let outcome = ScrapeOutcome::classify(Ok(FetchResponse {
            data: Some(vec![post()]),
            profile: None,
        }));
        match outcome {
            ScrapeOutcome::Success(batch) => {
                assert_eq!(batch.posts.len(), 1);
                assert!(batch.profile.is_empty());
            }
            other => panic!("expected Success, got {other:?}"),
        }
    }
}
