use thiserror::Error;

/// Opaque failure raised by a fetch provider, either while opening a
/// session, fetching posts, or releasing the session.
///
/// The retry loop never inspects the message; it only counts the attempt as
/// a transient failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FetchError {
    message: String,
}

impl FetchError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("config error: {0}")]
    Config(#[from] fbscrape_core::ConfigError),

    #[error("failed to persist table \"{label}\": {source}")]
    Persist {
        label: String,
        #[source]
        source: Box<ScraperError>,
    },

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
