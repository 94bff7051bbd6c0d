use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("no records were extracted")]
    EmptyResult,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ScrapeError {
    /// True for network and HTTP status failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, ScrapeError::Transport { .. } | ScrapeError::Status { .. })
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
