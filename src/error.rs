//! Error types for the digest pipeline.
//!
//! Only [`FetchError`] is allowed to escape a run: it covers the cases where the
//! NewsAPI response cannot be trusted at all (network failure, non-JSON body, an
//! article without a title or link). Mail failures are converted into a
//! [`crate::mailer::DeliveryOutcome`] before they reach the job driver.

use thiserror::Error;

/// Fatal failures while fetching articles from NewsAPI.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The GET request itself failed (DNS, connection, TLS, body read).
    ///
    /// The request URL carries the API key, so it is stripped before the
    /// error is stored; see the `From` impl below.
    #[error("request to news endpoint failed: {0}")]
    Network(#[source] reqwest::Error),
    /// The endpoint URL could not be built.
    #[error("invalid news endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    /// The response body was not valid JSON.
    #[error("news endpoint returned a non-JSON body: {0}")]
    InvalidJson(#[source] serde_json::Error),
    /// Valid JSON, but not an object, or `articles` is neither a list nor null.
    #[error("news endpoint returned an unexpected JSON shape: {0}")]
    UnexpectedShape(String),
    /// An article within the first 15 has a missing or null `title`/`url`.
    #[error("article {index} is malformed: {source}")]
    MalformedArticle {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.without_url())
    }
}

/// Failures while building or submitting the digest email.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid address '{address}': {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },
    #[error("failed to build email message: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Failures while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid send time '{0}', expected HH:MM")]
    SendTime(String),
}
