//! Data models for the NewsAPI response and the digest built from it.
//!
//! - [`NewsApiResponse`]: the top-level envelope, decoded loosely
//! - [`Article`]: one entry of `articles`, decoded strictly
//! - [`Digest`]: the rendered fragments plus the date they cover
//!
//! The envelope keeps `articles` as raw JSON so only the entries that will be
//! rendered are ever decoded into [`Article`].

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

/// Placeholder rendered when an article has no description.
pub const NO_DESCRIPTION: &str = "No description available.";

/// Status value NewsAPI uses for a successful response.
pub const STATUS_OK: &str = "ok";

/// Top-level NewsAPI response.
///
/// Successful responses carry `status: "ok"` and `articles`; error responses
/// carry `status: "error"` with a `code` and a human-readable `message`.
/// Every field is kept as raw JSON so gateway error bodies such as
/// `{"status": 500}` still decode and simply read as not ok.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsApiResponse {
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub code: Option<Value>,
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub total_results: Option<Value>,
    #[serde(default)]
    pub articles: Option<Value>,
}

impl NewsApiResponse {
    pub fn is_ok(&self) -> bool {
        self.status.as_ref().and_then(Value::as_str) == Some(STATUS_OK)
    }

    /// `status` for logging, whatever its JSON type.
    pub fn status_text(&self) -> String {
        match &self.status {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "<missing>".to_string(),
        }
    }

    pub fn code_text(&self) -> &str {
        self.code.as_ref().and_then(Value::as_str).unwrap_or("")
    }

    pub fn message_text(&self) -> &str {
        self.message.as_ref().and_then(Value::as_str).unwrap_or("")
    }

    pub fn total_results(&self) -> Option<u64> {
        self.total_results.as_ref().and_then(Value::as_u64)
    }
}

/// A single article as returned by NewsAPI.
///
/// `title` and `url` are required and must be strings; a `null` in either is
/// treated the same as a missing key. `description` is frequently `null`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Article {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
}

impl Article {
    /// Description text, or [`NO_DESCRIPTION`] when missing or null.
    pub fn description_or_placeholder(&self) -> &str {
        self.description.as_deref().unwrap_or(NO_DESCRIPTION)
    }
}

/// Rendered articles for one target date, in response order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub target_date: NaiveDate,
    pub fragments: Vec<String>,
}

impl Digest {
    pub fn new(target_date: NaiveDate, fragments: Vec<String>) -> Self {
        Self {
            target_date,
            fragments,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }
}
