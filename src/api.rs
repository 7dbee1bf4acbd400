//! NewsAPI client for the daily digest.
//!
//! One `GET /v2/everything` per run, for a single calendar day and a fixed
//! keyword expression, sorted by popularity and restricted to English.
//!
//! # Failure policy
//!
//! - NewsAPI reports an error (`status` other than `"ok"`): logged, treated as
//!   "no articles". The HTTP status code is not inspected, so a 401 with a
//!   NewsAPI error body lands here too.
//! - Body is not JSON, is not a JSON object, or one of the first 15 articles
//!   lacks `title`/`url` (or has them `null`): returned as a [`FetchError`] and
//!   left to the caller.
//! - Transport failure on the request: returned as [`FetchError::Network`],
//!   with the request URL (and so the API key) stripped from the error.

use crate::error::FetchError;
use crate::models::{Article, Digest, NewsApiResponse};
use crate::outputs::html::render_article;
use crate::utils::{iso_date, looks_truncated, truncate_for_log};
use chrono::NaiveDate;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Keyword filter sent as `q`.
pub const QUERY: &str = "AI OR 'machine learning' OR technology";

/// Only the first this-many articles of the response are rendered.
pub const MAX_ARTICLES: usize = 15;

/// Query parameters for one NewsAPI request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsQuery {
    pub keywords: String,
    pub date: NaiveDate,
    pub sort_by: &'static str,
    pub language: &'static str,
}

impl NewsQuery {
    /// The digest query for `date`.
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            keywords: QUERY.to_string(),
            date,
            sort_by: "popularity",
            language: "en",
        }
    }

    /// Full request URL against `endpoint`, including the API key.
    pub fn to_url(&self, endpoint: &str, api_key: &str) -> Result<Url, url::ParseError> {
        let day = iso_date(self.date);
        Url::parse_with_params(
            endpoint,
            &[
                ("q", self.keywords.as_str()),
                ("from", day.as_str()),
                ("to", day.as_str()),
                ("sortBy", self.sort_by),
                ("language", self.language),
                ("apiKey", api_key),
            ],
        )
    }
}

/// Fetch the articles for `target_date` and render them into a [`Digest`].
///
/// Returns an empty digest when NewsAPI reports an error or has no articles.
///
/// # Arguments
///
/// * `client` - HTTP client, reused across runs in recurring mode
/// * `endpoint` - NewsAPI `everything` endpoint
/// * `api_key` - NewsAPI key
/// * `target_date` - The single day to search (`from` = `to`)
#[instrument(level = "info", skip(client, api_key), fields(date = %target_date))]
pub async fn fetch_digest(
    client: &reqwest::Client,
    endpoint: &str,
    api_key: &str,
    target_date: NaiveDate,
) -> Result<Digest, FetchError> {
    let query = NewsQuery::for_date(target_date);
    let url = query.to_url(endpoint, api_key)?;

    let t0 = Instant::now();
    let response = client.get(url).send().await?;
    let http_status = response.status();
    let body = response.text().await?;
    debug!(
        %http_status,
        bytes = body.len(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Received NewsAPI response"
    );

    let fragments = parse_articles(&body)?
        .iter()
        .map(render_article)
        .collect::<Vec<_>>();

    info!(count = fragments.len(), "Rendered digest articles");
    Ok(Digest::new(target_date, fragments))
}

/// Decode a NewsAPI response body into at most [`MAX_ARTICLES`] articles.
///
/// Entries past the limit are never decoded, so a malformed article beyond
/// position 15 does not fail the run.
pub fn parse_articles(body: &str) -> Result<Vec<Article>, FetchError> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        error!(
            error = %e,
            truncated = looks_truncated(&e),
            body_preview = %truncate_for_log(body, 300),
            "NewsAPI returned a body that is not valid JSON"
        );
        FetchError::InvalidJson(e)
    })?;

    if !value.is_object() {
        error!(
            body_preview = %truncate_for_log(body, 300),
            "NewsAPI returned JSON that is not an object"
        );
        return Err(FetchError::UnexpectedShape("top-level value is not an object".to_string()));
    }
    let envelope: NewsApiResponse = serde_json::from_value(value)
        .map_err(|e| FetchError::UnexpectedShape(e.to_string()))?;

    if !envelope.is_ok() {
        error!(
            status = %envelope.status_text(),
            code = envelope.code_text(),
            message = envelope.message_text(),
            "Error: NewsAPI returned error status."
        );
        return Ok(Vec::new());
    }

    let total_results = envelope.total_results();
    let raw = match envelope.articles {
        Some(Value::Array(list)) => list,
        None | Some(Value::Null) => Vec::new(),
        Some(other) => {
            return Err(FetchError::UnexpectedShape(format!(
                "`articles` is not a list: {}",
                truncate_for_log(&other.to_string(), 100)
            )));
        }
    };
    if raw.is_empty() {
        warn!("No news articles found for the date.");
        return Ok(Vec::new());
    }

    if raw.len() > MAX_ARTICLES {
        debug!(
            available = raw.len(),
            total_results,
            limit = MAX_ARTICLES,
            "Truncating article list"
        );
    }

    raw.into_iter()
        .take(MAX_ARTICLES)
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value::<Article>(value)
                .map_err(|source| FetchError::MalformedArticle { index, source })
        })
        .collect()
}
