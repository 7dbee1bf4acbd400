//! Runtime configuration for the digest job.
//!
//! All four secrets come from one key-value source that is injected at startup:
//! the process environment (after `.env` is loaded), a YAML file with the same
//! keys, or a closure in tests. Nothing else in the crate reads the environment.
//!
//! Missing keys are not rejected here. They are logged and left empty so the
//! failure shows up where the value is actually used (NewsAPI rejects the key,
//! the SMTP relay rejects the login).

use crate::error::ConfigError;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::{info, instrument, warn};

/// NewsAPI key.
pub const NEWSAPI_KEY: &str = "NEWSAPI_KEY";
/// Sender address, also used as the SMTP username.
pub const EMAIL_SENDER: &str = "EMAIL_SENDER";
/// Sender credential (an app password for Gmail).
pub const EMAIL_PASSWORD: &str = "EMAIL_PASSWORD";
/// Comma-separated recipient list.
pub const EMAIL_RECEIVER: &str = "EMAIL_RECEIVER";

/// NewsAPI "everything" search endpoint.
pub const DEFAULT_NEWS_ENDPOINT: &str = "https://newsapi.org/v2/everything";
/// Gmail submission relay.
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
/// Submission port (STARTTLS).
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Ordered recipients parsed from a single comma-separated value.
///
/// The value is split on `,` and nothing else: no trimming, no validation,
/// no deduplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientList(Vec<String>);

impl RecipientList {
    pub fn parse(raw: &str) -> Self {
        Self(raw.split(',').map(str::to_string).collect())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// Everything one run of the job needs, built once at process start.
#[derive(Clone)]
pub struct DigestConfig {
    pub news_api_key: String,
    pub news_endpoint: String,
    pub sender: String,
    pub password: String,
    pub recipients: RecipientList,
    pub smtp_host: String,
    pub smtp_port: u16,
}

impl fmt::Debug for DigestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestConfig")
            .field("news_api_key", &redact(&self.news_api_key))
            .field("news_endpoint", &self.news_endpoint)
            .field("sender", &self.sender)
            .field("password", &redact(&self.password))
            .field("recipients", &self.recipients)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() { "<empty>" } else { "<redacted>" }
}

impl DigestConfig {
    /// Build a configuration from any key lookup.
    ///
    /// Endpoint and relay settings start at their defaults; use
    /// [`DigestConfig::with_news_endpoint`] and [`DigestConfig::with_smtp_relay`]
    /// to override them.
    pub fn from_source<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| match lookup(key) {
            Some(value) => value,
            None => {
                warn!(key, "Configuration value not set; continuing with an empty value");
                String::new()
            }
        };

        let news_api_key = get(NEWSAPI_KEY);
        let sender = get(EMAIL_SENDER);
        let password = get(EMAIL_PASSWORD);
        let recipients = RecipientList::parse(&get(EMAIL_RECEIVER));

        Self {
            news_api_key,
            news_endpoint: DEFAULT_NEWS_ENDPOINT.to_string(),
            sender,
            password,
            recipients,
            smtp_host: DEFAULT_SMTP_HOST.to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
        }
    }

    /// Build a configuration from the process environment.
    ///
    /// A `.env` file in the working directory is loaded first; variables that
    /// are already set in the environment take precedence over it.
    #[instrument(level = "info")]
    pub fn from_env() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => info!(path = %path.display(), "Loaded .env file"),
            Err(e) if e.not_found() => {}
            Err(e) => warn!(error = %e, "Failed to load .env file; using process environment only"),
        }
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Build a configuration from a flat YAML mapping using the same keys as
    /// the environment variables.
    ///
    /// ```yaml
    /// NEWSAPI_KEY: abc123
    /// EMAIL_SENDER: digest@example.com
    /// EMAIL_PASSWORD: app-password
    /// EMAIL_RECEIVER: a@example.com,b@example.com
    /// ```
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let values = Self::parse_yaml(&raw).map_err(|source| ConfigError::Yaml {
            path: path.display().to_string(),
            source,
        })?;
        info!(keys = values.len(), "Loaded configuration file");
        Ok(Self::from_source(|key| values.get(key).cloned()))
    }

    fn parse_yaml(raw: &str) -> Result<HashMap<String, String>, serde_yaml::Error> {
        serde_yaml::from_str(raw)
    }

    pub fn with_news_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.news_endpoint = endpoint.into();
        self
    }

    pub fn with_smtp_relay(mut self, host: impl Into<String>, port: u16) -> Self {
        self.smtp_host = host.into();
        self.smtp_port = port;
        self
    }
}
