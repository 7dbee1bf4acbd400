//! The daily digest job: fetch, compose, send.
//!
//! One call to [`run_daily_job`] is one run. The target date is computed by the
//! caller and used for both the NewsAPI query and the email header, so the two
//! can never disagree even when a run straddles midnight.

use crate::api::fetch_digest;
use crate::config::DigestConfig;
use crate::error::FetchError;
use crate::mailer::{send_digest, DeliveryOutcome, MailTransport};
use crate::outputs::html::compose;
use chrono::NaiveDate;
use std::fmt;
use tracing::{info, instrument, warn};

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// The digest was accepted by the mail relay.
    Sent { articles: usize, recipients: usize },
    /// NewsAPI returned nothing usable; no email was attempted.
    Skipped,
    /// An email was attempted and failed.
    Failed { articles: usize, reason: String },
}

impl fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sent {
                articles,
                recipients,
            } => write!(f, "sent {articles} articles to {recipients} recipients"),
            Self::Skipped => f.write_str("skipped (no news)"),
            Self::Failed { articles, reason } => {
                write!(f, "delivery of {articles} articles failed: {reason}")
            }
        }
    }
}

/// Run the digest job once for `target_date`.
///
/// # Errors
///
/// Returns [`FetchError`] when the NewsAPI request fails at the transport
/// level or the response is malformed. A NewsAPI error status is not an error
/// here; it yields [`JobOutcome::Skipped`].
#[instrument(level = "info", skip(client, config, transport), fields(date = %target_date))]
pub async fn run_daily_job<T: MailTransport>(
    client: &reqwest::Client,
    config: &DigestConfig,
    transport: &T,
    target_date: NaiveDate,
) -> Result<JobOutcome, FetchError> {
    let digest = fetch_digest(client, &config.news_endpoint, &config.news_api_key, target_date).await?;

    if digest.is_empty() {
        info!("No news to send today.");
        return Ok(JobOutcome::Skipped);
    }

    let composed = compose(&digest);
    let outcome = match send_digest(transport, config, &composed).await {
        DeliveryOutcome::Sent { recipients } => JobOutcome::Sent {
            articles: digest.len(),
            recipients,
        },
        DeliveryOutcome::Failed(reason) => {
            warn!(%reason, "Digest was not delivered");
            JobOutcome::Failed {
                articles: digest.len(),
                reason,
            }
        }
    };

    info!(%outcome, "Digest job finished");
    Ok(outcome)
}
