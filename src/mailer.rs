//! Email delivery over SMTP with STARTTLS.
//!
//! # Architecture
//!
//! - [`MailTransport`]: submits one prepared [`OutgoingEmail`]
//! - [`SmtpRelay`]: the real transport, one authenticated session per call
//! - [`send_digest`]: builds the email from the config and composed digest,
//!   submits it once and folds any failure into a [`DeliveryOutcome`]
//!
//! Delivery is attempted exactly once. A failure is logged and reported to the
//! caller; it never aborts the run.

use crate::config::DigestConfig;
use crate::error::MailError;
use crate::outputs::html::ComposedDigest;
use itertools::Itertools;
use lettre::message::{header::ContentType, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::fmt;
use std::time::Instant;
use tracing::{error, info, instrument};

/// An email ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: String,
    pub recipients: Vec<String>,
    pub subject: String,
    pub html_body: String,
}

/// Result of the single delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The relay accepted the message for every recipient.
    Sent { recipients: usize },
    /// Building, connecting, authenticating or sending failed.
    Failed(String),
}

/// Something that can submit an [`OutgoingEmail`].
pub trait MailTransport {
    type Error: std::error::Error;

    /// Submit `email` to all of its recipients in one transaction.
    async fn submit(&self, email: &OutgoingEmail) -> Result<(), Self::Error>;
}

/// SMTP submission relay (STARTTLS, username/password login).
#[derive(Clone)]
pub struct SmtpRelay {
    host: String,
    port: u16,
    username: String,
    password: String,
}

impl fmt::Debug for SmtpRelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpRelay")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl SmtpRelay {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            password: password.into(),
        }
    }

    /// Relay settings and login taken from the digest configuration.
    ///
    /// The sender address doubles as the SMTP username.
    pub fn from_config(config: &DigestConfig) -> Self {
        Self::new(
            config.smtp_host.clone(),
            config.smtp_port,
            config.sender.clone(),
            config.password.clone(),
        )
    }
}

impl MailTransport for SmtpRelay {
    type Error = MailError;

    #[instrument(level = "info", skip_all, fields(host = %self.host, port = self.port))]
    async fn submit(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        let message = build_message(email)?;
        let creds = Credentials::new(self.username.clone(), self.password.clone());

        let mailer: AsyncSmtpTransport<Tokio1Executor> =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)?
                .port(self.port)
                .credentials(creds)
                .build();

        mailer.send(message).await?;
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.trim().parse().map_err(|source| MailError::Address {
        address: address.to_string(),
        source,
    })
}

/// Build the MIME message: one `text/html` part inside `multipart/alternative`.
///
/// Every recipient becomes a `To` mailbox, in list order, which also fixes the
/// SMTP envelope order.
pub fn build_message(email: &OutgoingEmail) -> Result<Message, MailError> {
    let mut builder = Message::builder()
        .from(parse_mailbox(&email.from)?)
        .subject(email.subject.as_str());
    for recipient in &email.recipients {
        builder = builder.to(parse_mailbox(recipient)?);
    }

    let message = builder.multipart(
        MultiPart::alternative().singlepart(
            SinglePart::builder()
                .header(ContentType::TEXT_HTML)
                .body(email.html_body.clone()),
        ),
    )?;
    Ok(message)
}

/// Send the composed digest to every configured recipient.
///
/// Never returns an error: failures come back as [`DeliveryOutcome::Failed`]
/// carrying the error text.
#[instrument(level = "info", skip_all, fields(subject = %composed.subject))]
pub async fn send_digest<T: MailTransport>(
    transport: &T,
    config: &DigestConfig,
    composed: &ComposedDigest,
) -> DeliveryOutcome {
    let email = OutgoingEmail {
        from: config.sender.clone(),
        recipients: config.recipients.as_slice().to_vec(),
        subject: composed.subject.clone(),
        html_body: composed.html_body.clone(),
    };

    let t0 = Instant::now();
    match transport.submit(&email).await {
        Ok(()) => {
            info!(
                to = %email.recipients.iter().join(", "),
                elapsed_ms = t0.elapsed().as_millis() as u64,
                "Email sent successfully."
            );
            DeliveryOutcome::Sent {
                recipients: email.recipients.len(),
            }
        }
        Err(e) => {
            error!(error = %e, "Failed to send email");
            DeliveryOutcome::Failed(e.to_string())
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingTransport;
    use super::*;
    use crate::config::{EMAIL_PASSWORD, EMAIL_RECEIVER, EMAIL_SENDER};

    fn config(receivers: &str) -> DigestConfig {
        DigestConfig::from_source(|key| match key {
            EMAIL_SENDER => Some("digest@x.com".to_string()),
            EMAIL_PASSWORD => Some("app-password".to_string()),
            EMAIL_RECEIVER => Some(receivers.to_string()),
            _ => None,
        })
    }

    fn composed() -> ComposedDigest {
        ComposedDigest {
            subject: "AI & Tech News Digest – May 05, 2025".to_string(),
            html_body: "<html><body><p>hi</p></body></html>".to_string(),
        }
    }

    fn email(recipients: &[&str]) -> OutgoingEmail {
        OutgoingEmail {
            from: "digest@x.com".to_string(),
            recipients: recipients.iter().map(|r| r.to_string()).collect(),
            subject: "Subject".to_string(),
            html_body: "<p>body</p>".to_string(),
        }
    }

    #[tokio::test]
    async fn test_send_digest_passes_recipients_in_order() {
        let transport = RecordingTransport::default();
        let outcome = send_digest(&transport, &config("a@x.com,b@x.com"), &composed()).await;

        assert_eq!(outcome, DeliveryOutcome::Sent { recipients: 2 });
        let sent = transport.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipients, vec!["a@x.com", "b@x.com"]);
        assert_eq!(sent[0].from, "digest@x.com");
        assert_eq!(sent[0].subject, composed().subject);
    }

    #[tokio::test]
    async fn test_send_digest_reports_auth_failure() {
        let transport = RecordingTransport::rejecting("535 5.7.8 Username and Password not accepted");
        let outcome = send_digest(&transport, &config("a@x.com"), &composed()).await;

        match outcome {
            DeliveryOutcome::Failed(reason) => assert!(reason.contains("535")),
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(transport.calls(), 1);
    }

    #[test]
    fn test_build_message_envelope_order() {
        let message = build_message(&email(&["a@x.com", "b@x.com"])).unwrap();
        let to: Vec<String> = message
            .envelope()
            .to()
            .iter()
            .map(|addr| addr.to_string())
            .collect();
        assert_eq!(to, vec!["a@x.com", "b@x.com"]);
        assert_eq!(
            message.envelope().from().map(|addr| addr.to_string()),
            Some("digest@x.com".to_string())
        );
    }

    #[test]
    fn test_build_message_is_html() {
        let message = build_message(&email(&["a@x.com"])).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("text/html"));
        assert!(raw.contains("<p>body</p>"));
    }

    #[test]
    fn test_build_message_rejects_unparseable_address() {
        let result = build_message(&email(&["not an address"]));
        assert!(matches!(result, Err(MailError::Address { .. })));
    }

    #[test]
    fn test_relay_from_config() {
        let relay = SmtpRelay::from_config(&config("a@x.com"));
        let rendered = format!("{:?}", relay);
        assert!(rendered.contains("smtp.gmail.com"));
        assert!(rendered.contains("587"));
        assert!(!rendered.contains("app-password"));
    }
}
