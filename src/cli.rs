//! Command-line interface definitions for the digest job.
//!
//! Secrets are never taken from flags; they come from the environment (or
//! `.env`) or from the YAML file named by `--config`. Flags only select the run
//! mode and override endpoints.

use crate::config::{DEFAULT_NEWS_ENDPOINT, DEFAULT_SMTP_HOST, DEFAULT_SMTP_PORT};
use crate::schedule::{parse_send_time, DEFAULT_POLL_SECS, DEFAULT_SEND_TIME};
use chrono::NaiveTime;
use clap::{Parser, ValueEnum};

/// How long the process lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Run the job once and exit
    Once,
    /// Run the job every day at `--at` until interrupted
    Daily,
}

/// Command-line arguments for the digest job.
///
/// # Examples
///
/// ```sh
/// # Send yesterday's digest now, secrets from the environment / .env
/// daily_news_digest
///
/// # Secrets from a YAML file
/// daily_news_digest --config ./digest.yaml
///
/// # Stay resident and send every morning at 06:00
/// daily_news_digest --mode daily --at 06:00
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML file holding NEWSAPI_KEY, EMAIL_SENDER,
    /// EMAIL_PASSWORD and EMAIL_RECEIVER
    #[arg(short, long)]
    pub config: Option<String>,

    /// Run mode
    #[arg(long, value_enum, default_value_t = Mode::Once, env = "DIGEST_MODE")]
    pub mode: Mode,

    /// Daily send time (local, HH:MM); only used with `--mode daily`
    #[arg(long, default_value = DEFAULT_SEND_TIME, value_parser = parse_send_time, env = "DIGEST_SEND_TIME")]
    pub at: NaiveTime,

    /// Seconds between schedule checks in daily mode
    #[arg(long, default_value_t = DEFAULT_POLL_SECS)]
    pub poll_secs: u64,

    /// NewsAPI `everything` endpoint
    #[arg(long, default_value = DEFAULT_NEWS_ENDPOINT, env = "NEWSAPI_ENDPOINT")]
    pub news_endpoint: String,

    /// SMTP submission relay host
    #[arg(long, default_value = DEFAULT_SMTP_HOST, env = "SMTP_HOST")]
    pub smtp_host: String,

    /// SMTP submission relay port (STARTTLS)
    #[arg(long, default_value_t = DEFAULT_SMTP_PORT, env = "SMTP_PORT")]
    pub smtp_port: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["daily_news_digest"]);

        assert_eq!(cli.mode, Mode::Once);
        assert_eq!(cli.at, NaiveTime::from_hms_opt(6, 0, 0).unwrap());
        assert_eq!(cli.poll_secs, 60);
        assert_eq!(cli.news_endpoint, DEFAULT_NEWS_ENDPOINT);
        assert_eq!(cli.smtp_host, "smtp.gmail.com");
        assert_eq!(cli.smtp_port, 587);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_daily_mode() {
        let cli = Cli::parse_from([
            "daily_news_digest",
            "--mode",
            "daily",
            "--at",
            "07:30",
            "--poll-secs",
            "30",
            "-c",
            "/etc/digest.yaml",
        ]);

        assert_eq!(cli.mode, Mode::Daily);
        assert_eq!(cli.at, NaiveTime::from_hms_opt(7, 30, 0).unwrap());
        assert_eq!(cli.poll_secs, 30);
        assert_eq!(cli.config.as_deref(), Some("/etc/digest.yaml"));
    }

    #[test]
    fn test_cli_rejects_bad_send_time() {
        let result = Cli::try_parse_from(["daily_news_digest", "--at", "six"]);
        assert!(result.is_err());
    }
}
