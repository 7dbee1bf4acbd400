//! # Daily News Digest
//!
//! Fetches yesterday's most popular AI and technology articles from NewsAPI
//! and emails them as a single HTML digest to a fixed list of recipients.
//!
//! ## Usage
//!
//! ```sh
//! NEWSAPI_KEY=... EMAIL_SENDER=me@gmail.com EMAIL_PASSWORD=... \
//!     EMAIL_RECEIVER=a@example.com,b@example.com daily_news_digest
//! ```
//!
//! ## Architecture
//!
//! Each run is a straight pipeline:
//! 1. **Fetching**: one NewsAPI query for the target date, first 15 articles
//! 2. **Composing**: articles rendered into an HTML document and subject line
//! 3. **Sending**: one SMTP session, one message to every recipient
//!
//! By default the process runs once and exits. `--mode daily` keeps it
//! resident and repeats the run every day at a fixed time.

use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod api;
mod cli;
mod config;
mod error;
mod job;
mod mailer;
mod models;
mod outputs;
mod schedule;
mod utils;

use cli::{Cli, Mode};
use config::DigestConfig;
use job::run_daily_job;
use mailer::SmtpRelay;
use schedule::{run_daily, DailySchedule};
use utils::target_date_now;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("daily_news_digest starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // ---- Configuration ----
    let config = match &args.config {
        Some(path) => DigestConfig::from_yaml_file(path)?,
        None => DigestConfig::from_env(),
    }
    .with_news_endpoint(args.news_endpoint.clone())
    .with_smtp_relay(args.smtp_host.clone(), args.smtp_port);
    info!(
        recipients = config.recipients.as_slice().len(),
        smtp_host = %config.smtp_host,
        smtp_port = config.smtp_port,
        "Loaded configuration"
    );

    let client = reqwest::Client::new();
    let transport = SmtpRelay::from_config(&config);

    match args.mode {
        Mode::Once => {
            let outcome = run_daily_job(&client, &config, &transport, target_date_now()).await?;
            info!(%outcome, "Run complete");
        }
        Mode::Daily => {
            let schedule = DailySchedule::new(Local::now().naive_local(), args.at);
            info!(next_run = %schedule.next_run(), "Daily mode enabled");

            let (client, config, transport) = (&client, &config, &transport);
            run_daily(
                schedule,
                Duration::from_secs(args.poll_secs.max(1)),
                || Local::now().naive_local(),
                move || async move {
                    match run_daily_job(client, config, transport, target_date_now()).await {
                        Ok(outcome) => info!(%outcome, "Scheduled run complete"),
                        Err(e) => error!(error = %e, "Scheduled run failed; waiting for the next day"),
                    }
                },
                async {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        error!(error = %e, "Failed to listen for Ctrl-C; scheduler will run until killed");
                        std::future::pending::<()>().await;
                    }
                },
            )
            .await;
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
