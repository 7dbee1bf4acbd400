//! Run modes: a single run, or a daily run at a fixed wall-clock time.
//!
//! The daily mode is a poll loop. Every `poll` interval it checks whether the
//! next send time has passed; if so it runs the job to completion before
//! sleeping again, so two runs can never overlap. Ctrl-C (or whatever shutdown
//! future the caller supplies) is only observed between polls.

use crate::error::ConfigError;
use chrono::{Days, NaiveDateTime, NaiveTime};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Default daily send time.
pub const DEFAULT_SEND_TIME: &str = "06:00";

/// Default interval between schedule checks.
pub const DEFAULT_POLL_SECS: u64 = 60;

/// Parse an `HH:MM` send time.
pub fn parse_send_time(raw: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").map_err(|_| ConfigError::SendTime(raw.to_string()))
}

/// First occurrence of `at` strictly after `after`.
pub fn next_run_after(after: NaiveDateTime, at: NaiveTime) -> NaiveDateTime {
    let today = after.date().and_time(at);
    if today > after {
        today
    } else {
        after
            .date()
            .checked_add_days(Days::new(1))
            .map(|d| d.and_time(at))
            .unwrap_or(NaiveDateTime::MAX)
    }
}

/// Tracks the next time the daily job is due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySchedule {
    at: NaiveTime,
    next_run: NaiveDateTime,
}

impl DailySchedule {
    /// Schedule starting from `now`: today at `at` if that is still ahead,
    /// otherwise tomorrow.
    pub fn new(now: NaiveDateTime, at: NaiveTime) -> Self {
        Self {
            at,
            next_run: next_run_after(now, at),
        }
    }

    pub fn next_run(&self) -> NaiveDateTime {
        self.next_run
    }

    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        now >= self.next_run
    }

    /// Advance past a run that finished at `finished`.
    pub fn mark_ran(&mut self, finished: NaiveDateTime) {
        self.next_run = next_run_after(finished, self.at);
    }
}

/// Run `job` every day according to `schedule` until `shutdown` resolves.
///
/// `clock` supplies the local wall-clock time. Returns the number of runs.
#[instrument(level = "info", skip_all, fields(first_run = %schedule.next_run(), poll_secs = poll.as_secs()))]
pub async fn run_daily<C, J, Fut, S>(
    mut schedule: DailySchedule,
    poll: Duration,
    clock: C,
    mut job: J,
    shutdown: S,
) -> usize
where
    C: Fn() -> NaiveDateTime,
    J: FnMut() -> Fut,
    Fut: Future<Output = ()>,
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut runs = 0usize;

    loop {
        let now = clock();
        if schedule.is_due(now) {
            debug!(%now, "Daily job is due");
            job().await;
            runs += 1;
            schedule.mark_ran(clock());
            info!(runs, next_run = %schedule.next_run(), "Scheduled next digest");
        }

        tokio::select! {
            _ = &mut shutdown => {
                info!(runs, "Scheduler received shutdown signal");
                break;
            }
            _ = tokio::time::sleep(poll) => {}
        }
    }

    runs
}
