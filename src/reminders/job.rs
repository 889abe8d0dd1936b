use std::time::Duration as StdDuration;

use anyhow::Context;
use serde::Deserialize;
use time::{macros::time, Duration, OffsetDateTime, UtcOffset};
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::config::ReminderConfig;

/// Next Monday 09:00 UTC strictly after `now`.
pub fn next_run_after(now: OffsetDateTime) -> OffsetDateTime {
    let now = now.to_offset(UtcOffset::UTC);
    let days_ahead = (7 - i64::from(now.weekday().number_days_from_monday())) % 7;
    let candidate = (now.date() + Duration::days(days_ahead))
        .with_time(time!(9:00))
        .assume_utc();
    if candidate > now {
        candidate
    } else {
        candidate + Duration::weeks(1)
    }
}

#[derive(Debug, Deserialize)]
struct ReminderReply {
    message: Option<String>,
}

/// Calls the reminder endpoint once and returns the message it reported.
pub async fn trigger(client: &reqwest::Client, url: &str) -> anyhow::Result<String> {
    let resp = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("GET {url}"))?;
    let status = resp.status();
    anyhow::ensure!(status.is_success(), "reminder endpoint answered HTTP {status}");
    let reply: ReminderReply = resp.json().await.context("decode reminder reply")?;
    Ok(reply.message.unwrap_or_default())
}

/// Sleeps until each Monday 09:00 UTC and hits the reminder endpoint. No retries.
pub fn spawn(cfg: ReminderConfig) -> anyhow::Result<JoinHandle<()>> {
    let client = reqwest::Client::builder()
        .timeout(StdDuration::from_secs(60))
        .build()
        .context("build reminder http client")?;

    Ok(tokio::spawn(async move {
        loop {
            let now = OffsetDateTime::now_utc();
            let next = next_run_after(now);
            let wait = StdDuration::try_from(next - now).unwrap_or(StdDuration::ZERO);
            info!(next_run = %next, "payment reminder check scheduled");
            tokio::time::sleep(wait).await;

            info!("checking for payment reminders");
            match trigger(&client, &cfg.url).await {
                Ok(message) => info!(%message, "payment reminder check finished"),
                Err(e) => error!(error = ?e, "payment reminder check failed"),
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;
    use crate::{app::build_app, state::testing::TestHarness};

    #[test]
    fn schedules_next_monday_morning() {
        // 2026-10-19 is a Monday.
        assert_eq!(
            next_run_after(datetime!(2026-10-19 08:59:59 UTC)),
            datetime!(2026-10-19 09:00 UTC)
        );
        assert_eq!(
            next_run_after(datetime!(2026-10-19 09:00 UTC)),
            datetime!(2026-10-26 09:00 UTC)
        );
        assert_eq!(
            next_run_after(datetime!(2026-10-21 15:30 UTC)),
            datetime!(2026-10-26 09:00 UTC)
        );
        assert_eq!(
            next_run_after(datetime!(2026-10-25 23:59 UTC)),
            datetime!(2026-10-26 09:00 UTC)
        );
    }

    #[test]
    fn offsets_are_normalised_to_utc() {
        // Monday 12:00 in +05:30 is 06:30 UTC, still before the run.
        let next = next_run_after(datetime!(2026-10-19 12:00 +5:30));
        assert_eq!(next, datetime!(2026-10-19 09:00 UTC));
        assert_eq!(next.offset(), UtcOffset::UTC);
    }

    #[test]
    fn result_is_always_in_the_future_and_within_a_week() {
        let mut t = datetime!(2026-01-01 00:00 UTC);
        for _ in 0..(24 * 14) {
            let next = next_run_after(t);
            assert!(next > t);
            assert!(next - t <= Duration::weeks(1));
            assert_eq!(next.weekday(), time::Weekday::Monday);
            assert_eq!((next.hour(), next.minute()), (9, 0));
            t += Duration::hours(1);
        }
    }

    #[tokio::test]
    async fn trigger_reads_the_reported_message() {
        let h = TestHarness::new();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = build_app(h.state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = reqwest::Client::new();
        let message = trigger(&client, &format!("http://{addr}/api/boxes/reminders"))
            .await
            .unwrap();
        assert_eq!(message, "No pending payments found");

        let err = trigger(&client, &format!("http://{addr}/api/nowhere"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("404"));
    }
}
