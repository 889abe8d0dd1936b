use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

/// One Expo push message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushMessage {
    pub to: String,
    pub title: String,
    pub body: String,
    pub sound: String,
}

impl PushMessage {
    pub fn payment_reminder(token: &str) -> Self {
        Self {
            to: token.to_string(),
            title: "Payment Reminder".into(),
            body: "Your donation box payment for this month is pending. Please make your contribution."
                .into(),
            sound: "default".into(),
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, messages: &[PushMessage]) -> anyhow::Result<()>;
}

/// Expo accepts at most this many messages per request.
const EXPO_BATCH: usize = 100;

/// Sends through the Expo push HTTP API.
pub struct ExpoNotifier {
    client: reqwest::Client,
    url: String,
}

impl ExpoNotifier {
    pub fn new(url: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .context("build push http client")?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl Notifier for ExpoNotifier {
    async fn send(&self, messages: &[PushMessage]) -> anyhow::Result<()> {
        for batch in messages.chunks(EXPO_BATCH) {
            let resp = self
                .client
                .post(&self.url)
                .header("accept", "application/json")
                .json(batch)
                .send()
                .await
                .context("send push batch")?;
            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                warn!(%status, %body, "expo rejected push batch");
                anyhow::bail!("expo push failed with HTTP {status}");
            }
            debug!(count = batch.len(), "push batch accepted");
        }
        Ok(())
    }
}
