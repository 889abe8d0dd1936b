use serde::Serialize;
use time::OffsetDateTime;
use tracing::info;

use super::notifier::{Notifier, PushMessage};
use crate::{
    boxes::{repo::BoxRepo, services::pending_boxes},
    push::repo::PushTokenRepo,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderOutcome {
    pub message: String,
    pub pending_boxes: usize,
    pub notified: usize,
}

/// Finds active boxes still unpaid this month and pushes one reminder to every box-holder device.
pub async fn run_reminders<D>(
    db: &D,
    notifier: &dyn Notifier,
    now: OffsetDateTime,
) -> anyhow::Result<ReminderOutcome>
where
    D: BoxRepo + PushTokenRepo + ?Sized,
{
    let pending = pending_boxes(db.list_active_boxes().await?, now).len();
    if pending == 0 {
        return Ok(ReminderOutcome {
            message: "No pending payments found".into(),
            pending_boxes: 0,
            notified: 0,
        });
    }

    let tokens = db.list_active_box_holder_tokens().await?;
    if tokens.is_empty() {
        return Ok(ReminderOutcome {
            message: format!("{pending} boxes pending but no box holder devices are registered"),
            pending_boxes: pending,
            notified: 0,
        });
    }

    let messages: Vec<PushMessage> = tokens
        .iter()
        .map(|t| PushMessage::payment_reminder(t))
        .collect();
    notifier.send(&messages).await?;
    info!(pending, notified = messages.len(), "payment reminders sent");

    Ok(ReminderOutcome {
        message: format!(
            "Sent reminders to {} devices for {pending} pending boxes",
            messages.len()
        ),
        pending_boxes: pending,
        notified: messages.len(),
    })
}
