use axum::{extract::State, routing::get, Router};
use time::OffsetDateTime;
use tracing::instrument;

use super::services::{run_reminders, ReminderOutcome};
use crate::{
    error::{ApiResponse, ApiResult},
    state::AppState,
};

pub fn reminder_routes() -> Router<AppState> {
    Router::new().route("/boxes/reminders", get(send_reminders))
}

/// Triggered by the weekly job; carries no session.
#[instrument(skip(state))]
pub async fn send_reminders(State(state): State<AppState>) -> ApiResult<ReminderOutcome> {
    let outcome = run_reminders(
        state.db.as_ref(),
        state.notifier.as_ref(),
        OffsetDateTime::now_utc(),
    )
    .await?;
    let message = outcome.message.clone();
    Ok(ApiResponse::with_message(outcome, message))
}
