pub mod handlers;
pub mod job;
pub mod notifier;
pub mod services;

use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    handlers::reminder_routes()
}
