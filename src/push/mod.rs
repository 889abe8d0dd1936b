pub mod handlers;
pub mod repo;
pub mod repo_types;

use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    handlers::push_routes()
}
