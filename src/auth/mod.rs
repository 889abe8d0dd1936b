use crate::state::AppState;
use axum::Router;

mod claims;
mod dto;
pub mod error;
pub(crate) mod extractors;
pub mod handlers;
pub mod identity;
pub mod repo;
pub mod repo_types;
pub mod services;

pub use extractors::SessionUser;
pub use repo_types::Role;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::auth_routes())
}
