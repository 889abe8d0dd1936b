use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{
            AuthResponse, LoginRequest, RefreshRequest, RolesQuery, RolesResponse, SessionIdentity,
            SessionView,
        },
        extractors::SessionUser,
        repo_types::Role,
        services::{is_valid_phone, resolve_session, roles_for_phone, session_identity, JwtKeys},
    },
    error::{ApiError, ApiResponse, ApiResult},
    extract::{Json, Query},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/session", get(session))
        .route("/auth/roles", get(roles))
}

fn issue_tokens(keys: &JwtKeys, user: SessionIdentity) -> Result<AuthResponse, ApiError> {
    let account_id = Uuid::parse_str(&user.id).map_err(|e| ApiError::Internal(e.into()))?;
    let access_token = keys.sign_access(account_id, &user.phone, user.role)?;
    let refresh_token = keys.sign_refresh(account_id, &user.phone, user.role)?;
    Ok(AuthResponse {
        access_token,
        refresh_token,
        user,
    })
}

#[instrument(skip(state, payload), fields(role = %payload.role))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<AuthResponse> {
    let user = resolve_session(state.identity.as_ref(), state.db.as_ref(), &payload)
        .await
        .map_err(|e| {
            warn!(kind = e.kind(), error = %e, "login failed");
            e.into_api_error(state.config.auth_expose_errors)
        })?;

    let keys = JwtKeys::from_ref(&state);
    let response = issue_tokens(&keys, user)?;
    info!(account_id = %response.user.id, role = %response.user.role, "session issued");
    Ok(ApiResponse::ok(response))
}

/// Re-derives the session from the stored account; the old claims are never patched.
#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> ApiResult<AuthResponse> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|e| ApiError::unauthorized(e.to_string()))?;

    let account = state
        .db
        .find_account_by_id(claims.sub)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Account no longer exists"))?;

    let user = session_identity(&account, &claims.phone);
    Ok(ApiResponse::ok(issue_tokens(&keys, user)?))
}

#[instrument(skip_all)]
pub async fn session(user: SessionUser) -> ApiResult<SessionView> {
    Ok(ApiResponse::ok(SessionView {
        id: user.id.to_string(),
        phone: user.phone,
        role: user.role,
    }))
}

#[instrument(skip(state, user))]
pub async fn roles(
    State(state): State<AppState>,
    user: SessionUser,
    Query(q): Query<RolesQuery>,
) -> ApiResult<RolesResponse> {
    user.require_role(&[Role::Admin])?;
    let phone = q.phone.trim();
    if !is_valid_phone(phone) {
        return Err(ApiError::validation("Invalid phone number"));
    }
    let roles = roles_for_phone(state.db.as_ref(), phone).await?;
    Ok(ApiResponse::ok(RolesResponse {
        primary: roles.first().copied(),
        roles,
    }))
}
