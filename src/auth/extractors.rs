use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use super::{claims::TokenKind, repo_types::Role, services::JwtKeys};
use crate::error::ApiError;

/// Session identity read from the bearer access token. No store lookup is made.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub id: Uuid,
    pub phone: String,
    pub role: Role,
}

impl SessionUser {
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), ApiError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            warn!(account_id = %self.id, role = %self.role, "role not allowed");
            Err(ApiError::unauthorized("Unauthorized"))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or_else(|| ApiError::unauthorized("Invalid Authorization header"))?;

        let claims = keys.verify(token).map_err(|_| {
            warn!("invalid or expired token");
            ApiError::unauthorized("Invalid or expired token")
        })?;

        if claims.kind != TokenKind::Access {
            return Err(ApiError::unauthorized("Access token required"));
        }

        Ok(SessionUser {
            id: claims.sub,
            phone: claims.phone,
            role: claims.role,
        })
    }
}
