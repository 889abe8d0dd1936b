use axum::{extract::State, routing::post, Router};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use super::repo_types::{NewPushToken, PushToken};
use crate::{
    auth::SessionUser,
    error::{ApiError, ApiResponse, ApiResult},
    extract::Json,
    state::AppState,
};

pub fn push_routes() -> Router<AppState> {
    Router::new().route("/push-tokens", post(register_token))
}

lazy_static! {
    static ref EXPO_TOKEN_RE: Regex =
        Regex::new(r"^Expo(nent)?PushToken\[[A-Za-z0-9_\-]+\]$").unwrap();
}

pub(crate) fn is_expo_token(token: &str) -> bool {
    EXPO_TOKEN_RE.is_match(token)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub platform: Option<String>,
    pub device_name: Option<String>,
    pub app_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterTokenRequest {
    pub expo_push_token: Option<String>,
    #[serde(default)]
    pub box_holder: bool,
    #[serde(default)]
    pub device_info: Option<DeviceInfo>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PushTokenResponse {
    pub id: Uuid,
    pub expo_push_token: String,
    pub box_holder: bool,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub last_used: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<PushToken> for PushTokenResponse {
    fn from(t: PushToken) -> Self {
        Self {
            id: t.id,
            expo_push_token: t.expo_push_token,
            box_holder: t.box_holder,
            is_active: t.is_active,
            last_used: t.last_used,
            created_at: t.created_at,
        }
    }
}

/// Anonymous devices may register; a session, when present, links the token to the account.
#[instrument(skip(state, user, body))]
pub async fn register_token(
    State(state): State<AppState>,
    user: Option<SessionUser>,
    Json(body): Json<RegisterTokenRequest>,
) -> ApiResult<PushTokenResponse> {
    let token = body
        .expo_push_token
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::validation("Push token is required"))?;
    if !is_expo_token(&token) {
        return Err(ApiError::validation("Invalid Expo push token"));
    }
    let device = body.device_info.unwrap_or_default();
    let saved = state
        .db
        .upsert_push_token(&NewPushToken {
            expo_push_token: token,
            account_id: user.map(|u| u.id),
            box_holder: body.box_holder,
            platform: device.platform,
            device_name: device.device_name,
            app_version: device.app_version,
        })
        .await?;
    info!(token_id = %saved.id, box_holder = saved.box_holder, "push token registered");
    Ok(ApiResponse::with_message(
        saved.into(),
        "Push token registered successfully",
    ))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::is_expo_token;
    use crate::app::build_app;
    use crate::state::testing::TestHarness;

    async fn post(h: &TestHarness, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let req = Request::builder()
            .method("POST")
            .uri("/api/push-tokens")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let res = build_app(h.state.clone()).oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null))
    }

    #[test]
    fn expo_token_shape() {
        assert!(is_expo_token("ExponentPushToken[xxxxxxxxxxxxxxxxxxxxxx]"));
        assert!(is_expo_token("ExpoPushToken[abc-123_DEF]"));
        assert!(!is_expo_token("fcm:abc"));
        assert!(!is_expo_token("ExponentPushToken[]"));
    }

    #[tokio::test]
    async fn registering_twice_keeps_one_row() {
        let h = TestHarness::new();
        let token = "ExponentPushToken[device-one]";
        let (status, first) =
            post(&h, serde_json::json!({ "expoPushToken": token, "boxHolder": true })).await;
        assert_eq!(status, StatusCode::OK);
        let (status, second) = post(
            &h,
            serde_json::json!({ "expoPushToken": token, "deviceInfo": { "platform": "android" } }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["data"]["id"], second["data"]["id"]);
        assert_eq!(second["data"]["boxHolder"], true);
        assert!(first["data"]["createdAt"].is_string());
        assert_eq!(first["data"]["createdAt"], second["data"]["createdAt"]);
        assert_eq!(h.store.push_token_count(), 1);
    }

    #[tokio::test]
    async fn malformed_tokens_are_rejected() {
        let h = TestHarness::new();
        let (status, json) = post(&h, serde_json::json!({ "expoPushToken": "not-a-token" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "validation_error");
        let (status, _) = post(&h, serde_json::json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(h.store.push_token_count(), 0);
    }
}
