use axum::{extract::State, routing::get, Router};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

use super::repo_types::Subscription;
use crate::{
    error::{ApiResponse, ApiResult},
    state::AppState,
};

pub fn subscription_routes() -> Router<AppState> {
    Router::new().route("/subscriptions/manual", get(list_manual))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionResponse {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub amount: f64,
    pub period: String,
    pub method: String,
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(s: Subscription) -> Self {
        Self {
            id: s.id,
            name: s.name,
            phone: s.phone,
            amount: s.amount,
            period: s.period,
            method: s.method,
            status: s.status,
            created_at: s.created_at,
        }
    }
}

#[instrument(skip(state))]
pub async fn list_manual(State(state): State<AppState>) -> ApiResult<Vec<SubscriptionResponse>> {
    let rows = state.db.list_subscriptions_by_method("manual").await?;
    Ok(ApiResponse::ok(rows.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::app::build_app;
    use crate::state::testing::TestHarness;

    #[tokio::test]
    async fn only_manual_subscriptions_are_listed() {
        let h = TestHarness::new();
        h.store.seed_subscription("Aisha", "+919800000401", "manual");
        h.store.seed_subscription("Basheer", "+919800000402", "auto");
        h.store.seed_subscription("Chitra", "+919800000403", "manual");

        let res = build_app(h.state.clone())
            .oneshot(
                Request::builder().uri("/api/subscriptions/manual").body(Body::empty()).unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["success"], true);
        let list = json["data"].as_array().unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.iter().all(|s| s["method"] == "manual"));
    }
}
