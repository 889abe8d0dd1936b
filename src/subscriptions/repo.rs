use anyhow::Context;
use async_trait::async_trait;

use super::repo_types::Subscription;
use crate::db::PgStore;

#[async_trait]
pub trait SubscriptionRepo: Send + Sync {
    async fn list_subscriptions_by_method(&self, method: &str) -> anyhow::Result<Vec<Subscription>>;
}

#[async_trait]
impl SubscriptionRepo for PgStore {
    async fn list_subscriptions_by_method(
        &self,
        method: &str,
    ) -> anyhow::Result<Vec<Subscription>> {
        let rows = sqlx::query_as::<_, Subscription>(
            r#"
            SELECT id, name, phone, amount, period, method, status, created_at
              FROM subscriptions
             WHERE method = $1
             ORDER BY created_at DESC
            "#,
        )
        .bind(method)
        .fetch_all(&self.pool)
        .await
        .context("list subscriptions by method")?;
        Ok(rows)
    }
}
