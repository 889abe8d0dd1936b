use anyhow::Context;
use async_trait::async_trait;
use uuid::Uuid;

use super::repo_types::{NewPushToken, PushToken};
use crate::db::PgStore;

#[async_trait]
pub trait PushTokenRepo: Send + Sync {
    /// Inserts or refreshes by token; re-registering reactivates it and bumps `last_used`.
    async fn upsert_push_token(&self, new: &NewPushToken) -> anyhow::Result<PushToken>;
    async fn list_active_box_holder_tokens(&self) -> anyhow::Result<Vec<String>>;
}

#[async_trait]
impl PushTokenRepo for PgStore {
    async fn upsert_push_token(&self, new: &NewPushToken) -> anyhow::Result<PushToken> {
        let row = sqlx::query_as::<_, PushToken>(
            r#"
            INSERT INTO push_tokens
                (id, expo_push_token, account_id, box_holder, platform, device_name, app_version)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (expo_push_token) DO UPDATE
               SET account_id  = COALESCE(EXCLUDED.account_id, push_tokens.account_id),
                   box_holder  = push_tokens.box_holder OR EXCLUDED.box_holder,
                   platform    = COALESCE(EXCLUDED.platform, push_tokens.platform),
                   device_name = COALESCE(EXCLUDED.device_name, push_tokens.device_name),
                   app_version = COALESCE(EXCLUDED.app_version, push_tokens.app_version),
                   is_active   = true,
                   last_used   = now()
            RETURNING id, expo_push_token, account_id, box_holder, platform, device_name,
                      app_version, is_active, last_used, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.expo_push_token)
        .bind(new.account_id)
        .bind(new.box_holder)
        .bind(&new.platform)
        .bind(&new.device_name)
        .bind(&new.app_version)
        .fetch_one(&self.pool)
        .await
        .context("upsert push token")?;
        Ok(row)
    }

    async fn list_active_box_holder_tokens(&self) -> anyhow::Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT expo_push_token FROM push_tokens WHERE is_active AND box_holder",
        )
        .fetch_all(&self.pool)
        .await
        .context("list box holder push tokens")?;
        Ok(rows.into_iter().map(|(t,)| t).collect())
    }
}
