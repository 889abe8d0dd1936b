use anyhow::Context;
use async_trait::async_trait;
use sqlx::types::Json;
use uuid::Uuid;

use super::repo_types::{Frame, NewFrame};
use crate::db::PgStore;

#[async_trait]
pub trait FrameRepo: Send + Sync {
    async fn list_frames(&self) -> anyhow::Result<Vec<Frame>>;
    async fn get_frame(&self, id: Uuid) -> anyhow::Result<Option<Frame>>;
    async fn insert_frame(&self, new: &NewFrame) -> anyhow::Result<Frame>;
    /// Replaces every editable field; `bump_usage` also adds one to the usage count.
    async fn update_frame(
        &self,
        id: Uuid,
        new: &NewFrame,
        bump_usage: bool,
    ) -> anyhow::Result<Option<Frame>>;
    async fn increment_frame_usage(&self, id: Uuid) -> anyhow::Result<Option<Frame>>;
    async fn delete_frame(&self, id: Uuid) -> anyhow::Result<bool>;
}

const FRAME_COLUMNS: &str = "id, name, image_key, image_url, dimensions, placement_coords, \
     text_settings, is_active, usage_count, created_at, updated_at";

#[async_trait]
impl FrameRepo for PgStore {
    async fn list_frames(&self) -> anyhow::Result<Vec<Frame>> {
        let rows = sqlx::query_as::<_, Frame>(&format!(
            "SELECT {FRAME_COLUMNS} FROM frames ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .context("list frames")?;
        Ok(rows)
    }

    async fn get_frame(&self, id: Uuid) -> anyhow::Result<Option<Frame>> {
        let row = sqlx::query_as::<_, Frame>(&format!(
            "SELECT {FRAME_COLUMNS} FROM frames WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("get frame")?;
        Ok(row)
    }

    async fn insert_frame(&self, new: &NewFrame) -> anyhow::Result<Frame> {
        let row = sqlx::query_as::<_, Frame>(&format!(
            r#"
            INSERT INTO frames
                (id, name, image_key, image_url, dimensions, placement_coords, text_settings, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {FRAME_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(&new.image_key)
        .bind(&new.image_url)
        .bind(Json(&new.dimensions))
        .bind(Json(&new.placement_coords))
        .bind(Json(&new.text_settings))
        .bind(new.is_active)
        .fetch_one(&self.pool)
        .await
        .context("insert frame")?;
        Ok(row)
    }

    async fn update_frame(
        &self,
        id: Uuid,
        new: &NewFrame,
        bump_usage: bool,
    ) -> anyhow::Result<Option<Frame>> {
        let row = sqlx::query_as::<_, Frame>(&format!(
            r#"
            UPDATE frames
               SET name = $2, image_key = $3, image_url = $4, dimensions = $5,
                   placement_coords = $6, text_settings = $7, is_active = $8,
                   usage_count = usage_count + CASE WHEN $9 THEN 1 ELSE 0 END,
                   updated_at = now()
             WHERE id = $1
            RETURNING {FRAME_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&new.name)
        .bind(&new.image_key)
        .bind(&new.image_url)
        .bind(Json(&new.dimensions))
        .bind(Json(&new.placement_coords))
        .bind(Json(&new.text_settings))
        .bind(new.is_active)
        .bind(bump_usage)
        .fetch_optional(&self.pool)
        .await
        .context("update frame")?;
        Ok(row)
    }

    async fn increment_frame_usage(&self, id: Uuid) -> anyhow::Result<Option<Frame>> {
        let row = sqlx::query_as::<_, Frame>(&format!(
            r#"
            UPDATE frames
               SET usage_count = usage_count + 1, updated_at = now()
             WHERE id = $1
            RETURNING {FRAME_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("increment frame usage")?;
        Ok(row)
    }

    async fn delete_frame(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM frames WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("delete frame")?;
        Ok(res.rows_affected() > 0)
    }
}
