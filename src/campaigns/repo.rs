use anyhow::Context;
use async_trait::async_trait;
use uuid::Uuid;

use super::repo_types::{Campaign, NewCampaign};
use crate::db::PgStore;

#[async_trait]
pub trait CampaignRepo: Send + Sync {
    /// All campaigns, or only those with the given status.
    async fn list_campaigns(&self, status: Option<&str>) -> anyhow::Result<Vec<Campaign>>;
    async fn get_campaign(&self, id: Uuid) -> anyhow::Result<Option<Campaign>>;
    async fn insert_campaign(&self, new: &NewCampaign) -> anyhow::Result<Campaign>;
    async fn delete_campaign(&self, id: Uuid) -> anyhow::Result<bool>;
}

const CAMPAIGN_COLUMNS: &str = "id, name, campaign_type, goal, area, rate, is_infinite, \
     description, start_date, end_date, notes, status, current_amount, featured_image, \
     featured_image_type, created_by, created_at";

#[async_trait]
impl CampaignRepo for PgStore {
    async fn list_campaigns(&self, status: Option<&str>) -> anyhow::Result<Vec<Campaign>> {
        let rows = sqlx::query_as::<_, Campaign>(&format!(
            r#"
            SELECT {CAMPAIGN_COLUMNS}
              FROM campaigns
             WHERE ($1::text IS NULL OR status = $1)
             ORDER BY start_date DESC
            "#
        ))
        .bind(status)
        .fetch_all(&self.pool)
        .await
        .context("list campaigns")?;
        Ok(rows)
    }

    async fn get_campaign(&self, id: Uuid) -> anyhow::Result<Option<Campaign>> {
        let row = sqlx::query_as::<_, Campaign>(&format!(
            "SELECT {CAMPAIGN_COLUMNS} FROM campaigns WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("get campaign")?;
        Ok(row)
    }

    async fn insert_campaign(&self, new: &NewCampaign) -> anyhow::Result<Campaign> {
        let (image, image_type) = match &new.featured_image {
            Some(img) => (Some(img.bytes.as_slice()), Some(img.content_type.as_str())),
            None => (None, None),
        };
        let row = sqlx::query_as::<_, Campaign>(&format!(
            r#"
            INSERT INTO campaigns
                (id, name, campaign_type, goal, area, rate, is_infinite, description,
                 start_date, end_date, notes, status, current_amount,
                 featured_image, featured_image_type, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, 0, $13, $14, $15)
            RETURNING {CAMPAIGN_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(new.campaign_type.as_str())
        .bind(new.goal)
        .bind(&new.area)
        .bind(new.rate)
        .bind(new.is_infinite)
        .bind(&new.description)
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(&new.notes)
        .bind(&new.status)
        .bind(image)
        .bind(image_type)
        .bind(new.created_by)
        .fetch_one(&self.pool)
        .await
        .context("insert campaign")?;
        Ok(row)
    }

    async fn delete_campaign(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM campaigns WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("delete campaign")?;
        Ok(res.rows_affected() > 0)
    }
}
