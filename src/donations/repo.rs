use anyhow::Context;
use async_trait::async_trait;
use uuid::Uuid;

use super::repo_types::{Donation, NewDonation};
use crate::db::PgStore;

#[async_trait]
pub trait DonationRepo: Send + Sync {
    async fn insert_donation(&self, new: &NewDonation) -> anyhow::Result<Donation>;
    /// Most recent donation recorded against a box.
    async fn latest_donation_for_box(&self, box_id: Uuid) -> anyhow::Result<Option<Donation>>;
    async fn donations_for_institution(
        &self,
        institution_id: Uuid,
    ) -> anyhow::Result<Vec<Donation>>;
}

pub(crate) const DONATION_COLUMNS: &str =
    "id, box_id, institution_id, campaign_id, name, amount, donation_type, payment_id, created_at";

#[async_trait]
impl DonationRepo for PgStore {
    async fn insert_donation(&self, new: &NewDonation) -> anyhow::Result<Donation> {
        let row = sqlx::query_as::<_, Donation>(&format!(
            r#"
            INSERT INTO donations
                (id, box_id, institution_id, campaign_id, name, amount, donation_type, payment_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {DONATION_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(new.box_id)
        .bind(new.institution_id)
        .bind(new.campaign_id)
        .bind(&new.name)
        .bind(new.amount)
        .bind(&new.donation_type)
        .bind(&new.payment_id)
        .fetch_one(&self.pool)
        .await
        .context("insert donation")?;
        Ok(row)
    }

    async fn latest_donation_for_box(&self, box_id: Uuid) -> anyhow::Result<Option<Donation>> {
        let row = sqlx::query_as::<_, Donation>(&format!(
            r#"
            SELECT {DONATION_COLUMNS}
              FROM donations
             WHERE box_id = $1
             ORDER BY created_at DESC
             LIMIT 1
            "#
        ))
        .bind(box_id)
        .fetch_optional(&self.pool)
        .await
        .context("latest donation for box")?;
        Ok(row)
    }

    async fn donations_for_institution(
        &self,
        institution_id: Uuid,
    ) -> anyhow::Result<Vec<Donation>> {
        let rows = sqlx::query_as::<_, Donation>(&format!(
            r#"
            SELECT {DONATION_COLUMNS}
              FROM donations
             WHERE institution_id = $1
             ORDER BY created_at DESC
            "#
        ))
        .bind(institution_id)
        .fetch_all(&self.pool)
        .await
        .context("donations for institution")?;
        Ok(rows)
    }
}
