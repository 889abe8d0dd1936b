use anyhow::Context;
use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{BoxWriteError, DonationBox, NewBox, VolunteerRef};
use crate::{
    db::PgStore,
    donations::{
        repo::DONATION_COLUMNS,
        repo_types::{Donation, NewDonation},
    },
};

#[async_trait]
pub trait BoxRepo: Send + Sync {
    async fn list_boxes_by_volunteer(&self, volunteer_id: Uuid) -> anyhow::Result<Vec<DonationBox>>;
    async fn list_boxes_by_mobile(&self, mobile: &str) -> anyhow::Result<Vec<DonationBox>>;
    async fn list_active_boxes(&self) -> anyhow::Result<Vec<DonationBox>>;
    async fn get_box(&self, id: Uuid) -> anyhow::Result<Option<DonationBox>>;
    /// `None` when the serial number is already registered.
    async fn insert_box(
        &self,
        new: &NewBox,
        volunteer: &VolunteerRef,
    ) -> anyhow::Result<Option<DonationBox>>;
    /// Fails with `DuplicateSerial` when another box already holds the serial number.
    async fn update_box(
        &self,
        id: Uuid,
        new: &NewBox,
    ) -> Result<Option<DonationBox>, BoxWriteError>;
    async fn delete_box(&self, id: Uuid) -> anyhow::Result<bool>;
    /// Inserts the donation and moves `last_payment` in one step. `None` if the box is gone.
    async fn record_box_payment(
        &self,
        box_id: Uuid,
        donation: &NewDonation,
        paid_at: OffsetDateTime,
    ) -> anyhow::Result<Option<Donation>>;
}

const BOX_COLUMNS: &str = "id, serial_number, name, house_name, address, place, area, district, \
     ward, pincode, mobile_number, secondary_mobile_number, care_of, is_active, \
     registered_date, last_payment, volunteer_id, volunteer_name, volunteer_phone";

#[async_trait]
impl BoxRepo for PgStore {
    async fn list_boxes_by_volunteer(
        &self,
        volunteer_id: Uuid,
    ) -> anyhow::Result<Vec<DonationBox>> {
        let rows = sqlx::query_as::<_, DonationBox>(&format!(
            "SELECT {BOX_COLUMNS} FROM boxes WHERE volunteer_id = $1 ORDER BY registered_date DESC"
        ))
        .bind(volunteer_id)
        .fetch_all(&self.pool)
        .await
        .context("list boxes by volunteer")?;
        Ok(rows)
    }

    async fn list_boxes_by_mobile(&self, mobile: &str) -> anyhow::Result<Vec<DonationBox>> {
        let rows = sqlx::query_as::<_, DonationBox>(&format!(
            "SELECT {BOX_COLUMNS} FROM boxes WHERE mobile_number = $1 ORDER BY registered_date DESC"
        ))
        .bind(mobile)
        .fetch_all(&self.pool)
        .await
        .context("list boxes by mobile")?;
        Ok(rows)
    }

    async fn list_active_boxes(&self) -> anyhow::Result<Vec<DonationBox>> {
        let rows = sqlx::query_as::<_, DonationBox>(&format!(
            "SELECT {BOX_COLUMNS} FROM boxes WHERE is_active ORDER BY registered_date DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .context("list active boxes")?;
        Ok(rows)
    }

    async fn get_box(&self, id: Uuid) -> anyhow::Result<Option<DonationBox>> {
        let row = sqlx::query_as::<_, DonationBox>(&format!(
            "SELECT {BOX_COLUMNS} FROM boxes WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("get box")?;
        Ok(row)
    }

    async fn insert_box(
        &self,
        new: &NewBox,
        volunteer: &VolunteerRef,
    ) -> anyhow::Result<Option<DonationBox>> {
        let row = sqlx::query_as::<_, DonationBox>(&format!(
            r#"
            INSERT INTO boxes
                (id, serial_number, name, house_name, address, place, area, district, ward,
                 pincode, mobile_number, secondary_mobile_number, care_of, is_active,
                 volunteer_id, volunteer_name, volunteer_phone)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            ON CONFLICT (serial_number) DO NOTHING
            RETURNING {BOX_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&new.serial_number)
        .bind(&new.name)
        .bind(&new.house_name)
        .bind(&new.address)
        .bind(&new.place)
        .bind(&new.area)
        .bind(&new.district)
        .bind(&new.ward)
        .bind(&new.pincode)
        .bind(&new.mobile_number)
        .bind(&new.secondary_mobile_number)
        .bind(&new.care_of)
        .bind(new.is_active)
        .bind(volunteer.id)
        .bind(&volunteer.name)
        .bind(&volunteer.phone)
        .fetch_optional(&self.pool)
        .await
        .context("insert box")?;
        Ok(row)
    }

    async fn update_box(
        &self,
        id: Uuid,
        new: &NewBox,
    ) -> Result<Option<DonationBox>, BoxWriteError> {
        let res = sqlx::query_as::<_, DonationBox>(&format!(
            r#"
            UPDATE boxes
               SET serial_number = $2, name = $3, house_name = $4, address = $5, place = $6,
                   area = $7, district = $8, ward = $9, pincode = $10, mobile_number = $11,
                   secondary_mobile_number = $12, care_of = $13, is_active = $14
             WHERE id = $1
            RETURNING {BOX_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&new.serial_number)
        .bind(&new.name)
        .bind(&new.house_name)
        .bind(&new.address)
        .bind(&new.place)
        .bind(&new.area)
        .bind(&new.district)
        .bind(&new.ward)
        .bind(&new.pincode)
        .bind(&new.mobile_number)
        .bind(&new.secondary_mobile_number)
        .bind(&new.care_of)
        .bind(new.is_active)
        .fetch_optional(&self.pool)
        .await;
        match res {
            Ok(row) => Ok(row),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(BoxWriteError::DuplicateSerial)
            }
            Err(e) => Err(anyhow::Error::new(e).context("update box").into()),
        }
    }

    async fn delete_box(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM boxes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("delete box")?;
        Ok(res.rows_affected() > 0)
    }

    async fn record_box_payment(
        &self,
        box_id: Uuid,
        donation: &NewDonation,
        paid_at: OffsetDateTime,
    ) -> anyhow::Result<Option<Donation>> {
        let mut tx = self.pool.begin().await.context("begin payment tx")?;

        let touched = sqlx::query("UPDATE boxes SET last_payment = $2 WHERE id = $1")
            .bind(box_id)
            .bind(paid_at)
            .execute(&mut *tx)
            .await
            .context("update box last_payment")?;
        if touched.rows_affected() == 0 {
            tx.rollback().await.context("rollback payment tx")?;
            return Ok(None);
        }

        let row = sqlx::query_as::<_, Donation>(&format!(
            r#"
            INSERT INTO donations
                (id, box_id, institution_id, campaign_id, name, amount, donation_type, payment_id, created_at)
            VALUES ($1, $2, NULL, NULL, $3, $4, $5, $6, $7)
            RETURNING {DONATION_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(box_id)
        .bind(&donation.name)
        .bind(donation.amount)
        .bind(&donation.donation_type)
        .bind(&donation.payment_id)
        .bind(paid_at)
        .fetch_one(&mut *tx)
        .await
        .context("insert box donation")?;

        tx.commit().await.context("commit payment tx")?;
        Ok(Some(row))
    }
}
