use anyhow::Context;
use async_trait::async_trait;
use sqlx::types::Json;
use uuid::Uuid;

use super::repo_types::{Institution, NewInstitution};
use crate::db::PgStore;

#[async_trait]
pub trait InstitutionRepo: Send + Sync {
    async fn list_institutions(&self) -> anyhow::Result<Vec<Institution>>;
    async fn get_institution(&self, id: Uuid) -> anyhow::Result<Option<Institution>>;
    async fn insert_institution(&self, new: &NewInstitution) -> anyhow::Result<Institution>;
    async fn update_institution(
        &self,
        id: Uuid,
        new: &NewInstitution,
    ) -> anyhow::Result<Option<Institution>>;
    /// `false` when nothing was deleted.
    async fn delete_institution(&self, id: Uuid) -> anyhow::Result<bool>;
}

const INSTITUTION_COLUMNS: &str = "id, name, description, featured_image, featured_image_type, \
     facts, established, location, category, created_at, updated_at";

#[async_trait]
impl InstitutionRepo for PgStore {
    async fn list_institutions(&self) -> anyhow::Result<Vec<Institution>> {
        let rows = sqlx::query_as::<_, Institution>(&format!(
            "SELECT {INSTITUTION_COLUMNS} FROM institutions ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .context("list institutions")?;
        Ok(rows)
    }

    async fn get_institution(&self, id: Uuid) -> anyhow::Result<Option<Institution>> {
        let row = sqlx::query_as::<_, Institution>(&format!(
            "SELECT {INSTITUTION_COLUMNS} FROM institutions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("get institution")?;
        Ok(row)
    }

    async fn insert_institution(&self, new: &NewInstitution) -> anyhow::Result<Institution> {
        let (image, image_type) = split_image(new);
        let row = sqlx::query_as::<_, Institution>(&format!(
            r#"
            INSERT INTO institutions
                (id, name, description, featured_image, featured_image_type,
                 facts, established, location, category)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {INSTITUTION_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(&new.description)
        .bind(image)
        .bind(image_type)
        .bind(Json(&new.facts))
        .bind(&new.established)
        .bind(&new.location)
        .bind(&new.category)
        .fetch_one(&self.pool)
        .await
        .context("insert institution")?;
        Ok(row)
    }

    async fn update_institution(
        &self,
        id: Uuid,
        new: &NewInstitution,
    ) -> anyhow::Result<Option<Institution>> {
        let (image, image_type) = split_image(new);
        let row = sqlx::query_as::<_, Institution>(&format!(
            r#"
            UPDATE institutions
               SET name = $2, description = $3, featured_image = $4, featured_image_type = $5,
                   facts = $6, established = $7, location = $8, category = $9,
                   updated_at = now()
             WHERE id = $1
            RETURNING {INSTITUTION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&new.name)
        .bind(&new.description)
        .bind(image)
        .bind(image_type)
        .bind(Json(&new.facts))
        .bind(&new.established)
        .bind(&new.location)
        .bind(&new.category)
        .fetch_optional(&self.pool)
        .await
        .context("update institution")?;
        Ok(row)
    }

    async fn delete_institution(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM institutions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("delete institution")?;
        Ok(res.rows_affected() > 0)
    }
}

fn split_image(new: &NewInstitution) -> (Option<&[u8]>, Option<&str>) {
    match &new.featured_image {
        Some(img) => (Some(img.bytes.as_slice()), Some(img.content_type.as_str())),
        None => (None, None),
    }
}
