use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::images::codec::StoredImage;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct Institution {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub featured_image: Option<Vec<u8>>,
    pub featured_image_type: Option<String>,
    pub facts: Json<Vec<Fact>>,
    pub established: String,
    pub location: String,
    pub category: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Validated write payload; replaces every column on update.
#[derive(Debug, Clone)]
pub struct NewInstitution {
    pub name: String,
    pub description: String,
    pub featured_image: Option<StoredImage>,
    pub facts: Vec<Fact>,
    pub established: String,
    pub location: String,
    pub category: String,
}
