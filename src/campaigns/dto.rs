use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::Campaign;
use crate::images::codec::encode_optional;

#[derive(Debug, Deserialize)]
pub struct StatusFilter {
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub campaign_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<i64>,
    pub is_infinite: bool,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub start_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_date: OffsetDateTime,
    pub notes: String,
    pub status: String,
    pub current_amount: i64,
    pub featured_image: Option<String>,
    pub created_by: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Campaign> for CampaignResponse {
    fn from(c: Campaign) -> Self {
        Self {
            featured_image: encode_optional(
                c.featured_image.as_deref(),
                c.featured_image_type.as_deref(),
            ),
            id: c.id,
            name: c.name,
            campaign_type: c.campaign_type,
            goal: c.goal,
            area: c.area,
            rate: c.rate,
            is_infinite: c.is_infinite,
            description: c.description,
            start_date: c.start_date,
            end_date: c.end_date,
            notes: c.notes,
            status: c.status,
            current_amount: c.current_amount,
            created_by: c.created_by,
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignCreated {
    pub campaign_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub id: Uuid,
}
