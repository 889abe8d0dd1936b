use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::Donation;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationResponse {
    pub id: Uuid,
    pub box_id: Option<Uuid>,
    pub institution_id: Option<Uuid>,
    pub campaign_id: Option<Uuid>,
    pub name: Option<String>,
    pub amount: f64,
    #[serde(rename = "type")]
    pub donation_type: String,
    pub payment_id: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Donation> for DonationResponse {
    fn from(d: Donation) -> Self {
        Self {
            id: d.id,
            box_id: d.box_id,
            institution_id: d.institution_id,
            campaign_id: d.campaign_id,
            name: d.name,
            amount: d.amount,
            donation_type: d.donation_type,
            payment_id: d.payment_id,
            created_at: d.created_at,
        }
    }
}
