use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Donation {
    pub id: Uuid,
    pub box_id: Option<Uuid>,
    pub institution_id: Option<Uuid>,
    pub campaign_id: Option<Uuid>,
    pub name: Option<String>,
    pub amount: f64,
    pub donation_type: String,
    /// Payment gateway reference; the gateway itself is never called from here.
    pub payment_id: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Default)]
pub struct NewDonation {
    pub box_id: Option<Uuid>,
    pub institution_id: Option<Uuid>,
    pub campaign_id: Option<Uuid>,
    pub name: Option<String>,
    pub amount: f64,
    pub donation_type: String,
    pub payment_id: Option<String>,
}
