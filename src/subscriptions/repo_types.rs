use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Subscription {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub amount: f64,
    pub period: String,
    /// `manual` or `auto`.
    pub method: String,
    pub status: String,
    pub created_at: OffsetDateTime,
}
