use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct PushToken {
    pub id: Uuid,
    pub expo_push_token: String,
    pub account_id: Option<Uuid>,
    pub box_holder: bool,
    pub platform: Option<String>,
    pub device_name: Option<String>,
    pub app_version: Option<String>,
    pub is_active: bool,
    pub last_used: OffsetDateTime,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPushToken {
    pub expo_push_token: String,
    pub account_id: Option<Uuid>,
    pub box_holder: bool,
    pub platform: Option<String>,
    pub device_name: Option<String>,
    pub app_version: Option<String>,
}
