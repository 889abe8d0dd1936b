use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;

/// A physical collection box. Named to stay clear of `std::boxed::Box`.
#[derive(Debug, Clone, FromRow)]
pub struct DonationBox {
    pub id: Uuid,
    pub serial_number: String,
    pub name: String,
    pub house_name: Option<String>,
    pub address: String,
    pub place: Option<String>,
    pub area: Option<String>,
    pub district: Option<String>,
    pub ward: Option<String>,
    pub pincode: Option<String>,
    pub mobile_number: String,
    pub secondary_mobile_number: Option<String>,
    pub care_of: Option<String>,
    pub is_active: bool,
    pub registered_date: OffsetDateTime,
    pub last_payment: Option<OffsetDateTime>,
    pub volunteer_id: Option<Uuid>,
    pub volunteer_name: Option<String>,
    pub volunteer_phone: Option<String>,
}

/// Session user recorded as the box's volunteer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolunteerRef {
    pub id: Uuid,
    pub name: Option<String>,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBox {
    pub serial_number: String,
    pub name: String,
    pub house_name: Option<String>,
    pub address: String,
    pub place: Option<String>,
    pub area: Option<String>,
    pub district: Option<String>,
    pub ward: Option<String>,
    pub pincode: Option<String>,
    pub mobile_number: String,
    pub secondary_mobile_number: Option<String>,
    pub care_of: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum BoxWriteError {
    #[error("Box with this serial number already exists")]
    DuplicateSerial,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl From<BoxWriteError> for ApiError {
    fn from(e: BoxWriteError) -> Self {
        match e {
            BoxWriteError::DuplicateSerial => {
                ApiError::validation(BoxWriteError::DuplicateSerial.to_string())
            }
            BoxWriteError::Store(e) => ApiError::Internal(e),
        }
    }
}
