use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{
    repo_types::{DonationBox, NewBox},
    services::{BoxWithPayment, PaymentStatus},
};
use crate::{auth::services::normalize_phone, donations::repo_types::Donation, error::ApiError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxRequest {
    pub serial_number: Option<String>,
    pub name: Option<String>,
    pub house_name: Option<String>,
    pub address: Option<String>,
    pub place: Option<String>,
    pub area: Option<String>,
    pub district: Option<String>,
    pub ward: Option<String>,
    pub pincode: Option<String>,
    pub mobile_number: Option<String>,
    pub secondary_mobile_number: Option<String>,
    pub care_of: Option<String>,
    pub is_active: Option<bool>,
}

fn required(v: Option<String>, field: &str) -> Result<String, ApiError> {
    v.map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::validation(format!("Missing required field: {field}")))
}

fn optional(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl BoxRequest {
    pub fn validate(self) -> Result<NewBox, ApiError> {
        let serial_number = required(self.serial_number, "serialNumber")?;
        let name = required(self.name, "name")?;
        let mobile_raw = required(self.mobile_number, "mobileNumber")?;
        let address = required(self.address, "address")?;

        let mobile_number = normalize_phone(&mobile_raw)
            .ok_or_else(|| ApiError::validation("Invalid mobile number"))?;
        let secondary_mobile_number = match optional(self.secondary_mobile_number) {
            Some(raw) => Some(
                normalize_phone(&raw)
                    .ok_or_else(|| ApiError::validation("Invalid secondary mobile number"))?,
            ),
            None => None,
        };

        Ok(NewBox {
            serial_number,
            name,
            house_name: optional(self.house_name),
            address,
            place: optional(self.place),
            area: optional(self.area),
            district: optional(self.district),
            ward: optional(self.ward),
            pincode: optional(self.pincode),
            mobile_number,
            secondary_mobile_number,
            care_of: optional(self.care_of),
            is_active: self.is_active.unwrap_or(true),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerView {
    pub id: Uuid,
    pub name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxResponse {
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
    #[serde(with = "time::serde::rfc3339")]
    pub registered_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_payment: Option<OffsetDateTime>,
    pub volunteer: Option<VolunteerView>,
}

impl From<DonationBox> for BoxResponse {
    fn from(b: DonationBox) -> Self {
        Self {
            volunteer: b.volunteer_id.map(|id| VolunteerView {
                id,
                name: b.volunteer_name.clone(),
                phone: b.volunteer_phone.clone(),
            }),
            id: b.id,
            serial_number: b.serial_number,
            name: b.name,
            house_name: b.house_name,
            address: b.address,
            place: b.place,
            area: b.area,
            district: b.district,
            ward: b.ward,
            pincode: b.pincode,
            mobile_number: b.mobile_number,
            secondary_mobile_number: b.secondary_mobile_number,
            care_of: b.care_of,
            is_active: b.is_active,
            registered_date: b.registered_date,
            last_payment: b.last_payment,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestPayment {
    pub amount: f64,
    pub payment_id: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

impl From<Donation> for LatestPayment {
    fn from(d: Donation) -> Self {
        Self {
            amount: d.amount,
            payment_id: d.payment_id,
            date: d.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxPaymentResponse {
    #[serde(flatten)]
    pub record: BoxResponse,
    pub payment_status: PaymentStatus,
    pub latest_payment: Option<LatestPayment>,
}

impl From<BoxWithPayment> for BoxPaymentResponse {
    fn from(b: BoxWithPayment) -> Self {
        Self {
            record: b.record.into(),
            payment_status: b.status,
            latest_payment: b.latest.map(Into::into),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct VolunteerQuery {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PhoneQuery {
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub amount: f64,
    pub payment_id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> BoxRequest {
        serde_json::from_value(serde_json::json!({
            "serialNumber": "BX-0042",
            "name": "Fathima",
            "address": "Near mosque, Ward 4",
            "mobileNumber": "+91 98765 43210",
        }))
        .unwrap()
    }

    #[test]
    fn mobile_is_normalized_and_defaults_apply() {
        let b = request().validate().unwrap();
        assert_eq!(b.mobile_number, "+919876543210");
        assert!(b.is_active);
        assert_eq!(b.house_name, None);
    }

    #[test]
    fn first_missing_field_is_reported() {
        let mut r = request();
        r.name = Some("  ".into());
        r.address = None;
        let err = r.validate().unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: name");
    }

    #[test]
    fn bad_mobile_is_rejected() {
        let mut r = request();
        r.mobile_number = Some("12345".into());
        assert!(matches!(r.validate(), Err(ApiError::Validation(_))));
    }
}
