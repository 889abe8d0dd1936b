use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
};
use uuid::Uuid;

use super::repo_types::{CampaignType, NewCampaign};
use crate::{error::ApiError, images::codec::StoredImage};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CampaignError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Invalid campaign type: {0}")]
    InvalidType(String),
    #[error("Invalid goal value")]
    InvalidGoal,
    #[error("Area is required for fixed amount campaigns")]
    AreaRequired,
    #[error("Invalid rate value")]
    InvalidRate,
    #[error("Invalid date for {0}")]
    InvalidDate(&'static str),
    #[error("End date must be after start date")]
    EndBeforeStart,
}

impl From<CampaignError> for ApiError {
    fn from(e: CampaignError) -> Self {
        ApiError::Validation(e.to_string())
    }
}

/// Raw campaign fields as submitted by the multipart form.
#[derive(Debug, Default, Clone)]
pub struct CampaignForm {
    pub name: Option<String>,
    pub campaign_type: Option<String>,
    pub goal: Option<String>,
    pub area: Option<String>,
    pub rate: Option<String>,
    pub is_infinite: bool,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
    pub featured_image: Option<StoredImage>,
}

impl CampaignForm {
    /// Assigns a text field by its form name; unknown names are ignored.
    pub fn set(&mut self, field: &str, value: String) {
        match field {
            "name" => self.name = Some(value),
            "type" => self.campaign_type = Some(value),
            "goal" => self.goal = Some(value),
            "area" => self.area = Some(value),
            "rate" => self.rate = Some(value),
            "isInfinite" => self.is_infinite = value.trim() == "true",
            "description" => self.description = Some(value),
            "startDate" => self.start_date = Some(value),
            "endDate" => self.end_date = Some(value),
            "notes" => self.notes = Some(value),
            "status" => self.status = Some(value),
            _ => {}
        }
    }

    pub fn validate(self, created_by: Uuid) -> Result<NewCampaign, CampaignError> {
        let name = present(self.name).ok_or(CampaignError::MissingField("name"))?;
        let type_raw = present(self.campaign_type).ok_or(CampaignError::MissingField("type"))?;
        let goal_raw = present(self.goal);
        if goal_raw.is_none() && !self.is_infinite {
            return Err(CampaignError::MissingField("goal"));
        }
        let description =
            present(self.description).ok_or(CampaignError::MissingField("description"))?;
        let start_raw = present(self.start_date).ok_or(CampaignError::MissingField("startDate"))?;
        let end_raw = present(self.end_date).ok_or(CampaignError::MissingField("endDate"))?;

        let campaign_type: CampaignType = type_raw
            .parse()
            .map_err(|_| CampaignError::InvalidType(type_raw.clone()))?;

        let goal = if self.is_infinite {
            None
        } else {
            Some(positive(goal_raw.as_deref()).ok_or(CampaignError::InvalidGoal)?)
        };

        let (area, rate) = if campaign_type == CampaignType::FixedAmount {
            let area = present(self.area).ok_or(CampaignError::AreaRequired)?;
            let rate = positive(self.rate.as_deref()).ok_or(CampaignError::InvalidRate)?;
            (Some(area), Some(rate))
        } else {
            (None, None)
        };

        let start_date = parse_date(&start_raw).ok_or(CampaignError::InvalidDate("startDate"))?;
        let end_date = parse_date(&end_raw).ok_or(CampaignError::InvalidDate("endDate"))?;
        if start_date >= end_date {
            return Err(CampaignError::EndBeforeStart);
        }

        Ok(NewCampaign {
            name,
            campaign_type,
            goal,
            area,
            rate,
            is_infinite: self.is_infinite,
            description,
            start_date,
            end_date,
            notes: self.notes.map(|n| n.trim().to_string()).unwrap_or_default(),
            status: present(self.status).unwrap_or_else(|| "draft".to_string()),
            featured_image: self.featured_image,
            created_by,
        })
    }
}

fn present(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Leading integer of the field, so `"12.5"` reads as 12 and `"10abc"` as 10.
fn positive(v: Option<&str>) -> Option<i64> {
    v.and_then(leading_int).filter(|n| *n >= 1)
}

fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let sign = usize::from(s.starts_with(['+', '-']));
    let digits = s[sign..].bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    s[..sign + digits].parse().ok()
}

/// RFC 3339 timestamp, or a bare `YYYY-MM-DD` taken as midnight UTC.
pub fn parse_date(s: &str) -> Option<OffsetDateTime> {
    let s = s.trim();
    if let Ok(ts) = OffsetDateTime::parse(s, &Rfc3339) {
        return Some(ts);
    }
    Date::parse(s, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|d| d.midnight().assume_utc())
}
