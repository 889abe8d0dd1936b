use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::images::codec::StoredImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignType {
    Fundraising,
    Physical,
    #[serde(rename = "fixedamount")]
    FixedAmount,
}

impl CampaignType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignType::Fundraising => "fundraising",
            CampaignType::Physical => "physical",
            CampaignType::FixedAmount => "fixedamount",
        }
    }
}

impl fmt::Display for CampaignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CampaignType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fundraising" => Ok(CampaignType::Fundraising),
            "physical" => Ok(CampaignType::Physical),
            "fixedamount" => Ok(CampaignType::FixedAmount),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Campaign {
    pub id: Uuid,
    pub name: String,
    pub campaign_type: String,
    pub goal: Option<i64>,
    pub area: Option<String>,
    pub rate: Option<i64>,
    pub is_infinite: bool,
    pub description: String,
    pub start_date: OffsetDateTime,
    pub end_date: OffsetDateTime,
    pub notes: String,
    pub status: String,
    pub current_amount: i64,
    pub featured_image: Option<Vec<u8>>,
    pub featured_image_type: Option<String>,
    pub created_by: Uuid,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCampaign {
    pub name: String,
    pub campaign_type: CampaignType,
    pub goal: Option<i64>,
    pub area: Option<String>,
    pub rate: Option<i64>,
    pub is_infinite: bool,
    pub description: String,
    pub start_date: OffsetDateTime,
    pub end_date: OffsetDateTime,
    pub notes: String,
    pub status: String,
    pub featured_image: Option<StoredImage>,
    pub created_by: Uuid,
}
