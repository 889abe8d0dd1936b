use axum::extract::Multipart;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{Dimensions, Frame, NewFrame, PlacementCoords, TextSettings};
use crate::{error::ApiError, images::services::UploadItem};

/// Multipart frame submission, shared by create and full update.
#[derive(Default)]
pub struct FrameForm {
    pub name: Option<String>,
    pub image: Option<UploadItem>,
    pub dimensions: Option<Dimensions>,
    pub placement_coords: Option<PlacementCoords>,
    pub text_settings: Option<TextSettings>,
    pub is_active: Option<bool>,
    pub increment_usage: bool,
}

fn malformed(e: impl std::fmt::Display) -> ApiError {
    ApiError::validation(format!("Malformed form data: {e}"))
}

fn parse_json<T: DeserializeOwned>(field: &str, raw: &str) -> Result<T, ApiError> {
    serde_json::from_str(raw).map_err(|_| ApiError::validation(format!("Invalid JSON in {field}")))
}

impl FrameForm {
    pub async fn read(mut mp: Multipart) -> Result<Self, ApiError> {
        let mut form = FrameForm::default();
        while let Some(field) = mp.next_field().await.map_err(malformed)? {
            let name = field.name().unwrap_or_default().to_string();
            if name == "frameImage" {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let file_name = field.file_name().map(str::to_string);
                let body = field.bytes().await.map_err(malformed)?;
                if !body.is_empty() {
                    form.image = Some(UploadItem {
                        body,
                        content_type,
                        file_name,
                    });
                }
                continue;
            }

            let value = field.text().await.map_err(malformed)?;
            match name.as_str() {
                "name" => form.name = Some(value.trim().to_string()).filter(|s| !s.is_empty()),
                "dimensions" => form.dimensions = Some(parse_json("dimensions", &value)?),
                "placementCoords" => {
                    form.placement_coords = Some(parse_json("placementCoords", &value)?)
                }
                "textSettings" => form.text_settings = Some(parse_json("textSettings", &value)?),
                "isActive" => form.is_active = Some(value.trim() == "true"),
                "incrementUsage" => form.increment_usage = value.trim() == "true",
                _ => {}
            }
        }
        Ok(form)
    }

    pub fn require_name(&self) -> Result<String, ApiError> {
        self.name
            .clone()
            .ok_or_else(|| ApiError::validation("Frame name is required"))
    }

    /// Field values for a new row; absent geometry falls back to defaults.
    pub fn into_new(self, name: String, image_key: String, image_url: String) -> NewFrame {
        NewFrame {
            name,
            image_key: Some(image_key),
            image_url: Some(image_url),
            dimensions: self.dimensions.unwrap_or_default(),
            placement_coords: self.placement_coords.unwrap_or_default(),
            text_settings: self.text_settings.unwrap_or_default(),
            is_active: self.is_active.unwrap_or(true),
        }
    }

    /// Field values for a full update; absent fields keep what `current` holds.
    pub fn merge_into(self, name: String, current: &Frame) -> NewFrame {
        NewFrame {
            name,
            image_key: current.image_key.clone(),
            image_url: current.image_url.clone(),
            dimensions: self.dimensions.unwrap_or_else(|| current.dimensions.0.clone()),
            placement_coords: self
                .placement_coords
                .unwrap_or_else(|| current.placement_coords.0.clone()),
            text_settings: self
                .text_settings
                .unwrap_or_else(|| current.text_settings.0.clone()),
            is_active: self.is_active.unwrap_or(current.is_active),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageUpdate {
    #[serde(default)]
    pub increment_usage: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameResponse {
    pub id: Uuid,
    pub name: String,
    pub image_url: Option<String>,
    pub dimensions: Dimensions,
    pub placement_coords: PlacementCoords,
    pub text_settings: TextSettings,
    pub is_active: bool,
    pub usage_count: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Frame> for FrameResponse {
    fn from(f: Frame) -> Self {
        Self {
            id: f.id,
            name: f.name,
            image_url: f.image_url,
            dimensions: f.dimensions.0,
            placement_coords: f.placement_coords.0,
            text_settings: f.text_settings.0,
            is_active: f.is_active,
            usage_count: f.usage_count,
            created_at: f.created_at,
            updated_at: f.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub id: Uuid,
}
