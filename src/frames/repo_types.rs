use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            width: 1080.0,
            height: 1080.0,
        }
    }
}

/// Where the user's photo sits inside the frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacementCoords {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSettings {
    pub font_size: f64,
    pub color: String,
    /// Any further styling keys the editor sends are kept as-is.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self {
            font_size: 24.0,
            color: "#000000".into(),
            extra: serde_json::Map::new(),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Frame {
    pub id: Uuid,
    pub name: String,
    pub image_key: Option<String>,
    pub image_url: Option<String>,
    pub dimensions: Json<Dimensions>,
    pub placement_coords: Json<PlacementCoords>,
    pub text_settings: Json<TextSettings>,
    pub is_active: bool,
    pub usage_count: i64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewFrame {
    pub name: String,
    pub image_key: Option<String>,
    pub image_url: Option<String>,
    pub dimensions: Dimensions,
    pub placement_coords: PlacementCoords,
    pub text_settings: TextSettings,
    pub is_active: bool,
}
