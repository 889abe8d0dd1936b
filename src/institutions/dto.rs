use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{Fact, Institution, NewInstitution};
use crate::{
    error::ApiError,
    images::codec::{decode_optional, encode_optional},
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub featured_image: Option<String>,
    #[serde(default)]
    pub facts: Vec<FactInput>,
    pub established: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FactInput {
    pub label: Option<String>,
    pub value: Option<String>,
}

fn required(field: &'static str, value: Option<String>) -> Result<String, ApiError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::validation(format!("Missing required field: {field}"))),
    }
}

impl InstitutionRequest {
    /// Checks required fields in a fixed order and reports the first one missing.
    pub fn validate(self) -> Result<NewInstitution, ApiError> {
        let name = required("name", self.name)?;
        let description = required("description", self.description)?;
        let established = required("established", self.established)?;
        let location = required("location", self.location)?;
        let category = required("category", self.category)?;

        let facts = self
            .facts
            .into_iter()
            .enumerate()
            .map(|(i, f)| {
                let label = f.label.map(|s| s.trim().to_string()).unwrap_or_default();
                let value = f.value.map(|s| s.trim().to_string()).unwrap_or_default();
                if label.is_empty() || value.is_empty() {
                    Err(ApiError::validation(format!(
                        "Fact {} needs both label and value",
                        i + 1
                    )))
                } else {
                    Ok(Fact { label, value })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let featured_image = decode_optional(self.featured_image.as_deref())?;

        Ok(NewInstitution {
            name,
            description,
            featured_image,
            facts,
            established,
            location,
            category,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstitutionResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub featured_image: Option<String>,
    pub facts: Vec<Fact>,
    pub established: String,
    pub location: String,
    pub category: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Institution> for InstitutionResponse {
    fn from(i: Institution) -> Self {
        Self {
            featured_image: encode_optional(
                i.featured_image.as_deref(),
                i.featured_image_type.as_deref(),
            ),
            id: i.id,
            name: i.name,
            description: i.description,
            facts: i.facts.0,
            established: i.established,
            location: i.location,
            category: i.category,
            created_at: i.created_at,
            updated_at: i.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub id: Uuid,
}
