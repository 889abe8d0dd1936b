use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    routing::get,
    Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{CampaignCreated, CampaignResponse, Deleted, StatusFilter},
    validation::CampaignForm,
};
use crate::{
    auth::{Role, SessionUser},
    error::{ApiError, ApiResponse, ApiResult, Created},
    extract::{Path, Query},
    images::codec::{StoredImage, DEFAULT_IMAGE_TYPE},
    state::AppState,
};

pub fn campaign_routes() -> Router<AppState> {
    Router::new()
        .route("/campaigns", get(list_campaigns).post(create_campaign))
        .route("/campaigns/published", get(list_published))
        .route("/campaigns/:id", get(get_campaign).delete(delete_campaign))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024)) // 10MB
}

fn not_found() -> ApiError {
    ApiError::not_found("Campaign not found")
}

#[instrument(skip(state))]
pub async fn list_campaigns(
    State(state): State<AppState>,
    Query(q): Query<StatusFilter>,
) -> ApiResult<Vec<CampaignResponse>> {
    let status = q.status.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let rows = state.db.list_campaigns(status).await?;
    Ok(ApiResponse::ok(rows.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn list_published(State(state): State<AppState>) -> ApiResult<Vec<CampaignResponse>> {
    let rows = state.db.list_campaigns(Some("active")).await?;
    Ok(ApiResponse::ok(rows.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn get_campaign(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<CampaignResponse> {
    let row = state.db.get_campaign(id).await?.ok_or_else(not_found)?;
    Ok(ApiResponse::ok(row.into()))
}

/// POST /campaigns (multipart)
/// Text fields by name, optional `featuredImage` file.
#[instrument(skip(state, user, mp))]
pub async fn create_campaign(
    State(state): State<AppState>,
    user: SessionUser,
    mp: Result<Multipart, MultipartRejection>,
) -> Created<CampaignCreated> {
    user.require_role(&[Role::Admin])?;
    let mut mp = mp?;

    let mut form = CampaignForm::default();
    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Malformed form data: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "featuredImage" {
            let content_type = field
                .content_type()
                .map(str::to_string)
                .unwrap_or_else(|| DEFAULT_IMAGE_TYPE.to_string());
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::validation(format!("Malformed form data: {e}")))?;
            if !bytes.is_empty() {
                form.featured_image = Some(StoredImage {
                    bytes: bytes.to_vec(),
                    content_type,
                });
            }
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| ApiError::validation(format!("Malformed form data: {e}")))?;
            form.set(&name, value);
        }
    }

    let new = form.validate(user.id)?;
    let saved = state.db.insert_campaign(&new).await?;
    info!(campaign_id = %saved.id, kind = %new.campaign_type, "campaign created");
    Ok(ApiResponse::created(CampaignCreated {
        campaign_id: saved.id,
    }))
}

#[instrument(skip(state, user))]
pub async fn delete_campaign(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Deleted> {
    user.require_role(&[Role::Admin])?;
    if !state.db.delete_campaign(id).await? {
        return Err(not_found());
    }
    info!(campaign_id = %id, "campaign deleted");
    Ok(ApiResponse::with_message(Deleted { id }, "Campaign deleted successfully"))
}
