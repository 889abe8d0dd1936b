use axum::{
    extract::State,
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{Deleted, InstitutionRequest, InstitutionResponse};
use crate::{
    auth::{Role, SessionUser},
    donations::{dto::DonationResponse, repo_types::NewDonation},
    error::{ApiError, ApiResponse, ApiResult, Created},
    extract::{Json, Path},
    state::AppState,
};

pub fn institution_routes() -> Router<AppState> {
    Router::new()
        .route("/institutions", get(list_institutions).post(create_institution))
        .route(
            "/institutions/:id",
            get(get_institution)
                .put(update_institution)
                .delete(delete_institution),
        )
        .route(
            "/institutions/:id/donations",
            get(list_donations).post(donate),
        )
}

fn not_found() -> ApiError {
    ApiError::not_found("Institution not found")
}

#[instrument(skip(state))]
pub async fn list_institutions(
    State(state): State<AppState>,
) -> ApiResult<Vec<InstitutionResponse>> {
    let rows = state.db.list_institutions().await?;
    Ok(ApiResponse::ok(rows.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state, user, body))]
pub async fn create_institution(
    State(state): State<AppState>,
    user: SessionUser,
    Json(body): Json<InstitutionRequest>,
) -> Created<InstitutionResponse> {
    user.require_role(&[Role::Admin])?;
    let new = body.validate()?;
    let saved = state.db.insert_institution(&new).await?;
    info!(institution_id = %saved.id, "institution created");
    Ok(ApiResponse::created(saved.into()))
}

#[instrument(skip(state))]
pub async fn get_institution(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<InstitutionResponse> {
    let row = state.db.get_institution(id).await?.ok_or_else(not_found)?;
    Ok(ApiResponse::ok(row.into()))
}

#[instrument(skip(state, user, body))]
pub async fn update_institution(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<Uuid>,
    Json(body): Json<InstitutionRequest>,
) -> ApiResult<InstitutionResponse> {
    user.require_role(&[Role::Admin])?;
    let new = body.validate()?;
    let saved = state
        .db
        .update_institution(id, &new)
        .await?
        .ok_or_else(not_found)?;
    info!(institution_id = %id, "institution updated");
    Ok(ApiResponse::ok(saved.into()))
}

#[instrument(skip(state, user))]
pub async fn delete_institution(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Deleted> {
    user.require_role(&[Role::Admin])?;
    if !state.db.delete_institution(id).await? {
        return Err(not_found());
    }
    info!(institution_id = %id, "institution deleted");
    Ok(ApiResponse::with_message(
        Deleted { id },
        "Institution deleted successfully",
    ))
}

#[instrument(skip(state))]
pub async fn list_donations(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<DonationResponse>> {
    state.db.get_institution(id).await?.ok_or_else(not_found)?;
    let rows = state.db.donations_for_institution(id).await?;
    Ok(ApiResponse::ok(rows.into_iter().map(Into::into).collect()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonateRequest {
    pub amount: f64,
    pub payment_id: Option<String>,
    pub name: Option<String>,
}

#[instrument(skip(state, body))]
pub async fn donate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<DonateRequest>,
) -> Created<DonationResponse> {
    if !(body.amount.is_finite() && body.amount > 0.0) {
        return Err(ApiError::validation("Amount must be greater than zero"));
    }
    state.db.get_institution(id).await?.ok_or_else(not_found)?;
    let donation = state
        .db
        .insert_donation(&NewDonation {
            institution_id: Some(id),
            name: body.name.filter(|n| !n.trim().is_empty()),
            amount: body.amount,
            donation_type: "institution".into(),
            payment_id: body.payment_id,
            ..Default::default()
        })
        .await?;
    info!(donation_id = %donation.id, institution_id = %id, "institution donation recorded");
    Ok(ApiResponse::created(donation.into()))
}
