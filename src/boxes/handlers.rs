use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use time::OffsetDateTime;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::{
    dto::{
        BoxPaymentResponse, BoxRequest, BoxResponse, Deleted, PaymentRequest, PhoneQuery,
        VolunteerQuery,
    },
    repo_types::{BoxWriteError, VolunteerRef},
    services::with_latest_payments,
};
use crate::{
    auth::{services::normalize_phone, Role, SessionUser},
    donations::{dto::DonationResponse, repo_types::NewDonation},
    error::{ApiError, ApiResponse, ApiResult, Created},
    extract::{Json, Path, Query},
    state::AppState,
};

pub fn box_routes() -> Router<AppState> {
    Router::new()
        .route("/boxes", post(create_box))
        .route("/boxes/volunteer", get(volunteer_boxes))
        .route("/boxes/volunteer/find-boxes", get(find_boxes))
        .route("/boxes/findmybox", get(find_my_box))
        .route(
            "/boxes/:id",
            get(get_box).put(update_box).delete(delete_box),
        )
        .route("/boxes/:id/payments", post(record_payment))
}

fn not_found() -> ApiError {
    ApiError::not_found("Box not found")
}

#[instrument(skip(state, user, body))]
pub async fn create_box(
    State(state): State<AppState>,
    user: SessionUser,
    Json(body): Json<BoxRequest>,
) -> Created<BoxResponse> {
    user.require_role(&[Role::Volunteer, Role::Admin])?;
    let new = body.validate()?;
    let name = state
        .db
        .find_account_by_id(user.id)
        .await?
        .and_then(|a| a.name);
    let volunteer = VolunteerRef {
        id: user.id,
        name,
        phone: user.phone.clone(),
    };
    let saved = state
        .db
        .insert_box(&new, &volunteer)
        .await?
        .ok_or(BoxWriteError::DuplicateSerial)?;
    info!(
        box_id = %saved.id,
        serial = %saved.serial_number,
        volunteer_id = %user.id,
        "box registered"
    );
    Ok(ApiResponse::created(saved.into()))
}

#[instrument(skip(state))]
pub async fn get_box(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<BoxResponse> {
    let row = state.db.get_box(id).await?.ok_or_else(not_found)?;
    Ok(ApiResponse::ok(row.into()))
}

#[instrument(skip(state, user, body))]
pub async fn update_box(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<Uuid>,
    Json(body): Json<BoxRequest>,
) -> ApiResult<BoxResponse> {
    user.require_role(&[Role::Volunteer, Role::Admin])?;
    let new = body.validate()?;
    let saved = state.db.update_box(id, &new).await?.ok_or_else(not_found)?;
    info!(box_id = %id, "box updated");
    Ok(ApiResponse::ok(saved.into()))
}

#[instrument(skip(state, user))]
pub async fn delete_box(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Deleted> {
    user.require_role(&[Role::Admin])?;
    if !state.db.delete_box(id).await? {
        return Err(not_found());
    }
    info!(box_id = %id, "box deleted");
    Ok(ApiResponse::with_message(Deleted { id }, "Box deleted successfully"))
}

/// Boxes registered by the calling volunteer.
#[instrument(skip(state, user))]
pub async fn volunteer_boxes(
    State(state): State<AppState>,
    user: SessionUser,
) -> ApiResult<Vec<BoxResponse>> {
    user.require_role(&[Role::Volunteer])?;
    let rows = state.db.list_boxes_by_volunteer(user.id).await?;
    Ok(ApiResponse::ok(rows.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn find_boxes(
    State(state): State<AppState>,
    Query(q): Query<VolunteerQuery>,
) -> ApiResult<Vec<BoxPaymentResponse>> {
    let raw = q
        .id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::unauthorized("Unauthorized, please log in"))?;
    let volunteer_id =
        Uuid::parse_str(raw).map_err(|_| ApiError::validation("Invalid volunteer id"))?;

    let boxes = state.db.list_boxes_by_volunteer(volunteer_id).await?;
    let enriched = with_latest_payments(state.db.as_ref(), boxes, OffsetDateTime::now_utc()).await?;
    Ok(ApiResponse::ok(enriched.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state, q))]
pub async fn find_my_box(
    State(state): State<AppState>,
    Query(q): Query<PhoneQuery>,
) -> ApiResult<Vec<BoxPaymentResponse>> {
    let raw = q
        .phone
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::validation("Phone number is required"))?;
    let phone = normalize_phone(raw).ok_or_else(|| ApiError::validation("Invalid phone number"))?;

    let boxes = state.db.list_boxes_by_mobile(&phone).await?;
    if boxes.is_empty() {
        debug!("no boxes for phone lookup");
    }
    let enriched = with_latest_payments(state.db.as_ref(), boxes, OffsetDateTime::now_utc()).await?;
    Ok(ApiResponse::ok(enriched.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state, body))]
pub async fn record_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<PaymentRequest>,
) -> Created<DonationResponse> {
    if !(body.amount.is_finite() && body.amount > 0.0) {
        return Err(ApiError::validation("Amount must be greater than zero"));
    }
    let donation = NewDonation {
        box_id: Some(id),
        name: body.name.filter(|n| !n.trim().is_empty()),
        amount: body.amount,
        donation_type: "box".into(),
        payment_id: body.payment_id,
        ..Default::default()
    };
    let saved = state
        .db
        .record_box_payment(id, &donation, OffsetDateTime::now_utc())
        .await?
        .ok_or_else(not_found)?;
    info!(donation_id = %saved.id, box_id = %id, "box payment recorded");
    Ok(ApiResponse::created(saved.into()))
}
