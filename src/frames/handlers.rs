use axum::{
    extract::{
        multipart::MultipartRejection, DefaultBodyLimit, FromRequest, Multipart, Request, State,
    },
    http::header::CONTENT_TYPE,
    routing::get,
    Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::dto::{Deleted, FrameForm, FrameResponse, UsageUpdate};
use crate::{
    auth::{Role, SessionUser},
    error::{ApiError, ApiResponse, ApiResult, Created},
    extract::{Json, Path},
    images::services::{delete_image_quietly, upload_image},
    state::AppState,
};

const FRAME_PREFIX: &str = "frames";

pub fn frame_routes() -> Router<AppState> {
    Router::new()
        .route("/frames", get(list_frames).post(create_frame))
        .route(
            "/frames/:id",
            get(get_frame).put(update_frame).delete(delete_frame),
        )
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB
}

fn not_found() -> ApiError {
    ApiError::not_found("Frame not found")
}

#[instrument(skip(state))]
pub async fn list_frames(State(state): State<AppState>) -> ApiResult<Vec<FrameResponse>> {
    let rows = state.db.list_frames().await?;
    Ok(ApiResponse::ok(rows.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn get_frame(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<FrameResponse> {
    let row = state.db.get_frame(id).await?.ok_or_else(not_found)?;
    Ok(ApiResponse::ok(row.into()))
}

/// POST /frames (multipart)
/// `name` and `frameImage` are required; geometry fields are JSON strings.
#[instrument(skip(state, user, mp))]
pub async fn create_frame(
    State(state): State<AppState>,
    user: SessionUser,
    mp: Result<Multipart, MultipartRejection>,
) -> Created<FrameResponse> {
    user.require_role(&[Role::Admin])?;
    let mut form = FrameForm::read(mp?).await?;
    let name = form.require_name()?;
    let image = form
        .image
        .take()
        .ok_or_else(|| ApiError::validation("Frame image is required"))?;

    let uploaded = upload_image(state.storage.as_ref(), FRAME_PREFIX, image).await?;
    let new = form.into_new(name, uploaded.key.clone(), uploaded.url);
    let saved = match state.db.insert_frame(&new).await {
        Ok(f) => f,
        Err(e) => {
            delete_image_quietly(state.storage.as_ref(), &uploaded.key).await;
            return Err(e.into());
        }
    };
    info!(frame_id = %saved.id, key = %uploaded.key, "frame created");
    Ok(ApiResponse::created(saved.into()))
}

/// PUT /frames/:id
/// Multipart is a full update (admin only). A JSON body may only ask for `incrementUsage`.
#[instrument(skip(state, user, req))]
pub async fn update_frame(
    State(state): State<AppState>,
    user: Option<SessionUser>,
    Path(id): Path<Uuid>,
    req: Request,
) -> ApiResult<FrameResponse> {
    let is_multipart = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    if !is_multipart {
        let Json(body) = Json::<UsageUpdate>::from_request(req, &state).await?;
        if !body.increment_usage {
            return Err(ApiError::validation("Invalid update operation"));
        }
        let saved = state
            .db
            .increment_frame_usage(id)
            .await?
            .ok_or_else(not_found)?;
        return Ok(ApiResponse::with_message(
            saved.into(),
            "Frame usage incremented successfully",
        ));
    }

    let user = user.ok_or_else(|| ApiError::unauthorized("Unauthorized"))?;
    user.require_role(&[Role::Admin])?;
    let mp = Multipart::from_request(req, &state).await?;
    let mut form = FrameForm::read(mp).await?;
    let name = form.require_name()?;
    let current = state.db.get_frame(id).await?.ok_or_else(not_found)?;

    let bump_usage = form.increment_usage;
    let new_image = form.image.take();
    let mut new = form.merge_into(name, &current);
    let mut uploaded_key = None;
    if let Some(image) = new_image {
        let uploaded = upload_image(state.storage.as_ref(), FRAME_PREFIX, image).await?;
        uploaded_key = Some(uploaded.key.clone());
        new.image_key = Some(uploaded.key);
        new.image_url = Some(uploaded.url);
    }

    let saved = match state.db.update_frame(id, &new, bump_usage).await {
        Ok(Some(f)) => f,
        outcome => {
            // the row was not written, so the fresh upload is orphaned
            if let Some(key) = uploaded_key.as_deref() {
                delete_image_quietly(state.storage.as_ref(), key).await;
            }
            return Err(match outcome {
                Err(e) => e.into(),
                Ok(_) => not_found(),
            });
        }
    };

    if let Some(old_key) = current.image_key.as_deref() {
        if new.image_key.as_deref() != Some(old_key) {
            delete_image_quietly(state.storage.as_ref(), old_key).await;
        }
    }
    info!(frame_id = %id, "frame updated");
    Ok(ApiResponse::with_message(saved.into(), "Frame updated successfully"))
}

#[instrument(skip(state, user))]
pub async fn delete_frame(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Deleted> {
    user.require_role(&[Role::Admin])?;
    let current = state.db.get_frame(id).await?.ok_or_else(not_found)?;
    match current.image_key.as_deref() {
        Some(key) => delete_image_quietly(state.storage.as_ref(), key).await,
        None => warn!(frame_id = %id, "frame has no stored image"),
    }
    if !state.db.delete_frame(id).await? {
        return Err(not_found());
    }
    info!(frame_id = %id, "frame deleted");
    Ok(ApiResponse::with_message(Deleted { id }, "Frame deleted successfully"))
}
