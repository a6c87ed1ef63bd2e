//! Volunteering API endpoints.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};

use super::{Ack, OwnerQuery, ValidJson};
use crate::auth::ensure_owner;
use crate::errors::AppError;
use crate::models::{DeleteAck, NewVolunteerRequest, RecordId, SessionUser, VolunteerRequest};
use crate::AppState;

pub const NO_VOLUNTEERS_NEEDED: &str = "No more volunteers needed";
pub const VOLUNTEER_SUBMITTED: &str = "Volunteer request submitted";

/// POST /be-volunteer - Apply to a post, taking one of its open slots.
///
/// The slot is claimed first with a conditional decrement, so two concurrent
/// applications can never both take the last slot. The request is recorded
/// only once the claim succeeded; if recording fails the slot is given back.
pub async fn be_volunteer(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<NewVolunteerRequest>,
) -> Result<Json<Ack>, AppError> {
    let post_id = request.post_id;

    if !state.store.claim_volunteer_slot(post_id).await? {
        return Err(AppError::DomainConflict(NO_VOLUNTEERS_NEEDED.to_string()));
    }

    if let Err(err) = state
        .store
        .insert_volunteer_request(request.without_identity())
        .await
    {
        tracing::error!(post_id = %post_id, error = %err, "recording volunteer request failed, releasing slot");
        if let Err(release_err) = state.store.release_volunteer_slot(post_id).await {
            tracing::error!(post_id = %post_id, error = %release_err, "failed to release volunteer slot");
        }
        return Err(err);
    }

    tracing::info!(post_id = %post_id, "volunteer request submitted");
    Ok(Ack::with_message(VOLUNTEER_SUBMITTED))
}

/// GET /be-volunteer-posts?userEmail= - Volunteer requests for the signed-in organizer.
pub async fn list_be_volunteer_posts(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<Vec<VolunteerRequest>>, AppError> {
    let email = query.require()?;
    ensure_owner(&user, &email)?;
    Ok(Json(
        state.store.list_volunteer_requests_by_organizer(&email).await?,
    ))
}

/// DELETE /delete-be-volunteer-post/{id} - Delete a volunteer request.
pub async fn delete_be_volunteer_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteAck>, AppError> {
    let id = RecordId::parse(&id)?;
    Ok(Json(state.store.delete_volunteer_request(id).await?))
}
