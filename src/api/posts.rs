//! Post API endpoints.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};

use super::{OwnerQuery, ValidJson};
use crate::auth::ensure_owner;
use crate::errors::AppError;
use crate::models::{DeleteAck, InsertAck, NewPost, Post, PostChanges, RecordId, SessionUser, UpdateAck};
use crate::AppState;

/// Size of the "most urgent first" preview.
pub const LIMITED_POSTS: usize = 6;

/// POST /add-post - Create a new post.
pub async fn add_post(
    State(state): State<AppState>,
    ValidJson(post): ValidJson<NewPost>,
) -> Result<Json<InsertAck>, AppError> {
    let ack = state.store.insert_post(post.without_identity()).await?;
    tracing::debug!(id = %ack.inserted_id, "post created");
    Ok(Json(ack))
}

/// GET /posts - List every post.
pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<Post>>, AppError> {
    Ok(Json(state.store.list_posts().await?))
}

/// GET /limited-posts - The six posts with the earliest deadlines.
pub async fn list_limited_posts(
    State(state): State<AppState>,
) -> Result<Json<Vec<Post>>, AppError> {
    Ok(Json(state.store.list_posts_by_deadline(LIMITED_POSTS).await?))
}

/// GET /post-details/{id} - One post, or `null` when it does not exist.
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Post>>, AppError> {
    let id = RecordId::parse(&id)?;
    Ok(Json(state.store.get_post(id).await?))
}

/// GET /my-posts?userEmail= - Posts organized by the signed-in user.
pub async fn list_my_posts(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<Vec<Post>>, AppError> {
    let email = query.require()?;
    ensure_owner(&user, &email)?;
    Ok(Json(state.store.list_posts_by_organizer(&email).await?))
}

/// PUT /update-my-post/{id} - Merge the submitted fields into a post.
pub async fn update_my_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(changes): ValidJson<PostChanges>,
) -> Result<Json<UpdateAck>, AppError> {
    let id = RecordId::parse(&id)?;
    let fields = changes.into_fields()?;
    Ok(Json(state.store.update_post(id, fields).await?))
}

/// DELETE /delete-my-post/{id} - Delete a post.
pub async fn delete_my_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteAck>, AppError> {
    let id = RecordId::parse(&id)?;
    Ok(Json(state.store.delete_post(id).await?))
}
