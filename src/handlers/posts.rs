// handlers/posts.rs - blog post resource under /api/v2/blog
//
// Each handler performs a single storage call and collapses every failure
// into the fixed per-endpoint message. Raw errors only reach the log.

use axum::{
    body::Bytes,
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json,
};
use serde_json::json;

use crate::app::AppState;
use crate::database::models::PostInput;
use crate::database::{DatabaseError, PostRepository};
use crate::error::ApiError;
use crate::middleware::AuthUser;

const CREATE_FAILED: &str = "Error creating post";
const UPDATE_FAILED: &str = "Error updating post";
const LIST_FAILED: &str = "Error fetching posts";
const FETCH_FAILED: &str = "Error fetching post";
const NOT_FOUND: &str = "Post not found";
const NOT_OWNER: &str = "Not allowed to update this post";

fn parse_body(body: &Bytes) -> Result<PostInput, serde_json::Error> {
    serde_json::from_slice(body)
}

fn parse_id(raw: &str) -> Option<i32> {
    raw.parse().ok()
}

/// POST /api/v2/blog/ - create a post owned by the caller
pub async fn create_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let input = parse_body(&body).map_err(|e| {
        tracing::error!(user_id = user.id, "Invalid create body: {}", e);
        ApiError::internal_server_error(CREATE_FAILED)
    })?;

    let post = PostRepository::new(state.db.clone())
        .insert(&input, user.id)
        .await
        .map_err(|e| {
            tracing::error!(user_id = user.id, "Error creating post: {}", e);
            ApiError::internal_server_error(CREATE_FAILED)
        })?;

    tracing::info!(post_id = post.id, user_id = user.id, "Created post");
    Ok(Json(json!({ "id": post.id })))
}

/// PUT /api/v2/blog/:id - update title/content of a post the caller owns
pub async fn update_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    update_by_raw_id(&state, user, &id, &body).await
}

/// PUT /api/v2/blog/bulk - the static `/bulk` segment shadows `/:id`, so route it here
/// to keep the auth gate and the update failure contract
pub async fn update_bulk_post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    update_by_raw_id(&state, user, "bulk", &body).await
}

async fn update_by_raw_id(
    state: &AppState,
    user: AuthUser,
    raw_id: &str,
    body: &Bytes,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = parse_id(raw_id).ok_or_else(|| {
        tracing::warn!(user_id = user.id, "Non-numeric post id on update: {:?}", raw_id);
        ApiError::internal_server_error(UPDATE_FAILED)
    })?;

    let input = parse_body(body).map_err(|e| {
        tracing::warn!(post_id = id, user_id = user.id, "Invalid update body: {}", e);
        ApiError::internal_server_error(UPDATE_FAILED)
    })?;

    let repository = PostRepository::new(state.db.clone());

    if state.config.api.strict_ownership {
        check_ownership(&repository, id, user).await?;
    }

    match repository.update_owned(id, user.id, &input).await {
        Ok(post) => Ok(Json(json!({
            "message": "Post updated successfully",
            "post": post,
        }))),
        Err(DatabaseError::NotFound(what)) => {
            tracing::warn!(user_id = user.id, "Update matched no rows: {}", what);
            Err(ApiError::internal_server_error(UPDATE_FAILED))
        }
        Err(e) => {
            tracing::error!(post_id = id, user_id = user.id, "Error updating post: {}", e);
            Err(ApiError::internal_server_error(UPDATE_FAILED))
        }
    }
}

/// Distinguish a missing post from a foreign one before updating
async fn check_ownership(repository: &PostRepository, id: i32, user: AuthUser) -> Result<(), ApiError> {
    let post = repository.select_one(id).await.map_err(|e| {
        tracing::error!(post_id = id, "Error loading post for ownership check: {}", e);
        ApiError::internal_server_error(UPDATE_FAILED)
    })?;

    match post {
        None => Err(ApiError::not_found(NOT_FOUND)),
        Some(post) if post.author_id != user.id => {
            tracing::warn!(post_id = id, user_id = user.id, author_id = post.author_id, "Update of foreign post refused");
            Err(ApiError::forbidden(NOT_OWNER))
        }
        Some(_) => Ok(()),
    }
}

/// GET /api/v2/blog/bulk - every post, no auth
pub async fn list_posts(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let posts = PostRepository::new(state.db.clone())
        .select_all()
        .await
        .map_err(|e| {
            tracing::error!("Error fetching posts: {}", e);
            ApiError::internal_server_error(LIST_FAILED)
        })?;

    Ok(Json(posts))
}

/// GET /api/v2/blog/:id - single post by primary key, no auth
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id).ok_or_else(|| {
        tracing::warn!("Non-numeric post id on fetch: {:?}", id);
        ApiError::internal_server_error(FETCH_FAILED)
    })?;

    let post = PostRepository::new(state.db.clone())
        .select_one(id)
        .await
        .map_err(|e| {
            tracing::error!(post_id = id, "Error fetching post: {}", e);
            ApiError::internal_server_error(FETCH_FAILED)
        })?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;

    Ok(Json(post))
}
