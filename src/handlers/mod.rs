// handlers/mod.rs
//
// Public:    GET /health, GET /api/v2/blog/bulk, GET /api/v2/blog/:id
// Protected: POST /api/v2/blog/, PUT /api/v2/blog/:id, PUT /api/v2/blog/bulk (bearer JWT)
pub mod health;
pub mod posts;

pub use health::health;
pub use posts::{create_post, get_post, list_posts, update_bulk_post, update_post};

use crate::error::ApiError;

/// Unmatched paths still answer with the JSON error envelope
pub async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}
