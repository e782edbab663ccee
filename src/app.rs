use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::handlers;
use crate::middleware::{json_error_envelope, jwt_auth_middleware};

/// Shared request context: immutable configuration plus the connection pool
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: PgPool,
}

impl AppState {
    pub fn new(config: AppConfig, db: PgPool) -> Self {
        Self {
            config: Arc::new(config),
            db,
        }
    }
}

pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health))
        .merge(blog_routes(state.clone()))
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(state.config.api.max_request_size_bytes))
        .layer(middleware::from_fn(json_error_envelope));

    if state.config.security.enable_cors {
        router = router.layer(cors_layer(&state.config.security.cors_origins));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

fn blog_routes(state: AppState) -> Router<AppState> {
    // `/bulk` is a static segment, so it always wins over `/:id`
    let public = Router::new()
        .route("/api/v2/blog/bulk", get(handlers::list_posts))
        .route("/api/v2/blog/:id", get(handlers::get_post));

    let protected = Router::new()
        .route("/api/v2/blog", post(handlers::create_post))
        .route("/api/v2/blog/", post(handlers::create_post))
        .route("/api/v2/blog/bulk", put(handlers::update_bulk_post))
        .route("/api/v2/blog/:id", put(handlers::update_post))
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware));

    public.merge(protected)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}
