//! Admin HTTP server for restaurants, stores, corporates and the rest of the
//! venue catalogue

#![forbid(unsafe_code)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{Router, extract::DefaultBodyLimit, http::HeaderValue};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use venue_core::Config;
use venue_core::context_error::Result;

/// CORS policy for the configured origins; `*` allows any origin
#[must_use]
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

/// Router with middleware for an existing state
pub fn app(state: Arc<AppState>) -> Router {
    let body_limit = state.config.server.max_upload_size;
    let cors = cors_layer(&state.config.server.cors_origins);

    routes::build_router()
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Build the API router with all routes and middleware
///
/// # Errors
///
/// Returns an error if the clients cannot be built or the configuration
/// fails validation.
pub fn build_router(config: Config) -> Result<Router> {
    let state = AppState::new(config)?.shared();

    // Validate the application state
    state.validate()?;

    Ok(app(state))
}
