//! Health check endpoints for monitoring and diagnostics

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};
use venue_core::Table;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Timestamp of the check
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Backend connectivity status
    pub backend: BackendHealth,
    /// Process uptime in seconds
    pub uptime_seconds: u64,
}

/// Backend health status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendHealth {
    /// Whether the table API answered
    pub connected: bool,
    /// Project URL
    pub url: String,
    /// Response time in milliseconds
    pub response_time_ms: u64,
}

/// Readiness check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// Service readiness status
    pub ready: bool,
    /// Timestamp of the check
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Health check for load balancers and monitors
///
/// Probes the backend with a count on `users`. Returns 503 when the probe
/// fails.
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthResponse>, StatusCode> {
    let backend = match check_backend_health(&state).await {
        Ok(health) => health,
        Err(e) => {
            error!("Backend health check failed: {}", e);
            return Err(StatusCode::SERVICE_UNAVAILABLE);
        }
    };

    debug!("Health check completed in {}ms", backend.response_time_ms);
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        backend,
        uptime_seconds: get_uptime_seconds(),
    }))
}

/// Readiness check; 200 once the backend answers
pub async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ReadinessResponse>, StatusCode> {
    match state.backend.count(Table::Users, &[]).await {
        Ok(_) => Ok(Json(ReadinessResponse {
            ready: true,
            timestamp: chrono::Utc::now(),
        })),
        Err(e) => {
            error!("Readiness check failed - backend not reachable: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

async fn check_backend_health(state: &AppState) -> venue_backend::BackendResult<BackendHealth> {
    let start_time = std::time::Instant::now();
    state.backend.count(Table::Users, &[]).await?;

    Ok(BackendHealth {
        connected: true,
        url: state.backend.base_url().to_string(),
        response_time_ms: u64::try_from(start_time.elapsed().as_millis()).unwrap_or(u64::MAX),
    })
}

/// Process uptime in seconds
fn get_uptime_seconds() -> u64 {
    static START_TIME: std::sync::LazyLock<std::time::Instant> =
        std::sync::LazyLock::new(std::time::Instant::now);
    START_TIME.elapsed().as_secs()
}
