//! Dashboard numbers and the whole-dashboard workbook

use crate::error::{ApiError, ApiResult};
use crate::handlers::records::attachment;
use crate::state::AppState;
use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{Json, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use venue_core::types::{
    AdminProfile, Corporate, DashboardKpis, Lead, PromoCode, Record, Restaurant, Store,
    SubscriptionPlan, User,
};
use venue_core::utils::export_filename;
use venue_sheets::{ExportFormat, export_dashboard};

/// Dashboard payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    /// Headline counts
    pub kpis: DashboardKpis,
    /// When the counts were taken
    pub refreshed_at: Option<DateTime<Utc>>,
    /// Signed-in administrator, if one has been recorded
    pub profile: Option<AdminProfile>,
}

fn snapshot(state: &AppState) -> DashboardResponse {
    DashboardResponse {
        kpis: state.dashboard.kpis(),
        refreshed_at: state.dashboard.refreshed_at(),
        profile: state.dashboard.profile(),
    }
}

/// Recount every KPI and return the dashboard
pub async fn overview(State(state): State<Arc<AppState>>) -> ApiResult<Json<DashboardResponse>> {
    state.dashboard.refresh(&state.backend).await?;
    Ok(Json(snapshot(&state)))
}

/// Record the signed-in administrator
pub async fn set_profile(
    State(state): State<Arc<AppState>>,
    body: Result<Json<AdminProfile>, JsonRejection>,
) -> ApiResult<Json<DashboardResponse>> {
    let Json(profile) = body?;
    if profile.id.trim().is_empty() {
        return Err(venue_core::Error::validation("id", "profile id is required").into());
    }
    info!(admin = %profile.email, "Admin profile set");
    state.dashboard.set_profile(Some(profile));
    Ok(Json(snapshot(&state)))
}

/// Forget the signed-in administrator
pub async fn clear_profile(State(state): State<Arc<AppState>>) -> StatusCode {
    state.dashboard.set_profile(None);
    StatusCode::NO_CONTENT
}

async fn rows<T: Record>(state: &AppState) -> ApiResult<Vec<serde_json::Value>> {
    Ok(state
        .repository::<T>()
        .export_rows(None, state.config.export.batch_size)
        .await?)
}

/// One workbook with a sheet per dashboard table
pub async fn export(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    let (users, restaurants, stores, corporates, promos, plans, leads) = tokio::try_join!(
        rows::<User>(&state),
        rows::<Restaurant>(&state),
        rows::<Store>(&state),
        rows::<Corporate>(&state),
        rows::<PromoCode>(&state),
        rows::<SubscriptionPlan>(&state),
        rows::<Lead>(&state),
    )?;

    let bytes = tokio::task::spawn_blocking(move || {
        export_dashboard(&[
            ("Users", users),
            ("Restaurants", restaurants),
            ("Stores", stores),
            ("Corporates", corporates),
            ("Promo Codes", promos),
            ("Subscriptions", plans),
            ("Leads", leads),
        ])
    })
    .await
    .map_err(|e| ApiError::internal(format!("Export task failed: {e}")))??;

    let format = ExportFormat::Xlsx;
    Ok(attachment(
        bytes,
        &export_filename("dashboard", format.extension(), &Utc::now()),
        format.content_type(),
    ))
}
