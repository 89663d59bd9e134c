//! Spotlight cards and home-screen hero offers

use crate::error::ApiResult;
use crate::extractors::ValidatedJson;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use tracing::info;
use venue_core::types::{HomeHeroOffer, Spotlight};

/// All spotlight cards, ordered by position
pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Spotlight>>> {
    let mut cards = state.endpoints.list_spotlights().await?;
    cards.sort_by_key(|card| card.position);
    Ok(Json(cards))
}

/// Create a card
pub async fn create(
    State(state): State<Arc<AppState>>,
    ValidatedJson(card): ValidatedJson<Spotlight>,
) -> ApiResult<(StatusCode, Json<Spotlight>)> {
    let created = state.endpoints.create_spotlight(&card).await?;
    info!(id = ?created.id, title = %created.title, "Created spotlight");
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replace a card
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ValidatedJson(card): ValidatedJson<Spotlight>,
) -> ApiResult<Json<Spotlight>> {
    Ok(Json(state.endpoints.update_spotlight(&id, &card).await?))
}

/// Delete a card
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.endpoints.delete_spotlight(&id).await?;
    info!(%id, "Deleted spotlight");
    Ok(StatusCode::NO_CONTENT)
}

/// Hero offers as served to the apps
pub async fn home_hero_offers(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<HomeHeroOffer>>> {
    Ok(Json(state.endpoints.home_hero_offers().await?))
}
