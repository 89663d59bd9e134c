//! Opening hours and facility editors for restaurants and stores

use crate::error::ApiResult;
use crate::state::AppState;
use axum::{
    extract::{Path, State, rejection::JsonRejection},
    response::Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::info;
use venue_core::facilities::{FACILITIES, FacilitySet};
use venue_core::hours::{Weekday, WeeklyHours};
use venue_core::types::{HasFacilities, Restaurant, Store};

/// Hours of one listing, in the edit-form shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoursResponse {
    /// Listing id
    pub id: String,
    /// Week as edited
    pub hours: WeeklyHours,
}

/// Body of a hours update
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateHoursRequest {
    /// New week
    #[serde(default)]
    pub hours: WeeklyHours,
    /// Apply this day's hours to every day before saving
    #[serde(default)]
    pub copy_from: Option<Weekday>,
}

impl UpdateHoursRequest {
    fn resolve(self) -> venue_core::Result<WeeklyHours> {
        let mut hours = self.hours.normalized()?;
        if let Some(day) = self.copy_from {
            hours.copy_to_all(day);
        }
        Ok(hours)
    }
}

/// Facilities of a restaurant or store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilitiesResponse {
    /// Listing id
    pub id: String,
    /// Selected labels, canonical first
    pub selected: Vec<String>,
    /// Labels offered as checkboxes
    pub available: Vec<String>,
}

/// Body of a facilities update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateFacilitiesRequest {
    /// Replace the stored list
    #[serde(default)]
    pub facilities: Option<Vec<String>>,
    /// Labels to flip afterwards
    #[serde(default)]
    pub toggle: Vec<String>,
}

fn stored_value(value: Option<&Value>) -> &Value {
    value.unwrap_or(&Value::Null)
}

/// Restaurant hours, malformed days reading as unset
pub async fn get_restaurant_hours(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<HoursResponse>> {
    let restaurant = state.repository::<Restaurant>().get(&id).await?;
    let hours = WeeklyHours::from_restaurant_value(stored_value(restaurant.opening_hours.as_ref()));
    Ok(Json(HoursResponse { id, hours }))
}

/// Save restaurant hours as a day-keyed map
pub async fn put_restaurant_hours(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<UpdateHoursRequest>, JsonRejection>,
) -> ApiResult<Json<HoursResponse>> {
    let Json(request) = body?;
    let hours = request.resolve()?;
    state
        .repository::<Restaurant>()
        .update(&id, &json!({ "opening_hours": hours.to_restaurant_map() }))
        .await?;
    info!(restaurant = %id, "Updated opening hours");
    Ok(Json(HoursResponse { id, hours }))
}

/// Store hours, malformed days reading as unset
pub async fn get_store_hours(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<HoursResponse>> {
    let store = state.repository::<Store>().get(&id).await?;
    let hours = WeeklyHours::from_store_value(stored_value(store.opening_hours.as_ref()));
    Ok(Json(HoursResponse { id, hours }))
}

/// Save store hours as seven day entries
pub async fn put_store_hours(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<UpdateHoursRequest>, JsonRejection>,
) -> ApiResult<Json<HoursResponse>> {
    let Json(request) = body?;
    let hours = request.resolve()?;
    state
        .repository::<Store>()
        .update(&id, &json!({ "opening_hours": hours.to_store_days() }))
        .await?;
    info!(store = %id, "Updated opening hours");
    Ok(Json(HoursResponse { id, hours }))
}

fn facilities_response(id: String, set: &FacilitySet) -> FacilitiesResponse {
    FacilitiesResponse {
        id,
        selected: set.labels(),
        available: FACILITIES.iter().map(|label| (*label).to_string()).collect(),
    }
}

/// Listing facilities matched against the canonical labels
pub async fn get_facilities<T: HasFacilities>(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<FacilitiesResponse>> {
    let listing = state.repository::<T>().get(&id).await?;
    let set = FacilitySet::from_stored(listing.facilities());
    Ok(Json(facilities_response(id, &set)))
}

/// Replace and/or toggle listing facilities
///
/// Unrecognised stored spellings survive unless toggled off.
pub async fn put_facilities<T: HasFacilities>(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<UpdateFacilitiesRequest>, JsonRejection>,
) -> ApiResult<Json<FacilitiesResponse>> {
    let Json(request) = body?;
    let repository = state.repository::<T>();

    let mut set = match request.facilities {
        Some(list) => FacilitySet::from_stored(&list),
        None => FacilitySet::from_stored(repository.get(&id).await?.facilities()),
    };
    for label in &request.toggle {
        set.toggle(label);
    }

    repository
        .update(&id, &json!({ "facilities": set.labels() }))
        .await?;
    info!(table = %T::TABLE, %id, count = set.len(), "Updated facilities");
    Ok(Json(facilities_response(id, &set)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_copy_from_applies_after_normalizing() {
        let request: UpdateHoursRequest = serde_json::from_value(json!({
            "hours": {"tuesday": {"open": "9:00", "close": "18:30"}},
            "copy_from": "tuesday"
        }))
        .unwrap();

        let hours = request.resolve().unwrap();
        assert_eq!(hours.monday, hours.tuesday);
        assert_eq!(hours.sunday.open, "09:00");
    }

    #[test]
    fn test_invalid_time_is_rejected() {
        let request: UpdateHoursRequest = serde_json::from_value(json!({
            "hours": {"friday": {"open": "25:00", "close": "18:00"}}
        }))
        .unwrap();

        assert!(request.resolve().is_err());
    }
}
