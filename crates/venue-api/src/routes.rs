//! API route definitions

use crate::{handlers, state::AppState};
use axum::{
    Json, Router,
    http::StatusCode,
    routing::{MethodRouter, delete, get, post, put},
};
use serde_json::json;
use std::sync::Arc;
use venue_core::types::{
    Corporate, CronReport, Invoice, Lead, Offer, PromoCode, Record, Restaurant, Store,
    SubscriptionPlan, User,
};

/// Health check routes
pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
}

/// Table routes for one admin page, created with a plain insert
fn record_routes<T: Record>(page: &str) -> Router<Arc<AppState>> {
    record_routes_with::<T>(page, post(handlers::records::create::<T>))
}

/// Table routes for one admin page with a custom create handler
fn record_routes_with<T: Record>(
    page: &str,
    create: MethodRouter<Arc<AppState>>,
) -> Router<Arc<AppState>> {
    use handlers::records;

    Router::new()
        .route(
            &format!("/admin/{page}"),
            get(records::list::<T>).merge(create),
        )
        .route(&format!("/admin/{page}/export"), get(records::export::<T>))
        .route(
            &format!("/admin/{page}/live"),
            get(handlers::live_search::live_search::<T>),
        )
        .route(
            &format!("/admin/{page}/:id"),
            get(records::get::<T>)
                .patch(records::update::<T>)
                .delete(records::remove::<T>),
        )
}

/// Listing, editing and export for every admin page
pub fn table_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(record_routes::<User>("users"))
        .merge(record_routes::<Restaurant>("restaurants"))
        .merge(record_routes::<Store>("stores"))
        .merge(record_routes_with::<Corporate>(
            "corporates",
            post(handlers::employees::create_corporate),
        ))
        .merge(record_routes::<PromoCode>("promo-codes"))
        .merge(record_routes::<SubscriptionPlan>("subscriptions"))
        .merge(record_routes::<Offer>("offers"))
        .merge(record_routes::<Invoice>("invoices"))
        .merge(record_routes::<Lead>("leads"))
        .merge(record_routes::<CronReport>("cron-reports"))
}

/// Page-specific admin routes
pub fn admin_routes() -> Router<Arc<AppState>> {
    use handlers::{dashboard, details, employees, spotlight, uploads, users};

    Router::new()
        // Opening hours and facilities
        .route(
            "/admin/restaurants/:id/hours",
            get(details::get_restaurant_hours).put(details::put_restaurant_hours),
        )
        .route(
            "/admin/stores/:id/hours",
            get(details::get_store_hours).put(details::put_store_hours),
        )
        .route(
            "/admin/restaurants/:id/facilities",
            get(details::get_facilities::<Restaurant>).put(details::put_facilities::<Restaurant>),
        )
        .route(
            "/admin/stores/:id/facilities",
            get(details::get_facilities::<Store>).put(details::put_facilities::<Store>),
        )
        // Corporate employees
        .route("/admin/corporates/:id/employees", post(employees::provision))
        .route("/admin/corporates/:id/employees/import", post(employees::import))
        .route("/admin/corporates/:id/employees/single", post(employees::add_one))
        .route(
            "/admin/corporates/:id/employees/:user_id",
            delete(employees::remove),
        )
        // Auth accounts
        .route("/admin/accounts", post(users::create_account))
        .route("/admin/users/:id/account", delete(users::delete_account))
        // Spotlight and hero offers
        .route("/admin/spotlight", get(spotlight::list).post(spotlight::create))
        .route(
            "/admin/spotlight/:id",
            put(spotlight::update).delete(spotlight::delete),
        )
        .route("/admin/home-hero-offers", get(spotlight::home_hero_offers))
        // Dashboard
        .route("/admin/dashboard", get(dashboard::overview))
        .route("/admin/dashboard/export", get(dashboard::export))
        .route(
            "/admin/profile",
            put(dashboard::set_profile).delete(dashboard::clear_profile),
        )
        // Storage
        .route("/admin/uploads/:folder", post(uploads::upload_image))
}

/// Combine all routes into a single router
pub fn build_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(health_routes())
        .merge(table_routes())
        .merge(admin_routes())
        // Fallback handler for unknown routes
        .fallback(not_found_handler)
}

/// Handle 404 Not Found errors
async fn not_found_handler() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "The requested endpoint does not exist",
            "code": "ROUTE_NOT_FOUND",
            "details": null
        })),
    )
}
