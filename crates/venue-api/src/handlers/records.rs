//! Listing, editing and exporting the rows behind each admin page
//!
//! Every handler is generic over the [`Record`] it serves, so one set of
//! functions backs all table pages.

use crate::error::{ApiError, ApiResult};
use crate::extractors::{ListQuery, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State, rejection::JsonRejection, rejection::QueryRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use venue_core::pagination::{Page, PageWindow};
use venue_core::types::{Record, RecycleBinEntry};
use venue_core::utils::export_filename;
use venue_sheets::{ExportFormat, export_records};

/// Response for listing records
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    /// Records on this page
    pub items: Vec<T>,
    /// Pagination info
    pub pagination: PaginationInfo,
}

/// Pagination information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationInfo {
    /// Current page, after clamping
    pub page: u32,
    /// Page size
    pub limit: u32,
    /// Records matching the search
    pub total_records: u64,
    /// Pages available
    pub total_pages: u32,
    /// Whether there is a next page
    pub has_next: bool,
    /// Whether there is a previous page
    pub has_prev: bool,
    /// First record shown, 1-based; 0 when empty
    pub showing_from: u64,
    /// Last record shown
    pub showing_to: u64,
    /// Page links to render around the current one
    pub visible_pages: Vec<u32>,
}

/// Page links rendered in the page bar
const VISIBLE_PAGES: u32 = 5;

impl From<&PageWindow> for PaginationInfo {
    fn from(window: &PageWindow) -> Self {
        let (showing_from, showing_to) = window.showing();
        Self {
            page: window.page,
            limit: window.limit,
            total_records: window.total_records,
            total_pages: window.total_pages,
            has_next: window.has_next(),
            has_prev: window.has_prev(),
            showing_from,
            showing_to,
            visible_pages: window.visible_pages(VISIBLE_PAGES),
        }
    }
}

impl<T> From<Page<T>> for ListResponse<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            pagination: PaginationInfo::from(&page.window),
            items: page.items,
        }
    }
}

/// `?recycle=` on deletes
#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    /// Copy the row to the recycle bin first; defaults to configuration
    pub recycle: Option<bool>,
}

/// Result of a delete
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Id of the deleted row
    pub id: String,
    /// Recycle bin copy, when one was taken
    pub recycled: Option<RecycleBinEntry>,
}

/// `?format=&search=` on exports
#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    /// `xlsx` or `csv`; defaults to configuration
    pub format: Option<String>,
    /// Only export rows matching this term
    pub search: Option<String>,
}

impl ExportQuery {
    fn format(&self, state: &AppState) -> ApiResult<ExportFormat> {
        match self.format.as_deref().map(str::trim).filter(|f| !f.is_empty()) {
            Some(format) => Ok(format.parse()?),
            None => Ok(state.default_export_format()),
        }
    }
}

/// List one page of records, newest first
pub async fn list<T: Record>(
    State(state): State<Arc<AppState>>,
    query: ListQuery,
) -> ApiResult<Json<ListResponse<T>>> {
    let window = query.window(&state.config.pagination);
    let page = state.repository::<T>().list(window, query.search()).await?;
    Ok(Json(page.into()))
}

/// Fetch one record
pub async fn get<T: Record>(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<T>> {
    Ok(Json(state.repository::<T>().get(&id).await?))
}

/// Create a record from a validated body
pub async fn create<T: Record>(
    State(state): State<Arc<AppState>>,
    ValidatedJson(record): ValidatedJson<T>,
) -> ApiResult<(StatusCode, Json<T>)> {
    let created = state.repository::<T>().create(&record).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Merge a partial update over a stored record
pub async fn update<T: Record>(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<T>> {
    let Json(patch) = body?;
    Ok(Json(state.repository::<T>().update(&id, &patch).await?))
}

/// Delete a record, through the recycle bin unless `?recycle=false`
pub async fn remove<T: Record>(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    query: Result<Query<DeleteQuery>, QueryRejection>,
) -> ApiResult<Json<DeleteResponse>> {
    let Query(query) = query?;
    let recycle = query
        .recycle
        .unwrap_or(state.config.provisioning.recycle_on_delete);
    let recycled = state.repository::<T>().remove(&id, recycle).await?;
    Ok(Json(DeleteResponse { id, recycled }))
}

/// Download every matching record as a spreadsheet
pub async fn export<T: Record>(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ExportQuery>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(query) = query?;
    let format = query.format(&state)?;
    let search = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty());

    let rows = state
        .repository::<T>()
        .export_rows(search, state.config.export.batch_size)
        .await?;
    let count = rows.len();
    let bytes = tokio::task::spawn_blocking(move || export_records(&rows, format))
        .await
        .map_err(|e| ApiError::internal(format!("Export task failed: {e}")))??;

    info!(table = %T::TABLE, rows = count, %format, "Exported table");
    Ok(attachment(
        bytes,
        &export_filename(T::TABLE.name(), format.extension(), &Utc::now()),
        format.content_type(),
    ))
}

/// File download response
pub fn attachment(bytes: Vec<u8>, filename: &str, content_type: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pagination_info_from_window() {
        let info = PaginationInfo::from(&PageWindow::new(2, 10, 25));

        assert_eq!(info.page, 2);
        assert_eq!(info.total_pages, 3);
        assert!(info.has_next);
        assert!(info.has_prev);
        assert_eq!((info.showing_from, info.showing_to), (11, 20));
    }

    #[test]
    fn test_pagination_info_for_empty_table() {
        let info = PaginationInfo::from(&PageWindow::new(1, 10, 0));

        assert_eq!(info.total_pages, 0);
        assert!(!info.has_next);
        assert!(!info.has_prev);
        assert_eq!((info.showing_from, info.showing_to), (0, 0));
    }
}
