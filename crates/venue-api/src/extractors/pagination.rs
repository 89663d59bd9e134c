//! Listing query extractor

use crate::error::ApiError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};
use validator::Validate;
use venue_core::config::PaginationConfig;
use venue_core::pagination::PageWindow;

/// `?page=&limit=&search=` on every listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ListQuery {
    /// Page number (1-based)
    #[validate(range(min = 1, max = 100_000))]
    pub page: Option<u32>,

    /// Number of items per page
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<u32>,

    /// Free-text search term
    #[validate(length(max = 200))]
    pub search: Option<String>,
}

impl ListQuery {
    /// Requested window, with the configured default and cap applied to the limit
    #[must_use]
    pub fn window(&self, config: &PaginationConfig) -> PageWindow {
        PageWindow::request(self.page.unwrap_or(1), config.effective_limit(self.limit))
    }

    /// Search term, `None` when blank
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ListQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or_default();

        let list: Self = serde_urlencoded::from_str(query).map_err(|e| {
            ApiError::bad_request(format!("Invalid pagination parameters: {e}"))
        })?;
        list.validate()?;

        Ok(list)
    }
}
