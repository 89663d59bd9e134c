//! Typed access to one table

use crate::client::{BackendClient, SelectQuery};
use crate::error::{BackendError, BackendResult};
use serde_json::Value;
use std::marker::PhantomData;
use tracing::{debug, warn};
use validator::Validate;
use venue_core::pagination::{Page, PageWindow};
use venue_core::types::{Record, RecycleBinEntry};

/// Records of type `T` read and written through a [`BackendClient`]
#[derive(Debug)]
pub struct Repository<T> {
    client: BackendClient,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _record: PhantomData,
        }
    }
}

fn decode<T: Record>(row: Value) -> BackendResult<T> {
    serde_json::from_value(row).map_err(|e| BackendError::decode(T::TABLE.name(), e))
}

impl<T: Record> Repository<T> {
    /// Repository over `client`
    #[must_use]
    pub const fn new(client: BackendClient) -> Self {
        Self {
            client,
            _record: PhantomData,
        }
    }

    /// Underlying client
    #[must_use]
    pub const fn client(&self) -> &BackendClient {
        &self.client
    }

    fn query(window: PageWindow, search: Option<&str>) -> SelectQuery {
        SelectQuery::page(window)
            .search(T::SEARCH_COLUMNS, search)
            .order(T::ORDER_BY)
    }

    /// One page of records, newest first, optionally filtered by `search`
    ///
    /// A page past the end is clamped to the last page and fetched again.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or a row does not decode.
    pub async fn list(&self, window: PageWindow, search: Option<&str>) -> BackendResult<Page<T>> {
        let (mut rows, total) = self
            .client
            .select_page(T::TABLE, &Self::query(window, search))
            .await?;
        let mut resolved = window.with_total(total);

        if resolved.page != window.page && total > 0 {
            debug!(table = %T::TABLE, requested = window.page, page = resolved.page, "Clamping page");
            let (clamped, total) = self
                .client
                .select_page(T::TABLE, &Self::query(resolved, search))
                .await?;
            rows = clamped;
            resolved = resolved.with_total(total);
        }

        let items = rows.into_iter().map(decode::<T>).collect::<BackendResult<Vec<T>>>()?;
        Ok(Page::new(items, resolved))
    }

    /// Every record matching `search`, as raw rows for export
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    pub async fn export_rows(&self, search: Option<&str>, batch_size: u32) -> BackendResult<Vec<Value>> {
        let query = Self::query(PageWindow::request(1, batch_size), search);
        self.client.select_all(T::TABLE, &query, batch_size).await
    }

    /// Fetch one record
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] when no row has `id`.
    pub async fn get(&self, id: &str) -> BackendResult<T> {
        let row = self
            .client
            .select_by_id(T::TABLE, id)
            .await?
            .ok_or_else(|| BackendError::not_found(T::TABLE, id))?;
        decode(row)
    }

    /// Validate and insert a record
    ///
    /// # Errors
    ///
    /// Returns a validation error before any request when the record is invalid.
    pub async fn create(&self, record: &T) -> BackendResult<T> {
        record.validate()?;
        let body = serde_json::to_value(record).map_err(|e| BackendError::decode(T::TABLE.name(), e))?;
        decode(self.client.insert(T::TABLE, &body).await?)
    }

    /// Apply a partial update
    ///
    /// The patch is merged over the stored row and the result validated as a
    /// whole record before anything is sent.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] for a missing row or a validation
    /// error when the merged record is invalid.
    pub async fn update(&self, id: &str, patch: &Value) -> BackendResult<T> {
        let Value::Object(changes) = patch else {
            return Err(venue_core::Error::validation("body", "patch must be a JSON object").into());
        };

        let mut merged = self
            .client
            .select_by_id(T::TABLE, id)
            .await?
            .ok_or_else(|| BackendError::not_found(T::TABLE, id))?;
        if let Value::Object(current) = &mut merged {
            for (key, value) in changes {
                current.insert(key.clone(), value.clone());
            }
        }
        serde_json::from_value::<T>(merged)
            .map_err(|e| venue_core::Error::validation("body", e.to_string()))?
            .validate()?;

        let mut changes = changes.clone();
        changes.remove("id");
        decode(self.client.update(T::TABLE, id, &Value::Object(changes)).await?)
    }

    /// Delete a record, copying it to the recycle bin first when `recycle` is set
    ///
    /// # Errors
    ///
    /// Returns an error if any step fails; a failed copy leaves the row in place.
    pub async fn remove(&self, id: &str, recycle: bool) -> BackendResult<Option<RecycleBinEntry>> {
        if recycle {
            return self.client.delete_to_recycle_bin(T::TABLE, id).await.map(Some);
        }
        warn!(table = %T::TABLE, id, "Deleting without recycle bin copy");
        self.client.delete(T::TABLE, id).await?;
        Ok(None)
    }

    /// Total rows in the table
    ///
    /// # Errors
    ///
    /// Returns an error if the count request fails.
    pub async fn count(&self) -> BackendResult<u64> {
        self.client.count(T::TABLE, &[]).await
    }
}
