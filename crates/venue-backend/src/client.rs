//! Client for the backend's table API and object storage

use crate::error::{BackendError, BackendResult, ensure_success};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, header};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};
use venue_core::config::BackendConfig;
use venue_core::pagination::PageWindow;
use venue_core::types::{RecycleBinEntry, Table};
use venue_core::utils::sanitize_search_term;

/// Parameters for one listing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    /// Page to fetch
    pub window: PageWindow,
    /// Free-text search term
    pub search: Option<String>,
    /// Columns the term is matched against
    pub search_columns: &'static [&'static str],
    /// `column.direction` ordering
    pub order: Option<String>,
    /// Extra `column=operator.value` filters
    pub filters: Vec<(String, String)>,
}

impl SelectQuery {
    /// Plain page request with no search or filters
    #[must_use]
    pub const fn page(window: PageWindow) -> Self {
        Self {
            window,
            search: None,
            search_columns: &[],
            order: None,
            filters: Vec::new(),
        }
    }

    /// Match `term` case-insensitively against `columns`
    #[must_use]
    pub fn search(mut self, columns: &'static [&'static str], term: Option<&str>) -> Self {
        self.search_columns = columns;
        self.search = term.map(String::from);
        self
    }

    /// Order rows, e.g. `created_at.desc`
    #[must_use]
    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    /// Add a filter, e.g. `("is_active", "eq.true")`
    #[must_use]
    pub fn filter(mut self, column: impl Into<String>, expression: impl Into<String>) -> Self {
        self.filters.push((column.into(), expression.into()));
        self
    }

    fn params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), "*".to_string())];
        if let Some(order) = &self.order {
            params.push(("order".to_string(), order.clone()));
        }
        if let Some(term) = &self.search
            && let Some(filter) = search_filter(self.search_columns, term)
        {
            params.push(("or".to_string(), filter));
        }
        params.extend(self.filters.iter().cloned());
        params
    }
}

/// `or` filter matching `term` in any of `columns`, `None` when there is nothing to match
#[must_use]
pub fn search_filter(columns: &[&str], term: &str) -> Option<String> {
    let term = sanitize_search_term(term);
    if term.is_empty() || columns.is_empty() {
        return None;
    }
    let clauses: Vec<String> = columns
        .iter()
        .map(|column| format!("{column}.ilike.*{term}*"))
        .collect();
    Some(format!("({})", clauses.join(",")))
}

/// Total row count from a `Content-Range` value such as `0-9/57` or `*/0`
///
/// # Errors
///
/// Returns an error when the value has no numeric total.
pub fn parse_content_range(value: &str) -> BackendResult<u64> {
    value
        .rsplit_once('/')
        .and_then(|(_, total)| total.trim().parse::<u64>().ok())
        .ok_or_else(|| BackendError::InvalidContentRange(value.to_string()))
}

fn total_from(response: &Response) -> BackendResult<u64> {
    let value = response
        .headers()
        .get(header::CONTENT_RANGE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| BackendError::InvalidContentRange(String::new()))?;
    parse_content_range(value)
}

fn id_filter(id: &str) -> (&'static str, String) {
    ("id", format!("eq.{id}"))
}

/// Client for the backend's REST table API and storage
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
    api_key: String,
    bearer: String,
    schema: String,
    bucket: String,
}

impl BackendClient {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is empty or the HTTP client cannot be built.
    pub fn new(config: &BackendConfig) -> BackendResult<Self> {
        let base_url = config.url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(BackendError::configuration("backend.url is empty"));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.max(1)))
            .build()?;

        Ok(Self {
            http,
            base_url,
            api_key: config.anon_key.clone(),
            bearer: config
                .service_key
                .clone()
                .filter(|key| !key.is_empty())
                .unwrap_or_else(|| config.anon_key.clone()),
            schema: config.schema.clone(),
            bucket: config.storage_bucket.clone(),
        })
    }

    /// Project URL the client talks to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Default storage bucket
    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .bearer_auth(&self.bearer)
    }

    fn table_request(&self, method: Method, table: Table) -> RequestBuilder {
        let url = format!("{}/rest/v1/{}", self.base_url, table.name());
        let mut builder = self.authorized(self.http.request(method, url));
        if self.schema != "public" {
            builder = builder
                .header("Accept-Profile", &self.schema)
                .header("Content-Profile", &self.schema);
        }
        builder
    }

    /// Fetch one page of rows and the total matching the query
    ///
    /// A page past the end yields no rows but still reports the total.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    pub async fn select_page(
        &self,
        table: Table,
        query: &SelectQuery,
    ) -> BackendResult<(Vec<Value>, u64)> {
        let (from, to) = query.window.range();
        debug!(%table, from, to, search = ?query.search, "Selecting page");

        let response = self
            .table_request(Method::GET, table)
            .query(&query.params())
            .header("Range-Unit", "items")
            .header(header::RANGE, format!("{from}-{to}"))
            .header("Prefer", "count=exact")
            .send()
            .await?;

        if response.status() == StatusCode::RANGE_NOT_SATISFIABLE {
            return Ok((Vec::new(), total_from(&response)?));
        }

        let response = ensure_success(response, &format!("select from {table}")).await?;
        let total = total_from(&response)?;
        let rows = response
            .json::<Vec<Value>>()
            .await
            .map_err(|e| BackendError::decode(format!("{table} rows"), e))?;

        Ok((rows, total))
    }

    /// Fetch every row matching `query`, `batch_size` rows per request
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    pub async fn select_all(
        &self,
        table: Table,
        query: &SelectQuery,
        batch_size: u32,
    ) -> BackendResult<Vec<Value>> {
        let mut rows = Vec::new();
        let mut page = 1;
        loop {
            let mut batch_query = query.clone();
            batch_query.window = PageWindow::request(page, batch_size);
            let (batch, total) = self.select_page(table, &batch_query).await?;
            let fetched = batch.len();
            rows.extend(batch);

            if fetched == 0 || rows.len() as u64 >= total {
                break;
            }
            page += 1;
        }
        debug!(%table, rows = rows.len(), "Fetched all rows");
        Ok(rows)
    }

    /// Fetch a single row by id
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    pub async fn select_by_id(&self, table: Table, id: &str) -> BackendResult<Option<Value>> {
        let response = self
            .table_request(Method::GET, table)
            .query(&[("select", "*".to_string()), id_filter(id)])
            .send()
            .await?;
        let response = ensure_success(response, &format!("select {table}/{id}")).await?;
        let rows = response
            .json::<Vec<Value>>()
            .await
            .map_err(|e| BackendError::decode(format!("{table} row"), e))?;
        Ok(rows.into_iter().next())
    }

    /// Insert a row and return it as stored
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the row.
    pub async fn insert(&self, table: Table, row: &Value) -> BackendResult<Value> {
        let response = self
            .table_request(Method::POST, table)
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?;
        let response = ensure_success(response, &format!("insert into {table}")).await?;
        let inserted = first_row(response, table).await?;
        info!(%table, id = ?inserted.get("id"), "Inserted row");
        Ok(inserted)
    }

    /// Apply a partial update and return the updated row
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] when no row has `id`.
    pub async fn update(&self, table: Table, id: &str, patch: &Value) -> BackendResult<Value> {
        let response = self
            .table_request(Method::PATCH, table)
            .query(&[id_filter(id)])
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await?;
        let response = ensure_success(response, &format!("update {table}/{id}")).await?;
        let rows = response
            .json::<Vec<Value>>()
            .await
            .map_err(|e| BackendError::decode(format!("{table} row"), e))?;
        let updated = rows
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::not_found(table, id))?;
        info!(%table, id, "Updated row");
        Ok(updated)
    }

    /// Delete a row
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the delete.
    pub async fn delete(&self, table: Table, id: &str) -> BackendResult<()> {
        let response = self
            .table_request(Method::DELETE, table)
            .query(&[id_filter(id)])
            .send()
            .await?;
        ensure_success(response, &format!("delete {table}/{id}")).await?;
        info!(%table, id, "Deleted row");
        Ok(())
    }

    /// Count rows, optionally filtered
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the total is missing.
    pub async fn count(&self, table: Table, filters: &[(&str, &str)]) -> BackendResult<u64> {
        let response = self
            .table_request(Method::HEAD, table)
            .query(&[("select", "id")])
            .query(filters)
            .header("Prefer", "count=exact")
            .send()
            .await?;
        let response = ensure_success(response, &format!("count {table}")).await?;
        total_from(&response)
    }

    /// Copy a row into the recycle bin, then delete it
    ///
    /// The delete is not attempted if the row cannot be read or copied.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotFound`] for a missing row, or the failure of
    /// whichever step broke.
    pub async fn delete_to_recycle_bin(
        &self,
        table: Table,
        id: &str,
    ) -> BackendResult<RecycleBinEntry> {
        let row = self
            .select_by_id(table, id)
            .await?
            .ok_or_else(|| BackendError::not_found(table, id))?;

        let entry = RecycleBinEntry::capture(table, id, row);
        let body = serde_json::to_value(&entry)
            .map_err(|e| BackendError::decode("recycle bin entry", e))?;
        self.insert(Table::RecycleBin, &body).await?;
        self.delete(table, id).await?;

        info!(%table, id, "Moved row to recycle bin");
        Ok(entry)
    }

    /// Upload an object and return its public URL
    ///
    /// # Errors
    ///
    /// Returns an error if storage rejects the upload.
    pub async fn upload_object(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> BackendResult<String> {
        let size = bytes.len();
        let url = format!("{}/storage/v1/object/{bucket}/{path}", self.base_url);
        let response = self
            .authorized(self.http.post(url))
            .header(header::CONTENT_TYPE, content_type)
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await?;
        ensure_success(response, &format!("upload {bucket}/{path}")).await?;

        info!(bucket, path, size, "Uploaded object");
        Ok(self.public_url(bucket, path))
    }

    /// Public URL of a stored object
    #[must_use]
    pub fn public_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{bucket}/{}",
            self.base_url,
            path.trim_start_matches('/')
        )
    }
}

async fn first_row(response: Response, table: Table) -> BackendResult<Value> {
    let value = response
        .json::<Value>()
        .await
        .map_err(|e| BackendError::decode(format!("{table} row"), e))?;
    match value {
        Value::Array(rows) => rows
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::decode(format!("{table} row"), "empty representation")),
        Value::Object(_) => Ok(value),
        other => Err(BackendError::decode(format!("{table} row"), other)),
    }
}
