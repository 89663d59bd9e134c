//! Image uploads into backend storage

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State, multipart::MultipartRejection},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use venue_core::utils::{IMAGE_EXTENSIONS, storage_object_path, validate_file_extension};

/// Stored object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Public URL to save on the record
    pub url: String,
    /// Object path inside the bucket
    pub path: String,
    /// Size in bytes
    pub size: usize,
}

fn content_type_for(filename: &str) -> &'static str {
    let extension = std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Store the `file` field of a form under `<folder>/<uuid>.<ext>`
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    Path(folder): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<(StatusCode, Json<UploadResponse>)> {
    let mut multipart =
        multipart.map_err(|e| ApiError::new(e.status(), "INVALID_MULTIPART", e.body_text()))?;

    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::new(e.status(), "INVALID_MULTIPART", e.body_text()))?
    {
        if field.name() != Some("file") {
            debug!(field = ?field.name(), "Ignoring form field");
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::new(e.status(), "INVALID_MULTIPART", e.body_text()))?;
        file = Some((filename, bytes));
    }

    let Some((filename, bytes)) = file else {
        return Err(venue_core::Error::validation("file", "an image file is required").into());
    };
    if !validate_file_extension(&filename, IMAGE_EXTENSIONS) {
        return Err(venue_core::Error::validation(
            "file",
            format!("{filename} is not one of: {}", IMAGE_EXTENSIONS.join(", ")),
        )
        .into());
    }
    if bytes.is_empty() {
        return Err(venue_core::Error::validation("file", "file is empty").into());
    }

    let path = storage_object_path(&folder, &filename);
    let size = bytes.len();
    let bucket = state.backend.bucket().to_string();
    let url = state
        .backend
        .upload_object(&bucket, &path, bytes.to_vec(), content_type_for(&filename))
        .await?;

    info!(%path, size, "Stored upload");
    Ok((StatusCode::CREATED, Json(UploadResponse { url, path, size })))
}
