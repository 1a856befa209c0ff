//! File upload route
//!
//! Streams the uploaded file chunk by chunk to a temp file so large
//! uploads never sit in memory, then hands it to object storage.

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use social_media_shared::types::UploadResponse;
use tokio::io::AsyncWriteExt;
use tracing::info;

const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Create upload routes
pub fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload_file))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

/// Upload a file to object storage (requires authentication)
///
/// POST /upload (multipart, field name "file")
async fn upload_file(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<UploadResponse>)> {
    let Some(storage) = state.storage() else {
        return Err(ApiError::BadRequest(
            "File uploads are not configured".to_string(),
        ));
    };

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();

        let temp = tempfile::NamedTempFile::new()
            .map_err(|e| ApiError::Internal(anyhow::Error::from(e)))?;
        info!("Buffering upload to temporary file {}", temp.path().display());

        let mut file = tokio::fs::File::create(temp.path())
            .await
            .map_err(|e| ApiError::Internal(anyhow::Error::from(e)))?;
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Upload interrupted: {}", e)))?
        {
            file.write_all(&chunk)
                .await
                .map_err(|e| ApiError::Internal(anyhow::Error::from(e)))?;
        }
        file.flush()
            .await
            .map_err(|e| ApiError::Internal(anyhow::Error::from(e)))?;

        let file_url = storage
            .upload_file(temp.path(), &file_name)
            .await
            .map_err(ApiError::Internal)?;

        return Ok((
            StatusCode::CREATED,
            Json(UploadResponse {
                detail: format!("Successfully uploaded {}", file_name),
                file_url,
            }),
        ));
    }

    Err(ApiError::BadRequest("Missing 'file' field".to_string()))
}
