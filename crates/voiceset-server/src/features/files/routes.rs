use crate::api::response::ErrorResponse;
use crate::features::auth::AuthSession;
use crate::features::FeatureState;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use super::queries::{DownloadBlobError, DownloadBlobQuery};

pub fn file_routes() -> Router<FeatureState> {
    Router::new().route("/:key", get(download_file))
}

#[tracing::instrument(skip(state, _session), fields(key = %key))]
async fn download_file(
    State(state): State<FeatureState>,
    _session: AuthSession,
    Path(key): Path<String>,
) -> Result<Response, FileApiError> {
    let response =
        super::queries::download::handle(state.storage, DownloadBlobQuery { key }).await?;

    tracing::debug!(
        file_name = %response.file_name,
        size = response.bytes.len(),
        "File served via API"
    );

    Ok((
        [
            (header::CONTENT_TYPE, response.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", response.file_name),
            ),
        ],
        response.bytes,
    )
        .into_response())
}

#[derive(Debug)]
enum FileApiError {
    DownloadError(DownloadBlobError),
}

impl From<DownloadBlobError> for FileApiError {
    fn from(err: DownloadBlobError) -> Self {
        Self::DownloadError(err)
    }
}

impl IntoResponse for FileApiError {
    fn into_response(self) -> Response {
        match self {
            FileApiError::DownloadError(DownloadBlobError::KeyRequired) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", self.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            }
            FileApiError::DownloadError(DownloadBlobError::NotFound(_)) => {
                let error = ErrorResponse::new("NOT_FOUND", "File not found");
                (StatusCode::NOT_FOUND, Json(error)).into_response()
            }
            FileApiError::DownloadError(DownloadBlobError::Storage(_)) => {
                tracing::error!("Storage error during file download: {}", self);
                let error = ErrorResponse::new("STORAGE_ERROR", "A storage error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            }
        }
    }
}

impl std::fmt::Display for FileApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DownloadError(e) => write!(f, "{}", e),
        }
    }
}
