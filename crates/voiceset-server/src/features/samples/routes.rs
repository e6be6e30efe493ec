use crate::api::response::{ApiResponse, ErrorResponse};
use crate::features::auth::AuthSession;
use crate::features::FeatureState;
use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use super::commands::{
    DeleteSampleCommand, DeleteSampleError, NewAudio, UpdateSampleCommand, UpdateSampleError,
    UploadSampleCommand, UploadSampleError,
};
use super::queries::{GetSampleError, GetSampleQuery, ListSamplesError, ListSamplesQuery};
use crate::features::shared::pagination::PageParams;

/// Upload size ceiling; audio takes are small but well past axum's default.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Routes addressed by sample id: `/samples/{id}`
pub fn sample_routes() -> Router<FeatureState> {
    Router::new()
        .route(
            "/:id",
            get(get_sample).patch(update_sample).delete(delete_sample),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

/// Dataset-scoped routes merged under `/datasets`: `/datasets/{id}/samples`
pub fn dataset_sample_routes() -> Router<FeatureState> {
    Router::new()
        .route("/:id/samples", post(upload_sample).get(list_samples))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

#[tracing::instrument(skip(state, session, multipart), fields(dataset_id = %id, user_id = %session.user_id))]
async fn upload_sample(
    State(state): State<FeatureState>,
    session: AuthSession,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Response, SampleApiError> {
    let payload = read_multipart(multipart).await?;
    let (content, original_file_name) = payload.file.unwrap_or_default();

    let command = UploadSampleCommand {
        dataset_id: id,
        transcript: payload.text.unwrap_or_default(),
        content,
        original_file_name,
        uploader_id: Some(session.user_id),
    };

    let response = super::commands::upload::handle(state.db, state.storage, command).await?;

    tracing::info!(sample_id = %response.id, "Sample uploaded via API");

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state, _session, multipart), fields(id = %id))]
async fn update_sample(
    State(state): State<FeatureState>,
    _session: AuthSession,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Response, SampleApiError> {
    let payload = read_multipart(multipart).await?;

    let command = UpdateSampleCommand {
        id,
        // an empty text field means "not supplied", matching the upload form
        transcript: payload.text.filter(|t| !t.trim().is_empty()),
        new_audio: payload
            .file
            .map(|(content, original_file_name)| NewAudio {
                content,
                original_file_name,
            }),
    };

    let response = super::commands::update::handle(state.db, state.storage, command).await?;

    tracing::info!(sample_id = %response.id, "Sample updated via API");

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state, _session), fields(id = %id))]
async fn delete_sample(
    State(state): State<FeatureState>,
    _session: AuthSession,
    Path(id): Path<Uuid>,
) -> Result<Response, SampleApiError> {
    super::commands::delete::handle(state.db, state.storage, DeleteSampleCommand { id }).await?;

    tracing::info!(sample_id = %id, "Sample deleted via API");

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[tracing::instrument(skip(state, _session), fields(id = %id))]
async fn get_sample(
    State(state): State<FeatureState>,
    _session: AuthSession,
    Path(id): Path<Uuid>,
) -> Result<Response, SampleApiError> {
    let response = super::queries::get::handle(state.db, GetSampleQuery { id }).await?;

    tracing::debug!(sample_id = %response.id, "Sample retrieved via API");

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state, _session, page), fields(dataset_id = %id))]
async fn list_samples(
    State(state): State<FeatureState>,
    _session: AuthSession,
    Path(id): Path<Uuid>,
    Query(page): Query<PageParams>,
) -> Result<Response, SampleApiError> {
    let query = ListSamplesQuery {
        dataset_id: id,
        page,
    };

    let response = super::queries::list_by_dataset::handle(state.db, query).await?;

    tracing::debug!(
        count = response.items.len(),
        has_more = response.has_more,
        "Samples listed via API"
    );

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

/// Fields accepted from the upload/update forms
#[derive(Debug, Default)]
struct MultipartPayload {
    text: Option<String>,
    file: Option<(Vec<u8>, Option<String>)>,
}

async fn read_multipart(mut multipart: Multipart) -> Result<MultipartPayload, SampleApiError> {
    let mut payload = MultipartPayload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| SampleApiError::Multipart(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "text" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| SampleApiError::Multipart(e.to_string()))?;
                payload.text = Some(text);
            }
            "file" => {
                let file_name = field.file_name().map(|s| s.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| SampleApiError::Multipart(e.to_string()))?;
                payload.file = Some((bytes.to_vec(), file_name));
            }
            _ => {}
        }
    }

    Ok(payload)
}

#[derive(Debug)]
enum SampleApiError {
    UploadError(UploadSampleError),
    UpdateError(UpdateSampleError),
    DeleteError(DeleteSampleError),
    GetError(GetSampleError),
    ListError(ListSamplesError),
    Multipart(String),
}

impl From<UploadSampleError> for SampleApiError {
    fn from(err: UploadSampleError) -> Self {
        Self::UploadError(err)
    }
}

impl From<UpdateSampleError> for SampleApiError {
    fn from(err: UpdateSampleError) -> Self {
        Self::UpdateError(err)
    }
}

impl From<DeleteSampleError> for SampleApiError {
    fn from(err: DeleteSampleError) -> Self {
        Self::DeleteError(err)
    }
}

impl From<GetSampleError> for SampleApiError {
    fn from(err: GetSampleError) -> Self {
        Self::GetError(err)
    }
}

impl From<ListSamplesError> for SampleApiError {
    fn from(err: ListSamplesError) -> Self {
        Self::ListError(err)
    }
}

impl IntoResponse for SampleApiError {
    fn into_response(self) -> Response {
        match self {
            SampleApiError::UploadError(UploadSampleError::TranscriptValidation(_))
            | SampleApiError::UploadError(UploadSampleError::FileRequired)
            | SampleApiError::UpdateError(UpdateSampleError::NoFieldsToUpdate)
            | SampleApiError::UpdateError(UpdateSampleError::TranscriptValidation(_))
            | SampleApiError::UpdateError(UpdateSampleError::FileEmpty)
            | SampleApiError::ListError(ListSamplesError::InvalidPagination(_))
            | SampleApiError::Multipart(_) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", self.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            }
            SampleApiError::UploadError(UploadSampleError::DatasetNotFound(_))
            | SampleApiError::UpdateError(UpdateSampleError::NotFound(_))
            | SampleApiError::DeleteError(DeleteSampleError::NotFound(_))
            | SampleApiError::GetError(GetSampleError::NotFound(_))
            | SampleApiError::ListError(ListSamplesError::DatasetNotFound(_)) => {
                let error = ErrorResponse::new("NOT_FOUND", self.to_string());
                (StatusCode::NOT_FOUND, Json(error)).into_response()
            }
            SampleApiError::UploadError(UploadSampleError::Storage(_))
            | SampleApiError::UpdateError(UpdateSampleError::Storage(_)) => {
                tracing::error!("Storage error during sample operation: {}", self);
                let error = ErrorResponse::new("STORAGE_ERROR", "A storage error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            }
            SampleApiError::UploadError(UploadSampleError::Database(_))
            | SampleApiError::UpdateError(UpdateSampleError::Database(_))
            | SampleApiError::DeleteError(DeleteSampleError::Database(_))
            | SampleApiError::GetError(GetSampleError::Database(_))
            | SampleApiError::ListError(ListSamplesError::Database(_)) => {
                tracing::error!("Database error during sample operation: {}", self);
                let error = ErrorResponse::new("INTERNAL_ERROR", "A database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            }
        }
    }
}

impl std::fmt::Display for SampleApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UploadError(e) => write!(f, "{}", e),
            Self::UpdateError(e) => write!(f, "{}", e),
            Self::DeleteError(e) => write!(f, "{}", e),
            Self::GetError(e) => write!(f, "{}", e),
            Self::ListError(e) => write!(f, "{}", e),
            Self::Multipart(msg) => write!(f, "Malformed multipart body: {}", msg),
        }
    }
}
