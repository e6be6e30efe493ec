use crate::api::response::{ApiResponse, ErrorResponse};
use crate::features::auth::AuthSession;
use crate::features::FeatureState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use super::commands::{
    CreateDatasetCommand, CreateDatasetError, DeleteDatasetCommand, DeleteDatasetError,
    UpdateDatasetCommand, UpdateDatasetError,
};
use super::queries::{GetDatasetError, GetDatasetQuery, ListDatasetsError, ListDatasetsQuery};

pub fn dataset_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", post(create_dataset).get(list_datasets))
        .route(
            "/:id",
            get(get_dataset).patch(update_dataset).delete(delete_dataset),
        )
}

#[tracing::instrument(skip(state, session, command), fields(name = %command.name, user_id = %session.user_id))]
async fn create_dataset(
    State(state): State<FeatureState>,
    session: AuthSession,
    Json(mut command): Json<CreateDatasetCommand>,
) -> Result<Response, DatasetApiError> {
    command.owner_id = Some(session.user_id);

    let response = super::commands::create::handle(state.db, command).await?;

    tracing::info!(dataset_id = %response.id, "Dataset created via API");

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state, _session))]
async fn list_datasets(
    State(state): State<FeatureState>,
    _session: AuthSession,
) -> Result<Response, DatasetApiError> {
    let items = super::queries::list::handle(state.db, ListDatasetsQuery::default()).await?;

    tracing::debug!(count = items.len(), "Datasets listed via API");

    Ok((StatusCode::OK, Json(ApiResponse::success(items))).into_response())
}

#[tracing::instrument(skip(state, _session), fields(id = %id))]
async fn get_dataset(
    State(state): State<FeatureState>,
    _session: AuthSession,
    Path(id): Path<Uuid>,
) -> Result<Response, DatasetApiError> {
    let response = super::queries::get::handle(state.db, GetDatasetQuery { id }).await?;

    tracing::debug!(dataset_id = %response.id, "Dataset retrieved via API");

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state, _session, command), fields(id = %id))]
async fn update_dataset(
    State(state): State<FeatureState>,
    _session: AuthSession,
    Path(id): Path<Uuid>,
    Json(mut command): Json<UpdateDatasetCommand>,
) -> Result<Response, DatasetApiError> {
    command.id = id;

    let response = super::commands::update::handle(state.db, command).await?;

    tracing::info!(dataset_id = %response.id, "Dataset updated via API");

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state, _session), fields(id = %id))]
async fn delete_dataset(
    State(state): State<FeatureState>,
    _session: AuthSession,
    Path(id): Path<Uuid>,
) -> Result<Response, DatasetApiError> {
    let response =
        super::commands::delete::handle(state.db, state.storage, DeleteDatasetCommand { id })
            .await?;

    tracing::info!(
        dataset_id = %response.id,
        samples_removed = response.samples_removed,
        "Dataset deleted via API"
    );

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[derive(Debug)]
#[allow(clippy::enum_variant_names)]
enum DatasetApiError {
    CreateError(CreateDatasetError),
    UpdateError(UpdateDatasetError),
    DeleteError(DeleteDatasetError),
    GetError(GetDatasetError),
    ListError(ListDatasetsError),
}

impl From<CreateDatasetError> for DatasetApiError {
    fn from(err: CreateDatasetError) -> Self {
        Self::CreateError(err)
    }
}

impl From<UpdateDatasetError> for DatasetApiError {
    fn from(err: UpdateDatasetError) -> Self {
        Self::UpdateError(err)
    }
}

impl From<DeleteDatasetError> for DatasetApiError {
    fn from(err: DeleteDatasetError) -> Self {
        Self::DeleteError(err)
    }
}

impl From<GetDatasetError> for DatasetApiError {
    fn from(err: GetDatasetError) -> Self {
        Self::GetError(err)
    }
}

impl From<ListDatasetsError> for DatasetApiError {
    fn from(err: ListDatasetsError) -> Self {
        Self::ListError(err)
    }
}

impl IntoResponse for DatasetApiError {
    fn into_response(self) -> Response {
        match self {
            DatasetApiError::CreateError(CreateDatasetError::NameValidation(_))
            | DatasetApiError::UpdateError(UpdateDatasetError::NameValidation(_)) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", self.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            }
            DatasetApiError::UpdateError(UpdateDatasetError::NotFound(_))
            | DatasetApiError::DeleteError(DeleteDatasetError::NotFound(_))
            | DatasetApiError::GetError(GetDatasetError::NotFound(_)) => {
                let error = ErrorResponse::new("NOT_FOUND", self.to_string());
                (StatusCode::NOT_FOUND, Json(error)).into_response()
            }
            DatasetApiError::CreateError(CreateDatasetError::Database(_))
            | DatasetApiError::UpdateError(UpdateDatasetError::Database(_))
            | DatasetApiError::DeleteError(DeleteDatasetError::Database(_))
            | DatasetApiError::GetError(GetDatasetError::Database(_))
            | DatasetApiError::ListError(ListDatasetsError::Database(_)) => {
                tracing::error!("Database error during dataset operation: {}", self);
                let error = ErrorResponse::new("INTERNAL_ERROR", "A database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            }
        }
    }
}

impl std::fmt::Display for DatasetApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreateError(e) => write!(f, "{}", e),
            Self::UpdateError(e) => write!(f, "{}", e),
            Self::DeleteError(e) => write!(f, "{}", e),
            Self::GetError(e) => write!(f, "{}", e),
            Self::ListError(e) => write!(f, "{}", e),
        }
    }
}
