use crate::api::response::{ApiResponse, ErrorResponse};
use crate::features::FeatureState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

use super::commands::{LoginCommand, LoginError, LogoutCommand, LogoutError};
use super::session::AuthSession;

pub fn auth_routes() -> Router<FeatureState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
}

#[tracing::instrument(skip(state, command), fields(email = %command.email))]
async fn login(
    State(state): State<FeatureState>,
    Json(command): Json<LoginCommand>,
) -> Result<Response, AuthApiError> {
    let response =
        super::commands::login::handle(state.db, state.auth.session_ttl_secs, command).await?;

    tracing::info!(user_id = %response.user.id, "User logged in via API");

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state, session), fields(user_id = %session.user_id))]
async fn logout(
    State(state): State<FeatureState>,
    session: AuthSession,
) -> Result<Response, AuthApiError> {
    super::commands::logout::handle(state.db, LogoutCommand {
        token: session.token,
    })
    .await?;

    tracing::info!(user_id = %session.user_id, "User logged out via API");

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[derive(Debug)]
enum AuthApiError {
    LoginError(LoginError),
    LogoutError(LogoutError),
}

impl From<LoginError> for AuthApiError {
    fn from(err: LoginError) -> Self {
        Self::LoginError(err)
    }
}

impl From<LogoutError> for AuthApiError {
    fn from(err: LogoutError) -> Self {
        Self::LogoutError(err)
    }
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        match self {
            AuthApiError::LoginError(LoginError::EmailRequired)
            | AuthApiError::LoginError(LoginError::PasswordRequired) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", self.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            }
            AuthApiError::LoginError(LoginError::InvalidCredentials) => {
                let error = ErrorResponse::new("UNAUTHORIZED", self.to_string());
                (StatusCode::UNAUTHORIZED, Json(error)).into_response()
            }
            AuthApiError::LoginError(LoginError::Database(_)) => {
                tracing::error!("Database error during login: {}", self);
                let error = ErrorResponse::new("INTERNAL_ERROR", "A database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            }
            AuthApiError::LogoutError(LogoutError::Database(_)) => {
                tracing::error!("Database error during logout: {}", self);
                let error = ErrorResponse::new("INTERNAL_ERROR", "A database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            }
        }
    }
}

impl std::fmt::Display for AuthApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LoginError(e) => write!(f, "{}", e),
            Self::LogoutError(e) => write!(f, "{}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthApiError::LoginError(LoginError::InvalidCredentials);
        assert!(err.to_string().contains("Invalid email or password"));
    }

    #[test]
    fn test_routes_structure() {
        let router = auth_routes();
        assert!(format!("{:?}", router).contains("Router"));
    }
}
