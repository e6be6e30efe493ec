//! Login command
//!
//! Verifies credentials against the stored salted digest and issues a
//! session token. Unknown emails and wrong passwords produce the same
//! error, so the response never reveals which half was wrong.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::features::auth::password::verify_password;
use crate::features::auth::session::issue_session;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCommand {
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing)]
    pub password: String,
}

/// Response from a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginUser {
    pub id: Uuid,
    pub email: String,
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Email is required and cannot be empty")]
    EmailRequired,
    #[error("Password is required and cannot be empty")]
    PasswordRequired,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl LoginCommand {
    pub fn validate(&self) -> Result<(), LoginError> {
        if self.email.trim().is_empty() {
            return Err(LoginError::EmailRequired);
        }
        if self.password.is_empty() {
            return Err(LoginError::PasswordRequired);
        }
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(email = %command.email))]
pub async fn handle(
    pool: SqlitePool,
    session_ttl_secs: u64,
    command: LoginCommand,
) -> Result<LoginResponse, LoginError> {
    command.validate()?;

    #[derive(sqlx::FromRow)]
    #[allow(dead_code)]
    struct UserRow {
        id: Uuid,
        email: String,
        password_hash: String,
        created_at: DateTime<Utc>,
    }

    let user = sqlx::query_as::<_, UserRow>(
        "SELECT id, email, password_hash, created_at FROM users WHERE email = ?",
    )
    .bind(command.email.trim())
    .fetch_optional(&pool)
    .await?
    .ok_or(LoginError::InvalidCredentials)?;

    if !verify_password(&command.password, &user.password_hash) {
        return Err(LoginError::InvalidCredentials);
    }

    let token = issue_session(&pool, user.id, session_ttl_secs).await?;

    Ok(LoginResponse {
        token,
        user: LoginUser {
            id: user.id,
            email: user.email,
        },
    })
}
