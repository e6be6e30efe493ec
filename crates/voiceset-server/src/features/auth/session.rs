//! Session tokens and the request-side session boundary.
//!
//! Sessions are opaque tokens stored in the `sessions` table with a TTL.
//! Handlers opt into authentication by taking an [`AuthSession`] argument:
//! a custom extractor rather than a middleware layer, which keeps the
//! state plumbing simple on axum 0.7 and makes the requirement visible in
//! each handler signature.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::api::response::ErrorResponse;

/// The authenticated caller, resolved from a bearer token or `session` cookie.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user_id: Uuid,
    pub email: String,
    pub token: String,
}

/// Why a request failed the session boundary
#[derive(Debug)]
pub enum AuthRejection {
    /// No bearer token or session cookie on the request
    MissingToken,
    /// Token unknown or expired
    InvalidToken,
    Database(sqlx::Error),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::MissingToken | AuthRejection::InvalidToken => {
                let error = ErrorResponse::new("UNAUTHORIZED", "Authentication required");
                (StatusCode::UNAUTHORIZED, Json(error)).into_response()
            }
            AuthRejection::Database(e) => {
                tracing::error!("Database error during session lookup: {}", e);
                let error = ErrorResponse::new("INTERNAL_ERROR", "A database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            }
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthSession
where
    SqlitePool: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .or_else(|| cookie_token(parts))
            .ok_or(AuthRejection::MissingToken)?;

        let pool = SqlitePool::from_ref(state);
        match lookup_session(&pool, &token).await {
            Ok(Some(session)) => Ok(session),
            Ok(None) => Err(AuthRejection::InvalidToken),
            Err(e) => Err(AuthRejection::Database(e)),
        }
    }
}

/// Issue a new session for `user_id` and return its token.
pub async fn issue_session(
    pool: &SqlitePool,
    user_id: Uuid,
    ttl_secs: u64,
) -> Result<String, sqlx::Error> {
    // two UUIDs' worth of randomness; hex only, so it survives cookies and headers
    let token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
    let now = Utc::now();
    let expires_at = now + Duration::seconds(ttl_secs.min(i64::MAX as u64) as i64);

    sqlx::query(
        "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
    )
    .bind(&token)
    .bind(user_id)
    .bind(now)
    .bind(expires_at)
    .execute(pool)
    .await?;

    Ok(token)
}

/// Resolve a token to its session, rejecting expired ones.
///
/// Expired rows are removed opportunistically during lookup.
pub async fn lookup_session(
    pool: &SqlitePool,
    token: &str,
) -> Result<Option<AuthSession>, sqlx::Error> {
    #[derive(sqlx::FromRow)]
    struct SessionRow {
        user_id: Uuid,
        email: String,
        expires_at: DateTime<Utc>,
    }

    let row = sqlx::query_as::<_, SessionRow>(
        "SELECT s.user_id, u.email, s.expires_at \
         FROM sessions s JOIN users u ON u.id = s.user_id \
         WHERE s.token = ?",
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(r) if r.expires_at > Utc::now() => Ok(Some(AuthSession {
            user_id: r.user_id,
            email: r.email,
            token: token.to_string(),
        })),
        Some(_) => {
            revoke_session(pool, token).await?;
            Ok(None)
        }
        None => Ok(None),
    }
}

/// Delete a session; deleting an unknown token is a no-op.
pub async fn revoke_session(pool: &SqlitePool, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn cookie_token(parts: &Parts) -> Option<String> {
    let raw = parts.headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == "session")
        .map(|(_, value)| value.to_string())
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::TestUser;

    fn parts_with_header(name: header::HeaderName, value: &str) -> Parts {
        let request = axum::http::Request::builder()
            .header(name, value)
            .body(())
            .expect("request");
        request.into_parts().0
    }

    #[test]
    fn test_bearer_token_parsing() {
        let parts = parts_with_header(header::AUTHORIZATION, "Bearer abc123");
        assert_eq!(bearer_token(&parts).as_deref(), Some("abc123"));

        let parts = parts_with_header(header::AUTHORIZATION, "Basic abc123");
        assert_eq!(bearer_token(&parts), None);

        let parts = parts_with_header(header::AUTHORIZATION, "Bearer ");
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn test_cookie_token_parsing() {
        let parts = parts_with_header(header::COOKIE, "theme=dark; session=tok42; lang=en");
        assert_eq!(cookie_token(&parts).as_deref(), Some("tok42"));

        let parts = parts_with_header(header::COOKIE, "theme=dark");
        assert_eq!(cookie_token(&parts), None);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_issue_and_lookup(pool: SqlitePool) -> sqlx::Result<()> {
        let user = TestUser::new("user@example.com").insert(&pool).await?;

        let token = issue_session(&pool, user.id, 3600).await?;
        let session = lookup_session(&pool, &token).await?.expect("session");
        assert_eq!(session.user_id, user.id);
        assert_eq!(session.email, "user@example.com");

        assert!(lookup_session(&pool, "unknown-token").await?.is_none());
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_expired_session_rejected_and_pruned(pool: SqlitePool) -> sqlx::Result<()> {
        let user = TestUser::new("user@example.com").insert(&pool).await?;

        let past = Utc::now() - Duration::seconds(60);
        sqlx::query(
            "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind("stale-token")
        .bind(user.id)
        .bind(past)
        .bind(past)
        .execute(&pool)
        .await?;

        assert!(lookup_session(&pool, "stale-token").await?.is_none());

        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions")
            .fetch_one(&pool)
            .await?;
        assert_eq!(remaining, 0);
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_revoke_is_idempotent(pool: SqlitePool) -> sqlx::Result<()> {
        let user = TestUser::new("user@example.com").insert(&pool).await?;
        let token = issue_session(&pool, user.id, 3600).await?;

        revoke_session(&pool, &token).await?;
        revoke_session(&pool, &token).await?;
        assert!(lookup_session(&pool, &token).await?.is_none());
        Ok(())
    }
}
