//! Logout command
//!
//! Revokes the caller's session token. Revoking an already-revoked token
//! succeeds, so repeated logouts are harmless.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::features::auth::session::revoke_session;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutCommand {
    pub token: String,
}

#[derive(Debug, thiserror::Error)]
pub enum LogoutError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[tracing::instrument(skip(pool, command))]
pub async fn handle(pool: SqlitePool, command: LogoutCommand) -> Result<(), LogoutError> {
    revoke_session(&pool, &command.token).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::session::{issue_session, lookup_session};
    use crate::features::shared::test_helpers::TestUser;

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_handle_revokes_session(pool: SqlitePool) -> sqlx::Result<()> {
        let user = TestUser::new("user@example.com").insert(&pool).await?;
        let token = issue_session(&pool, user.id, 3600).await?;

        handle(pool.clone(), LogoutCommand { token: token.clone() })
            .await
            .expect("logout");
        assert!(lookup_session(&pool, &token).await?.is_none());

        // a second logout with the same token is a no-op
        handle(pool.clone(), LogoutCommand { token })
            .await
            .expect("repeat logout");
        Ok(())
    }
}
