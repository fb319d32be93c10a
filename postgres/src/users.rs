//! Read access to the user registry.

use crate::db_error;
use bistro_core::store::{StoreFuture, UserDirectory};
use sqlx::PgPool;

/// Looks up display names in the `users` table.
///
/// The table is owned by the account service; this backend only reads it.
#[derive(Clone, Debug)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    /// Create a directory over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserDirectory for PgUserDirectory {
    fn username_for(&self, email: String) -> StoreFuture<'_, Option<String>> {
        Box::pin(async move {
            let username: Option<(String,)> =
                sqlx::query_as("SELECT username FROM users WHERE email = $1")
                    .bind(&email)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(db_error("Failed to look up username"))?;

            Ok(username.map(|(name,)| name))
        })
    }
}
