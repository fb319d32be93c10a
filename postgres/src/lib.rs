//! `PostgreSQL` stores for the Bistro backend.
//!
//! Implements the store traits from `bistro-core` on top of a shared
//! [`sqlx::PgPool`]:
//!
//! - [`PgFeedbackStore`]: feedback with an atomic `INSERT ... ON CONFLICT` upsert
//! - [`PgReservationStore`]: reservations
//! - [`PgUserDirectory`]: display names from the `users` table
//!
//! Queries are built at runtime with `sqlx::query_as`, so the crate compiles
//! without a live database.
//!
//! # Example
//!
//! ```no_run
//! use bistro_postgres::{PgFeedbackStore, migrate};
//! use sqlx::PgPool;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = PgPool::connect("postgres://localhost/bistro").await?;
//! migrate(&pool).await?;
//! let feedback = PgFeedbackStore::new(pool);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod feedback;
mod reservation;
mod users;

pub use feedback::PgFeedbackStore;
pub use reservation::PgReservationStore;
pub use users::PgUserDirectory;

use bistro_core::StoreError;
use sqlx::PgPool;

/// Apply the embedded migrations.
///
/// # Errors
///
/// Returns [`StoreError::Database`] if a migration fails.
pub async fn migrate(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| StoreError::Database(format!("Migration failed: {e}")))?;

    tracing::info!("Database migrations applied");
    Ok(())
}

/// Wrap a sqlx error with what was being attempted.
fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |e| StoreError::Database(format!("{context}: {e}"))
}
