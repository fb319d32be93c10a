//! Feedback persistence.

use crate::db_error;
use bistro_core::store::{FeedbackStore, StoreFuture};
use bistro_core::{
    FeedbackDraft, FeedbackId, FeedbackKey, FeedbackRecord, Rating, StoreError, UpsertOutcome,
    Upserted,
};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

const COLUMNS: &str = "id, email, feedback, rating, item_name, order_id, created_at, updated_at";

#[derive(FromRow)]
struct FeedbackRow {
    id: Uuid,
    email: String,
    feedback: String,
    rating: i16,
    item_name: String,
    order_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<FeedbackRow> for FeedbackRecord {
    type Error = StoreError;

    fn try_from(row: FeedbackRow) -> Result<Self, Self::Error> {
        let rating = Rating::new(i64::from(row.rating)).ok_or_else(|| {
            StoreError::Serialization(format!("feedback {} has rating {}", row.id, row.rating))
        })?;

        Ok(Self {
            id: FeedbackId::from_uuid(row.id),
            email: row.email,
            feedback: row.feedback,
            rating,
            item_name: row.item_name,
            order_id: row.order_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct UpsertRow {
    #[sqlx(flatten)]
    record: FeedbackRow,
    inserted: bool,
}

fn into_records(rows: Vec<FeedbackRow>) -> Result<Vec<FeedbackRecord>, StoreError> {
    rows.into_iter().map(FeedbackRecord::try_from).collect()
}

/// `PostgreSQL` feedback store.
///
/// Relies on the unique index over `(email, item_name, order_id)`: the upsert
/// is one `INSERT ... ON CONFLICT DO UPDATE` statement, so concurrent first
/// submissions for a key resolve to a single row.
#[derive(Clone, Debug)]
pub struct PgFeedbackStore {
    pool: PgPool,
}

impl PgFeedbackStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl FeedbackStore for PgFeedbackStore {
    fn upsert(&self, draft: FeedbackDraft, at: DateTime<Utc>) -> StoreFuture<'_, Upserted> {
        Box::pin(async move {
            // xmax is 0 only on a freshly inserted tuple.
            let sql = format!(
                r"
                INSERT INTO feedback
                    (id, email, feedback, rating, item_name, order_id, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
                ON CONFLICT (email, item_name, order_id) DO UPDATE
                SET feedback = EXCLUDED.feedback,
                    rating = EXCLUDED.rating,
                    updated_at = EXCLUDED.updated_at
                RETURNING {COLUMNS}, (xmax = 0) AS inserted
                "
            );

            let row: UpsertRow = sqlx::query_as(&sql)
                .bind(Uuid::new_v4())
                .bind(&draft.key.email)
                .bind(&draft.feedback)
                .bind(i16::from(draft.rating.value()))
                .bind(&draft.key.item_name)
                .bind(&draft.key.order_id)
                .bind(at)
                .fetch_one(&self.pool)
                .await
                .map_err(db_error("Failed to upsert feedback"))?;

            let outcome = if row.inserted {
                UpsertOutcome::Created
            } else {
                UpsertOutcome::Updated
            };

            Ok(Upserted {
                record: row.record.try_into()?,
                outcome,
            })
        })
    }

    fn find(&self, key: FeedbackKey) -> StoreFuture<'_, Option<FeedbackRecord>> {
        Box::pin(async move {
            let sql = format!(
                "SELECT {COLUMNS} FROM feedback WHERE email = $1 AND item_name = $2 AND order_id = $3"
            );

            let row: Option<FeedbackRow> = sqlx::query_as(&sql)
                .bind(&key.email)
                .bind(&key.item_name)
                .bind(&key.order_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("Failed to get feedback"))?;

            row.map(FeedbackRecord::try_from).transpose()
        })
    }

    fn delete(&self, key: FeedbackKey) -> StoreFuture<'_, bool> {
        Box::pin(async move {
            let result = sqlx::query(
                "DELETE FROM feedback WHERE email = $1 AND item_name = $2 AND order_id = $3",
            )
            .bind(&key.email)
            .bind(&key.item_name)
            .bind(&key.order_id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete feedback"))?;

            Ok(result.rows_affected() > 0)
        })
    }

    fn list_all(&self) -> StoreFuture<'_, Vec<FeedbackRecord>> {
        Box::pin(async move {
            let sql = format!("SELECT {COLUMNS} FROM feedback ORDER BY created_at, id");

            let rows: Vec<FeedbackRow> = sqlx::query_as(&sql)
                .fetch_all(&self.pool)
                .await
                .map_err(db_error("Failed to list feedback"))?;

            into_records(rows)
        })
    }

    fn list_by_item(&self, item_name: String) -> StoreFuture<'_, Vec<FeedbackRecord>> {
        Box::pin(async move {
            let sql = format!(
                "SELECT {COLUMNS} FROM feedback WHERE item_name = $1 ORDER BY created_at, id"
            );

            let rows: Vec<FeedbackRow> = sqlx::query_as(&sql)
                .bind(&item_name)
                .fetch_all(&self.pool)
                .await
                .map_err(db_error("Failed to list feedback for item"))?;

            into_records(rows)
        })
    }
}
