//! Reservation persistence.

use crate::db_error;
use bistro_core::store::{ReservationStore, StoreFuture};
use bistro_core::{
    NewReservation, ReservationId, ReservationRecord, ReservationStatus, StoreError,
};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

const COLUMNS: &str =
    "id, name, email, phone, date, time, guests, table_type, special_requests, status, created_at";

#[derive(FromRow)]
struct ReservationRow {
    id: Uuid,
    name: String,
    email: String,
    phone: String,
    date: String,
    time: String,
    guests: i32,
    table_type: String,
    special_requests: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ReservationRow> for ReservationRecord {
    type Error = StoreError;

    fn try_from(row: ReservationRow) -> Result<Self, Self::Error> {
        let status: ReservationStatus = row
            .status
            .parse()
            .map_err(|e| StoreError::Serialization(format!("reservation {}: {e}", row.id)))?;
        let guests = u32::try_from(row.guests).map_err(|_| {
            StoreError::Serialization(format!("reservation {} has {} guests", row.id, row.guests))
        })?;

        Ok(Self {
            id: ReservationId::from_uuid(row.id),
            name: row.name,
            email: row.email,
            phone: row.phone,
            date: row.date,
            time: row.time,
            guests,
            table_type: row.table_type,
            special_requests: row.special_requests,
            status,
            created_at: row.created_at,
        })
    }
}

fn into_records(rows: Vec<ReservationRow>) -> Result<Vec<ReservationRecord>, StoreError> {
    rows.into_iter().map(ReservationRecord::try_from).collect()
}

/// `PostgreSQL` reservation store.
#[derive(Clone, Debug)]
pub struct PgReservationStore {
    pool: PgPool,
}

impl PgReservationStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ReservationStore for PgReservationStore {
    fn insert(
        &self,
        fields: NewReservation,
        status: ReservationStatus,
        created_at: DateTime<Utc>,
    ) -> StoreFuture<'_, ReservationRecord> {
        Box::pin(async move {
            let guests = i32::try_from(fields.guests).map_err(|_| {
                StoreError::Serialization(format!("guest count {} is too large", fields.guests))
            })?;

            let sql = format!(
                r"
                INSERT INTO reservations
                    (id, name, email, phone, date, time, guests, table_type,
                     special_requests, status, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                RETURNING {COLUMNS}
                "
            );

            let row: ReservationRow = sqlx::query_as(&sql)
                .bind(Uuid::new_v4())
                .bind(&fields.name)
                .bind(&fields.email)
                .bind(&fields.phone)
                .bind(&fields.date)
                .bind(&fields.time)
                .bind(guests)
                .bind(&fields.table_type)
                .bind(&fields.special_requests)
                .bind(status.as_str())
                .bind(created_at)
                .fetch_one(&self.pool)
                .await
                .map_err(db_error("Failed to create reservation"))?;

            row.try_into()
        })
    }

    fn get(&self, id: ReservationId) -> StoreFuture<'_, Option<ReservationRecord>> {
        Box::pin(async move {
            let sql = format!("SELECT {COLUMNS} FROM reservations WHERE id = $1");

            let row: Option<ReservationRow> = sqlx::query_as(&sql)
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("Failed to get reservation"))?;

            row.map(ReservationRecord::try_from).transpose()
        })
    }

    fn list_by_email(&self, email: String) -> StoreFuture<'_, Vec<ReservationRecord>> {
        Box::pin(async move {
            let sql = format!(
                "SELECT {COLUMNS} FROM reservations WHERE email = $1 ORDER BY created_at, id"
            );

            let rows: Vec<ReservationRow> = sqlx::query_as(&sql)
                .bind(&email)
                .fetch_all(&self.pool)
                .await
                .map_err(db_error("Failed to list reservations"))?;

            into_records(rows)
        })
    }

    fn list_all(&self) -> StoreFuture<'_, Vec<ReservationRecord>> {
        Box::pin(async move {
            let sql = format!("SELECT {COLUMNS} FROM reservations ORDER BY created_at, id");

            let rows: Vec<ReservationRow> = sqlx::query_as(&sql)
                .fetch_all(&self.pool)
                .await
                .map_err(db_error("Failed to list reservations"))?;

            into_records(rows)
        })
    }

    fn update_status(
        &self,
        id: ReservationId,
        status: ReservationStatus,
    ) -> StoreFuture<'_, Option<ReservationRecord>> {
        Box::pin(async move {
            let sql = format!("UPDATE reservations SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");

            let row: Option<ReservationRow> = sqlx::query_as(&sql)
                .bind(id.as_uuid())
                .bind(status.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("Failed to update reservation status"))?;

            row.map(ReservationRecord::try_from).transpose()
        })
    }

    fn delete(&self, id: ReservationId) -> StoreFuture<'_, bool> {
        Box::pin(async move {
            let result = sqlx::query("DELETE FROM reservations WHERE id = $1")
                .bind(id.as_uuid())
                .execute(&self.pool)
                .await
                .map_err(db_error("Failed to delete reservation"))?;

            Ok(result.rows_affected() > 0)
        })
    }
}
