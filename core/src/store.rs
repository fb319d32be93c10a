//! Storage abstractions.
//!
//! The managers only ever talk to these traits. Two families of
//! implementations exist:
//!
//! - `bistro-postgres`: production storage on `PostgreSQL`
//! - `bistro-testing`: in-memory stores for fast, deterministic tests
//!
//! # Dyn Compatibility
//!
//! Methods return `Pin<Box<dyn Future>>` instead of using `async fn` so the
//! stores can be shared as `Arc<dyn FeedbackStore>` and friends.
//!
//! # Atomic upsert
//!
//! [`FeedbackStore::upsert`] is a single primitive rather than a
//! find-then-insert pair: implementations must guarantee that two concurrent
//! upserts for the same [`FeedbackKey`] never produce two records. Concurrent
//! *updates* of one key are still last-writer-wins.

use crate::types::{
    FeedbackDraft, FeedbackKey, FeedbackRecord, NewReservation, ReservationId, ReservationRecord,
    ReservationStatus, Upserted,
};
use chrono::{DateTime, Utc};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Errors raised by a storage backend.
///
/// These carry backend detail for logs; the HTTP layer never forwards it to
/// clients.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Database connection or query failed
    #[error("Database error: {0}")]
    Database(String),

    /// Stored data could not be decoded into a record
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Boxed future returned by every store method
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Persistence for feedback records.
pub trait FeedbackStore: Send + Sync {
    /// Insert a record for `draft.key`, or overwrite `feedback` and `rating`
    /// of the existing one, as one atomic step.
    ///
    /// `at` becomes `created_at` for new records and `updated_at` in both
    /// cases. The store generates the identity of new records.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn upsert(&self, draft: FeedbackDraft, at: DateTime<Utc>) -> StoreFuture<'_, Upserted>;

    /// Fetch the record filed under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn find(&self, key: FeedbackKey) -> StoreFuture<'_, Option<FeedbackRecord>>;

    /// Remove the record filed under `key`; `true` when one was removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn delete(&self, key: FeedbackKey) -> StoreFuture<'_, bool>;

    /// Every feedback record, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn list_all(&self) -> StoreFuture<'_, Vec<FeedbackRecord>>;

    /// Every record for one menu item, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn list_by_item(&self, item_name: String) -> StoreFuture<'_, Vec<FeedbackRecord>>;
}

/// Persistence for reservations.
pub trait ReservationStore: Send + Sync {
    /// Persist a new reservation and return it with its generated identity.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn insert(
        &self,
        fields: NewReservation,
        status: ReservationStatus,
        created_at: DateTime<Utc>,
    ) -> StoreFuture<'_, ReservationRecord>;

    /// Fetch one reservation by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn get(&self, id: ReservationId) -> StoreFuture<'_, Option<ReservationRecord>>;

    /// Reservations owned by `email`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn list_by_email(&self, email: String) -> StoreFuture<'_, Vec<ReservationRecord>>;

    /// Every reservation, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn list_all(&self) -> StoreFuture<'_, Vec<ReservationRecord>>;

    /// Overwrite the status of one reservation; `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn update_status(
        &self,
        id: ReservationId,
        status: ReservationStatus,
    ) -> StoreFuture<'_, Option<ReservationRecord>>;

    /// Remove one reservation; `true` when one was removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn delete(&self, id: ReservationId) -> StoreFuture<'_, bool>;
}

/// Read-only registry of user display names.
pub trait UserDirectory: Send + Sync {
    /// Display name registered for `email`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn username_for(&self, email: String) -> StoreFuture<'_, Option<String>>;
}
