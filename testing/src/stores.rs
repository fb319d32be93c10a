//! In-memory store implementations
//!
//! Fast, deterministic stand-ins for the `PostgreSQL` stores:
//! - [`InMemoryFeedbackStore`]: feedback records behind one lock
//! - [`InMemoryReservationStore`]: reservations in insertion order
//! - [`InMemoryUserDirectory`]: seeded email → username map
//! - [`FailingStore`]: every call fails, for error-path tests

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Test utilities document panics where critical

use bistro_core::store::{
    FeedbackStore, ReservationStore, StoreError, StoreFuture, UserDirectory,
};
use bistro_core::types::{
    FeedbackDraft, FeedbackId, FeedbackKey, FeedbackRecord, NewReservation, ReservationId,
    ReservationRecord, ReservationStatus, UpsertOutcome, Upserted,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

/// In-memory feedback store.
///
/// The check-and-write of [`FeedbackStore::upsert`] happens under a single
/// write lock, so one key never maps to two records.
///
/// # Example
///
/// ```
/// use bistro_testing::InMemoryFeedbackStore;
///
/// let store = InMemoryFeedbackStore::new();
/// assert!(store.is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryFeedbackStore {
    records: Arc<RwLock<Vec<FeedbackRecord>>>,
    calls: Arc<AtomicUsize>,
}

impl InMemoryFeedbackStore {
    /// Create a new empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    /// Check if the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().unwrap().is_empty()
    }

    /// Snapshot of every stored record
    #[must_use]
    pub fn records(&self) -> Vec<FeedbackRecord> {
        self.records.read().unwrap().clone()
    }

    /// How many store methods have been called
    ///
    /// Lets tests assert that rejected input never reached the store.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl FeedbackStore for InMemoryFeedbackStore {
    fn upsert(&self, draft: FeedbackDraft, at: DateTime<Utc>) -> StoreFuture<'_, Upserted> {
        self.touch();
        let mut records = self.records.write().unwrap();

        let upserted = if let Some(existing) = records.iter_mut().find(|r| r.key() == draft.key) {
            existing.feedback = draft.feedback;
            existing.rating = draft.rating;
            existing.updated_at = at;
            Upserted {
                record: existing.clone(),
                outcome: UpsertOutcome::Updated,
            }
        } else {
            let record = FeedbackRecord {
                id: FeedbackId::new(),
                email: draft.key.email,
                feedback: draft.feedback,
                rating: draft.rating,
                item_name: draft.key.item_name,
                order_id: draft.key.order_id,
                created_at: at,
                updated_at: at,
            };
            records.push(record.clone());
            Upserted {
                record,
                outcome: UpsertOutcome::Created,
            }
        };

        Box::pin(async move { Ok(upserted) })
    }

    fn find(&self, key: FeedbackKey) -> StoreFuture<'_, Option<FeedbackRecord>> {
        self.touch();
        let found = self
            .records
            .read()
            .unwrap()
            .iter()
            .find(|r| r.key() == key)
            .cloned();
        Box::pin(async move { Ok(found) })
    }

    fn delete(&self, key: FeedbackKey) -> StoreFuture<'_, bool> {
        self.touch();
        let mut records = self.records.write().unwrap();
        let before = records.len();
        records.retain(|r| r.key() != key);
        let deleted = records.len() < before;
        Box::pin(async move { Ok(deleted) })
    }

    fn list_all(&self) -> StoreFuture<'_, Vec<FeedbackRecord>> {
        self.touch();
        let all = self.records();
        Box::pin(async move { Ok(all) })
    }

    fn list_by_item(&self, item_name: String) -> StoreFuture<'_, Vec<FeedbackRecord>> {
        self.touch();
        let matching: Vec<_> = self
            .records
            .read()
            .unwrap()
            .iter()
            .filter(|r| r.item_name == item_name)
            .cloned()
            .collect();
        Box::pin(async move { Ok(matching) })
    }
}

/// In-memory reservation store.
#[derive(Clone, Debug, Default)]
pub struct InMemoryReservationStore {
    records: Arc<RwLock<Vec<ReservationRecord>>>,
}

impl InMemoryReservationStore {
    /// Create a new empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored reservations
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    /// Check if the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().unwrap().is_empty()
    }

    /// Fetch one reservation without going through the async trait
    #[must_use]
    pub fn snapshot(&self, id: ReservationId) -> Option<ReservationRecord> {
        self.records
            .read()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }
}

impl ReservationStore for InMemoryReservationStore {
    fn insert(
        &self,
        fields: NewReservation,
        status: ReservationStatus,
        created_at: DateTime<Utc>,
    ) -> StoreFuture<'_, ReservationRecord> {
        let record = ReservationRecord::from_new(ReservationId::new(), fields, status, created_at);
        self.records.write().unwrap().push(record.clone());
        Box::pin(async move { Ok(record) })
    }

    fn get(&self, id: ReservationId) -> StoreFuture<'_, Option<ReservationRecord>> {
        let found = self.snapshot(id);
        Box::pin(async move { Ok(found) })
    }

    fn list_by_email(&self, email: String) -> StoreFuture<'_, Vec<ReservationRecord>> {
        let owned: Vec<_> = self
            .records
            .read()
            .unwrap()
            .iter()
            .filter(|r| r.email == email)
            .cloned()
            .collect();
        Box::pin(async move { Ok(owned) })
    }

    fn list_all(&self) -> StoreFuture<'_, Vec<ReservationRecord>> {
        let all = self.records.read().unwrap().clone();
        Box::pin(async move { Ok(all) })
    }

    fn update_status(
        &self,
        id: ReservationId,
        status: ReservationStatus,
    ) -> StoreFuture<'_, Option<ReservationRecord>> {
        let updated = self
            .records
            .write()
            .unwrap()
            .iter_mut()
            .find(|r| r.id == id)
            .map(|r| {
                r.status = status;
                r.clone()
            });
        Box::pin(async move { Ok(updated) })
    }

    fn delete(&self, id: ReservationId) -> StoreFuture<'_, bool> {
        let mut records = self.records.write().unwrap();
        let before = records.len();
        records.retain(|r| r.id != id);
        let deleted = records.len() < before;
        Box::pin(async move { Ok(deleted) })
    }
}

/// In-memory user registry.
#[derive(Clone, Debug, Default)]
pub struct InMemoryUserDirectory {
    users: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryUserDirectory {
    /// Create a new empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a display name for an email
    #[must_use]
    pub fn with_user(self, email: &str, username: &str) -> Self {
        self.users
            .write()
            .unwrap()
            .insert(email.to_string(), username.to_string());
        self
    }
}

impl UserDirectory for InMemoryUserDirectory {
    fn username_for(&self, email: String) -> StoreFuture<'_, Option<String>> {
        let found = self.users.read().unwrap().get(&email).cloned();
        Box::pin(async move { Ok(found) })
    }
}

/// A store whose every operation fails with [`StoreError::Database`].
#[derive(Clone, Debug)]
pub struct FailingStore {
    message: String,
}

impl FailingStore {
    /// Create a failing store reporting `message`
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    fn fail<T: Send + 'static>(&self) -> StoreFuture<'_, T> {
        let error = StoreError::Database(self.message.clone());
        Box::pin(async move { Err(error) })
    }
}

impl Default for FailingStore {
    fn default() -> Self {
        Self::new("connection refused (os error 111) at 10.0.0.5:5432")
    }
}

impl FeedbackStore for FailingStore {
    fn upsert(&self, _draft: FeedbackDraft, _at: DateTime<Utc>) -> StoreFuture<'_, Upserted> {
        self.fail()
    }

    fn find(&self, _key: FeedbackKey) -> StoreFuture<'_, Option<FeedbackRecord>> {
        self.fail()
    }

    fn delete(&self, _key: FeedbackKey) -> StoreFuture<'_, bool> {
        self.fail()
    }

    fn list_all(&self) -> StoreFuture<'_, Vec<FeedbackRecord>> {
        self.fail()
    }

    fn list_by_item(&self, _item_name: String) -> StoreFuture<'_, Vec<FeedbackRecord>> {
        self.fail()
    }
}

impl ReservationStore for FailingStore {
    fn insert(
        &self,
        _fields: NewReservation,
        _status: ReservationStatus,
        _created_at: DateTime<Utc>,
    ) -> StoreFuture<'_, ReservationRecord> {
        self.fail()
    }

    fn get(&self, _id: ReservationId) -> StoreFuture<'_, Option<ReservationRecord>> {
        self.fail()
    }

    fn list_by_email(&self, _email: String) -> StoreFuture<'_, Vec<ReservationRecord>> {
        self.fail()
    }

    fn list_all(&self) -> StoreFuture<'_, Vec<ReservationRecord>> {
        self.fail()
    }

    fn update_status(
        &self,
        _id: ReservationId,
        _status: ReservationStatus,
    ) -> StoreFuture<'_, Option<ReservationRecord>> {
        self.fail()
    }

    fn delete(&self, _id: ReservationId) -> StoreFuture<'_, bool> {
        self.fail()
    }
}

impl UserDirectory for FailingStore {
    fn username_for(&self, _email: String) -> StoreFuture<'_, Option<String>> {
        self.fail()
    }
}
