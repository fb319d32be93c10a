//! # Bistro Core
//!
//! Domain types and business rules for the Bistro restaurant backend.
//!
//! The crate owns two resource collections, customer feedback and table
//! reservations, and the rules that govern them:
//!
//! - **Validation**: pure presence/range checks run before any store access
//! - **Access control**: one configured administrator identity with
//!   cross-cutting scope; everyone else is scoped to their own email
//! - **Feedback manager**: idempotent create-or-update keyed on
//!   `(email, itemName, orderId)`, lookups, deletes and per-item aggregation
//! - **Reservation manager**: creation, owner/admin listings, unrestricted
//!   status changes gated by ownership, and deletion by id
//!
//! ## Architecture
//!
//! ```text
//! HTTP payload ──► validation ──► manager ──► store trait ──► backend
//!                     │              │
//!                     ▼              ▼
//!              ValidationError   ManagerError
//! ```
//!
//! Storage is abstracted behind [`store::FeedbackStore`],
//! [`store::ReservationStore`] and [`store::UserDirectory`]. Production uses
//! the `bistro-postgres` implementations; tests use the in-memory stores from
//! `bistro-testing`.
//!
//! ## Example
//!
//! ```ignore
//! use bistro_core::{access::AdminEmail, feedback::FeedbackManager};
//!
//! let manager = FeedbackManager::new(store, directory, Arc::new(AdminEmail::new("admin@gmail.com")), clock);
//! let upserted = manager.upsert(submission).await?;
//! println!("{:?}", upserted.outcome);
//! ```

pub mod access;
pub mod aggregate;
pub mod clock;
pub mod error;
pub mod feedback;
pub mod reservation;
pub mod store;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use access::{AccessPolicy, AdminEmail};
pub use chrono::{DateTime, Utc};
pub use clock::{Clock, SystemClock};
pub use error::{ManagerError, Result};
pub use feedback::FeedbackManager;
pub use reservation::ReservationManager;
pub use store::{FeedbackStore, ReservationStore, StoreError, UserDirectory};
pub use types::{
    EnrichedFeedback, FeedbackDraft, FeedbackId, FeedbackKey, FeedbackRecord, ItemReviews,
    Listing, NewReservation, Rating, ReservationId, ReservationRecord, ReservationStatus,
    UpsertOutcome, Upserted,
};
pub use validation::{
    FeedbackPayload, FeedbackQuery, MAX_GUESTS, Numeric, ReservationPayload, StatusPayload,
    ValidationError,
};
