//! Domain types for the Bistro backend.
//!
//! Records are serialized with the camelCase field names the frontend expects,
//! and store-generated identities are exposed as `_id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Store-generated identifier of a feedback record
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeedbackId(Uuid);

impl FeedbackId {
    /// Creates a new random `FeedbackId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `FeedbackId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for FeedbackId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FeedbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Store-generated identifier of a reservation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReservationId(Uuid);

impl ReservationId {
    /// Creates a new random `ReservationId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `ReservationId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Parse an identifier taken from a request path.
    ///
    /// Returns `None` for anything that is not a UUID; no record can carry
    /// such an id, so callers treat it as "no matching record".
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }
}

impl Default for ReservationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Feedback
// ============================================================================

/// A star rating, always within `1..=5`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Rating(u8);

impl Rating {
    /// Lowest accepted rating
    pub const MIN: i64 = 1;
    /// Highest accepted rating
    pub const MAX: i64 = 5;

    /// Creates a rating, or `None` when `value` is outside `1..=5`.
    #[must_use]
    pub fn new(value: i64) -> Option<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            u8::try_from(value).ok().map(Self)
        } else {
            None
        }
    }

    /// Get the numeric value
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("rating {value} is outside 1..=5"))
    }
}

impl From<Rating> for i64 {
    fn from(rating: Rating) -> Self {
        Self::from(rating.0)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The business key of a feedback record: one record per key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackKey {
    /// Email of the customer who left the feedback
    pub email: String,
    /// Menu item the feedback is about (empty when not given)
    pub item_name: String,
    /// Order the item belonged to
    pub order_id: String,
}

impl FeedbackKey {
    /// Creates a new `FeedbackKey`
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        item_name: impl Into<String>,
        order_id: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            item_name: item_name.into(),
            order_id: order_id.into(),
        }
    }
}

impl fmt::Display for FeedbackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.email, self.order_id, self.item_name)
    }
}

/// A validated feedback submission, ready to be upserted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackDraft {
    /// Key the submission is filed under
    pub key: FeedbackKey,
    /// Free-text feedback
    pub feedback: String,
    /// Star rating
    pub rating: Rating,
}

/// Persisted feedback record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    /// Store-generated identity
    #[serde(rename = "_id")]
    pub id: FeedbackId,
    /// Email of the customer (owning email)
    pub email: String,
    /// Free-text feedback
    pub feedback: String,
    /// Star rating
    pub rating: Rating,
    /// Menu item name
    pub item_name: String,
    /// Order identifier
    pub order_id: String,
    /// When the record was first created
    pub created_at: DateTime<Utc>,
    /// When `feedback`/`rating` were last written
    pub updated_at: DateTime<Utc>,
}

impl FeedbackRecord {
    /// The business key of this record
    #[must_use]
    pub fn key(&self) -> FeedbackKey {
        FeedbackKey::new(&self.email, &self.item_name, &self.order_id)
    }
}

/// Which branch an upsert took
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpsertOutcome {
    /// No record existed for the key; a new one was created
    Created,
    /// An existing record had its `feedback` and `rating` overwritten
    Updated,
}

impl UpsertOutcome {
    /// Label used in logs and metrics
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
        }
    }
}

/// Result of an upsert: the stored record and which branch was taken
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Upserted {
    /// The record as it is now stored
    pub record: FeedbackRecord,
    /// Whether the record was created or updated
    pub outcome: UpsertOutcome,
}

/// A feedback record enriched with the reviewer's display name
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EnrichedFeedback {
    /// The underlying record
    #[serde(flatten)]
    pub record: FeedbackRecord,
    /// Display name from the user registry, or `"Anonymous"`
    pub username: String,
}

/// All reviews for one menu item plus their mean rating
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemReviews {
    /// Enriched reviews
    pub reviews: Vec<EnrichedFeedback>,
    /// Arithmetic mean of the ratings; `0` when there are no reviews
    pub average_rating: f64,
}

// ============================================================================
// Reservations
// ============================================================================

/// Reservation status.
///
/// A flat set: any status may be replaced by any other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReservationStatus {
    /// Just created, awaiting the restaurant
    #[default]
    Pending,
    /// Accepted by the restaurant
    Confirmed,
    /// The guests came and went
    Completed,
    /// Called off, but kept on record
    Cancelled,
}

impl ReservationStatus {
    /// Every status value, in declaration order
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Confirmed,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Wire/database representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Move to `next`.
    ///
    /// There is no transition graph: every move is allowed, including out of
    /// `Completed` or `Cancelled`.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub const fn transition(self, next: Self) -> Self {
        next
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no [`ReservationStatus`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown reservation status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for ReservationStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Validated fields of a reservation request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReservation {
    /// Guest name
    pub name: String,
    /// Owning email
    pub email: String,
    /// Contact phone (empty when not given)
    pub phone: String,
    /// Requested date, as entered
    pub date: String,
    /// Requested time, as entered
    pub time: String,
    /// Party size
    pub guests: u32,
    /// Requested table type
    pub table_type: String,
    /// Free-text requests (empty when not given)
    pub special_requests: String,
}

/// Persisted reservation record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRecord {
    /// Store-generated identity
    #[serde(rename = "_id")]
    pub id: ReservationId,
    /// Guest name
    pub name: String,
    /// Owning email
    pub email: String,
    /// Contact phone
    pub phone: String,
    /// Requested date
    pub date: String,
    /// Requested time
    pub time: String,
    /// Party size
    pub guests: u32,
    /// Requested table type
    pub table_type: String,
    /// Free-text requests
    pub special_requests: String,
    /// Current status
    pub status: ReservationStatus,
    /// When the reservation was made
    pub created_at: DateTime<Utc>,
}

impl ReservationRecord {
    /// Build a record from validated fields and store-assigned metadata
    #[must_use]
    pub fn from_new(
        id: ReservationId,
        fields: NewReservation,
        status: ReservationStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: fields.name,
            email: fields.email,
            phone: fields.phone,
            date: fields.date,
            time: fields.time,
            guests: fields.guests,
            table_type: fields.table_type,
            special_requests: fields.special_requests,
            status,
            created_at,
        }
    }
}

/// Result of a listing that may legitimately find nothing
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Listing<T> {
    /// At least one record matched
    Found(Vec<T>),
    /// Nothing matched; not an error
    Empty,
}

impl<T> Listing<T> {
    /// Wrap a result set, mapping an empty vector to [`Listing::Empty`]
    #[must_use]
    pub fn from_vec(items: Vec<T>) -> Self {
        if items.is_empty() {
            Self::Empty
        } else {
            Self::Found(items)
        }
    }

    /// Whether nothing matched
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The matched records (empty for [`Listing::Empty`])
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Found(items) => items,
            Self::Empty => Vec::new(),
        }
    }
}
