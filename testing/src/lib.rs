//! # Bistro Testing
//!
//! Testing utilities for the Bistro backend.
//!
//! This crate provides:
//! - In-memory implementations of the store traits
//! - A store that always fails, for exercising error paths
//! - A fixed clock for deterministic timestamps
//! - Payload builders for common requests
//!
//! ## Example
//!
//! ```
//! use bistro_core::{AdminEmail, FeedbackManager, UpsertOutcome};
//! use bistro_testing::{fixtures, test_clock, InMemoryFeedbackStore, InMemoryUserDirectory};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = FeedbackManager::new(
//!     Arc::new(InMemoryFeedbackStore::new()),
//!     Arc::new(InMemoryUserDirectory::new()),
//!     Arc::new(AdminEmail::new(fixtures::ADMIN_EMAIL)),
//!     Arc::new(test_clock()),
//! );
//!
//! let upserted = manager
//!     .upsert(fixtures::feedback_payload("a@x.com", "pizza", "o1", "great", 5))
//!     .await?;
//! assert_eq!(upserted.outcome, UpsertOutcome::Created);
//! # Ok(())
//! # }
//! ```

pub mod stores;

/// Mock implementations for testing.
pub mod mocks {
    use bistro_core::clock::Clock;
    use chrono::{DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use bistro_testing::mocks::FixedClock;
    /// use bistro_core::clock::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Request payload builders.
pub mod fixtures {
    use bistro_core::validation::{
        FeedbackPayload, FeedbackQuery, Numeric, ReservationPayload, StatusPayload,
    };

    /// Administrator email used throughout the tests
    pub const ADMIN_EMAIL: &str = "admin@gmail.com";

    /// A complete feedback submission
    #[must_use]
    pub fn feedback_payload(
        email: &str,
        item_name: &str,
        order_id: &str,
        feedback: &str,
        rating: i64,
    ) -> FeedbackPayload {
        FeedbackPayload {
            email: Some(email.to_string()),
            feedback: Some(feedback.to_string()),
            rating: Some(Numeric::Int(rating)),
            item_name: Some(item_name.to_string()),
            order_id: Some(order_id.to_string()),
        }
    }

    /// A complete feedback lookup/delete query
    #[must_use]
    pub fn feedback_query(email: &str, item_name: &str, order_id: &str) -> FeedbackQuery {
        FeedbackQuery {
            email: Some(email.to_string()),
            order_id: Some(order_id.to_string()),
            item_name: Some(item_name.to_string()),
        }
    }

    /// A reservation request with every required field and no optional ones
    #[must_use]
    pub fn reservation_payload(name: &str, email: &str) -> ReservationPayload {
        ReservationPayload {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            phone: None,
            date: Some("2025-02-14".to_string()),
            time: Some("19:30".to_string()),
            guests: Some(Numeric::Int(2)),
            table_type: Some("Window".to_string()),
            special_requests: None,
        }
    }

    /// A status update body
    #[must_use]
    pub fn status_payload(status: &str) -> StatusPayload {
        StatusPayload {
            status: Some(status.to_string()),
        }
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
pub use stores::{
    FailingStore, InMemoryFeedbackStore, InMemoryReservationStore, InMemoryUserDirectory,
};

#[cfg(test)]
mod tests {
    use super::*;
    use bistro_core::clock::Clock;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
    }
}
