//! Per-item review aggregation.

use crate::store::{StoreError, UserDirectory};
use crate::types::{EnrichedFeedback, FeedbackRecord};
use futures::future::try_join_all;

/// Display name used when no user is registered for a feedback's email.
pub const ANONYMOUS: &str = "Anonymous";

/// Arithmetic mean of the ratings in `records`.
///
/// The mean of no ratings is `0.0`, never `NaN`.
#[must_use]
#[allow(clippy::cast_precision_loss)] // Counts and sums stay far below 2^52
pub fn average_rating(records: &[FeedbackRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }

    let total: u64 = records.iter().map(|r| u64::from(r.rating.value())).sum();
    total as f64 / records.len() as f64
}

/// Attach the registered display name to every record.
///
/// Lookups run concurrently; order of `records` is preserved.
///
/// # Errors
///
/// Returns the first [`StoreError`] raised by the directory.
pub async fn enrich(
    records: Vec<FeedbackRecord>,
    directory: &dyn UserDirectory,
) -> Result<Vec<EnrichedFeedback>, StoreError> {
    let lookups = records.into_iter().map(|record| async move {
        let username = directory
            .username_for(record.email.clone())
            .await?
            .unwrap_or_else(|| ANONYMOUS.to_string());
        Ok::<_, StoreError>(EnrichedFeedback { record, username })
    });

    try_join_all(lookups).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreFuture;
    use crate::types::{FeedbackId, Rating};
    use chrono::Utc;
    use std::collections::HashMap;

    struct Directory(HashMap<String, String>);

    impl UserDirectory for Directory {
        fn username_for(&self, email: String) -> StoreFuture<'_, Option<String>> {
            let found = self.0.get(&email).cloned();
            Box::pin(async move { Ok(found) })
        }
    }

    fn record(email: &str, rating: i64) -> FeedbackRecord {
        FeedbackRecord {
            id: FeedbackId::new(),
            email: email.to_string(),
            feedback: "ok".to_string(),
            rating: Rating::new(rating).expect("valid rating"),
            item_name: "pizza".to_string(),
            order_id: "o1".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_average_of_nothing_is_zero() {
        let avg = average_rating(&[]);
        assert!(avg.abs() < f64::EPSILON);
        assert!(!avg.is_nan());
    }

    #[test]
    fn test_average_rating() {
        let records = vec![record("a@x.com", 5), record("b@x.com", 4), record("c@x.com", 2)];
        let avg = average_rating(&records);
        assert!((avg - 11.0 / 3.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_enrich_falls_back_to_anonymous() {
        let directory = Directory(HashMap::from([(
            "a@x.com".to_string(),
            "alice".to_string(),
        )]));

        let enriched = enrich(vec![record("a@x.com", 5), record("ghost@x.com", 1)], &directory)
            .await
            .expect("lookups succeed");

        assert_eq!(enriched[0].username, "alice");
        assert_eq!(enriched[1].username, ANONYMOUS);
        assert_eq!(enriched[1].record.email, "ghost@x.com");
    }
}
