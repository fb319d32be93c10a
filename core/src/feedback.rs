//! Feedback manager.
//!
//! Owns the create-or-update semantics of feedback filed under an
//! `(email, itemName, orderId)` key, plus lookups, deletion, the
//! administrator listing and per-item aggregation.

use crate::access::AccessPolicy;
use crate::aggregate::{average_rating, enrich};
use crate::clock::Clock;
use crate::error::{ManagerError, Result};
use crate::store::{FeedbackStore, UserDirectory};
use crate::types::{FeedbackRecord, ItemReviews, Upserted};
use crate::validation::{self, FeedbackPayload, FeedbackQuery};
use std::sync::Arc;

/// Business logic for customer feedback.
///
/// Cheap to clone; all dependencies are shared behind `Arc`.
#[derive(Clone)]
pub struct FeedbackManager {
    store: Arc<dyn FeedbackStore>,
    users: Arc<dyn UserDirectory>,
    access: Arc<dyn AccessPolicy>,
    clock: Arc<dyn Clock>,
}

impl FeedbackManager {
    /// Create a new feedback manager.
    ///
    /// # Arguments
    ///
    /// - `store`: Feedback persistence
    /// - `users`: Registry used to resolve display names
    /// - `access`: Administrator policy
    /// - `clock`: Source of record timestamps
    #[must_use]
    pub fn new(
        store: Arc<dyn FeedbackStore>,
        users: Arc<dyn UserDirectory>,
        access: Arc<dyn AccessPolicy>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            users,
            access,
            clock,
        }
    }

    /// Create the feedback for a key, or overwrite its `feedback` and
    /// `rating` if it already exists.
    ///
    /// The returned [`Upserted::outcome`] tells callers which branch ran.
    ///
    /// # Errors
    ///
    /// - [`ManagerError::Validation`] for missing fields or a rating outside
    ///   `1..=5`; the store is not touched
    /// - [`ManagerError::Store`] if persistence fails
    #[tracing::instrument(skip(self, payload))]
    pub async fn upsert(&self, payload: FeedbackPayload) -> Result<Upserted> {
        let draft = validation::validate_feedback(payload)?;
        let key = draft.key.clone();

        let upserted = self.store.upsert(draft, self.clock.now()).await?;

        metrics::counter!(
            "bistro_feedback_upserts_total",
            "outcome" => upserted.outcome.as_str()
        )
        .increment(1);
        tracing::info!(
            key = %key,
            id = %upserted.record.id,
            outcome = upserted.outcome.as_str(),
            "Feedback upserted"
        );

        Ok(upserted)
    }

    /// Fetch the feedback filed under a key.
    ///
    /// Absence is a normal outcome and yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// - [`ManagerError::Validation`] if `email`, `orderId` or `itemName` is missing
    /// - [`ManagerError::Store`] if the lookup fails
    #[tracing::instrument(skip(self, query))]
    pub async fn lookup(&self, query: FeedbackQuery) -> Result<Option<FeedbackRecord>> {
        let key = validation::validate_feedback_key(query)?;
        Ok(self.store.find(key).await?)
    }

    /// Delete the feedback filed under a key.
    ///
    /// Returns `true` when a record was removed and `false` when none existed.
    ///
    /// # Errors
    ///
    /// - [`ManagerError::Validation`] if `email`, `orderId` or `itemName` is missing
    /// - [`ManagerError::Store`] if the delete fails
    #[tracing::instrument(skip(self, query))]
    pub async fn delete(&self, query: FeedbackQuery) -> Result<bool> {
        let key = validation::validate_feedback_key(query)?;
        let deleted = self.store.delete(key.clone()).await?;

        if deleted {
            tracing::info!(key = %key, "Feedback deleted");
        }

        Ok(deleted)
    }

    /// Every feedback record, for the administrator only.
    ///
    /// Any other caller is refused, whatever email they claim to be asking
    /// about.
    ///
    /// # Errors
    ///
    /// - [`ManagerError::Unauthorized`] unless `caller` is the administrator
    /// - [`ManagerError::Store`] if the listing fails
    #[tracing::instrument(skip(self))]
    pub async fn list_all(&self, caller: Option<&str>) -> Result<Vec<FeedbackRecord>> {
        match caller {
            Some(identity) if self.access.is_admin(identity) => Ok(self.store.list_all().await?),
            _ => {
                metrics::counter!(
                    "bistro_authorization_denied_total",
                    "operation" => "list_feedback"
                )
                .increment(1);
                tracing::warn!("Non-admin caller refused the feedback listing");
                Err(ManagerError::Unauthorized(
                    "Only the administrator may list all feedback".to_string(),
                ))
            }
        }
    }

    /// All reviews for a menu item with reviewer names and their mean rating.
    ///
    /// Reviews from emails with no registered user are attributed to
    /// `"Anonymous"`. An item with no reviews averages `0`.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::Store`] if the listing or a name lookup fails.
    #[tracing::instrument(skip(self))]
    pub async fn aggregate_by_item(&self, item_name: &str) -> Result<ItemReviews> {
        let records = self.store.list_by_item(item_name.to_string()).await?;
        let average_rating = average_rating(&records);
        let reviews = enrich(records, self.users.as_ref()).await?;

        tracing::debug!(
            item = item_name,
            reviews = reviews.len(),
            average_rating,
            "Item reviews aggregated"
        );

        Ok(ItemReviews {
            reviews,
            average_rating,
        })
    }
}
