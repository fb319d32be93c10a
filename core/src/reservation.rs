//! Reservation manager.
//!
//! # Lifecycle
//!
//! ```text
//! create ──► Pending ◄──► Confirmed ◄──► Completed ◄──► Cancelled
//!               (any status may be replaced by any other)
//!
//! delete(id) removes the record outright, independent of its status
//! ```
//!
//! Status changes require the caller to own the reservation or be the
//! administrator. Deletion by id performs no ownership check.

use crate::access::AccessPolicy;
use crate::clock::Clock;
use crate::error::{ManagerError, Result};
use crate::store::ReservationStore;
use crate::types::{Listing, ReservationId, ReservationRecord, ReservationStatus};
use crate::validation::{self, ReservationPayload, StatusPayload};
use std::sync::Arc;

const RESOURCE: &str = "Reservation";

/// Business logic for table reservations.
#[derive(Clone)]
pub struct ReservationManager {
    store: Arc<dyn ReservationStore>,
    access: Arc<dyn AccessPolicy>,
    clock: Arc<dyn Clock>,
}

impl ReservationManager {
    /// Create a new reservation manager.
    #[must_use]
    pub fn new(
        store: Arc<dyn ReservationStore>,
        access: Arc<dyn AccessPolicy>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            access,
            clock,
        }
    }

    /// Create a reservation in the `Pending` status.
    ///
    /// Identical requests create distinct reservations.
    ///
    /// # Errors
    ///
    /// - [`ManagerError::Validation`] if a required field is missing
    /// - [`ManagerError::Store`] if persistence fails
    #[tracing::instrument(skip(self, payload))]
    pub async fn create(&self, payload: ReservationPayload) -> Result<ReservationRecord> {
        let fields = validation::validate_reservation(payload)?;

        let record = self
            .store
            .insert(fields, ReservationStatus::Pending, self.clock.now())
            .await?;

        metrics::counter!("bistro_reservations_created_total").increment(1);
        tracing::info!(
            id = %record.id,
            email = %record.email,
            date = %record.date,
            time = %record.time,
            guests = record.guests,
            "Reservation created"
        );

        Ok(record)
    }

    /// Reservations owned by the caller.
    ///
    /// # Errors
    ///
    /// - [`ManagerError::Validation`] if the caller identity is missing
    /// - [`ManagerError::Store`] if the listing fails
    #[tracing::instrument(skip(self))]
    pub async fn list_own(&self, caller: Option<&str>) -> Result<Listing<ReservationRecord>> {
        let identity = validation::require_identity(caller)?;
        let records = self.store.list_by_email(identity).await?;
        Ok(Listing::from_vec(records))
    }

    /// Every reservation for the administrator; the caller's own otherwise.
    ///
    /// # Errors
    ///
    /// - [`ManagerError::Validation`] if the caller identity is missing
    /// - [`ManagerError::Store`] if the listing fails
    #[tracing::instrument(skip(self))]
    pub async fn list_all(&self, caller: Option<&str>) -> Result<Listing<ReservationRecord>> {
        let identity = validation::require_identity(caller)?;

        let records = if self.access.is_admin(&identity) {
            self.store.list_all().await?
        } else {
            self.store.list_by_email(identity).await?
        };

        Ok(Listing::from_vec(records))
    }

    /// Delete a reservation by id.
    ///
    /// No ownership check is made. Returns whether a record was removed; an id
    /// that is not a valid identifier matches nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::Store`] if the delete fails.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let Some(id) = ReservationId::parse(id) else {
            tracing::debug!("Delete requested for a malformed reservation id");
            return Ok(false);
        };

        let deleted = self.store.delete(id).await?;
        if deleted {
            tracing::info!(id = %id, "Reservation deleted");
        }

        Ok(deleted)
    }

    /// Replace the status of a reservation.
    ///
    /// Any status may move to any other. The caller must own the reservation
    /// or be the administrator.
    ///
    /// # Errors
    ///
    /// - [`ManagerError::Validation`] if the caller identity is missing or the
    ///   status is not one of the known values
    /// - [`ManagerError::NotFound`] if no reservation has this id
    /// - [`ManagerError::Unauthorized`] if the caller is neither owner nor
    ///   administrator; the record is left unchanged
    /// - [`ManagerError::Store`] if the lookup or update fails
    #[tracing::instrument(skip(self, payload))]
    pub async fn update_status(
        &self,
        caller: Option<&str>,
        id: &str,
        payload: StatusPayload,
    ) -> Result<ReservationRecord> {
        let identity = validation::require_identity(caller)?;
        let requested = validation::validate_status(payload)?;

        let not_found = || ManagerError::NotFound {
            resource: RESOURCE,
            id: id.to_string(),
        };

        let reservation_id = ReservationId::parse(id).ok_or_else(not_found)?;
        let existing = self
            .store
            .get(reservation_id)
            .await?
            .ok_or_else(not_found)?;

        if !self.access.may_act_for(&identity, &existing.email) {
            metrics::counter!(
                "bistro_authorization_denied_total",
                "operation" => "update_reservation_status"
            )
            .increment(1);
            tracing::warn!(id = %reservation_id, "Status update refused for non-owner");
            return Err(ManagerError::Unauthorized(
                "Only the owner or the administrator may update this reservation".to_string(),
            ));
        }

        let next = existing.status.transition(requested);
        let updated = self
            .store
            .update_status(reservation_id, next)
            .await?
            .ok_or_else(not_found)?;

        metrics::counter!(
            "bistro_reservation_status_updates_total",
            "status" => next.as_str()
        )
        .increment(1);
        tracing::info!(
            id = %reservation_id,
            from = %existing.status,
            to = %next,
            "Reservation status updated"
        );

        Ok(updated)
    }
}
