//! Reservation endpoints.
//!
//! - `POST /reservation` - create a reservation in the `Pending` status
//! - `GET /reservations` - the caller's reservations (`email` header)
//! - `GET /allreservations` - every reservation for the administrator,
//!   the caller's own otherwise
//! - `DELETE /reservations/:id` - delete by id
//! - `PUT /update/:id` - change the status (owner or administrator)
//!
//! # Status
//!
//! ```text
//! Pending ◄──► Confirmed ◄──► Completed ◄──► Cancelled
//! ```
//!
//! Any status may be replaced by any other.

use super::feedback::MessageResponse;
use crate::error::AppError;
use crate::extractors::CallerEmail;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use bistro_core::{Listing, ReservationPayload, ReservationRecord, StatusPayload};
use serde::Serialize;

const NONE_FOUND: &str = "No reservations found for the given email";

/// Response after creating a reservation.
#[derive(Debug, Serialize)]
pub struct CreateReservationResponse {
    /// Message for the user
    pub message: String,
    /// The stored reservation
    pub reservation: ReservationRecord,
}

fn found_or_404(listing: Listing<ReservationRecord>) -> Result<Json<Vec<ReservationRecord>>, AppError> {
    match listing {
        Listing::Found(records) => Ok(Json(records)),
        Listing::Empty => Err(AppError::not_found(NONE_FOUND)),
    }
}

/// Create a reservation.
///
/// ```bash
/// curl -X POST http://localhost:8080/reservation \
///   -H "Content-Type: application/json" \
///   -d '{"name":"Ada","email":"ada@x.com","date":"2025-02-14","time":"19:30","guests":2,"tableType":"Window"}'
/// ```
pub async fn create_reservation(
    State(state): State<AppState>,
    payload: Result<Json<ReservationPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateReservationResponse>), AppError> {
    let Json(payload) = payload?;
    let reservation = state.reservations.create(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateReservationResponse {
            message: "Reservation created successfully!".to_string(),
            reservation,
        }),
    ))
}

/// The caller's reservations.
pub async fn list_reservations(
    State(state): State<AppState>,
    caller: CallerEmail,
) -> Result<Json<Vec<ReservationRecord>>, AppError> {
    found_or_404(state.reservations.list_own(caller.as_deref()).await?)
}

/// Every reservation for the administrator; the caller's own otherwise.
pub async fn list_all_reservations(
    State(state): State<AppState>,
    caller: CallerEmail,
) -> Result<Json<Vec<ReservationRecord>>, AppError> {
    found_or_404(state.reservations.list_all(caller.as_deref()).await?)
}

/// Delete a reservation by id.
///
/// Answers `200 OK` whether or not the id matched a reservation.
pub async fn cancel_reservation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.reservations.delete(&id).await?;

    Ok(Json(MessageResponse {
        message: "Reservation cancelled successfully".to_string(),
    }))
}

/// Replace the status of a reservation and return the updated record.
///
/// ```bash
/// curl -X PUT http://localhost:8080/update/660e8400-e29b-41d4-a716-446655440001 \
///   -H "email: ada@x.com" \
///   -H "Content-Type: application/json" \
///   -d '{"status":"Confirmed"}'
/// ```
pub async fn update_reservation(
    State(state): State<AppState>,
    caller: CallerEmail,
    Path(id): Path<String>,
    payload: Result<Json<StatusPayload>, JsonRejection>,
) -> Result<Json<ReservationRecord>, AppError> {
    let Json(payload) = payload?;
    let updated = state
        .reservations
        .update_status(caller.as_deref(), &id, payload)
        .await?;

    Ok(Json(updated))
}
