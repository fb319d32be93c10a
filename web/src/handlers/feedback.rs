//! Feedback endpoints.
//!
//! - `POST /addfeedback` - create or update feedback for an order item
//! - `GET /getfeedbacks` - look up feedback by `email`, `orderId`, `itemName`
//! - `DELETE /deletefeedback` - delete feedback by the same key
//! - `GET /admin/feedbacks` - every feedback record (administrator only)
//! - `GET /item/:itemName` - reviews of one item with reviewer names

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bistro_core::{FeedbackPayload, FeedbackQuery, FeedbackRecord, ItemReviews, UpsertOutcome};
use serde::{Deserialize, Serialize};

/// Plain `{ "message": ... }` body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Message for the user
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

/// Response after submitting feedback.
#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    /// Message for the user
    pub message: String,
    /// The stored record
    pub feedback: FeedbackRecord,
}

/// Query of the administrator listing.
#[derive(Debug, Deserialize)]
pub struct AdminQuery {
    /// Caller identity
    pub email: Option<String>,
}

/// Create or update feedback.
///
/// Responds `201 Created` the first time a key is seen and `200 OK` when the
/// existing record was overwritten.
///
/// ```bash
/// curl -X POST http://localhost:8080/addfeedback \
///   -H "Content-Type: application/json" \
///   -d '{"email":"a@x.com","feedback":"great","rating":5,"itemName":"pizza","orderId":"o1"}'
/// ```
pub async fn add_feedback(
    State(state): State<AppState>,
    payload: Result<Json<FeedbackPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<FeedbackResponse>), AppError> {
    let Json(payload) = payload?;
    let upserted = state.feedback.upsert(payload).await?;

    let (status, message) = match upserted.outcome {
        UpsertOutcome::Created => (StatusCode::CREATED, "Feedback added successfully!"),
        UpsertOutcome::Updated => (StatusCode::OK, "Feedback updated successfully!"),
    };

    Ok((
        status,
        Json(FeedbackResponse {
            message: message.to_string(),
            feedback: upserted.record,
        }),
    ))
}

/// Look up feedback for one order item.
///
/// Absence is not an error: the response is `200 OK` with a message.
pub async fn get_feedback(
    State(state): State<AppState>,
    query: Result<Query<FeedbackQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(query) = query?;

    let response = match state.feedback.lookup(query).await? {
        Some(record) => Json(record).into_response(),
        None => MessageResponse::new("No feedback found for this order and item!").into_response(),
    };

    Ok(response)
}

/// Delete feedback for one order item.
pub async fn delete_feedback(
    State(state): State<AppState>,
    query: Result<Query<FeedbackQuery>, QueryRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Query(query) = query?;

    if state.feedback.delete(query).await? {
        Ok(MessageResponse::new("Feedback deleted successfully!"))
    } else {
        Err(AppError::not_found("No feedback found to delete!"))
    }
}

/// List every feedback record.
///
/// Only the administrator (`?email=<admin>`) is served; everyone else gets
/// `403 Forbidden`.
pub async fn admin_feedbacks(
    State(state): State<AppState>,
    query: Result<Query<AdminQuery>, QueryRejection>,
) -> Result<Json<Vec<FeedbackRecord>>, AppError> {
    let Query(query) = query?;
    let records = state.feedback.list_all(query.email.as_deref()).await?;
    Ok(Json(records))
}

/// Reviews of one menu item and their mean rating.
///
/// ```json
/// {
///   "reviews": [{ "_id": "...", "rating": 5, "username": "alice", ... }],
///   "averageRating": 5.0
/// }
/// ```
pub async fn item_reviews(
    State(state): State<AppState>,
    Path(item_name): Path<String>,
) -> Result<Json<ItemReviews>, AppError> {
    let reviews = state.feedback.aggregate_by_item(&item_name).await?;
    Ok(Json(reviews))
}
