//! Request validation.
//!
//! Pure checks over the plain payloads the HTTP layer deserializes. Nothing in
//! here touches a store: a payload that fails validation never reaches one.
//!
//! Every payload field is optional at the type level so that a missing field
//! is reported as a [`ValidationError`] instead of a deserialization failure.
//! Numeric fields take either a JSON number or a numeric string (`5` or `"5"`).

use crate::types::{FeedbackDraft, FeedbackKey, NewReservation, Rating, ReservationStatus};
use serde::Deserialize;
use thiserror::Error;

/// Rejected input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// One or more required fields were absent or blank
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// Rating present but outside `1..=5`
    #[error("Rating must be between {} and {}", Rating::MIN, Rating::MAX)]
    RatingOutOfRange(i64),

    /// Guest count present but outside `1..=MAX_GUESTS`
    #[error("Guests must be between 1 and {}", MAX_GUESTS)]
    GuestsOutOfRange(i64),

    /// Numeric field given as text that is not an integer
    #[error("{field} must be a whole number, got {value:?}")]
    NotANumber {
        /// Offending field
        field: &'static str,
        /// Text as received
        value: String,
    },

    /// Caller identity (`email`) absent or blank
    #[error("Email is required to identify the caller")]
    MissingIdentity,

    /// Status outside the known set
    #[error("Invalid status: {0}")]
    InvalidStatus(String),
}

/// Largest accepted party size; the column is a 32-bit signed integer.
pub const MAX_GUESTS: i64 = i32::MAX as i64;

/// An integer sent either as a JSON number or as a string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    /// JSON number
    Int(i64),
    /// JSON string, parsed during validation
    Text(String),
}

impl From<i64> for Numeric {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for Numeric {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Body of `POST /addfeedback`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackPayload {
    /// Customer email
    pub email: Option<String>,
    /// Free-text feedback
    pub feedback: Option<String>,
    /// Star rating
    pub rating: Option<Numeric>,
    /// Menu item name
    pub item_name: Option<String>,
    /// Order identifier
    pub order_id: Option<String>,
}

/// Query of `GET /getfeedbacks` and `DELETE /deletefeedback`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackQuery {
    /// Customer email
    pub email: Option<String>,
    /// Order identifier
    pub order_id: Option<String>,
    /// Menu item name
    pub item_name: Option<String>,
}

/// Body of `POST /reservation`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationPayload {
    /// Guest name
    pub name: Option<String>,
    /// Owning email
    pub email: Option<String>,
    /// Contact phone
    pub phone: Option<String>,
    /// Requested date
    pub date: Option<String>,
    /// Requested time
    pub time: Option<String>,
    /// Party size
    pub guests: Option<Numeric>,
    /// Requested table type
    pub table_type: Option<String>,
    /// Free-text requests
    pub special_requests: Option<String>,
}

/// Body of `PUT /update/:id`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusPayload {
    /// Requested status name
    pub status: Option<String>,
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Collects missing field names while pulling values out of a payload.
#[derive(Default)]
struct Presence {
    missing: Vec<&'static str>,
}

impl Presence {
    fn require(&mut self, field: &'static str, value: Option<String>) -> String {
        if is_blank(value.as_deref()) {
            self.missing.push(field);
            String::new()
        } else {
            value.unwrap_or_default()
        }
    }

    /// A blank string counts as missing; other text must parse as an integer.
    fn require_int(
        &mut self,
        field: &'static str,
        value: Option<Numeric>,
    ) -> Result<Option<i64>, ValidationError> {
        match value {
            Some(Numeric::Int(n)) => Ok(Some(n)),
            Some(Numeric::Text(text)) if !text.trim().is_empty() => text
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| ValidationError::NotANumber { field, value: text }),
            _ => {
                self.missing.push(field);
                Ok(None)
            }
        }
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingFields(self.missing))
        }
    }
}

/// Validate a feedback submission.
///
/// `itemName` is optional here and normalizes to an empty string.
///
/// # Errors
///
/// - [`ValidationError::MissingFields`] when `email`, `feedback`, `orderId`
///   or `rating` is absent or blank
/// - [`ValidationError::NotANumber`] when `rating` is text that is not an integer
/// - [`ValidationError::RatingOutOfRange`] when `rating` is outside `1..=5`
pub fn validate_feedback(payload: FeedbackPayload) -> Result<FeedbackDraft, ValidationError> {
    let mut presence = Presence::default();
    let email = presence.require("email", payload.email);
    let feedback = presence.require("feedback", payload.feedback);
    let order_id = presence.require("orderId", payload.order_id);
    let raw_rating = presence.require_int("rating", payload.rating)?;
    presence.finish()?;

    let raw_rating = raw_rating.unwrap_or_default();
    let rating = Rating::new(raw_rating).ok_or(ValidationError::RatingOutOfRange(raw_rating))?;

    Ok(FeedbackDraft {
        key: FeedbackKey::new(email, payload.item_name.unwrap_or_default(), order_id),
        feedback,
        rating,
    })
}

/// Validate a feedback lookup/delete query.
///
/// # Errors
///
/// Returns [`ValidationError::MissingFields`] when `email`, `orderId` or
/// `itemName` is absent or blank.
pub fn validate_feedback_key(query: FeedbackQuery) -> Result<FeedbackKey, ValidationError> {
    let mut presence = Presence::default();
    let email = presence.require("email", query.email);
    let order_id = presence.require("orderId", query.order_id);
    let item_name = presence.require("itemName", query.item_name);
    presence.finish()?;

    Ok(FeedbackKey::new(email, item_name, order_id))
}

/// Validate a reservation request.
///
/// `phone` and `specialRequests` default to empty strings.
///
/// # Errors
///
/// - [`ValidationError::MissingFields`] when `name`, `email`, `date`, `time`,
///   `guests` or `tableType` is absent or blank
/// - [`ValidationError::NotANumber`] when `guests` is text that is not an integer
/// - [`ValidationError::GuestsOutOfRange`] when `guests` is outside `1..=MAX_GUESTS`
pub fn validate_reservation(payload: ReservationPayload) -> Result<NewReservation, ValidationError> {
    let mut presence = Presence::default();
    let name = presence.require("name", payload.name);
    let email = presence.require("email", payload.email);
    let date = presence.require("date", payload.date);
    let time = presence.require("time", payload.time);
    let raw_guests = presence.require_int("guests", payload.guests)?;
    let table_type = presence.require("tableType", payload.table_type);
    presence.finish()?;

    let raw_guests = raw_guests.unwrap_or_default();
    let guests = u32::try_from(raw_guests)
        .ok()
        .filter(|&n| n >= 1 && i64::from(n) <= MAX_GUESTS)
        .ok_or(ValidationError::GuestsOutOfRange(raw_guests))?;

    Ok(NewReservation {
        name,
        email,
        phone: payload.phone.unwrap_or_default(),
        date,
        time,
        guests,
        table_type,
        special_requests: payload.special_requests.unwrap_or_default(),
    })
}

/// Require a caller identity.
///
/// # Errors
///
/// Returns [`ValidationError::MissingIdentity`] when `email` is absent or blank.
pub fn require_identity(email: Option<&str>) -> Result<String, ValidationError> {
    match email {
        Some(email) if !email.trim().is_empty() => Ok(email.to_string()),
        _ => Err(ValidationError::MissingIdentity),
    }
}

/// Validate a status update body.
///
/// # Errors
///
/// - [`ValidationError::MissingFields`] when `status` is absent or blank
/// - [`ValidationError::InvalidStatus`] when it does not name a
///   [`ReservationStatus`]
pub fn validate_status(payload: StatusPayload) -> Result<ReservationStatus, ValidationError> {
    let mut presence = Presence::default();
    let raw = presence.require("status", payload.status);
    presence.finish()?;

    raw.parse().map_err(|_| ValidationError::InvalidStatus(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn feedback_payload(rating: Option<i64>) -> FeedbackPayload {
        FeedbackPayload {
            email: Some("a@x.com".to_string()),
            feedback: Some("great".to_string()),
            rating: rating.map(Numeric::from),
            item_name: Some("pizza".to_string()),
            order_id: Some("o1".to_string()),
        }
    }

    fn reservation_payload() -> ReservationPayload {
        ReservationPayload {
            name: Some("Ada".to_string()),
            email: Some("ada@x.com".to_string()),
            phone: None,
            date: Some("2026-10-20".to_string()),
            time: Some("19:30".to_string()),
            guests: Some(Numeric::Int(4)),
            table_type: Some("Window".to_string()),
            special_requests: None,
        }
    }

    #[test]
    fn test_valid_feedback() {
        let draft = validate_feedback(feedback_payload(Some(5))).expect("valid");
        assert_eq!(draft.key, FeedbackKey::new("a@x.com", "pizza", "o1"));
        assert_eq!(draft.rating.value(), 5);
        assert_eq!(draft.feedback, "great");
    }

    #[test]
    fn test_feedback_missing_fields_are_listed() {
        let err = validate_feedback(FeedbackPayload::default()).expect_err("invalid");
        assert_eq!(
            err,
            ValidationError::MissingFields(vec!["email", "feedback", "orderId", "rating"])
        );
    }

    #[test]
    fn test_feedback_blank_counts_as_missing() {
        let mut payload = feedback_payload(Some(3));
        payload.feedback = Some("   ".to_string());
        assert_eq!(
            validate_feedback(payload),
            Err(ValidationError::MissingFields(vec!["feedback"]))
        );
    }

    #[test]
    fn test_feedback_item_name_optional() {
        let mut payload = feedback_payload(Some(3));
        payload.item_name = None;
        let draft = validate_feedback(payload).expect("valid");
        assert_eq!(draft.key.item_name, "");
    }

    #[test]
    fn test_feedback_zero_rating_rejected() {
        assert_eq!(
            validate_feedback(feedback_payload(Some(0))),
            Err(ValidationError::RatingOutOfRange(0))
        );
    }

    proptest! {
        #[test]
        fn prop_rating_outside_range_always_rejected(rating in prop_oneof![i64::MIN..1i64, 6i64..i64::MAX]) {
            prop_assert_eq!(
                validate_feedback(feedback_payload(Some(rating))),
                Err(ValidationError::RatingOutOfRange(rating))
            );
        }

        #[test]
        fn prop_rating_inside_range_always_accepted(rating in 1i64..=5) {
            let draft = validate_feedback(feedback_payload(Some(rating)));
            prop_assert!(draft.is_ok());
        }
    }

    #[test]
    fn test_feedback_key_requires_item_name() {
        let query = FeedbackQuery {
            email: Some("a@x.com".to_string()),
            order_id: Some("o1".to_string()),
            item_name: None,
        };
        assert_eq!(
            validate_feedback_key(query),
            Err(ValidationError::MissingFields(vec!["itemName"]))
        );
    }

    #[test]
    fn test_reservation_defaults_optional_fields() {
        let reservation = validate_reservation(reservation_payload()).expect("valid");
        assert_eq!(reservation.phone, "");
        assert_eq!(reservation.special_requests, "");
        assert_eq!(reservation.guests, 4);
    }

    #[test]
    fn test_reservation_missing_fields() {
        let mut payload = reservation_payload();
        payload.table_type = None;
        payload.guests = None;
        assert_eq!(
            validate_reservation(payload),
            Err(ValidationError::MissingFields(vec!["guests", "tableType"]))
        );
    }

    #[test]
    fn test_reservation_zero_guests() {
        let mut payload = reservation_payload();
        payload.guests = Some(Numeric::Int(0));
        assert_eq!(
            validate_reservation(payload),
            Err(ValidationError::GuestsOutOfRange(0))
        );
    }

    #[test]
    fn test_reservation_guests_upper_bound() {
        let mut payload = reservation_payload();
        payload.guests = Some(Numeric::Int(MAX_GUESTS));
        let reservation = validate_reservation(payload).expect("largest storable party");
        assert_eq!(i64::from(reservation.guests), MAX_GUESTS);

        let mut payload = reservation_payload();
        payload.guests = Some(Numeric::Int(3_000_000_000));
        assert_eq!(
            validate_reservation(payload),
            Err(ValidationError::GuestsOutOfRange(3_000_000_000))
        );

        let mut payload = reservation_payload();
        payload.guests = Some(Numeric::Int(-2));
        assert_eq!(
            validate_reservation(payload),
            Err(ValidationError::GuestsOutOfRange(-2))
        );
    }

    #[test]
    fn test_numeric_strings_accepted() {
        let mut payload = feedback_payload(None);
        payload.rating = Some(Numeric::from(" 5 "));
        assert_eq!(validate_feedback(payload).expect("valid").rating.value(), 5);

        let mut payload = reservation_payload();
        payload.guests = Some(Numeric::from("4"));
        assert_eq!(validate_reservation(payload).expect("valid").guests, 4);
    }

    #[test]
    fn test_non_numeric_strings_rejected() {
        let mut payload = feedback_payload(None);
        payload.rating = Some(Numeric::from("five"));
        assert_eq!(
            validate_feedback(payload),
            Err(ValidationError::NotANumber {
                field: "rating",
                value: "five".to_string()
            })
        );

        let mut payload = reservation_payload();
        payload.guests = Some(Numeric::from(""));
        assert_eq!(
            validate_reservation(payload),
            Err(ValidationError::MissingFields(vec!["guests"]))
        );
    }

    #[test]
    fn test_numeric_deserializes_from_number_or_string() {
        let payload: ReservationPayload =
            serde_json::from_str(r#"{"guests": "4"}"#).expect("string form");
        assert_eq!(payload.guests, Some(Numeric::Text("4".to_string())));

        let payload: FeedbackPayload =
            serde_json::from_str(r#"{"rating": 3}"#).expect("number form");
        assert_eq!(payload.rating, Some(Numeric::Int(3)));
    }

    #[test]
    fn test_require_identity() {
        assert_eq!(require_identity(Some("a@x.com")), Ok("a@x.com".to_string()));
        assert_eq!(require_identity(Some(" ")), Err(ValidationError::MissingIdentity));
        assert_eq!(require_identity(None), Err(ValidationError::MissingIdentity));
    }

    #[test]
    fn test_validate_status() {
        let ok = validate_status(StatusPayload {
            status: Some("Completed".to_string()),
        });
        assert_eq!(ok, Ok(ReservationStatus::Completed));

        let bad = validate_status(StatusPayload {
            status: Some("Launched".to_string()),
        });
        assert_eq!(bad, Err(ValidationError::InvalidStatus("Launched".to_string())));

        assert_eq!(
            validate_status(StatusPayload::default()),
            Err(ValidationError::MissingFields(vec!["status"]))
        );
    }
}
