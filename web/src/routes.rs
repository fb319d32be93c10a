//! Router configuration.

use crate::handlers::{feedback, health::health_check, reservations};
use crate::middleware::correlation_id_layer;
use crate::state::AppState;
use axum::{
    Router,
    http::{HeaderValue, Method, header::InvalidHeaderValue},
    routing::{delete, get, post, put},
};
use tower_http::cors::{AllowHeaders, CorsLayer};

/// Build the complete Axum router.
///
/// Paths match what the existing web client calls, so they are not grouped
/// under a common prefix.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Feedback
        .route("/addfeedback", post(feedback::add_feedback))
        .route("/getfeedbacks", get(feedback::get_feedback))
        .route("/deletefeedback", delete(feedback::delete_feedback))
        .route("/admin/feedbacks", get(feedback::admin_feedbacks))
        .route("/item/:item_name", get(feedback::item_reviews))
        // Reservations
        .route("/reservation", post(reservations::create_reservation))
        .route("/reservations", get(reservations::list_reservations))
        .route("/reservations/:id", delete(reservations::cancel_reservation))
        .route("/allreservations", get(reservations::list_all_reservations))
        .route("/update/:id", put(reservations::update_reservation))
        .layer(correlation_id_layer())
        .with_state(state)
}

/// CORS policy admitting a single browser origin.
///
/// # Errors
///
/// Returns an error if `origin` is not a valid header value.
pub fn cors_layer(origin: &str) -> Result<CorsLayer, InvalidHeaderValue> {
    Ok(CorsLayer::new()
        .allow_origin(HeaderValue::from_str(origin)?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(AllowHeaders::mirror_request()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_rejects_invalid_origin() {
        assert!(cors_layer("http://localhost:5173").is_ok());
        assert!(cors_layer("bad\norigin").is_err());
    }
}
