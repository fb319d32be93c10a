//! Application state for Axum handlers.

use bistro_core::{FeedbackManager, ReservationManager};

/// Application state shared across all HTTP handlers.
///
/// Both managers are cheap to clone, so the state is passed by value.
#[derive(Clone)]
pub struct AppState {
    /// Feedback operations
    pub feedback: FeedbackManager,
    /// Reservation operations
    pub reservations: ReservationManager,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub const fn new(feedback: FeedbackManager, reservations: ReservationManager) -> Self {
        Self {
            feedback,
            reservations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_is_clone() {
        // Axum requires Clone state
        fn assert_clone<T: Clone + Send + Sync + 'static>() {}
        assert_clone::<AppState>();
    }
}
