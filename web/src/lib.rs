//! Axum HTTP layer for the Bistro backend.
//!
//! Handlers are thin: they extract the request, call a manager from
//! `bistro-core`, and map the outcome to a status code and JSON body.
//!
//! # Request Flow
//!
//! 1. **Correlation middleware** tags the request with an id and opens a span
//! 2. **Extractors** pull the JSON body, query, path and `email` header
//! 3. **Manager** validates, authorizes and persists
//! 4. **`AppError`** maps failures to 400 / 403 / 404 / 500
//!
//! # Example
//!
//! ```ignore
//! use bistro_web::{AppState, build_router};
//!
//! let app = build_router(AppState::new(feedback_manager, reservation_manager));
//! axum::serve(listener, app).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

// Re-export key types for convenience
pub use error::AppError;
pub use extractors::{CallerEmail, EMAIL_HEADER};
pub use middleware::{CORRELATION_ID_HEADER, CorrelationId, correlation_id_layer};
pub use routes::{build_router, cors_layer};
pub use state::AppState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
