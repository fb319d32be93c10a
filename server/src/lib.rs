//! Bistro server library: configuration, metrics and application wiring.
//!
//! The `bistro` binary is a thin shell over these modules so the wiring can
//! be tested without binding sockets.

pub mod app;
pub mod config;
pub mod metrics;

pub use app::{build_app, build_state, connect_pool};
pub use config::Config;
