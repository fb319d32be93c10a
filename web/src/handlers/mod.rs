//! HTTP request handlers.
//!
//! This module contains all HTTP handlers organized by domain.

pub mod feedback;
pub mod health;
pub mod reservations;

pub use health::health_check;
