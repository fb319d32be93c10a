//! Wiring: database pool, stores, managers and router.

use crate::config::{Config, DatabaseConfig};
use axum::Router;
use bistro_core::{AdminEmail, FeedbackManager, ReservationManager, SystemClock};
use bistro_postgres::{PgFeedbackStore, PgReservationStore, PgUserDirectory};
use bistro_web::{AppState, build_router, cors_layer};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;

/// Open the connection pool described by `config`.
///
/// # Errors
///
/// Returns an error if no connection can be established within the
/// configured timeout.
pub async fn connect_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout))
        .connect(&config.url)
        .await
}

/// Build the managers over `PostgreSQL` stores sharing one pool.
#[must_use]
pub fn build_state(pool: &PgPool, config: &Config) -> AppState {
    let access = Arc::new(AdminEmail::new(config.access.admin_email.clone()));
    let clock = Arc::new(SystemClock);

    let feedback = FeedbackManager::new(
        Arc::new(PgFeedbackStore::new(pool.clone())),
        Arc::new(PgUserDirectory::new(pool.clone())),
        access.clone(),
        clock.clone(),
    );
    let reservations = ReservationManager::new(
        Arc::new(PgReservationStore::new(pool.clone())),
        access,
        clock,
    );

    AppState::new(feedback, reservations)
}

/// The full HTTP application, including CORS when an origin is configured.
///
/// # Errors
///
/// Returns an error if `CORS_ALLOWED_ORIGIN` is not a valid header value.
pub fn build_app(state: AppState, config: &Config) -> Result<Router, Box<dyn std::error::Error>> {
    let router = build_router(state);

    match config.server.cors_allowed_origin.as_deref() {
        Some(origin) => {
            tracing::info!(origin, "CORS enabled");
            Ok(router.layer(cors_layer(origin)?))
        }
        None => Ok(router),
    }
}
