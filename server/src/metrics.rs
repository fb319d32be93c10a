//! Prometheus metrics exporter.
//!
//! The managers record counters through the `metrics` facade; this module
//! describes them and installs the Prometheus recorder with its own HTTP
//! listener.
//!
//! | Metric | Labels |
//! |--------|--------|
//! | `bistro_feedback_upserts_total` | `outcome` |
//! | `bistro_reservations_created_total` | |
//! | `bistro_reservation_status_updates_total` | `status` |
//! | `bistro_authorization_denied_total` | `operation` |

use metrics::describe_counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use thiserror::Error;

/// Errors from metrics setup.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build or install the exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Install the Prometheus recorder and serve `/metrics` on `addr`.
///
/// Must be called from within the Tokio runtime, at most once per process.
///
/// # Errors
///
/// Returns [`MetricsError::Install`] if a recorder is already installed or
/// the listener cannot be set up.
pub fn install(addr: SocketAddr) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| MetricsError::Install(e.to_string()))?;

    register_metrics();
    tracing::info!(addr = %addr, "Metrics available at http://{addr}/metrics");
    Ok(())
}

fn register_metrics() {
    describe_counter!(
        "bistro_feedback_upserts_total",
        "Feedback submissions stored, by whether they created or updated a record"
    );
    describe_counter!(
        "bistro_reservations_created_total",
        "Reservations created"
    );
    describe_counter!(
        "bistro_reservation_status_updates_total",
        "Reservation status changes, by the new status"
    );
    describe_counter!(
        "bistro_authorization_denied_total",
        "Requests refused because the caller lacked the required scope"
    );
}
