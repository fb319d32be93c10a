//! Bistro HTTP server.
//!
//! Loads configuration from the environment (and `.env` when present),
//! connects to `PostgreSQL`, applies migrations and serves the feedback and
//! reservation API until Ctrl+C or SIGTERM.

use bistro_server::{Config, build_app, build_state, connect_pool};
use std::time::Duration;
use tokio::signal;
use tokio::sync::oneshot;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Missing .env is fine; the environment may already be populated
    let _ = dotenvy::dotenv();

    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Bistro HTTP Server");
    info!(
        database = %config.database.redacted_url(),
        admin_email = %config.access.admin_email,
        metrics_enabled = config.metrics.enabled,
        "Configuration loaded"
    );

    info!("Connecting to database...");
    let pool = connect_pool(&config.database).await?;
    info!("Database connected");

    if config.database.run_migrations {
        bistro_postgres::migrate(&pool).await?;
        info!("Migrations applied");
    }

    if config.metrics.enabled {
        bistro_server::metrics::install(config.metrics_addr()?)?;
    }

    let state = build_state(&pool, &config);
    let app = build_app(state, &config)?;

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    let (signalled_tx, signalled_rx) = oneshot::channel();
    let mut server = tokio::spawn(
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown_signal().await;
                let _ = signalled_tx.send(());
            })
            .into_future(),
    );

    tokio::select! {
        joined = &mut server => joined??,
        Ok(()) = signalled_rx => {
            let drain = Duration::from_secs(config.server.shutdown_timeout);
            match tokio::time::timeout(drain, &mut server).await {
                Ok(joined) => joined??,
                Err(_) => {
                    warn!(timeout_secs = drain.as_secs(), "In-flight requests did not drain in time");
                    server.abort();
                }
            }
        }
    }

    pool.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
