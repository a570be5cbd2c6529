//! Warranty Management System server
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt};

use wms_api::AppState;
use wms_core::config::AppConfig;
use wms_database::connection::DatabasePool;
use wms_database::migration::run_migrations;
use wms_worker::{CronScheduler, ExpiryJob};

#[tokio::main]
async fn main() {
    let env = std::env::var("WMS_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!("Configuration loaded (env: {})", env);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {:#}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    if config.logging.is_json() {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .pretty()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

/// Main server run function
async fn run(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!("Starting WMS v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database ─────────────────────────────────────────
    let db = DatabasePool::connect(&config.database)
        .await
        .context("Database connection failed")?;
    run_migrations(db.pool())
        .await
        .context("Database migration failed")?;

    // ── Step 2: Services ─────────────────────────────────────────
    let state = AppState::build(config.clone(), db.pool().clone())
        .context("Failed to initialize services")?;

    // ── Step 3: Background scheduler ─────────────────────────────
    let mut scheduler = if config.worker.enabled {
        let scheduler = CronScheduler::new().await?;
        let job = Arc::new(ExpiryJob::new(Arc::clone(&state.expiry_sweep)));
        scheduler.register_expiry(&config.worker, job).await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Background worker disabled");
        None
    };

    // ── Step 4: HTTP server ──────────────────────────────────────
    let app = wms_api::build_app(state);

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("WMS server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
        })
        .await
        .context("Server error")?;

    // ── Step 5: Drain background work ────────────────────────────
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);

    if let Some(scheduler) = scheduler.as_mut() {
        match tokio::time::timeout(grace, scheduler.shutdown()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!("Scheduler shutdown failed: {}", e),
            Err(_) => tracing::warn!("Scheduler did not stop within {}s", grace.as_secs()),
        }
    }

    db.close().await;

    tracing::info!("WMS server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
