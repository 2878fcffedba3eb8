// ABOUTME: Chart2Fit server binary
// ABOUTME: Wires configuration, storage, auth and the router, then serves HTTP
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use anyhow::Result;
use chart2fit::auth::AuthManager;
use chart2fit::config::ServerConfig;
use chart2fit::database::Database;
use chart2fit::logging;
use chart2fit::routes::{self, ServerResources};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_from_env()?;

    let config = ServerConfig::from_env()?;
    let database = Database::new(&config.database_url).await?;
    info!(database.url = %config.database_url, "database ready");

    let auth = AuthManager::new(config.jwt_secret.clone(), config.jwt_expiry_hours);
    let http_port = config.http_port;

    let resources = Arc::new(ServerResources {
        database,
        auth,
        config,
    });

    let app = routes::router(resources);
    let listener = TcpListener::bind(("0.0.0.0", http_port)).await?;
    info!(port = http_port, "Chart2Fit server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Chart2Fit server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    info!("shutdown signal received");
}
