// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::time::Duration;

use axum_server::tls_rustls::RustlsConfig;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use blockchain_updates_monitor::{
    api::router,
    config::{ConfigError, LogFormat, ServiceConfig, DEFAULT_LOG_FILTER},
    state::AppState,
    sweeper::UpdatesSweeper,
};

/// How long in-flight requests get to finish once shutdown starts.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TLS crypto provider already installed")]
    CryptoProvider,
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
    }
}

#[tokio::main]
async fn main() {
    let config = match ServiceConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(LogFormat::default());
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };
    init_tracing(config.log_format);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Blockchain updates monitor failed");
        std::process::exit(1);
    }
}

async fn run(config: ServiceConfig) -> Result<(), StartupError> {
    let addr = config.bind_addr()?;
    let state = AppState::default();
    let app = router(state.clone());

    let shutdown = CancellationToken::new();
    let sweeper = UpdatesSweeper::new(state).with_interval(config.sweep_interval);
    let sweeper_task = tokio::spawn(sweeper.run(shutdown.clone()));

    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Shutdown signal received");
                    shutdown.cancel();
                }
                Err(e) => {
                    tracing::error!(error = %e, "Unable to listen for shutdown signal");
                }
            }
        }
    });

    match &config.tls {
        Some(tls) => {
            // Install the ring crypto provider for rustls (must be done before any TLS operations)
            rustls::crypto::ring::default_provider()
                .install_default()
                .map_err(|_| StartupError::CryptoProvider)?;

            let tls_config = RustlsConfig::from_pem_file(&tls.cert, &tls.key).await?;
            let handle = axum_server::Handle::new();

            tokio::spawn({
                let handle = handle.clone();
                let shutdown = shutdown.clone();
                async move {
                    shutdown.cancelled().await;
                    handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
                }
            });

            tracing::info!(%addr, "Blockchain updates monitor listening on https (docs at /docs)");
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            tracing::info!(%addr, "Blockchain updates monitor listening on http (docs at /docs)");
            axum::serve(listener, app)
                .with_graceful_shutdown({
                    let shutdown = shutdown.clone();
                    async move { shutdown.cancelled().await }
                })
                .await?;
        }
    }

    shutdown.cancel();
    if let Err(e) = sweeper_task.await {
        tracing::warn!(error = %e, "Update sweeper task ended abnormally");
    }
    Ok(())
}
