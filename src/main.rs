// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use couple_space_server::{
    api::router,
    auth::{BcryptHasher, ExemptRoutes, SigningKey},
    config::{AppConfig, LogFormat},
    state::AppState,
    storage::Database,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
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
                warn!(error = %e, "Failed to listen for SIGTERM");
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

    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env().expect("Invalid configuration");
    init_tracing(config.log_format);

    let key = match config.jwt_secret.as_deref() {
        Some(secret) => SigningKey::from_secret(secret.as_bytes()).expect("Invalid JWT_SECRET"),
        None => {
            warn!("JWT_SECRET not set; using a random key, tokens will not survive a restart");
            SigningKey::generate().expect("Failed to generate signing key")
        }
    };

    let db = Database::open_in(&config.data_dir).expect("Failed to open database");
    info!(data_dir = %config.data_dir.display(), "Database opened");

    let hasher = BcryptHasher::new(config.bcrypt_cost);
    info!(bcrypt_cost = hasher.cost(), "Password hasher ready");

    let state = AppState::new(
        Arc::new(db),
        Arc::new(key),
        Arc::new(hasher),
        ExemptRoutes::with_public(&config.public_paths),
    );
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind listener");

    info!(addr = %config.bind_addr, "Couple Space server listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server failed");
}
