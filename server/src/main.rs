//! Pinggate Server - Main Entry Point

use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info, warn};

use pinggate_server::{api, config, kv, ratelimit};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pinggate_server=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env()?;
    let rate_limit = ratelimit::RateLimitConfig::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Pinggate Server"
    );

    // Initialize the shared store
    let store: kv::SharedKv = if config.uses_memory_store() {
        warn!("Using in-process store; admission state is not shared between instances");
        Arc::new(kv::MemoryStore::new())
    } else {
        let redis = kv::create_redis_client(&config.redis_url).await?;
        Arc::new(kv::RedisStore::new(redis, config.kv_timeout()))
    };

    info!(
        gate_capacity = rate_limit.gate.capacity,
        gate_mode = %rate_limit.gate.mode,
        user_requests = rate_limit.user_limit.requests,
        user_window_secs = rate_limit.user_limit.window_secs,
        "Admission control configured"
    );

    // Build application state
    let state = api::AppState::new(store, config.clone(), rate_limit);

    // Build router
    let app = api::create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!(address = %config.bind_address, "Server listening");

    // Graceful shutdown handler
    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
        info!("Received shutdown signal, draining in-flight requests...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shutdown complete");

    Ok(())
}
