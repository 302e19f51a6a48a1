//! Keygate - short-lived access key server

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use keygate::{
    cli::Args,
    server::{self, AppState},
    Clock, KeyService, KeyStore, SystemClock,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("keygate={},info", args.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match args.to_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    info!("Listen: {}", args.listen);
    info!("Key length: {}", config.key_length);
    info!("Key TTL: {}s", config.key_ttl.as_secs());
    info!("Sweep interval: {}s", config.sweep_interval.as_secs());
    match config.max_records {
        Some(limit) => info!("Max records: {}", limit),
        None => info!("Max records: unbounded"),
    }
    if config.legacy_keys.is_empty() {
        info!("Legacy allow-list endpoint: disabled");
    } else {
        info!(
            "Legacy allow-list endpoint: enabled ({} keys)",
            config.legacy_keys.len()
        );
    }

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store = KeyStore::from_config(&config);
    let sweeper = store.spawn_sweeper(config.sweep_interval, Arc::clone(&clock))?;

    let service = KeyService::from_parts(
        store,
        &config,
        clock,
        Arc::new(keygate::RandomKeyGenerator),
    )?;
    let state = AppState::new(service, &config);

    let listener = tokio::net::TcpListener::bind(args.listen).await?;
    server::serve(listener, state, shutdown_signal()).await?;

    sweeper.shutdown().await;
    info!("Keygate stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
            // Keep serving; the process can still be killed.
            std::future::pending::<()>().await
        }
    }
}
