mod api;
mod middleware;

use anyhow::Context;
use salesdash_core::{Environment, FilterDefaults};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::{BearerAuth, RateLimiter},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = salesdash_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(env = %config.env, data_path = %config.data_path.display(), "starting salesdash-server");

    let (dataset, missing) = salesdash_analytics::load_with_missing_report(&config.data_path)
        .with_context(|| format!("loading orders from {}", config.data_path.display()))?;
    let state = AppState::new(dataset, FilterDefaults::from_app_config(&config), missing);

    let auth = BearerAuth::from_keys(
        &config.api_keys,
        matches!(config.env, Environment::Development),
    )?;
    let app = build_app(
        state,
        auth,
        RateLimiter::per_minute(config.rate_limit_per_minute),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
