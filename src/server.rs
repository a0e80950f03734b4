//! HTTP server initialization and runtime setup.
//!
//! Handles database and Redis connections, service wiring, and the Axum
//! server lifecycle.

use crate::application::services::{DynResolveService, DynShortenService};
use crate::config::{Config, mask_connection_string};
use crate::domain::repositories::{IdCounter, UrlRepository};
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::connection;
use crate::infrastructure::counter::RedisCounter;
use crate::infrastructure::persistence::PgUrlRepository;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use redis::aio::ConnectionManager;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Shortcode encoder
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Redis counter and cache (or NullCache when caching is disabled)
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - Encoder settings are invalid
/// - Database or Redis connection fails after all startup attempts
/// - Migrations fail
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let encoder = Arc::new(
        config
            .build_encoder()
            .context("Failed to build shortcode encoder")?,
    );

    let pool = connect_database(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations applied");

    let redis = connect_redis(&config).await?;

    let counter: Arc<dyn IdCounter> =
        Arc::new(RedisCounter::new(redis.clone(), config.counter_key.as_str()));

    let cache: Arc<dyn CacheService> = if config.cache_enabled {
        tracing::info!("Cache enabled (Redis)");
        Arc::new(RedisCache::new(redis))
    } else {
        tracing::info!("Cache disabled (NullCache)");
        Arc::new(NullCache::new())
    };

    let repository: Arc<dyn UrlRepository> = Arc::new(PgUrlRepository::new(Arc::new(pool)));

    let shorten_service: Arc<DynShortenService> = Arc::new(DynShortenService::new(
        counter,
        repository.clone(),
        encoder,
        config.base_url.as_str(),
        config.collision_retry_limit,
    ));
    let resolve_service: Arc<DynResolveService> = Arc::new(DynResolveService::new(
        repository.clone(),
        cache.clone(),
        config.cache_ttl(),
    ));

    let state = AppState::new(shorten_service, resolve_service, repository, cache);

    let app = app_router(state, config.router_options());

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");

    Ok(())
}

/// Backoff for startup connections: 200ms, 400ms, 800ms... capped at 5s, jittered.
fn startup_backoff(attempts: usize) -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(2)
        .factor(100)
        .max_delay(Duration::from_secs(5))
        .map(jitter)
        .take(attempts.saturating_sub(1))
}

async fn connect_database(config: &Config) -> Result<PgPool> {
    let options = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime));

    Retry::spawn(startup_backoff(config.startup_retries), || {
        let options = options.clone();
        async move {
            options
                .connect(&config.database_url)
                .await
                .inspect_err(|e| tracing::warn!(error = %e, "Database connection attempt failed"))
        }
    })
    .await
    .with_context(|| {
        format!(
            "Failed to connect to database at {}",
            mask_connection_string(&config.database_url)
        )
    })
}

async fn connect_redis(config: &Config) -> Result<ConnectionManager> {
    Retry::spawn(startup_backoff(config.startup_retries), || async {
        connection::connect(&config.redis_url)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Redis connection attempt failed"))
    })
    .await
    .with_context(|| {
        format!(
            "Failed to connect to Redis at {}",
            mask_connection_string(&config.redis_url)
        )
    })
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
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
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
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

    tracing::info!("Shutdown signal received, draining connections");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_backoff_attempt_count() {
        assert_eq!(startup_backoff(5).count(), 4);
        assert_eq!(startup_backoff(1).count(), 0);
    }

    #[test]
    fn test_startup_backoff_is_capped() {
        assert!(startup_backoff(20).all(|d| d <= Duration::from_secs(5)));
    }
}
