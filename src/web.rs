use anyhow::{Context, Result};
use axum::{Router, routing::get};
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::actions;

pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Build the shared connection pool. Each component holds a connection only
/// for the duration of its own transaction.
pub fn create_pool(database_url: &str) -> Result<PgPool> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .max_size(10)
        .build(manager)
        .context("failed to create database connection pool")
}

/// App state shared across dashboard requests.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}

/// The read-only dashboard surface. No mutating route exists across this
/// boundary; concurrent requests share the pool with no locking beyond what
/// Postgres provides for reads.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(actions::health))
        .route("/data/flights", get(actions::get_flights))
        .route("/data/stats", get(actions::get_stats))
        .route("/data/metrics", get(actions::get_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(pool: PgPool, listen: &str) -> Result<()> {
    let app = create_router(AppState { pool });

    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .with_context(|| format!("failed to bind {listen}"))?;
    info!("Query layer listening on {}", listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutdown signal received");
        })
        .await
        .context("server error")
}
