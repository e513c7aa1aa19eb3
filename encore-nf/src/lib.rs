//! encore-nf library interface
//!
//! Exposes the service internals for integration testing.

pub mod api;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod types;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::Mutex;

use encore_common::Config;
use services::{CatalogClient, TokenProvider, WebhookChannel};

/// Application state shared across handlers and the scheduler
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Resolved service configuration
    pub config: Arc<Config>,
    /// Catalog access token provider
    pub tokens: Arc<TokenProvider>,
    /// Catalog client (releases + artist search)
    pub catalog: Arc<CatalogClient>,
    /// Outbound messaging channel
    pub channel: Arc<WebhookChannel>,
    /// Single-flight lock: at most one workflow run at a time
    pub run_lock: Arc<Mutex<()>>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, config: Config) -> anyhow::Result<Self> {
        let tokens = TokenProvider::new(&config.catalog)
            .map_err(|e| anyhow::anyhow!("token provider init: {e}"))?;
        let catalog = CatalogClient::new(&config.catalog)
            .map_err(|e| anyhow::anyhow!("catalog client init: {e}"))?;
        let channel = WebhookChannel::new(&config.notifier)
            .map_err(|e| anyhow::anyhow!("webhook channel init: {e}"))?;

        Ok(Self {
            db,
            config: Arc::new(config),
            tokens: Arc::new(tokens),
            catalog: Arc::new(catalog),
            channel: Arc::new(channel),
            run_lock: Arc::new(Mutex::new(())),
            startup_time: Utc::now(),
        })
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::token_routes())
        .merge(api::artist_routes())
        .merge(api::workflow_routes())
        .merge(api::health_routes())
        .with_state(state)
}
