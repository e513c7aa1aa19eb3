//! encore-nf - Artist release notifier service
//!
//! Hosts the artist-list HTTP API and the weekly notification workflow:
//! scan monitored artists, check the music catalog for each artist's latest
//! release, persist the delta, and publish a message to the outbound
//! channel.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use encore_nf::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    info!("Starting encore-nf (release notifier)");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = encore_common::Config::load(None)?;

    let db_pool = encore_common::db::init_database(&config.database.path).await?;
    info!("Database connection established");

    let bind_addr = config.http.bind_addr.clone();
    let schedule_enabled = config.schedule.enabled;

    let state = AppState::new(db_pool, config)?;

    if schedule_enabled {
        info!(
            "Weekly schedule: {} at {:02}:00 UTC",
            state.config.schedule.weekday, state.config.schedule.hour
        );
        tokio::spawn(encore_nf::services::scheduler::run_scheduler(state.clone()));
    } else {
        info!("Scheduled trigger disabled; workflow runs only via POST /workflow/run");
    }

    let app = encore_nf::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Listening on http://{bind_addr}");
    info!("Health check: http://{bind_addr}/health");

    axum::serve(listener, app).await?;

    Ok(())
}
