//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, worker spawning, and Axum server lifecycle.

use crate::application::services::{AnalyticsService, ClickService, ShortenerService};
use crate::config::Config;
use crate::domain::account_worker::run_account_worker;
use crate::domain::click_worker::run_click_worker;
use crate::domain::repositories::{AccountRepository, UrlRepository};
use crate::infrastructure::persistence::{PgAccountRepository, PgUrlRepository};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Migrations
/// - Background click and account workers
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Migrations applied");

    let pool = Arc::new(pool);
    let url_repository: Arc<dyn UrlRepository> = Arc::new(PgUrlRepository::new(pool.clone()));
    let account_repository: Arc<dyn AccountRepository> =
        Arc::new(PgAccountRepository::new(pool.clone()));

    let (click_tx, click_rx) = mpsc::channel(config.click_queue_capacity);
    let (account_tx, account_rx) = mpsc::channel(config.account_queue_capacity);

    let click_service = Arc::new(ClickService::new(
        url_repository.clone(),
        account_tx.clone(),
    ));
    tokio::spawn(run_click_worker(click_rx, click_service));
    tokio::spawn(run_account_worker(account_rx, account_repository));
    tracing::info!("Background workers started");

    let state = AppState {
        shortener_service: Arc::new(ShortenerService::new(
            url_repository.clone(),
            account_tx,
            config.base_url.clone(),
        )),
        analytics_service: Arc::new(AnalyticsService::new(url_repository)),
        click_tx,
    };

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .await?;

    Ok(())
}
