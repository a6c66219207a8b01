use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use std::env;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fed_liquidity_backend::jobs::fed_weekly_sync::start_fed_weekly_sync_job;
use fed_liquidity_backend::jobs::repo_rates_sync::start_repo_rates_sync_job;
use fed_liquidity_backend::services::fred::{self, FredService};
use fed_liquidity_backend::services::nyfed::{self, NyFedService};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,fed_liquidity_backend=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Connect to database
    let database_url = env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://fed_liquidity.db?mode=rwc".to_string());
    tracing::info!("Connecting to database...");
    let db = Database::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    // Run migrations
    tracing::info!("Running migrations...");
    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let nyfed = NyFedService::new(
        env::var("NYFED_BASE_URL").unwrap_or_else(|_| nyfed::DEFAULT_BASE_URL.to_string()),
    );
    let fred = FredService::from_env(
        env::var("FRED_BASE_URL").unwrap_or_else(|_| fred::DEFAULT_BASE_URL.to_string()),
    );

    start_repo_rates_sync_job(db.clone(), nyfed).await;

    if fred.has_api_key() {
        start_fed_weekly_sync_job(db, fred).await;
    } else {
        tracing::warn!(
            "{} not set; weekly Fed sync disabled. \
             Get a free key at https://fred.stlouisfed.org/docs/api/api_key.html",
            fred::API_KEY_VAR
        );
    }

    tracing::info!("Sync jobs started, press Ctrl-C to stop");

    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");

    tracing::info!("Shutting down");
}
