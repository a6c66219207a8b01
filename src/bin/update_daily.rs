//! Scheduled daily update: fetch the last N days of repo market data from the
//! NY Fed and upsert them.
//!
//! Cron (daily at 10 AM ET):
//!   0 10 * * * update_daily

use chrono::{Duration, Utc};
use clap::Parser;
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use std::env;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use fed_liquidity_backend::services::nyfed::{self, NyFedService};
use fed_liquidity_backend::services::repo_rates::upsert_repo_rates;

#[derive(Parser, Debug)]
#[command(about = "Update the database with recent daily repo rates")]
struct Args {
    /// Number of days to look back
    #[arg(long, default_value_t = 7)]
    days: i64,

    /// Log every inserted/updated record instead of summaries only
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Connect to database
    let database_url = env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://fed_liquidity.db?mode=rwc".to_string());
    let db = Database::connect(&database_url).await?;
    migration::Migrator::up(&db, None).await?;

    let nyfed = NyFedService::new(
        env::var("NYFED_BASE_URL").unwrap_or_else(|_| nyfed::DEFAULT_BASE_URL.to_string()),
    );

    let end_date = Utc::now().date_naive();
    let start_date = end_date - Duration::days(args.days);

    tracing::info!("Fetching last {} days from NY Fed...", args.days);
    let records = nyfed.fetch_repo_rates(start_date, end_date).await;

    if records.is_empty() {
        tracing::error!("No data fetched");
        std::process::exit(1);
    }

    let counts = upsert_repo_rates(&db, &records, args.verbose).await?;

    tracing::info!(
        "Update complete: {} inserted, {} updated, {} total",
        counts.inserted,
        counts.updated,
        counts.total()
    );

    Ok(())
}
