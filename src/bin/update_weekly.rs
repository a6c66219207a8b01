//! Scheduled weekly update: fetch the last N weeks of Fed balance sheet data
//! from FRED and upsert them.
//!
//! Requires FRED_API_KEY (free key at
//! https://fred.stlouisfed.org/docs/api/api_key.html).
//!
//! Cron (Thursdays at 10 AM ET, after the H.4.1 release):
//!   0 10 * * 4 update_weekly

use chrono::{Duration, Utc};
use clap::Parser;
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use std::env;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use fed_liquidity_backend::services::fed_weekly::upsert_fed_weekly;
use fed_liquidity_backend::services::fred::{self, FredService};

#[derive(Parser, Debug)]
#[command(about = "Update the database with recent weekly Fed data")]
struct Args {
    /// Number of weeks to look back
    #[arg(long, default_value_t = 4)]
    weeks: i64,

    /// Include the Treasury General Account series
    #[arg(long)]
    include_tga: bool,

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

    let fred = FredService::from_env(
        env::var("FRED_BASE_URL").unwrap_or_else(|_| fred::DEFAULT_BASE_URL.to_string()),
    );

    let end_date = Utc::now().date_naive();
    let start_date = end_date - Duration::weeks(args.weeks);

    tracing::info!("Fetching last {} weeks from FRED...", args.weeks);
    let records = match fred
        .fetch_fed_weekly(start_date, end_date, args.include_tga)
        .await
    {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    if records.is_empty() {
        tracing::error!("No data fetched");
        std::process::exit(1);
    }

    let counts = upsert_fed_weekly(&db, &records, args.verbose).await?;

    tracing::info!(
        "Update complete: {} inserted, {} updated, {} total",
        counts.inserted,
        counts.updated,
        counts.total()
    );

    Ok(())
}
