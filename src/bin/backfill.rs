//! One-shot historical backfill of both sources.
//!
//! Usage:
//!   backfill [--start-date YYYY-MM-DD] [--end-date YYYY-MM-DD]
//!            [--skip-repo] [--skip-fed] [--verbose]

use chrono::{NaiveDate, Utc};
use clap::Parser;
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use std::env;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use fed_liquidity_backend::services::backfill::{
    backfill_fed_weekly, backfill_repo_rates, DateRange,
};
use fed_liquidity_backend::services::fred::{self, FredService};
use fed_liquidity_backend::services::nyfed::{self, NyFedService};

#[derive(Parser, Debug)]
#[command(about = "Backfill historical Fed liquidity data")]
struct Args {
    /// Start date (YYYY-MM-DD)
    #[arg(long, default_value = "2018-01-01")]
    start_date: NaiveDate,

    /// End date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    end_date: Option<NaiveDate>,

    /// Skip the daily repo rates backfill
    #[arg(long)]
    skip_repo: bool,

    /// Skip the weekly Fed balance sheet backfill
    #[arg(long)]
    skip_fed: bool,

    /// Log every inserted/updated record instead of summaries only
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
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
    let end_date = args.end_date.unwrap_or_else(|| Utc::now().date_naive());
    let range = DateRange::new(args.start_date, end_date);

    if range.start > range.end {
        return Err(format!(
            "start date {} is after end date {}",
            range.start, range.end
        )
        .into());
    }

    // Connect to database
    let database_url = env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://fed_liquidity.db?mode=rwc".to_string());
    let db = Database::connect(&database_url).await?;
    migration::Migrator::up(&db, None).await?;

    tracing::info!("Backfill period: {} to {}", range.start, range.end);

    let mut config_failure = false;

    if !args.skip_repo {
        let nyfed = NyFedService::new(
            env::var("NYFED_BASE_URL").unwrap_or_else(|_| nyfed::DEFAULT_BASE_URL.to_string()),
        );
        backfill_repo_rates(&db, &nyfed, range, args.verbose).await;
    }

    if !args.skip_fed {
        let fred = FredService::from_env(
            env::var("FRED_BASE_URL").unwrap_or_else(|_| fred::DEFAULT_BASE_URL.to_string()),
        );

        if let Err(e) = backfill_fed_weekly(&db, &fred, range, args.verbose).await {
            // Configuration precondition; the message names the variable and
            // where to get a key.
            tracing::error!("Fed weekly backfill failed: {}", e);
            config_failure = true;
        }
    }

    tracing::info!("Backfill finished");
    tracing::info!("Next steps: run update_daily daily and update_weekly weekly");

    if config_failure {
        std::process::exit(1);
    }

    Ok(())
}
