use chrono::{Duration, Utc};
use sea_orm::DatabaseConnection;
use tokio::time::{interval, Duration as TokioDuration};

use crate::services::fed_weekly::upsert_fed_weekly;
use crate::services::fred::FredService;

/// Weeks of lookback per scheduled run; FRED revises recent observations.
const LOOKBACK_WEEKS: i64 = 4;

pub async fn start_fed_weekly_sync_job(db: DatabaseConnection, fred: FredService) {
    tokio::spawn(async move {
        let mut interval = interval(TokioDuration::from_secs(7 * 86400)); // Every 7 days

        // The first tick completes immediately, covering the startup sync
        loop {
            interval.tick().await;
            tracing::info!("Starting Fed weekly sync");

            if let Err(e) = sync_fed_weekly(&db, &fred).await {
                tracing::error!("Failed to sync Fed weekly data: {}", e);
            }
        }
    });
}

async fn sync_fed_weekly(
    db: &DatabaseConnection,
    fred: &FredService,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let end_date = Utc::now().date_naive();
    let start_date = end_date - Duration::weeks(LOOKBACK_WEEKS);

    let records = fred.fetch_fed_weekly(start_date, end_date, false).await?;

    if records.is_empty() {
        tracing::warn!("No Fed weekly data fetched for {} to {}", start_date, end_date);
        return Ok(());
    }

    let counts = upsert_fed_weekly(db, &records, false).await?;

    tracing::info!(
        "Fed weekly sync complete: {} inserted, {} updated, {} total",
        counts.inserted,
        counts.updated,
        counts.total()
    );

    Ok(())
}
