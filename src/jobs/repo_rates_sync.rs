use chrono::{Duration, Utc};
use sea_orm::DatabaseConnection;
use tokio::time::{interval, Duration as TokioDuration};

use crate::services::nyfed::NyFedService;
use crate::services::repo_rates::upsert_repo_rates;

/// Days of lookback per scheduled run; wide enough to absorb publication lag
/// and weekend gaps.
const LOOKBACK_DAYS: i64 = 7;

pub async fn start_repo_rates_sync_job(db: DatabaseConnection, nyfed: NyFedService) {
    tokio::spawn(async move {
        let mut interval = interval(TokioDuration::from_secs(86400)); // Every 24 hours

        // The first tick completes immediately, covering the startup sync
        loop {
            interval.tick().await;
            tracing::info!("Starting repo rates sync");

            if let Err(e) = sync_repo_rates(&db, &nyfed).await {
                tracing::error!("Failed to sync repo rates: {}", e);
            }
        }
    });
}

async fn sync_repo_rates(
    db: &DatabaseConnection,
    nyfed: &NyFedService,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let end_date = Utc::now().date_naive();
    let start_date = end_date - Duration::days(LOOKBACK_DAYS);

    let records = nyfed.fetch_repo_rates(start_date, end_date).await;

    if records.is_empty() {
        tracing::warn!("No repo rate data fetched for {} to {}", start_date, end_date);
        return Ok(());
    }

    let counts = upsert_repo_rates(db, &records, false).await?;

    tracing::info!(
        "Repo rates sync complete: {} inserted, {} updated, {} total",
        counts.inserted,
        counts.updated,
        counts.total()
    );

    Ok(())
}
