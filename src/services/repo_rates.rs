//! Upsert engine for daily repo market rows.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Set};

use crate::entities::{prelude::*, repo_rates};
use crate::models::{RepoRateObservation, UpsertCounts};
use crate::services::date_utils::{is_month_end, is_quarter_end};

/// Insert or update one row per observation, keyed by date.
///
/// Value fields are fully replaced on update, and the period-end flags are
/// recomputed from the calendar on every pass. A storage error propagates to
/// the caller; the chunked backfill driver catches it per chunk.
pub async fn upsert_repo_rates(
    db: &DatabaseConnection,
    records: &[RepoRateObservation],
    verbose: bool,
) -> Result<UpsertCounts, Box<dyn std::error::Error + Send + Sync>> {
    let mut counts = UpsertCounts::default();

    for record in records {
        let quarter_end = is_quarter_end(record.date);
        let month_end = is_month_end(record.date);

        let existing = RepoRates::find_by_id(record.date).one(db).await?;

        match existing {
            Some(model) => {
                let mut row = model.into_active_model();
                row.sofr = Set(record.sofr);
                row.effr = Set(record.effr);
                row.srf_usage = Set(record.srf_usage);
                row.onrrp = Set(record.onrrp);
                row.is_quarter_end = Set(quarter_end);
                row.is_month_end = Set(month_end);
                row.updated_at = Set(Some(Utc::now().naive_utc()));
                row.update(db).await?;

                counts.updated += 1;

                if verbose {
                    tracing::info!("Updated: {}", record.date);
                }
            }
            None => {
                let now = Utc::now().naive_utc();
                let row = repo_rates::ActiveModel {
                    date: Set(record.date),
                    sofr: Set(record.sofr),
                    effr: Set(record.effr),
                    srf_usage: Set(record.srf_usage),
                    onrrp: Set(record.onrrp),
                    is_quarter_end: Set(quarter_end),
                    is_month_end: Set(month_end),
                    created_at: Set(Some(now)),
                    updated_at: Set(Some(now)),
                    ..Default::default()
                };
                row.insert(db).await?;

                counts.inserted += 1;

                if verbose {
                    let flag = if quarter_end {
                        " [QTR END]"
                    } else if month_end {
                        " [MONTH END]"
                    } else {
                        ""
                    };
                    tracing::info!("Inserted: {}{}", record.date, flag);
                }
            }
        }
    }

    Ok(counts)
}
