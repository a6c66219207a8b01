//! Upsert engine for weekly balance sheet rows with trailing deltas.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Order,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entities::{fed_weekly, prelude::*};
use crate::models::{FedWeeklyObservation, UpsertCounts};

/// Insert or update one row per observation, keyed by date, computing the
/// change fields against the nearest stored row strictly earlier than the
/// observation date.
///
/// Records must arrive in ascending date order: each row's delta reads the
/// previously committed state, so a later row in the same batch sees its
/// predecessor. A gap in the data produces a delta across the gap, not a
/// null — the comparison row is the nearest earlier one, not date minus 7.
pub async fn upsert_fed_weekly(
    db: &DatabaseConnection,
    records: &[FedWeeklyObservation],
    verbose: bool,
) -> Result<UpsertCounts, Box<dyn std::error::Error + Send + Sync>> {
    let mut counts = UpsertCounts::default();

    for record in records {
        let previous = FedWeekly::find()
            .filter(fed_weekly::Column::Date.lt(record.date))
            .order_by(fed_weekly::Column::Date, Order::Desc)
            .limit(1)
            .one(db)
            .await?;

        // Null on either side means no delta; a real 0.0 still counts.
        let balance_sheet_change = match (
            record.balance_sheet,
            previous.as_ref().and_then(|p| p.balance_sheet),
        ) {
            (Some(current), Some(prev)) => Some(current - prev),
            _ => None,
        };
        let reserves_change = match (
            record.reserves,
            previous.as_ref().and_then(|p| p.reserves),
        ) {
            (Some(current), Some(prev)) => Some(current - prev),
            _ => None,
        };

        let existing = FedWeekly::find_by_id(record.date).one(db).await?;

        match existing {
            Some(model) => {
                let mut row = model.into_active_model();
                row.balance_sheet = Set(record.balance_sheet);
                row.reserves = Set(record.reserves);
                row.tga = Set(record.tga);
                row.balance_sheet_change = Set(balance_sheet_change);
                row.reserves_change = Set(reserves_change);
                row.updated_at = Set(Some(Utc::now().naive_utc()));
                row.update(db).await?;

                counts.updated += 1;

                if verbose {
                    tracing::info!("Updated: {}", record.date);
                }
            }
            None => {
                let now = Utc::now().naive_utc();
                let row = fed_weekly::ActiveModel {
                    date: Set(record.date),
                    balance_sheet: Set(record.balance_sheet),
                    reserves: Set(record.reserves),
                    tga: Set(record.tga),
                    balance_sheet_change: Set(balance_sheet_change),
                    reserves_change: Set(reserves_change),
                    created_at: Set(Some(now)),
                    updated_at: Set(Some(now)),
                };
                row.insert(db).await?;

                counts.inserted += 1;

                if verbose {
                    tracing::info!("Inserted: {}", record.date);
                }
            }
        }

        if verbose {
            if let Some(change) = balance_sheet_change {
                tracing::info!(
                    "    Change: balance sheet {:+.1}B, reserves {}",
                    change,
                    reserves_change
                        .map(|c| format!("{:+.1}B", c))
                        .unwrap_or_else(|| "n/a".to_string())
                );
            }
        }
    }

    Ok(counts)
}
