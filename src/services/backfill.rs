//! Chunked historical backfill.
//!
//! A long date range is split into consecutive end-inclusive sub-ranges so no
//! single request asks a rate-sensitive source for years of data at once.
//! Chunks run strictly sequentially: the weekly delta computation reads rows
//! committed by earlier chunks, and the sources dislike bursts.

use chrono::{Duration, NaiveDate};
use sea_orm::DatabaseConnection;

use crate::models::UpsertCounts;
use crate::services::fed_weekly::upsert_fed_weekly;
use crate::services::fred::{FredError, FredService};
use crate::services::nyfed::NyFedService;
use crate::services::repo_rates::upsert_repo_rates;

/// NY Fed chunks stay small to respect the rate-limited source.
pub const REPO_RATES_CHUNK_DAYS: i64 = 90;
/// FRED tolerates year-sized requests.
pub const FED_WEEKLY_CHUNK_DAYS: i64 = 365;

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }
}

/// What happened to one chunk. The continue-on-failure policy is an explicit
/// branch, not a swallowed exception.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkOutcome {
    Completed(UpsertCounts),
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Fetch succeeded (or degraded soft) but produced zero usable records.
    NoData,
    /// The store rejected the chunk's writes.
    UpsertFailed(String),
}

/// Cumulative result of a backfill run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackfillSummary {
    pub inserted: usize,
    pub updated: usize,
    pub chunks_completed: usize,
    pub chunks_skipped: usize,
}

impl BackfillSummary {
    pub fn total(&self) -> usize {
        self.inserted + self.updated
    }

    fn absorb(&mut self, outcome: &ChunkOutcome) {
        match outcome {
            ChunkOutcome::Completed(counts) => {
                self.inserted += counts.inserted;
                self.updated += counts.updated;
                self.chunks_completed += 1;
            }
            ChunkOutcome::Skipped(_) => {
                self.chunks_skipped += 1;
            }
        }
    }
}

/// Decompose `range` into consecutive, non-overlapping, end-inclusive
/// sub-ranges covering every date exactly once. The first chunk spans
/// `chunk_days + 1` dates because both endpoints are inclusive; the final
/// chunk may be shorter.
pub fn split_into_chunks(range: DateRange, chunk_days: i64) -> Vec<DateRange> {
    let mut chunks = Vec::new();
    let mut current = range.start;

    while current <= range.end {
        let chunk_end = (current + Duration::days(chunk_days)).min(range.end);
        chunks.push(DateRange::new(current, chunk_end));
        current = chunk_end + Duration::days(1);
    }

    chunks
}

/// Backfill daily repo rates from the NY Fed in 90-day chunks.
pub async fn backfill_repo_rates(
    db: &DatabaseConnection,
    nyfed: &NyFedService,
    range: DateRange,
    verbose: bool,
) -> BackfillSummary {
    let chunks = split_into_chunks(range, REPO_RATES_CHUNK_DAYS);
    let mut summary = BackfillSummary::default();

    tracing::info!(
        "Backfilling repo rates {} to {} in {} chunks",
        range.start,
        range.end,
        chunks.len()
    );

    for (i, chunk) in chunks.iter().enumerate() {
        tracing::info!("[Chunk {}/{}] {} to {}", i + 1, chunks.len(), chunk.start, chunk.end);

        let records = nyfed.fetch_repo_rates(chunk.start, chunk.end).await;
        let outcome = run_chunk_upsert(records.is_empty(), || {
            upsert_repo_rates(db, &records, verbose)
        })
        .await;

        summary.absorb(&outcome);
    }

    log_summary("Repo rates", &summary);
    summary
}

/// Backfill weekly Fed aggregates from FRED in 365-day chunks.
///
/// A missing API key is a configuration error, not a flaky chunk, so it
/// propagates instead of degrading to skipped chunks.
pub async fn backfill_fed_weekly(
    db: &DatabaseConnection,
    fred: &FredService,
    range: DateRange,
    verbose: bool,
) -> Result<BackfillSummary, FredError> {
    let chunks = split_into_chunks(range, FED_WEEKLY_CHUNK_DAYS);
    let mut summary = BackfillSummary::default();

    tracing::info!(
        "Backfilling Fed weekly data {} to {} in {} chunks",
        range.start,
        range.end,
        chunks.len()
    );

    for (i, chunk) in chunks.iter().enumerate() {
        tracing::info!("[Chunk {}/{}] {} to {}", i + 1, chunks.len(), chunk.start, chunk.end);

        let records = fred.fetch_fed_weekly(chunk.start, chunk.end, false).await?;
        let outcome = run_chunk_upsert(records.is_empty(), || {
            upsert_fed_weekly(db, &records, verbose)
        })
        .await;

        summary.absorb(&outcome);
    }

    log_summary("Fed weekly data", &summary);
    Ok(summary)
}

async fn run_chunk_upsert<F, Fut>(no_data: bool, upsert: F) -> ChunkOutcome
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<
        Output = Result<UpsertCounts, Box<dyn std::error::Error + Send + Sync>>,
    >,
{
    if no_data {
        tracing::warn!("  No data fetched, skipping chunk");
        return ChunkOutcome::Skipped(SkipReason::NoData);
    }

    match upsert().await {
        Ok(counts) => {
            tracing::info!("  Inserted: {}, Updated: {}", counts.inserted, counts.updated);
            ChunkOutcome::Completed(counts)
        }
        Err(e) => {
            tracing::error!("  Error upserting chunk: {}", e);
            ChunkOutcome::Skipped(SkipReason::UpsertFailed(e.to_string()))
        }
    }
}

fn log_summary(name: &str, summary: &BackfillSummary) {
    tracing::info!(
        "{} backfill complete: {} inserted, {} updated, {} total ({} chunks ok, {} skipped)",
        name,
        summary.inserted,
        summary.updated,
        summary.total(),
        summary.chunks_completed,
        summary.chunks_skipped
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn range(start: &str, end: &str) -> DateRange {
        DateRange::new(d(start), d(end))
    }

    #[test]
    fn chunks_match_pinned_boundary_example() {
        // Inclusive endpoints: a width-2 chunk spans three dates.
        let chunks = split_into_chunks(range("2024-01-01", "2024-01-05"), 2);

        assert_eq!(
            chunks,
            vec![
                range("2024-01-01", "2024-01-03"),
                range("2024-01-04", "2024-01-05"),
            ]
        );
    }

    #[test]
    fn chunks_cover_every_date_exactly_once() {
        for chunk_days in [1, 2, 7, 90, 365] {
            let full = range("2023-11-20", "2024-03-08");
            let chunks = split_into_chunks(full, chunk_days);

            // No gaps, no overlaps
            assert_eq!(chunks[0].start, full.start);
            assert_eq!(chunks.last().unwrap().end, full.end);
            for pair in chunks.windows(2) {
                assert_eq!(pair[1].start, pair[0].end + Duration::days(1));
            }

            let covered: i64 = chunks
                .iter()
                .map(|c| (c.end - c.start).num_days() + 1)
                .sum();
            assert_eq!(covered, (full.end - full.start).num_days() + 1);
        }
    }

    #[test]
    fn single_day_range_yields_one_chunk() {
        let chunks = split_into_chunks(range("2024-06-30", "2024-06-30"), 90);
        assert_eq!(chunks, vec![range("2024-06-30", "2024-06-30")]);
    }

    #[tokio::test]
    async fn empty_fetch_marks_chunk_skipped() {
        let outcome = run_chunk_upsert(true, || async {
            Ok::<_, Box<dyn std::error::Error + Send + Sync>>(UpsertCounts::default())
        })
        .await;

        assert_eq!(outcome, ChunkOutcome::Skipped(SkipReason::NoData));
    }

    #[tokio::test]
    async fn failed_upsert_skips_the_chunk_without_aborting_the_run() {
        let failed = run_chunk_upsert(false, || async {
            Err::<UpsertCounts, Box<dyn std::error::Error + Send + Sync>>(
                "database is locked".into(),
            )
        })
        .await;

        assert_eq!(
            failed,
            ChunkOutcome::Skipped(SkipReason::UpsertFailed("database is locked".to_string()))
        );

        // A later chunk still completes and its counts land in the summary
        let completed = run_chunk_upsert(false, || async {
            Ok::<_, Box<dyn std::error::Error + Send + Sync>>(UpsertCounts {
                inserted: 3,
                updated: 1,
            })
        })
        .await;

        let mut summary = BackfillSummary::default();
        summary.absorb(&failed);
        summary.absorb(&completed);

        assert_eq!(summary.chunks_skipped, 1);
        assert_eq!(summary.chunks_completed, 1);
        assert_eq!(summary.inserted, 3);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.total(), 4);
    }

    #[test]
    fn summary_accumulates_chunk_outcomes() {
        let mut summary = BackfillSummary::default();
        summary.absorb(&ChunkOutcome::Completed(UpsertCounts {
            inserted: 5,
            updated: 2,
        }));
        summary.absorb(&ChunkOutcome::Skipped(SkipReason::NoData));
        summary.absorb(&ChunkOutcome::Completed(UpsertCounts {
            inserted: 1,
            updated: 4,
        }));

        assert_eq!(summary.inserted, 6);
        assert_eq!(summary.updated, 6);
        assert_eq!(summary.total(), 12);
        assert_eq!(summary.chunks_completed, 2);
        assert_eq!(summary.chunks_skipped, 1);
    }
}
