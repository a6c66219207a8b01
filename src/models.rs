//! Composite per-date records produced by the fetch adapters and consumed by
//! the upsert engines, plus the date-bucketed merge that builds them.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

/// One day of repo market data, merged across the four NY Fed series.
/// A field is `None` when the series had no observation for that date.
#[derive(Debug, Clone, PartialEq)]
pub struct RepoRateObservation {
    pub date: NaiveDate,
    pub sofr: Option<f64>,
    pub effr: Option<f64>,
    pub srf_usage: Option<f64>,
    pub onrrp: Option<f64>,
}

/// One weekly observation of Fed balance sheet aggregates, merged across the
/// FRED series. `tga` stays `None` unless the optional series was requested.
#[derive(Debug, Clone, PartialEq)]
pub struct FedWeeklyObservation {
    pub date: NaiveDate,
    pub balance_sheet: Option<f64>,
    pub reserves: Option<f64>,
    pub tga: Option<f64>,
}

/// Rows newly inserted vs updated by one upsert batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertCounts {
    pub inserted: usize,
    pub updated: usize,
}

impl UpsertCounts {
    pub fn total(&self) -> usize {
        self.inserted + self.updated
    }
}

/// Outer join of the four daily series over the union of their dates,
/// ascending. A date present in only one series still yields a record.
pub fn merge_repo_series(
    sofr: &BTreeMap<NaiveDate, f64>,
    effr: &BTreeMap<NaiveDate, f64>,
    srf: &BTreeMap<NaiveDate, f64>,
    onrrp: &BTreeMap<NaiveDate, f64>,
) -> Vec<RepoRateObservation> {
    let mut dates: BTreeSet<&NaiveDate> = BTreeSet::new();
    dates.extend(sofr.keys());
    dates.extend(effr.keys());
    dates.extend(srf.keys());
    dates.extend(onrrp.keys());

    dates
        .into_iter()
        .map(|date| RepoRateObservation {
            date: *date,
            sofr: sofr.get(date).copied(),
            effr: effr.get(date).copied(),
            srf_usage: srf.get(date).copied(),
            onrrp: onrrp.get(date).copied(),
        })
        .collect()
}

/// Outer join of the weekly series over the union of their dates, ascending.
/// The TGA map participates in the date union only when present.
pub fn merge_fed_weekly_series(
    balance_sheet: &BTreeMap<NaiveDate, f64>,
    reserves: &BTreeMap<NaiveDate, f64>,
    tga: Option<&BTreeMap<NaiveDate, f64>>,
) -> Vec<FedWeeklyObservation> {
    let mut dates: BTreeSet<&NaiveDate> = BTreeSet::new();
    dates.extend(balance_sheet.keys());
    dates.extend(reserves.keys());
    if let Some(tga) = tga {
        dates.extend(tga.keys());
    }

    dates
        .into_iter()
        .map(|date| FedWeeklyObservation {
            date: *date,
            balance_sheet: balance_sheet.get(date).copied(),
            reserves: reserves.get(date).copied(),
            tga: tga.and_then(|m| m.get(date).copied()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn merge_is_an_outer_join_over_dates() {
        let sofr = BTreeMap::from([(d("2024-01-01"), 5.31)]);
        let effr = BTreeMap::from([(d("2024-01-02"), 5.33)]);
        let empty = BTreeMap::new();

        let merged = merge_repo_series(&sofr, &effr, &empty, &empty);

        assert_eq!(
            merged,
            vec![
                RepoRateObservation {
                    date: d("2024-01-01"),
                    sofr: Some(5.31),
                    effr: None,
                    srf_usage: None,
                    onrrp: None,
                },
                RepoRateObservation {
                    date: d("2024-01-02"),
                    sofr: None,
                    effr: Some(5.33),
                    srf_usage: None,
                    onrrp: None,
                },
            ]
        );
    }

    #[test]
    fn merge_sorts_dates_ascending() {
        let sofr = BTreeMap::from([(d("2024-03-05"), 5.3), (d("2024-03-01"), 5.2)]);
        let empty = BTreeMap::new();

        let merged = merge_repo_series(&sofr, &empty, &empty, &empty);

        let dates: Vec<_> = merged.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![d("2024-03-01"), d("2024-03-05")]);
    }

    #[test]
    fn weekly_merge_ignores_tga_when_not_requested() {
        let bs = BTreeMap::from([(d("2024-01-03"), 7700.5)]);
        let res = BTreeMap::new();
        let tga = BTreeMap::from([(d("2024-01-10"), 750.25)]);

        let without_tga = merge_fed_weekly_series(&bs, &res, None);
        assert_eq!(without_tga.len(), 1);
        assert_eq!(without_tga[0].tga, None);

        let with_tga = merge_fed_weekly_series(&bs, &res, Some(&tga));
        assert_eq!(with_tga.len(), 2);
        assert_eq!(with_tga[1].date, d("2024-01-10"));
        assert_eq!(with_tga[1].tga, Some(750.25));
        assert_eq!(with_tga[1].balance_sheet, None);
    }
}
