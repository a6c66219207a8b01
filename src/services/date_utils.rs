//! Calendar-derived period-end flags for daily rows.

use chrono::{Datelike, NaiveDate};

/// True iff `date` is the last calendar day of its month.
pub fn is_month_end(date: NaiveDate) -> bool {
    match date.succ_opt() {
        Some(next) => next.month() != date.month(),
        // NaiveDate::MAX has no successor; not a reachable data date
        None => true,
    }
}

/// True iff `date` is the last calendar day of March, June, September or
/// December. Quarter-end dates are always also month-end.
pub fn is_quarter_end(date: NaiveDate) -> bool {
    matches!(date.month(), 3 | 6 | 9 | 12) && is_month_end(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn quarter_ends_are_month_ends() {
        for date in ["2024-03-31", "2024-06-30", "2024-09-30", "2024-12-31"] {
            assert!(is_quarter_end(d(date)), "{date} should be quarter-end");
            assert!(is_month_end(d(date)), "{date} should be month-end");
        }
    }

    #[test]
    fn month_ends_outside_quarter_months() {
        for date in ["2024-01-31", "2024-04-30", "2024-11-30"] {
            assert!(is_month_end(d(date)), "{date} should be month-end");
            assert!(!is_quarter_end(d(date)), "{date} is not a quarter-end");
        }
    }

    #[test]
    fn february_month_end_tracks_leap_years() {
        assert!(is_month_end(d("2024-02-29")));
        assert!(!is_month_end(d("2024-02-28")));
        assert!(is_month_end(d("2023-02-28")));
    }

    #[test]
    fn mid_month_dates_carry_no_flags() {
        for date in ["2024-03-30", "2024-06-15", "2024-12-01"] {
            assert!(!is_month_end(d(date)));
            assert!(!is_quarter_end(d(date)));
        }
    }
}
