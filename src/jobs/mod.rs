pub mod fed_weekly_sync;
pub mod repo_rates_sync;
