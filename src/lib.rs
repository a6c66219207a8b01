// src/lib.rs

pub mod entities {
    pub mod prelude;
    pub mod fed_weekly;
    pub mod policy_rates;
    pub mod repo_rates;
}

pub mod services {
    pub mod backfill;
    pub mod date_utils;
    pub mod fed_weekly;
    pub mod fred;
    pub mod nyfed;
    pub mod repo_rates;
}

pub mod jobs;
pub mod models;
