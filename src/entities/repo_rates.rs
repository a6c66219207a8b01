//! `SeaORM` Entity for the repo_rates table (daily repo market data)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "repo_rates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub date: Date,
    /// Secured Overnight Financing Rate (percent)
    pub sofr: Option<f64>,
    /// Effective Federal Funds Rate (percent)
    pub effr: Option<f64>,
    /// Standing Repo Facility usage (billions)
    pub srf_usage: Option<f64>,
    /// Overnight Reverse Repo usage (billions)
    pub onrrp: Option<f64>,
    /// SOFR minus IORB; filled by the analytics layer, not the sync jobs
    pub sofr_iorb_spread: Option<f64>,
    /// EFFR minus target range midpoint; filled by the analytics layer
    pub effr_target_mid: Option<f64>,
    pub is_quarter_end: bool,
    pub is_month_end: bool,
    pub created_at: Option<DateTime>,
    pub updated_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
