//! `SeaORM` Entity for the fed_weekly table (weekly balance sheet aggregates)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fed_weekly")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub date: Date,
    /// Total Fed assets, WALCL (billions)
    pub balance_sheet: Option<f64>,
    /// Reserve balances with Federal Reserve Banks, WRESBAL (billions)
    pub reserves: Option<f64>,
    /// Treasury General Account, WTREGEN (billions, optional series)
    pub tga: Option<f64>,
    /// Change vs the nearest earlier stored row
    pub balance_sheet_change: Option<f64>,
    pub reserves_change: Option<f64>,
    pub created_at: Option<DateTime>,
    pub updated_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
