//! `SeaORM` Entity for the policy_rates table (IORB and target range schedule)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "policy_rates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub effective_date: Date,
    pub iorb: f64,
    pub target_lower: f64,
    pub target_upper: f64,
    pub fomc_meeting_date: Option<Date>,
    pub notes: Option<String>,
    pub created_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
