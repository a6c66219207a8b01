pub use sea_orm_migration::prelude::*;

mod m20240115_000001_create_repo_rates;
mod m20240115_000002_create_fed_weekly;
mod m20240115_000003_create_policy_rates;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240115_000001_create_repo_rates::Migration),
            Box::new(m20240115_000002_create_fed_weekly::Migration),
            Box::new(m20240115_000003_create_policy_rates::Migration),
        ]
    }
}
