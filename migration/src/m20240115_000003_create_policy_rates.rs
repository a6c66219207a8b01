use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Policy rate schedule (IORB + target range). Maintained by hand,
        // not written by the sync jobs.
        manager
            .create_table(
                Table::create()
                    .table(PolicyRates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PolicyRates::EffectiveDate)
                            .date()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PolicyRates::Iorb).double().not_null())
                    .col(ColumnDef::new(PolicyRates::TargetLower).double().not_null())
                    .col(ColumnDef::new(PolicyRates::TargetUpper).double().not_null())
                    .col(ColumnDef::new(PolicyRates::FomcMeetingDate).date().null())
                    .col(ColumnDef::new(PolicyRates::Notes).text().null())
                    .col(
                        ColumnDef::new(PolicyRates::CreatedAt)
                            .timestamp()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_policy_rates_date")
                    .table(PolicyRates::Table)
                    .col((PolicyRates::EffectiveDate, IndexOrder::Desc))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PolicyRates::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PolicyRates {
    Table,
    EffectiveDate,
    Iorb,
    TargetLower,
    TargetUpper,
    FomcMeetingDate,
    Notes,
    CreatedAt,
}
