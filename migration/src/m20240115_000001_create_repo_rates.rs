use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Daily repo market data: SOFR, EFFR, SRF usage, ON RRP usage
        manager
            .create_table(
                Table::create()
                    .table(RepoRates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RepoRates::Date)
                            .date()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RepoRates::Sofr).double().null())
                    .col(ColumnDef::new(RepoRates::Effr).double().null())
                    .col(ColumnDef::new(RepoRates::SrfUsage).double().null())
                    .col(ColumnDef::new(RepoRates::Onrrp).double().null())
                    .col(ColumnDef::new(RepoRates::SofrIorbSpread).double().null())
                    .col(ColumnDef::new(RepoRates::EffrTargetMid).double().null())
                    .col(
                        ColumnDef::new(RepoRates::IsQuarterEnd)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(RepoRates::IsMonthEnd)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(RepoRates::CreatedAt)
                            .timestamp()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .col(
                        ColumnDef::new(RepoRates::UpdatedAt)
                            .timestamp()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .to_owned(),
            )
            .await?;

        // Index on date for latest-first range scans
        manager
            .create_index(
                Index::create()
                    .name("idx_repo_rates_date")
                    .table(RepoRates::Table)
                    .col((RepoRates::Date, IndexOrder::Desc))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RepoRates::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum RepoRates {
    Table,
    Date,
    Sofr,
    Effr,
    SrfUsage,
    Onrrp,
    SofrIorbSpread,
    EffrTargetMid,
    IsQuarterEnd,
    IsMonthEnd,
    CreatedAt,
    UpdatedAt,
}
