use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Weekly Fed balance sheet aggregates, one row per observation date
        manager
            .create_table(
                Table::create()
                    .table(FedWeekly::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FedWeekly::Date)
                            .date()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FedWeekly::BalanceSheet).double().null())
                    .col(ColumnDef::new(FedWeekly::Reserves).double().null())
                    .col(ColumnDef::new(FedWeekly::Tga).double().null())
                    .col(
                        ColumnDef::new(FedWeekly::BalanceSheetChange)
                            .double()
                            .null(),
                    )
                    .col(ColumnDef::new(FedWeekly::ReservesChange).double().null())
                    .col(
                        ColumnDef::new(FedWeekly::CreatedAt)
                            .timestamp()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .col(
                        ColumnDef::new(FedWeekly::UpdatedAt)
                            .timestamp()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_fed_weekly_date")
                    .table(FedWeekly::Table)
                    .col((FedWeekly::Date, IndexOrder::Desc))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FedWeekly::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum FedWeekly {
    Table,
    Date,
    BalanceSheet,
    Reserves,
    Tga,
    BalanceSheetChange,
    ReservesChange,
    CreatedAt,
    UpdatedAt,
}
