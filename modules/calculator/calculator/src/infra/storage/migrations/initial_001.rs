use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CalculationHistory::Table)
                    .if_not_exists()
                    // SQLite only allows AUTOINCREMENT on an INTEGER key, which is 64-bit there.
                    .col(
                        ColumnDef::new(CalculationHistory::Seq)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CalculationHistory::Id)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(CalculationHistory::Operator).string().not_null())
                    .col(ColumnDef::new(CalculationHistory::OperandA).double().not_null())
                    .col(ColumnDef::new(CalculationHistory::OperandB).double().not_null())
                    .col(ColumnDef::new(CalculationHistory::Result).double().not_null())
                    .col(
                        ColumnDef::new(CalculationHistory::CreatedAtUs)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_calculation_history_created_at")
                    .table(CalculationHistory::Table)
                    .col(CalculationHistory::CreatedAtUs)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CalculationHistory::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CalculationHistory {
    Table,
    Seq,
    Id,
    Operator,
    OperandA,
    OperandB,
    Result,
    CreatedAtUs,
}
