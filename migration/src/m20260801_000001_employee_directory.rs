use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Employees {
    Table,
    Id,
    FirstName,
    LastName,
    Position,
    Department,
    DirectReports,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Compensations {
    Table,
    EmployeeId,
    Employee,
    Salary,
    EffectiveDate,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Employees::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Employees::FirstName).string_len(128))
                    .col(ColumnDef::new(Employees::LastName).string_len(128))
                    .col(ColumnDef::new(Employees::Position).string_len(256))
                    .col(ColumnDef::new(Employees::Department).string_len(256))
                    .col(
                        ColumnDef::new(Employees::DirectReports)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(
                        ColumnDef::new(Employees::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("now()")),
                    )
                    .col(
                        ColumnDef::new(Employees::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("now()")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Compensations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Compensations::EmployeeId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Compensations::Employee).json_binary().not_null())
                    .col(ColumnDef::new(Compensations::Salary).big_integer().not_null())
                    .col(ColumnDef::new(Compensations::EffectiveDate).date().not_null())
                    .col(
                        ColumnDef::new(Compensations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("now()")),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Compensations::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Employees::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
