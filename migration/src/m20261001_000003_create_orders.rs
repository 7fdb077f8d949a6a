use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Orders::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Orders::Email).string_len(255).not_null())
                    .col(ColumnDef::new(Orders::FirstName).string_len(255).not_null())
                    .col(ColumnDef::new(Orders::LastName).string_len(255).not_null())
                    .col(ColumnDef::new(Orders::City).string_len(255).not_null())
                    .col(ColumnDef::new(Orders::Address).string_len(255).not_null())
                    .col(ColumnDef::new(Orders::PhoneNumber).string_len(64).not_null())
                    .col(ColumnDef::new(Orders::PostIndex).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Orders::TotalPrice)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Orders::Status)
                            .string_len(32)
                            .not_null()
                            .default("NEW"),
                    )
                    .col(
                        ColumnDef::new(Orders::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_orders_email")
                    .table(Orders::Table)
                    .col(Orders::Email)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Orders {
    Table,
    Id,
    Email,
    FirstName,
    LastName,
    City,
    Address,
    PhoneNumber,
    PostIndex,
    TotalPrice,
    Status,
    CreatedAt,
}
