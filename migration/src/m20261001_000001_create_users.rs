use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::FirstName).string_len(255).null())
                    .col(ColumnDef::new(Users::LastName).string_len(255).null())
                    .col(ColumnDef::new(Users::City).string_len(255).null())
                    .col(ColumnDef::new(Users::Address).string_len(255).null())
                    .col(ColumnDef::new(Users::PhoneNumber).string_len(64).null())
                    .col(ColumnDef::new(Users::PostIndex).string_len(32).null())
                    .col(ColumnDef::new(Users::Password).text().null())
                    .col(
                        ColumnDef::new(Users::Roles)
                            .text()
                            .not_null()
                            .default("[\"USER\"]"),
                    )
                    .col(
                        ColumnDef::new(Users::Provider)
                            .string_len(32)
                            .not_null()
                            .default("LOCAL"),
                    )
                    .col(ColumnDef::new(Users::ActivationCode).string_len(64).null())
                    .col(
                        ColumnDef::new(Users::PasswordResetCode)
                            .string_len(64)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Users::Active)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .date_time()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
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
                    .name("idx_users_activation_code")
                    .table(Users::Table)
                    .col(Users::ActivationCode)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_password_reset_code")
                    .table(Users::Table)
                    .col(Users::PasswordResetCode)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Users {
    Table,
    Id,
    Email,
    FirstName,
    LastName,
    City,
    Address,
    PhoneNumber,
    PostIndex,
    Password,
    Roles,
    Provider,
    ActivationCode,
    PasswordResetCode,
    Active,
    CreatedAt,
    UpdatedAt,
}
