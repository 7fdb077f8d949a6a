use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Perfumes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Perfumes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Perfumes::PerfumeTitle)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Perfumes::Perfumer).string_len(255).not_null())
                    .col(ColumnDef::new(Perfumes::Year).integer().null())
                    .col(ColumnDef::new(Perfumes::Country).string_len(255).null())
                    .col(
                        ColumnDef::new(Perfumes::PerfumeGender)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Perfumes::FragranceTopNotes).text().null())
                    .col(ColumnDef::new(Perfumes::FragranceMiddleNotes).text().null())
                    .col(ColumnDef::new(Perfumes::FragranceBaseNotes).text().null())
                    .col(ColumnDef::new(Perfumes::Price).integer().not_null())
                    .col(ColumnDef::new(Perfumes::Volume).string_len(32).null())
                    .col(ColumnDef::new(Perfumes::PerfumeType).string_len(64).null())
                    .col(
                        ColumnDef::new(Perfumes::CreatedAt)
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
                    .name("idx_perfumes_perfumer")
                    .table(Perfumes::Table)
                    .col(Perfumes::Perfumer)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Perfumes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Perfumes {
    Table,
    Id,
    PerfumeTitle,
    Perfumer,
    Year,
    Country,
    PerfumeGender,
    FragranceTopNotes,
    FragranceMiddleNotes,
    FragranceBaseNotes,
    Price,
    Volume,
    PerfumeType,
    CreatedAt,
}
