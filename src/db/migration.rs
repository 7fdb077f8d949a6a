use ::migration::{Migrator, MigratorTrait};
use sea_orm::{DatabaseConnection, DbErr};

pub async fn run(db: &DatabaseConnection) -> Result<(), DbErr> {
    Migrator::up(db, None).await
}
