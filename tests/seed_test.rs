mod common;

use perfume_store::error::AppError;
use perfume_store::seed::bootstrap;
use sea_orm::{ColumnTrait, Database, EntityTrait, PaginatorTrait, QueryFilter};

async fn test_db() -> sea_orm::DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect");
    use migration::MigratorTrait;
    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

async fn find_user(db: &sea_orm::DatabaseConnection, email: &str) -> entity::user::Model {
    entity::user::Entity::find()
        .filter(entity::user::Column::Email.eq(email))
        .one(db)
        .await
        .unwrap()
        .expect("user not found")
}

// ─── New admin ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn seed_creates_admin_and_catalog() {
    let db = test_db().await;

    let result = bootstrap(&db, "admin@test.com", Some("StrongPass1"))
        .await
        .expect("seed failed");

    assert_eq!(result.user_action, "created");
    assert_eq!(result.perfumes_added, 4);

    let user = find_user(&db, "admin@test.com").await;
    assert_eq!(user.roles, r#"["ADMIN","USER"]"#);
    assert!(user.active);
    assert!(user.password.is_some());

    let perfumes = entity::perfume::Entity::find().count(&db).await.unwrap();
    assert_eq!(perfumes, 4);
}

#[tokio::test]
async fn seed_requires_password_for_new_user() {
    let db = test_db().await;

    let result = bootstrap(&db, "nopass@test.com", None).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
}

// ─── Idempotency ────────────────────────────────────────────────────────────

#[tokio::test]
async fn seed_twice_is_a_no_op() {
    let db = test_db().await;

    bootstrap(&db, "admin@test.com", Some("StrongPass1"))
        .await
        .unwrap();
    let second = bootstrap(&db, "admin@test.com", None).await.unwrap();

    assert_eq!(second.user_action, "already_admin");
    assert_eq!(second.perfumes_added, 0);

    let perfumes = entity::perfume::Entity::find().count(&db).await.unwrap();
    assert_eq!(perfumes, 4);
}

#[tokio::test]
async fn seed_promotes_existing_user() {
    let db = test_db().await;
    perfume_store::services::auth::register_user(
        &db,
        perfume_store::services::auth::NewUser {
            email: "shopper@test.com".to_string(),
            password: "password1".to_string(),
            first_name: None,
            last_name: None,
        },
        "password1",
    )
    .await
    .unwrap();

    let result = bootstrap(&db, "shopper@test.com", None).await.unwrap();
    assert_eq!(result.user_action, "promoted");

    let user = find_user(&db, "shopper@test.com").await;
    assert_eq!(user.roles, r#"["ADMIN","USER"]"#);
}
