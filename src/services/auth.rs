use chrono::Utc;
use entity::user;
use sea_orm::{DatabaseConnection, DbErr, IntoActiveModel, Set, SqlErr, TransactionTrait};
use uuid::Uuid;

use crate::auth::jwt::JwtManager;
use crate::auth::oauth2::{AuthProvider, OAuth2UserInfo};
use crate::auth::password::{hash_password, validate_password, verify_password};
use crate::auth::roles::{encode_roles, primary_role, Role};
use crate::db::queries;
use crate::error::AppError;

pub const REGISTERED: &str = "User successfully registered.";
pub const RESET_CODE_SENT: &str = "Reset password code is send to your E-mail";
pub const PASSWORD_CHANGED: &str = "Password successfully changed!";
pub const ACTIVATED: &str = "User successfully activated.";

/// A freshly issued token and the user it was issued for.
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub token: String,
    pub user: user::Model,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

fn issue_token(jwt: &JwtManager, user: user::Model) -> Result<LoginResult, AppError> {
    let role = primary_role(&user.roles)?;
    let token = jwt.create_token(&user.email, role.as_str())?;
    Ok(LoginResult { token, user })
}

/// Checks credentials and issues a token. Every failure collapses into
/// `BadCredentials` so callers cannot probe which part was wrong.
pub async fn login(
    db: &DatabaseConnection,
    jwt: &JwtManager,
    email: &str,
    password: &str,
) -> Result<LoginResult, AppError> {
    let user = queries::users::find_by_email(db, email)
        .await?
        .ok_or(AppError::BadCredentials)?;

    if !user.active {
        tracing::info!(email, "login rejected: account inactive");
        return Err(AppError::BadCredentials);
    }

    let hash = user.password.as_deref().ok_or(AppError::BadCredentials)?;
    if !verify_password(password, hash)? {
        tracing::info!(email, "login rejected: wrong password");
        return Err(AppError::BadCredentials);
    }

    issue_token(jwt, user)
}

pub async fn find_user_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<user::Model, AppError> {
    queries::users::find_by_email(db, email)
        .await?
        .ok_or(AppError::EmailNotFound)
}

fn validate_email(email: &str) -> Result<(), AppError> {
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::field("email", "Incorrect email"));
    }
    Ok(())
}

/// Maps a unique-index violation on `users.email` to `EmailAlreadyUsed`.
/// The lookup before insert cannot see a concurrent registration.
fn duplicate_email(err: AppError) -> AppError {
    match err {
        AppError::Database(ref db_err) if is_unique_violation(db_err) => AppError::EmailAlreadyUsed,
        other => other,
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

pub async fn register_user(
    db: &DatabaseConnection,
    new_user: NewUser,
    password2: &str,
) -> Result<&'static str, AppError> {
    if new_user.password != password2 {
        return Err(AppError::PasswordMismatch);
    }
    validate_email(&new_user.email)?;
    validate_password(&new_user.password)?;

    if queries::users::find_by_email(db, &new_user.email)
        .await?
        .is_some()
    {
        return Err(AppError::EmailAlreadyUsed);
    }

    let now = Utc::now().naive_utc();
    let model = user::ActiveModel {
        email: Set(new_user.email.clone()),
        first_name: Set(new_user.first_name),
        last_name: Set(new_user.last_name),
        password: Set(Some(hash_password(&new_user.password)?)),
        roles: Set(encode_roles(&[Role::User])),
        provider: Set(AuthProvider::Local.to_string()),
        activation_code: Set(Some(Uuid::new_v4().to_string())),
        password_reset_code: Set(None),
        active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let user = queries::users::insert(db, model)
        .await
        .map_err(duplicate_email)?;

    tracing::info!(user_id = user.id, email = %user.email, "user registered");
    Ok(REGISTERED)
}

pub async fn register_oauth2_user(
    db: &DatabaseConnection,
    provider: AuthProvider,
    info: &OAuth2UserInfo,
) -> Result<user::Model, AppError> {
    let now = Utc::now().naive_utc();
    let model = user::ActiveModel {
        email: Set(info.email.clone()),
        first_name: Set(info.first_name.clone()),
        last_name: Set(info.last_name.clone()),
        password: Set(None),
        roles: Set(encode_roles(&[Role::User])),
        provider: Set(provider.to_string()),
        activation_code: Set(None),
        password_reset_code: Set(None),
        active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let user = queries::users::insert(db, model).await?;

    tracing::info!(user_id = user.id, %provider, "oauth2 user provisioned");
    Ok(user)
}

pub async fn update_oauth2_user(
    db: &DatabaseConnection,
    user: user::Model,
    provider: AuthProvider,
    info: &OAuth2UserInfo,
) -> Result<user::Model, AppError> {
    let mut active = user.into_active_model();
    active.first_name = Set(info.first_name.clone());
    active.last_name = Set(info.last_name.clone());
    active.provider = Set(provider.to_string());
    active.updated_at = Set(Utc::now().naive_utc());
    queries::users::update(db, active).await
}

/// Signs in a user vouched for by an identity provider, creating the local
/// account on first sight and syncing the profile afterwards.
pub async fn process_oauth2_login(
    db: &DatabaseConnection,
    jwt: &JwtManager,
    provider: AuthProvider,
    info: &OAuth2UserInfo,
) -> Result<LoginResult, AppError> {
    let user = match queries::users::find_by_email(db, &info.email).await? {
        Some(existing) => update_oauth2_user(db, existing, provider, info).await?,
        None => register_oauth2_user(db, provider, info).await?,
    };

    if !user.active {
        return Err(AppError::BadCredentials);
    }

    issue_token(jwt, user)
}

pub async fn get_email_by_password_reset_code(
    db: &DatabaseConnection,
    code: &str,
) -> Result<String, AppError> {
    queries::users::email_by_password_reset_code(db, code)
        .await?
        .ok_or(AppError::PasswordResetCodeInvalid)
}

/// Issues a fresh reset code for `email`. `hostname` is the storefront the
/// reset link points at.
pub async fn send_password_reset_code(
    db: &DatabaseConnection,
    hostname: &str,
    email: &str,
) -> Result<&'static str, AppError> {
    let user = find_user_by_email(db, email).await?;

    let code = Uuid::new_v4().to_string();
    let mut active = user.into_active_model();
    active.password_reset_code = Set(Some(code.clone()));
    active.updated_at = Set(Utc::now().naive_utc());
    queries::users::update(db, active).await?;

    // Mail delivery is not wired up; the code only lives in the database.
    tracing::debug!(reset_link = %format!("http://{hostname}/reset/{code}"), "reset link");
    tracing::info!(email, "password reset code issued, mail not dispatched");
    Ok(RESET_CODE_SENT)
}

fn check_new_password(password: &str, password2: &str) -> Result<(), AppError> {
    if password2.is_empty() {
        return Err(AppError::PasswordConfirmationEmpty);
    }
    if password != password2 {
        return Err(AppError::PasswordMismatch);
    }
    validate_password(password)
}

pub async fn password_reset(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
    password2: &str,
) -> Result<&'static str, AppError> {
    check_new_password(password, password2)?;

    let user = find_user_by_email(db, email).await?;

    let mut active = user.into_active_model();
    active.password = Set(Some(hash_password(password)?));
    active.password_reset_code = Set(None);
    active.updated_at = Set(Utc::now().naive_utc());
    queries::users::update(db, active).await?;

    tracing::info!(email, "password changed");
    Ok(PASSWORD_CHANGED)
}

/// Redeems a reset code. Clearing the code and storing the new password
/// share one transaction, and only the request that clears the code wins.
pub async fn reset_password_by_code(
    db: &DatabaseConnection,
    code: &str,
    password: &str,
    password2: &str,
) -> Result<&'static str, AppError> {
    let txn = db.begin().await?;

    let email = queries::users::email_by_password_reset_code(&txn, code)
        .await?
        .ok_or(AppError::PasswordResetCodeInvalid)?;
    check_new_password(password, password2)?;

    if queries::users::clear_password_reset_code(&txn, code).await? != 1 {
        return Err(AppError::PasswordResetCodeInvalid);
    }

    let user = queries::users::find_by_email(&txn, &email)
        .await?
        .ok_or(AppError::EmailNotFound)?;
    let mut active = user.into_active_model();
    active.password = Set(Some(hash_password(password)?));
    active.updated_at = Set(Utc::now().naive_utc());
    queries::users::update(&txn, active).await?;

    txn.commit().await?;

    tracing::info!(email, "password changed with reset code");
    Ok(PASSWORD_CHANGED)
}

pub async fn activate_user(db: &DatabaseConnection, code: &str) -> Result<&'static str, AppError> {
    let user = queries::users::find_by_activation_code(db, code)
        .await?
        .ok_or(AppError::ActivationCodeNotFound)?;

    let mut active = user.into_active_model();
    active.activation_code = Set(None);
    active.active = Set(true);
    active.updated_at = Set(Utc::now().naive_utc());
    let user = queries::users::update(db, active).await?;

    tracing::info!(user_id = user.id, "user activated");
    Ok(ACTIVATED)
}

#[cfg(test)]
mod tests {
    use sea_orm::Database;

    use super::*;

    async fn test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        crate::db::migration::run(&db).await.unwrap();
        db
    }

    fn local_user(email: &str) -> user::ActiveModel {
        let now = Utc::now().naive_utc();
        user::ActiveModel {
            email: Set(email.to_string()),
            password: Set(None),
            roles: Set(encode_roles(&[Role::User])),
            provider: Set(AuthProvider::Local.to_string()),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn unique_email_violation_maps_to_email_already_used() {
        let db = test_db().await;
        queries::users::insert(&db, local_user("race@test.com"))
            .await
            .unwrap();

        let err = queries::users::insert(&db, local_user("race@test.com"))
            .await
            .map_err(duplicate_email)
            .unwrap_err();
        assert!(matches!(err, AppError::EmailAlreadyUsed));

        let other = duplicate_email(AppError::Database(DbErr::Custom("boom".to_string())));
        assert!(matches!(other, AppError::Database(_)));
    }

    #[tokio::test]
    async fn mismatch_is_reported_before_a_bad_email() {
        let db = test_db().await;
        let new_user = NewUser {
            email: "not-an-email".to_string(),
            password: "password1".to_string(),
            first_name: None,
            last_name: None,
        };

        let err = register_user(&db, new_user.clone(), "password2")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PasswordMismatch));

        let err = register_user(&db, new_user, "password1").await.unwrap_err();
        assert!(matches!(err, AppError::InputField(ref f) if f.contains_key("email")));
    }

    #[tokio::test]
    async fn concurrent_reset_code_redemptions_succeed_once() {
        let db = test_db().await;
        let mut model = local_user("twice@test.com");
        model.password_reset_code = Set(Some("shared-code".to_string()));
        queries::users::insert(&db, model).await.unwrap();

        let (a, b) = tokio::join!(
            reset_password_by_code(&db, "shared-code", "first123", "first123"),
            reset_password_by_code(&db, "shared-code", "second12", "second12"),
        );
        let wins = [&a, &b].iter().filter(|r| r.is_ok()).count();
        assert_eq!(wins, 1);
        let loser = if a.is_ok() { b } else { a };
        assert!(matches!(loser, Err(AppError::PasswordResetCodeInvalid)));

        let stored = queries::users::find_by_email(&db, "twice@test.com")
            .await
            .unwrap()
            .unwrap();
        assert!(stored.password_reset_code.is_none());
        assert!(stored.password.is_some());
    }

    #[tokio::test]
    async fn clearing_an_unknown_code_touches_no_rows() {
        let db = test_db().await;
        queries::users::insert(&db, local_user("idle@test.com"))
            .await
            .unwrap();

        let cleared = queries::users::clear_password_reset_code(&db, "missing")
            .await
            .unwrap();
        assert_eq!(cleared, 0);
    }
}
