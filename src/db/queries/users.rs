use entity::user;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect,
};

use crate::error::AppError;

pub async fn find_by_email<C: ConnectionTrait>(
    db: &C,
    email: &str,
) -> Result<Option<user::Model>, AppError> {
    Ok(user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await?)
}

pub async fn find_by_activation_code<C: ConnectionTrait>(
    db: &C,
    code: &str,
) -> Result<Option<user::Model>, AppError> {
    Ok(user::Entity::find()
        .filter(user::Column::ActivationCode.eq(code))
        .one(db)
        .await?)
}

pub async fn email_by_password_reset_code<C: ConnectionTrait>(
    db: &C,
    code: &str,
) -> Result<Option<String>, AppError> {
    Ok(user::Entity::find()
        .select_only()
        .column(user::Column::Email)
        .filter(user::Column::PasswordResetCode.eq(code))
        .into_tuple::<String>()
        .one(db)
        .await?)
}

/// Clears `code` wherever it is still set and returns how many rows changed.
pub async fn clear_password_reset_code<C: ConnectionTrait>(
    db: &C,
    code: &str,
) -> Result<u64, AppError> {
    let result = user::Entity::update_many()
        .col_expr(
            user::Column::PasswordResetCode,
            Expr::value(Option::<String>::None),
        )
        .filter(user::Column::PasswordResetCode.eq(code))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

pub async fn insert<C: ConnectionTrait>(
    db: &C,
    model: user::ActiveModel,
) -> Result<user::Model, AppError> {
    Ok(model.insert(db).await?)
}

pub async fn update<C: ConnectionTrait>(
    db: &C,
    model: user::ActiveModel,
) -> Result<user::Model, AppError> {
    Ok(model.update(db).await?)
}
