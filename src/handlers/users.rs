use axum::{extract::State, Json};

use super::mapper::UserResponse;
use crate::auth::middleware::AuthenticatedUser;
use crate::error::AppError;
use crate::services::auth as auth_service;
use crate::AppState;

pub async fn get_profile(
    user: AuthenticatedUser,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, AppError> {
    let db_user = auth_service::find_user_by_email(&state.db, &user.email).await?;
    Ok(Json(db_user.try_into()?))
}
