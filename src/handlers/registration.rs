use axum::{extract::Path, extract::State, Json};
use serde::Deserialize;

use super::extract::AppJson;
use super::mapper::MessageResponse;
use crate::error::AppError;
use crate::services::auth::{self as auth_service, NewUser};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegistrationRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub password2: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

pub async fn register(
    State(state): State<AppState>,
    AppJson(req): AppJson<RegistrationRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let new_user = NewUser {
        email: req.email.trim().to_string(),
        password: req.password,
        first_name: req.first_name,
        last_name: req.last_name,
    };
    let message = auth_service::register_user(&state.db, new_user, &req.password2).await?;
    Ok(Json(message.into()))
}

pub async fn activate(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let message = auth_service::activate_user(&state.db, &code).await?;
    Ok(Json(message.into()))
}
