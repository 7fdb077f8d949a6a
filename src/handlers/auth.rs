use axum::{extract::Path, extract::State, Json};
use serde::Deserialize;

use super::extract::AppJson;
use super::mapper::{AuthenticationResponse, MessageResponse};
use crate::auth::middleware::AuthenticatedUser;
use crate::auth::oauth2::AuthProvider;
use crate::error::AppError;
use crate::services::auth as auth_service;
use crate::AppState;

// --- Request types ---

#[derive(Debug, Deserialize)]
pub struct AuthenticationRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub email: Option<String>,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password2: String,
}

#[derive(Debug, Deserialize)]
pub struct OAuth2LoginRequest {
    pub access_token: String,
}

#[derive(Debug, serde::Serialize)]
pub struct EmailResponse {
    pub email: String,
}

// --- Handlers ---

pub async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<AuthenticationRequest>,
) -> Result<Json<AuthenticationResponse>, AppError> {
    let result = auth_service::login(&state.db, &state.jwt, &req.email, &req.password).await?;
    Ok(Json(result.try_into()?))
}

pub async fn forgot_password(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let message =
        auth_service::send_password_reset_code(&state.db, &state.config.hostname, &email).await?;
    Ok(Json(message.into()))
}

pub async fn email_by_reset_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<EmailResponse>, AppError> {
    let email = auth_service::get_email_by_password_reset_code(&state.db, &code).await?;
    Ok(Json(EmailResponse { email }))
}

pub async fn password_reset(
    State(state): State<AppState>,
    AppJson(req): AppJson<PasswordResetRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let email = req
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| AppError::field("email", "Email cannot be empty"))?;
    let message =
        auth_service::password_reset(&state.db, &email, &req.password, &req.password2).await?;
    Ok(Json(message.into()))
}

pub async fn password_reset_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
    AppJson(req): AppJson<PasswordResetRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let message =
        auth_service::reset_password_by_code(&state.db, &code, &req.password, &req.password2)
            .await?;
    Ok(Json(message.into()))
}

pub async fn update_password(
    user: AuthenticatedUser,
    State(state): State<AppState>,
    AppJson(req): AppJson<PasswordResetRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let message =
        auth_service::password_reset(&state.db, &user.email, &req.password, &req.password2)
            .await?;
    Ok(Json(message.into()))
}

pub async fn oauth2_login(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    AppJson(req): AppJson<OAuth2LoginRequest>,
) -> Result<Json<AuthenticationResponse>, AppError> {
    let provider: AuthProvider = provider.parse()?;
    if provider == AuthProvider::Local {
        return Err(AppError::ProviderNotSupported(provider.to_string()));
    }

    let info = state
        .oauth2
        .fetch_user_info(provider, &req.access_token)
        .await?;
    let result = auth_service::process_oauth2_login(&state.db, &state.jwt, provider, &info).await?;
    Ok(Json(result.try_into()?))
}
