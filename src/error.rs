use std::collections::BTreeMap;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Incorrect password or email")]
    BadCredentials,

    #[error("Email not found.")]
    EmailNotFound,

    #[error("Email is already used.")]
    EmailAlreadyUsed,

    #[error("Passwords do not match.")]
    PasswordMismatch,

    #[error("Password confirmation cannot be empty.")]
    PasswordConfirmationEmpty,

    #[error("Password reset code is invalid!")]
    PasswordResetCodeInvalid,

    #[error("Activation code not found.")]
    ActivationCodeNotFound,

    #[error("Order not found")]
    OrderNotFound,

    #[error("Perfume not found")]
    PerfumeNotFound,

    #[error("Provider not supported: {0}")]
    ProviderNotSupported(String),

    #[error("Invalid input")]
    InputField(BTreeMap<String, String>),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl AppError {
    /// Single-field validation failure, rendered under `fields`.
    pub fn field(name: &str, message: &str) -> Self {
        AppError::InputField(BTreeMap::from([(name.to_string(), message.to_string())]))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            AppError::BadCredentials => {
                (StatusCode::FORBIDDEN, "bad_credentials", self.to_string())
            }
            AppError::EmailNotFound => {
                (StatusCode::NOT_FOUND, "email_not_found", self.to_string())
            }
            AppError::EmailAlreadyUsed => {
                (StatusCode::BAD_REQUEST, "email_already_used", self.to_string())
            }
            AppError::PasswordMismatch => {
                (StatusCode::BAD_REQUEST, "password_mismatch", self.to_string())
            }
            AppError::PasswordConfirmationEmpty => (
                StatusCode::BAD_REQUEST,
                "password_confirmation_empty",
                self.to_string(),
            ),
            AppError::PasswordResetCodeInvalid => {
                (StatusCode::NOT_FOUND, "reset_code_invalid", self.to_string())
            }
            AppError::ActivationCodeNotFound => (
                StatusCode::NOT_FOUND,
                "activation_code_not_found",
                self.to_string(),
            ),
            AppError::OrderNotFound => {
                (StatusCode::NOT_FOUND, "order_not_found", self.to_string())
            }
            AppError::PerfumeNotFound => {
                (StatusCode::NOT_FOUND, "perfume_not_found", self.to_string())
            }
            AppError::ProviderNotSupported(_) => {
                (StatusCode::BAD_REQUEST, "provider_not_supported", self.to_string())
            }
            AppError::InputField(fields) => {
                let body = json!({
                    "error": "validation_error",
                    "message": self.to_string(),
                    "fields": fields,
                });
                return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
            }
            AppError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "unauthorized", self.to_string())
            }
            AppError::Forbidden => (StatusCode::FORBIDDEN, "forbidden", self.to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error".to_string(),
                )
            }
            AppError::Jwt(_) => (
                StatusCode::UNAUTHORIZED,
                "invalid_token",
                "Invalid or expired token".to_string(),
            ),
            AppError::HttpClient(e) => {
                tracing::error!("HTTP client error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "provider_error",
                    "External provider error".to_string(),
                )
            }
        };

        let body = json!({
            "error": error_type,
            "message": message,
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_errors_hide_details() {
        let resp = AppError::Internal("secret detail".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn status_mapping() {
        assert_eq!(
            AppError::BadCredentials.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::ActivationCodeNotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::PasswordMismatch.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::field("password", "too short").into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
