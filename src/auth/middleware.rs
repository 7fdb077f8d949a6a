use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::auth::jwt::Claims;
use crate::auth::roles::Role;
use crate::error::AppError;

/// Extracts the authenticated principal from a Bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub email: String,
    pub role: String,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin.as_str()
    }
}

fn bearer_claims(parts: &Parts, app_state: &crate::AppState) -> Result<Claims, AppError> {
    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::Unauthorized)?;

    app_state.jwt.verify_token(token)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync + AsRef<crate::AppState>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let claims = bearer_claims(parts, state.as_ref())?;

        Ok(AuthenticatedUser {
            email: claims.sub,
            role: claims.role,
        })
    }
}

/// Requires a Bearer token whose role is ADMIN.
#[derive(Debug, Clone)]
pub struct AdminAuth {
    pub email: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminAuth
where
    S: Send + Sync + AsRef<crate::AppState>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let claims = bearer_claims(parts, state.as_ref())?;
        if claims.role != Role::Admin.as_str() {
            return Err(AppError::Forbidden);
        }

        Ok(AdminAuth { email: claims.sub })
    }
}
