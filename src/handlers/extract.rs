use axum::extract::FromRequest;

use crate::error::AppError;

/// JSON body extractor whose rejections render as `AppError` bodies.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
