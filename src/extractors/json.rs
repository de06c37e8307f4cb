use crate::error::AppError;
use axum::extract::FromRequest;
use axum::extract::FromRequestParts;

/// JSON body; malformed or mistyped bodies become `AppError::Format`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct FormatJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct FormatQuery<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct FormatPath<T>(pub T);
