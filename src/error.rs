//! Typed errors and HTTP mapping.

use crate::response::{Envelope, ResponseStatus};
use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Storage-layer failure. Anything other than a missing row is opaque.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("database: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("format: {0}")]
    Format(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("database: {0}")]
    Db(#[source] sqlx::Error),
    #[error("internal: {0}")]
    Internal(String),
}

impl AppError {
    /// Reclassify a storage error; a missing row becomes `NotFound` for `what`.
    pub fn from_store(e: StoreError, what: impl Into<String>) -> Self {
        match e {
            StoreError::NotFound => AppError::NotFound(what.into()),
            StoreError::Database(e) => AppError::Db(e),
        }
    }

    pub fn status(&self) -> ResponseStatus {
        match self {
            AppError::Format(_) => ResponseStatus::FormatError,
            AppError::NotFound(_) => ResponseStatus::DoesNotExist,
            AppError::Db(_) | AppError::Internal(_) => ResponseStatus::InternalServerError,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::from_store(e, "record")
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Db(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Format(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Format(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Format(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            // Db errors were already logged where they were detected.
            AppError::Db(_) => "internal server error".to_string(),
            AppError::Internal(detail) => {
                tracing::error!(detail = %detail, "request failed");
                "internal server error".to_string()
            }
            AppError::Format(msg) => msg.clone(),
            AppError::NotFound(what) => format!("{what} not found"),
        };
        Envelope::<()>::failure(status, message).into_response()
    }
}
