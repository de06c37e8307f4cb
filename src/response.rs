//! Standard response envelope. Every handler outcome is rendered through [`Envelope`].

use crate::pagination::Pagination;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

/// Fixed response taxonomy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub enum ResponseStatus {
    Successful,
    FormatError,
    DoesNotExist,
    InternalServerError,
}

impl ResponseStatus {
    pub fn http_status(self) -> StatusCode {
        match self {
            ResponseStatus::Successful => StatusCode::OK,
            ResponseStatus::FormatError => StatusCode::BAD_REQUEST,
            ResponseStatus::DoesNotExist => StatusCode::NOT_FOUND,
            ResponseStatus::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ResponseStatus::Successful => "successful",
            ResponseStatus::FormatError => "format error",
            ResponseStatus::DoesNotExist => "does not exist",
            ResponseStatus::InternalServerError => "internal server error",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: ResponseStatus,
    pub code: u16,
    pub message: String,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip)]
    http: StatusCode,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self::success(StatusCode::OK, Some(data), None)
    }

    pub fn created(data: T) -> Self {
        Self::success(StatusCode::CREATED, Some(data), None)
    }

    pub fn page(data: T, pagination: Pagination) -> Self {
        Self::success(StatusCode::OK, Some(data), Some(pagination))
    }

    pub fn empty() -> Self {
        Self::success(StatusCode::OK, None, None)
    }

    pub fn failure(status: ResponseStatus, message: String) -> Self {
        let http = status.http_status();
        Envelope {
            status,
            code: http.as_u16(),
            message,
            data: None,
            pagination: None,
            http,
        }
    }

    fn success(http: StatusCode, data: Option<T>, pagination: Option<Pagination>) -> Self {
        Envelope {
            status: ResponseStatus::Successful,
            code: http.as_u16(),
            message: ResponseStatus::Successful.message().to_string(),
            data,
            pagination,
            http,
        }
    }

    pub fn http_status(&self) -> StatusCode {
        self.http
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (self.http, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::PageRequest;

    #[test]
    fn failure_maps_taxonomy_to_http() {
        let e = Envelope::<()>::failure(ResponseStatus::DoesNotExist, "missing".into());
        assert_eq!(e.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(e.code, 404);
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["status"], "DoesNotExist");
        assert!(json["data"].is_null());
        assert!(json.get("pagination").is_none());
    }

    #[test]
    fn page_carries_pagination() {
        let p = Pagination::new(15, PageRequest { page: 2, limit: 10 });
        let e = Envelope::page(vec![1, 2, 3], p);
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["status"], "Successful");
        assert_eq!(json["pagination"]["total_pages"], 2);
        assert_eq!(json["pagination"]["total_count"], 15);
    }

    #[test]
    fn created_uses_201() {
        assert_eq!(Envelope::created("x").http_status(), StatusCode::CREATED);
    }
}
