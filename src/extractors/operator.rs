//! Operator identity for audit columns, taken from the `X-Operator-Id` header.

use crate::error::AppError;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

pub const OPERATOR_ID_HEADER: &str = "X-Operator-Id";

/// Optional operator id. A header that is present but not a UUID is rejected.
#[derive(Clone, Debug, Default)]
pub struct Operator(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for Operator
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(raw) = parts.headers.get(OPERATOR_ID_HEADER) else {
            return Ok(Operator(None));
        };
        let value = raw
            .to_str()
            .map_err(|_| AppError::Format(format!("{OPERATOR_ID_HEADER} is not valid text")))?
            .trim();
        if value.is_empty() {
            return Ok(Operator(None));
        }
        let id = uuid::Uuid::parse_str(value)
            .map_err(|_| AppError::Format(format!("{OPERATOR_ID_HEADER} must be a uuid")))?;
        Ok(Operator(Some(id.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(header: Option<&str>) -> Result<Operator, AppError> {
        let mut builder = Request::builder().uri("/");
        if let Some(h) = header {
            builder = builder.header(OPERATOR_ID_HEADER, h);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        Operator::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn header_is_optional() {
        assert!(extract(None).await.unwrap().0.is_none());
        assert!(extract(Some("  ")).await.unwrap().0.is_none());
    }

    #[tokio::test]
    async fn uuid_is_normalized() {
        let op = extract(Some("67E55044-10B1-426F-9247-BB680E5FE0C8")).await.unwrap();
        assert_eq!(op.0.as_deref(), Some("67e55044-10b1-426f-9247-bb680e5fe0c8"));
    }

    #[tokio::test]
    async fn non_uuid_is_a_format_error() {
        assert!(matches!(extract(Some("alice")).await, Err(AppError::Format(_))));
    }
}
