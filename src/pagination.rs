//! Page requests and page metadata.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Validated page request. `page` is 1-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Build from optional query values. Missing page is 1, missing limit is `default_limit`.
    pub fn new(
        page: Option<u32>,
        limit: Option<u32>,
        default_limit: u32,
        max_limit: u32,
    ) -> Result<Self, AppError> {
        let page = page.unwrap_or(1);
        let limit = limit.unwrap_or(default_limit);
        if page < 1 {
            return Err(AppError::Format("page must be at least 1".into()));
        }
        if limit < 1 || limit > max_limit {
            return Err(AppError::Format(format!(
                "limit must be between 1 and {}",
                max_limit
            )));
        }
        Ok(PageRequest { page, limit })
    }

    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

/// Pagination block attached to list envelopes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
    pub total_count: u64,
}

impl Pagination {
    pub fn new(total_count: u64, page: PageRequest) -> Self {
        let limit = page.limit.max(1) as u64;
        Pagination {
            page: page.page,
            limit: page.limit,
            total_pages: total_count.div_ceil(limit),
            total_count,
        }
    }
}

/// Raw page parameters as they arrive in a query string or list body.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct PageParams {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_zero_based() {
        let p = PageRequest::new(Some(3), Some(10), 10, 100).unwrap();
        assert_eq!(p.offset(), 20);
        let first = PageRequest::new(None, None, 25, 100).unwrap();
        assert_eq!(first, PageRequest { page: 1, limit: 25 });
        assert_eq!(first.offset(), 0);
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(matches!(PageRequest::new(Some(0), None, 10, 100), Err(AppError::Format(_))));
        assert!(matches!(PageRequest::new(None, Some(0), 10, 100), Err(AppError::Format(_))));
        assert!(matches!(PageRequest::new(None, Some(101), 10, 100), Err(AppError::Format(_))));
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = PageRequest { page: 2, limit: 10 };
        assert_eq!(Pagination::new(15, page).total_pages, 2);
        assert_eq!(Pagination::new(20, page).total_pages, 2);
        assert_eq!(Pagination::new(21, page).total_pages, 3);
        assert_eq!(Pagination::new(0, page).total_pages, 0);
    }
}
