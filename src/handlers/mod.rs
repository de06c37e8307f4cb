//! HTTP handlers: generic resource CRUD plus the enriched contact endpoints.

pub mod contact;
pub mod resource;

use crate::error::AppError;
use crate::state::AppState;
use crate::store::PgTx;
use serde::Deserialize;

/// Body of `POST /{resource}/list`.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "F: Deserialize<'de> + Default"))]
pub struct ListBody<F> {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub filter: F,
}

impl<F> ListBody<F> {
    fn split(self) -> (crate::pagination::PageParams, F) {
        let page = crate::pagination::PageParams {
            page: self.page,
            limit: self.limit,
        };
        (page, self.filter)
    }
}

/// Open the transaction a create runs in.
async fn begin(state: &AppState) -> Result<PgTx, AppError> {
    state.pool.begin().await.map_err(|e| {
        tracing::error!(error = %e, "could not begin transaction");
        AppError::Db(e)
    })
}
