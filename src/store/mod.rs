//! Storage adapter contract: the [`Resource`] description each table provides and the
//! [`Store`] operations every backend implements.

mod postgres;
pub mod schema;

pub use postgres::{PgStore, PgTx};
pub use schema::{ensure_database_exists, ensure_tables};

use crate::error::{AppError, StoreError};
use crate::pagination::PageRequest;
use crate::service::Validate;
use crate::sql::{BindValue, Predicate, TableSpec};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::FromRow;

/// Who is acting and when. Stamped onto records by the workflows, never taken from the body.
#[derive(Clone, Debug)]
pub struct Audit {
    pub operator: Option<String>,
    pub at: DateTime<Utc>,
}

impl Audit {
    pub fn now(operator: Option<String>) -> Self {
        Audit {
            operator,
            at: Utc::now(),
        }
    }

    /// `updated_by` / `updated_at` assignments. `updated_by` is only written when the
    /// operator is known.
    pub fn update_stamp(&self) -> Vec<(&'static str, BindValue)> {
        let mut out = Vec::with_capacity(2);
        if let Some(op) = &self.operator {
            out.push(("updated_by", BindValue::Text(op.clone())));
        }
        out.push(("updated_at", BindValue::Timestamp(self.at)));
        out
    }
}

/// One resource table: its record shape, request inputs, filter and the explicit
/// mappings between them.
pub trait Resource: Send + Sync + 'static {
    type Record: for<'r> FromRow<'r, PgRow> + Serialize + Clone + Send + Sync + Unpin + 'static;
    type Create: DeserializeOwned + Validate + Send + 'static;
    type Update: DeserializeOwned + Validate + Send + 'static;
    /// Sparse storage-side change set built from `Update`.
    type Changes: Send + Sync + 'static;
    type Filter: DeserializeOwned + Validate + Default + Clone + Send + Sync + 'static;

    /// Singular name used in logs and not-found messages.
    const NAME: &'static str;
    const TABLE: TableSpec;

    fn id(record: &Self::Record) -> &str;
    fn display_name(record: &Self::Record) -> &str;
    fn by_id(id: &str) -> Self::Filter;

    /// Validate a path id and return the form it is stored under. Ids are UUIDs unless a
    /// resource says otherwise.
    fn normalize_id(id: &str) -> Result<String, AppError> {
        crate::service::validation::canonical_uuid("id", id)
    }

    fn new_record(input: Self::Create, audit: &Audit) -> Self::Record;
    fn changes(input: Self::Update, audit: &Audit) -> Self::Changes;

    fn insert_values(record: &Self::Record) -> Vec<(&'static str, BindValue)>;
    /// Only the columns present in the change set.
    fn assignments(changes: &Self::Changes) -> Vec<(&'static str, BindValue)>;
    fn predicate(filter: &Self::Filter) -> Option<Predicate>;
}

/// A transaction handed to the create workflow. Dropping it without commit rolls back.
#[async_trait]
pub trait UnitOfWork: Send + Sized + 'static {
    async fn commit(self) -> Result<(), StoreError>;
    async fn rollback(self) -> Result<(), StoreError>;
}

#[async_trait]
pub trait Store<R: Resource>: Send + Sync + 'static {
    type Tx: UnitOfWork;

    async fn create(&self, tx: &mut Self::Tx, record: &R::Record) -> Result<(), StoreError>;

    /// Total matching rows and the requested page, both under the same filter.
    async fn get_list(
        &self,
        filter: &R::Filter,
        page: PageRequest,
    ) -> Result<(u64, Vec<R::Record>), StoreError>;

    async fn get_single(&self, filter: &R::Filter) -> Result<R::Record, StoreError>;

    async fn get_count(&self, filter: &R::Filter) -> Result<u64, StoreError>;

    /// Fails with `NotFound` when no row matched.
    async fn update(&self, filter: &R::Filter, changes: &R::Changes) -> Result<(), StoreError>;

    /// Fails with `NotFound` when no row matched. Soft-deleting tables also record `audit`.
    async fn delete(&self, filter: &R::Filter, audit: &Audit) -> Result<(), StoreError>;
}
