//! Per-resource orchestration over a [`Store`]: validation, audit stamping, the
//! transactional create workflow, existence pre-checks and page metadata.

use crate::error::{AppError, StoreError};
use crate::pagination::{PageRequest, Pagination};
use crate::service::Validate;
use crate::store::{Audit, Resource, Store, UnitOfWork};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::Span;

/// Run one create inside the caller's transaction. Commits only when the insert succeeded;
/// any insert error rolls back. A failed commit drops the transaction, which rolls it back.
/// Insert errors were logged by the store; commit and rollback failures are logged here.
pub async fn create_in_tx<R, S>(
    store: &S,
    mut tx: S::Tx,
    record: &R::Record,
    span: &Span,
) -> Result<(), StoreError>
where
    R: Resource,
    S: Store<R>,
{
    match store.create(&mut tx, record).await {
        Ok(()) => tx.commit().await.map_err(|e| {
            tracing::error!(parent: span, table = R::TABLE.name, error = %e, "commit failed");
            e
        }),
        Err(e) => {
            if let Err(rollback) = tx.rollback().await {
                tracing::warn!(parent: span, error = %rollback, "rollback failed");
            }
            Err(e)
        }
    }
}

pub struct ResourceManager<R, S> {
    store: Arc<S>,
    span: Span,
    _resource: PhantomData<fn() -> R>,
}

impl<R, S> ResourceManager<R, S>
where
    R: Resource,
    S: Store<R>,
{
    pub fn new(store: Arc<S>, span: Span) -> Self {
        ResourceManager {
            store,
            span,
            _resource: PhantomData,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    fn not_found(e: StoreError, id: &str) -> AppError {
        AppError::from_store(e, format!("{} {}", R::NAME, id))
    }

    pub async fn create(
        &self,
        tx: S::Tx,
        input: R::Create,
        operator: Option<String>,
    ) -> Result<R::Record, AppError> {
        input.validate()?;
        let record = R::new_record(input, &Audit::now(operator));
        create_in_tx::<R, S>(&self.store, tx, &record, &self.span).await?;
        tracing::info!(parent: &self.span, id = R::id(&record), "created");
        Ok(record)
    }

    pub async fn get_by_single(&self, id: &str) -> Result<R::Record, AppError> {
        let id = R::normalize_id(id)?;
        self.fetch(&id).await
    }

    /// Read by an id already in stored form.
    async fn fetch(&self, id: &str) -> Result<R::Record, AppError> {
        self.store
            .get_single(&R::by_id(id))
            .await
            .map_err(|e| Self::not_found(e, id))
    }

    pub async fn get_by_list(
        &self,
        filter: R::Filter,
        page: PageRequest,
    ) -> Result<(Vec<R::Record>, Pagination), AppError> {
        filter.validate()?;
        let (total, records) = self.store.get_list(&filter, page).await?;
        Ok((records, Pagination::new(total, page)))
    }

    pub async fn count(&self, filter: R::Filter) -> Result<u64, AppError> {
        filter.validate()?;
        Ok(self.store.get_count(&filter).await?)
    }

    /// Apply a sparse update and return the stored result.
    pub async fn update(
        &self,
        id: &str,
        input: R::Update,
        operator: Option<String>,
    ) -> Result<R::Record, AppError> {
        let id = R::normalize_id(id)?;
        input.validate()?;
        self.fetch(&id).await?;
        let changes = R::changes(input, &Audit::now(operator));
        self.store
            .update(&R::by_id(&id), &changes)
            .await
            .map_err(|e| Self::not_found(e, &id))?;
        tracing::info!(parent: &self.span, id = %id, "updated");
        self.fetch(&id).await
    }

    pub async fn delete(&self, id: &str, operator: Option<String>) -> Result<(), AppError> {
        let id = R::normalize_id(id)?;
        self.fetch(&id).await?;
        self.store
            .delete(&R::by_id(&id), &Audit::now(operator))
            .await
            .map_err(|e| Self::not_found(e, &id))?;
        tracing::info!(parent: &self.span, id = %id, "deleted");
        Ok(())
    }
}
