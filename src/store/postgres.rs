//! PostgreSQL storage adapter, generic over the resource description.

use super::{Audit, Resource, Store, UnitOfWork};
use crate::error::StoreError;
use crate::pagination::PageRequest;
use crate::sql::{self, bind_value, bind_value_as, QueryBuf};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use std::marker::PhantomData;
use tracing::Span;

pub type PgTx = Transaction<'static, Postgres>;

#[async_trait]
impl UnitOfWork for PgTx {
    async fn commit(self) -> Result<(), StoreError> {
        Transaction::commit(self).await.map_err(StoreError::from)
    }

    async fn rollback(self) -> Result<(), StoreError> {
        Transaction::rollback(self).await.map_err(StoreError::from)
    }
}

pub struct PgStore<R> {
    pool: PgPool,
    span: Span,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> PgStore<R> {
    pub fn new(pool: PgPool, span: Span) -> Self {
        PgStore {
            pool,
            span,
            _resource: PhantomData,
        }
    }

    /// Log a storage failure where it happens and hand it upward.
    fn fail(&self, op: &'static str, e: sqlx::Error) -> StoreError {
        tracing::error!(parent: &self.span, table = R::TABLE.name, op, error = %e, "storage failure");
        StoreError::Database(e)
    }

    fn trace(&self, q: &QueryBuf) {
        tracing::debug!(parent: &self.span, sql = %q.sql, params = q.params.len(), "query");
    }

    async fn execute(&self, op: &'static str, q: &QueryBuf) -> Result<u64, StoreError> {
        self.trace(q);
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = bind_value(query, p);
        }
        let done = query.execute(&self.pool).await.map_err(|e| self.fail(op, e))?;
        Ok(done.rows_affected())
    }
}

#[async_trait]
impl<R: Resource> Store<R> for PgStore<R> {
    type Tx = PgTx;

    async fn create(&self, tx: &mut PgTx, record: &R::Record) -> Result<(), StoreError> {
        let q = sql::insert(&R::TABLE, &R::insert_values(record));
        self.trace(&q);
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = bind_value(query, p);
        }
        query.execute(&mut **tx).await.map_err(|e| self.fail("create", e))?;
        Ok(())
    }

    async fn get_list(
        &self,
        filter: &R::Filter,
        page: PageRequest,
    ) -> Result<(u64, Vec<R::Record>), StoreError> {
        let predicate = R::predicate(filter);
        let count_q = sql::count(&R::TABLE, predicate.as_ref());
        let page_q = sql::select_page(&R::TABLE, predicate.as_ref(), page.limit, page.offset());

        // Count and slice must observe the same snapshot.
        let mut tx = self.pool.begin().await.map_err(|e| self.fail("list", e))?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(|e| self.fail("list", e))?;

        self.trace(&count_q);
        let mut count = sqlx::query_as::<_, (i64,)>(&count_q.sql);
        for p in &count_q.params {
            count = bind_value_as(count, p);
        }
        let (total,) = count.fetch_one(&mut *tx).await.map_err(|e| self.fail("list", e))?;

        self.trace(&page_q);
        let mut rows = sqlx::query_as::<_, R::Record>(&page_q.sql);
        for p in &page_q.params {
            rows = bind_value_as(rows, p);
        }
        let records = rows.fetch_all(&mut *tx).await.map_err(|e| self.fail("list", e))?;
        tx.commit().await.map_err(|e| self.fail("list", e))?;

        Ok((total.max(0) as u64, records))
    }

    async fn get_single(&self, filter: &R::Filter) -> Result<R::Record, StoreError> {
        let q = sql::select_one(&R::TABLE, R::predicate(filter).as_ref());
        self.trace(&q);
        let mut query = sqlx::query_as::<_, R::Record>(&q.sql);
        for p in &q.params {
            query = bind_value_as(query, p);
        }
        query
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| self.fail("get_single", e))?
            .ok_or(StoreError::NotFound)
    }

    async fn get_count(&self, filter: &R::Filter) -> Result<u64, StoreError> {
        let q = sql::count(&R::TABLE, R::predicate(filter).as_ref());
        self.trace(&q);
        let mut query = sqlx::query_as::<_, (i64,)>(&q.sql);
        for p in &q.params {
            query = bind_value_as(query, p);
        }
        let (n,) = query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| self.fail("get_count", e))?;
        Ok(n.max(0) as u64)
    }

    async fn update(&self, filter: &R::Filter, changes: &R::Changes) -> Result<(), StoreError> {
        let assignments = R::assignments(changes);
        let Some(q) = sql::update(&R::TABLE, R::predicate(filter).as_ref(), &assignments) else {
            return Ok(());
        };
        match self.execute("update", &q).await? {
            0 => Err(StoreError::NotFound),
            _ => Ok(()),
        }
    }

    async fn delete(&self, filter: &R::Filter, audit: &Audit) -> Result<(), StoreError> {
        let q = sql::delete(&R::TABLE, R::predicate(filter).as_ref(), &audit.update_stamp());
        match self.execute("delete", &q).await? {
            0 => Err(StoreError::NotFound),
            _ => Ok(()),
        }
    }
}
