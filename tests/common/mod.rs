#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crm_service::error::StoreError;
use crm_service::model::{Account, AccountType, Contact, Customer};
use crm_service::pagination::PageRequest;
use crm_service::sql::BindValue;
use crm_service::store::Audit;
use crm_service::{Resource, Store, UnitOfWork};
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

pub const OPERATOR: &str = "67e55044-10b1-426f-9247-bb680e5fe0c8";

/// Column writes for the in-memory store. Reads go through `Resource::insert_values`,
/// so only the write direction needs a per-resource mapping.
pub trait MemoryResource: Resource {
    fn set_column(record: &mut Self::Record, column: &str, value: BindValue);
}

fn text(column: &str, value: BindValue) -> String {
    match value {
        BindValue::Text(s) => s,
        other => panic!("{column}: expected text, got {other:?}"),
    }
}

fn optional_text(column: &str, value: BindValue) -> Option<String> {
    match value {
        BindValue::Null => None,
        other => Some(text(column, other)),
    }
}

fn timestamp(column: &str, value: BindValue) -> DateTime<Utc> {
    match value {
        BindValue::Timestamp(t) => t,
        other => panic!("{column}: expected timestamp, got {other:?}"),
    }
}

fn flag(column: &str, value: BindValue) -> bool {
    match value {
        BindValue::Bool(b) => b,
        other => panic!("{column}: expected bool, got {other:?}"),
    }
}

impl MemoryResource for Account {
    fn set_column(r: &mut Account, column: &str, v: BindValue) {
        match column {
            "company_id" => r.company_id = optional_text(column, v),
            "login_name" => r.login_name = text(column, v),
            "name" => r.name = text(column, v),
            "password" => r.password = text(column, v),
            "is_deleted" => r.is_deleted = flag(column, v),
            "email" => r.email = optional_text(column, v),
            "phone" => r.phone = optional_text(column, v),
            "mobile" => r.mobile = optional_text(column, v),
            "updated_by" => r.updated_by = optional_text(column, v),
            "updated_at" => r.updated_at = timestamp(column, v),
            _ => panic!("account has no writable column {column}"),
        }
    }
}

impl MemoryResource for AccountType {
    fn set_column(r: &mut AccountType, column: &str, v: BindValue) {
        match column {
            "name" => r.name = text(column, v),
            _ => panic!("account type has no writable column {column}"),
        }
    }
}

impl MemoryResource for Contact {
    fn set_column(r: &mut Contact, column: &str, v: BindValue) {
        match column {
            "name" => r.name = text(column, v),
            "title" => r.title = text(column, v),
            "tel" => r.tel = text(column, v),
            "mobile" => r.mobile = text(column, v),
            "email" => r.email = text(column, v),
            "department" => r.department = text(column, v),
            "supervisor_id" => r.supervisor_id = optional_text(column, v),
            "account_id" => r.account_id = optional_text(column, v),
            "salesperson_id" => r.salesperson_id = optional_text(column, v),
            "updated_by" => r.updated_by = optional_text(column, v),
            "updated_at" => r.updated_at = timestamp(column, v),
            _ => panic!("contact has no writable column {column}"),
        }
    }
}

impl MemoryResource for Customer {
    fn set_column(r: &mut Customer, column: &str, v: BindValue) {
        match column {
            "name" => r.name = text(column, v),
            "short_name" => r.short_name = text(column, v),
            "eng_name" => r.eng_name = text(column, v),
            "zip_code" => r.zip_code = text(column, v),
            "address" => r.address = text(column, v),
            "eng_address" => r.eng_address = text(column, v),
            "tel" => r.tel = text(column, v),
            "fax" => r.fax = text(column, v),
            "email" => r.email = text(column, v),
            "contact_person" => r.contact_person = text(column, v),
            "tax_id_number" => r.tax_id_number = text(column, v),
            "remark" => r.remark = text(column, v),
            "updated_by" => r.updated_by = optional_text(column, v),
            "updated_at" => r.updated_at = timestamp(column, v),
            _ => panic!("customer has no writable column {column}"),
        }
    }
}

fn column_value<R: Resource>(record: &R::Record, column: &str) -> Option<BindValue> {
    R::insert_values(record)
        .into_iter()
        .find(|(c, _)| *c == column)
        .map(|(_, v)| v)
}

/// Same visibility rule as the SQL: soft-deleted rows never match, then the
/// filter's single equality predicate, if any.
fn visible<R: Resource>(filter: &R::Filter, record: &R::Record) -> bool {
    if let Some(flag) = R::TABLE.soft_delete {
        if column_value::<R>(record, flag) != Some(BindValue::Bool(false)) {
            return false;
        }
    }
    match R::predicate(filter) {
        Some(p) => column_value::<R>(record, p.column).as_ref() == Some(&p.value),
        None => true,
    }
}

#[derive(Default)]
pub struct TxLog {
    pub commits: AtomicUsize,
    pub rollbacks: AtomicUsize,
}

/// In-memory store keyed by record id. Ordering by key mirrors `ORDER BY id`.
pub struct MemoryStore<R: Resource> {
    rows: Arc<RwLock<BTreeMap<String, R::Record>>>,
    fail_create: AtomicBool,
    fail_commit: AtomicBool,
    fail_read: AtomicBool,
    pub log: Arc<TxLog>,
}

pub struct MemoryTx<R: Resource> {
    rows: Arc<RwLock<BTreeMap<String, R::Record>>>,
    staged: Vec<R::Record>,
    fail_commit: bool,
    log: Arc<TxLog>,
}

impl<R: MemoryResource> MemoryStore<R> {
    pub fn new() -> Self {
        MemoryStore {
            rows: Arc::new(RwLock::new(BTreeMap::new())),
            fail_create: AtomicBool::new(false),
            fail_commit: AtomicBool::new(false),
            fail_read: AtomicBool::new(false),
            log: Arc::new(TxLog::default()),
        }
    }

    pub fn begin(&self) -> MemoryTx<R> {
        MemoryTx {
            rows: self.rows.clone(),
            staged: Vec::new(),
            fail_commit: self.fail_commit.load(Ordering::SeqCst),
            log: self.log.clone(),
        }
    }

    pub fn fail_creates(&self) {
        self.fail_create.store(true, Ordering::SeqCst);
    }

    /// Transactions begun after this call fail to commit and keep nothing.
    pub fn fail_commits(&self) {
        self.fail_commit.store(true, Ordering::SeqCst);
    }

    pub fn fail_reads(&self) {
        self.fail_read.store(true, Ordering::SeqCst);
    }

    pub fn seed(&self, record: R::Record) {
        self.rows.write().insert(R::id(&record).to_string(), record);
    }

    /// Every stored row, including soft-deleted ones.
    pub fn raw(&self) -> Vec<R::Record> {
        self.rows.read().values().cloned().collect()
    }

    fn select(&self, filter: &R::Filter) -> Result<Vec<R::Record>, StoreError> {
        if self.fail_read.load(Ordering::SeqCst) {
            return Err(injected("read failed"));
        }
        Ok(self
            .rows
            .read()
            .values()
            .filter(|r| visible::<R>(filter, r))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl<R: Resource> UnitOfWork for MemoryTx<R> {
    async fn commit(self) -> Result<(), StoreError> {
        if self.fail_commit {
            return Err(injected("commit failed"));
        }
        let mut rows = self.rows.write();
        for record in self.staged {
            rows.insert(R::id(&record).to_string(), record);
        }
        self.log.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn rollback(self) -> Result<(), StoreError> {
        self.log.rollbacks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn injected(msg: &str) -> StoreError {
    StoreError::Database(sqlx::Error::Protocol(msg.into()))
}

#[async_trait]
impl<R: MemoryResource> Store<R> for MemoryStore<R> {
    type Tx = MemoryTx<R>;

    async fn create(&self, tx: &mut MemoryTx<R>, record: &R::Record) -> Result<(), StoreError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(injected("insert failed"));
        }
        if self.rows.read().contains_key(R::id(record)) {
            return Err(injected("duplicate key"));
        }
        tx.staged.push(record.clone());
        Ok(())
    }

    async fn get_list(
        &self,
        filter: &R::Filter,
        page: PageRequest,
    ) -> Result<(u64, Vec<R::Record>), StoreError> {
        let all = self.select(filter)?;
        let total = all.len() as u64;
        let records = all
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok((total, records))
    }

    async fn get_single(&self, filter: &R::Filter) -> Result<R::Record, StoreError> {
        self.select(filter)?.into_iter().next().ok_or(StoreError::NotFound)
    }

    async fn get_count(&self, filter: &R::Filter) -> Result<u64, StoreError> {
        Ok(self.select(filter)?.len() as u64)
    }

    async fn update(&self, filter: &R::Filter, changes: &R::Changes) -> Result<(), StoreError> {
        let assignments = R::assignments(changes);
        let mut rows = self.rows.write();
        let mut touched = 0;
        for record in rows.values_mut().filter(|r| visible::<R>(filter, r)) {
            for (column, value) in &assignments {
                R::set_column(record, column, value.clone());
            }
            touched += 1;
        }
        if touched == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, filter: &R::Filter, audit: &Audit) -> Result<(), StoreError> {
        let mut rows = self.rows.write();
        let ids: Vec<String> = rows
            .values()
            .filter(|r| visible::<R>(filter, r))
            .map(|r| R::id(r).to_string())
            .collect();
        if ids.is_empty() {
            return Err(StoreError::NotFound);
        }
        for id in ids {
            match R::TABLE.soft_delete {
                Some(flag) => {
                    if let Some(record) = rows.get_mut(&id) {
                        R::set_column(record, flag, BindValue::Bool(true));
                        for (column, value) in audit.update_stamp() {
                            R::set_column(record, column, value);
                        }
                    }
                }
                None => {
                    rows.remove(&id);
                }
            }
        }
        Ok(())
    }
}

/// Formatted log output captured for the current thread while the guard lives.
pub struct LogCapture {
    buf: Arc<Mutex<Vec<u8>>>,
    _guard: tracing::subscriber::DefaultGuard,
}

struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for CaptureWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl LogCapture {
    pub fn start() -> Self {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || CaptureWriter(writer.clone()))
            .finish();
        LogCapture {
            buf,
            _guard: tracing::subscriber::set_default(subscriber),
        }
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock()).into_owned()
    }
}
