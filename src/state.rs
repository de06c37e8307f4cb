//! Shared application state: the pool, settings and one manager per resource.

use crate::config::Settings;
use crate::model::{Account, AccountType, Contact, Customer};
use crate::service::{ContactManager, ContactResolver, ResourceManager, StoreNames};
use crate::store::{PgStore, Resource};
use sqlx::PgPool;
use std::sync::Arc;

pub type PgManager<R> = ResourceManager<R, PgStore<R>>;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub settings: Arc<Settings>,
    pub accounts: Arc<PgManager<Account>>,
    pub account_types: Arc<PgManager<AccountType>>,
    pub contacts: Arc<ContactManager<PgStore<Contact>>>,
    pub customers: Arc<PgManager<Customer>>,
}

fn store<R: Resource>(pool: &PgPool) -> Arc<PgStore<R>> {
    Arc::new(PgStore::new(
        pool.clone(),
        tracing::info_span!("store", resource = R::NAME),
    ))
}

fn manager<R: Resource>(store: Arc<PgStore<R>>) -> PgManager<R> {
    ResourceManager::new(store, tracing::info_span!("manager", resource = R::NAME))
}

impl AppState {
    pub fn new(pool: PgPool, settings: Settings) -> Self {
        let account_store = store::<Account>(&pool);
        let contact_store = store::<Contact>(&pool);
        let resolver = ContactResolver::new(
            Arc::new(StoreNames::<Contact, _>::new(contact_store.clone())),
            Arc::new(StoreNames::<Account, _>::new(account_store.clone())),
            tracing::info_span!("enrich", resource = Contact::NAME),
        );
        AppState {
            accounts: Arc::new(manager(account_store)),
            account_types: Arc::new(manager(store::<AccountType>(&pool))),
            contacts: Arc::new(ContactManager::new(manager(contact_store), resolver)),
            customers: Arc::new(manager(store::<Customer>(&pool))),
            settings: Arc::new(settings),
            pool,
        }
    }
}

/// Selects the manager serving `R`, so one set of handlers covers every plain resource.
pub trait Managed<R: Resource> {
    fn manager(&self) -> &PgManager<R>;
}

impl Managed<Account> for AppState {
    fn manager(&self) -> &PgManager<Account> {
        &self.accounts
    }
}

impl Managed<AccountType> for AppState {
    fn manager(&self) -> &PgManager<AccountType> {
        &self.account_types
    }
}

impl Managed<Customer> for AppState {
    fn manager(&self) -> &PgManager<Customer> {
        &self.customers
    }
}
