//! Post-read enrichment: replace contact references with display names.
//!
//! Lookups are best-effort. A reference that does not resolve, or a lookup that fails,
//! yields an empty name and a warning; the primary read still succeeds.

use crate::error::{AppError, StoreError};
use crate::model::{Contact, ContactView};
use crate::pagination::{PageRequest, Pagination};
use crate::service::ResourceManager;
use crate::store::{Resource, Store};
use async_trait::async_trait;
use futures::future::{join, join_all};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::Span;

/// Point lookup of a display name by id.
#[async_trait]
pub trait NameLookup: Send + Sync {
    async fn name_of(&self, id: &str) -> Result<String, StoreError>;
}

/// [`NameLookup`] over any resource store.
pub struct StoreNames<R, S> {
    store: Arc<S>,
    _resource: PhantomData<fn() -> R>,
}

impl<R, S> StoreNames<R, S> {
    pub fn new(store: Arc<S>) -> Self {
        StoreNames {
            store,
            _resource: PhantomData,
        }
    }
}

#[async_trait]
impl<R, S> NameLookup for StoreNames<R, S>
where
    R: Resource,
    S: Store<R>,
{
    async fn name_of(&self, id: &str) -> Result<String, StoreError> {
        let record = self.store.get_single(&R::by_id(id)).await?;
        Ok(R::display_name(&record).to_string())
    }
}

pub struct ContactResolver {
    supervisors: Arc<dyn NameLookup>,
    accounts: Arc<dyn NameLookup>,
    span: Span,
}

impl ContactResolver {
    pub fn new(supervisors: Arc<dyn NameLookup>, accounts: Arc<dyn NameLookup>, span: Span) -> Self {
        ContactResolver {
            supervisors,
            accounts,
            span,
        }
    }

    async fn lookup(&self, kind: &'static str, names: &dyn NameLookup, id: Option<&str>) -> String {
        let Some(id) = id else {
            return String::new();
        };
        match names.name_of(id).await {
            Ok(name) => name,
            Err(StoreError::NotFound) => {
                tracing::warn!(parent: &self.span, kind, id, "dangling reference");
                String::new()
            }
            Err(e) => {
                tracing::warn!(parent: &self.span, kind, id, error = %e, "name lookup failed");
                String::new()
            }
        }
    }

    pub async fn resolve(&self, contact: Contact) -> ContactView {
        let (supervisor_name, account_name) = join(
            self.lookup("supervisor", self.supervisors.as_ref(), contact.supervisor_id.as_deref()),
            self.lookup("account", self.accounts.as_ref(), contact.account_id.as_deref()),
        )
        .await;
        ContactView {
            supervisor_name,
            account_name,
            salesperson_name: contact.salesperson_name.clone().unwrap_or_default(),
            created_by_name: contact.created_by_name.clone().unwrap_or_default(),
            updated_by_name: contact.updated_by_name.clone().unwrap_or_default(),
            contact,
        }
    }

    /// One resolution per record, run concurrently; output keeps input order.
    pub async fn resolve_all(&self, contacts: Vec<Contact>) -> Vec<ContactView> {
        join_all(contacts.into_iter().map(|c| self.resolve(c))).await
    }
}

/// Contact manager: the generic workflows plus enrichment on every read.
pub struct ContactManager<S> {
    inner: ResourceManager<Contact, S>,
    resolver: ContactResolver,
}

impl<S: Store<Contact>> ContactManager<S> {
    pub fn new(inner: ResourceManager<Contact, S>, resolver: ContactResolver) -> Self {
        ContactManager { inner, resolver }
    }

    pub fn inner(&self) -> &ResourceManager<Contact, S> {
        &self.inner
    }

    /// Creates, then re-reads so preloaded names are filled in. The create is already
    /// committed when the re-read runs, so a failed re-read falls back to the created record.
    pub async fn create(
        &self,
        tx: S::Tx,
        input: <Contact as Resource>::Create,
        operator: Option<String>,
    ) -> Result<ContactView, AppError> {
        let created = self.inner.create(tx, input, operator).await?;
        match self.get_by_single(&created.id).await {
            Ok(view) => Ok(view),
            Err(e) => {
                tracing::warn!(parent: self.inner.span(), id = %created.id, error = %e, "re-read after create failed");
                Ok(self.resolver.resolve(created).await)
            }
        }
    }

    pub async fn get_by_single(&self, id: &str) -> Result<ContactView, AppError> {
        let contact = self.inner.get_by_single(id).await?;
        Ok(self.resolver.resolve(contact).await)
    }

    pub async fn get_by_list(
        &self,
        filter: <Contact as Resource>::Filter,
        page: PageRequest,
    ) -> Result<(Vec<ContactView>, Pagination), AppError> {
        let (contacts, pagination) = self.inner.get_by_list(filter, page).await?;
        Ok((self.resolver.resolve_all(contacts).await, pagination))
    }

    pub async fn update(
        &self,
        id: &str,
        input: <Contact as Resource>::Update,
        operator: Option<String>,
    ) -> Result<ContactView, AppError> {
        let contact = self.inner.update(id, input, operator).await?;
        Ok(self.resolver.resolve(contact).await)
    }

    pub async fn delete(&self, id: &str, operator: Option<String>) -> Result<(), AppError> {
        self.inner.delete(id, operator).await
    }
}
