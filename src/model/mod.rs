//! Resource records, request inputs, filters and their storage mappings.

pub mod account;
pub mod account_type;
pub mod contact;
pub mod customer;

pub use account::{Account, AccountFilter, CreateAccount, UpdateAccount};
pub use account_type::{AccountType, AccountTypeFilter, CreateAccountType, UpdateAccountType};
pub use contact::{Contact, ContactFilter, ContactView, CreateContact, UpdateContact};
pub use customer::{CreateCustomer, Customer, CustomerFilter, UpdateCustomer};

use crate::field::Field;
use crate::sql::BindValue;
use crate::store::Audit;

/// An update input plus the audit columns the workflow stamps on it.
#[derive(Clone, Debug)]
pub struct Stamped<U> {
    pub patch: U,
    pub audit: Audit,
}

impl<U> Stamped<U> {
    pub fn new(patch: U, audit: &Audit) -> Self {
        Stamped {
            patch,
            audit: audit.clone(),
        }
    }

    fn stamp(&self, out: &mut Vec<(&'static str, BindValue)>) {
        out.extend(self.audit.update_stamp());
    }
}

/// Stored form of a validated UUID reference.
fn canonical(id: String) -> String {
    match uuid::Uuid::parse_str(&id) {
        Ok(u) => u.hyphenated().to_string(),
        Err(_) => id,
    }
}

fn canonical_ref(id: Option<String>) -> Option<String> {
    id.map(canonical)
}

/// Push `col` into the assignment list only when the field was supplied.
fn assign<T>(out: &mut Vec<(&'static str, BindValue)>, col: &'static str, f: &Field<T>)
where
    T: Clone + Into<BindValue>,
{
    if let Field::Present(v) = f {
        out.push((col, v.clone().into()));
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
