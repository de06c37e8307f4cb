use super::{assign, canonical, new_id};
use crate::error::AppError;
use crate::field::Field;
use crate::service::validation::{self as v, Validate};
use crate::sql::{BindValue, Predicate, TableSpec};
use crate::store::{Audit, Resource};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, FromRow, ToSchema)]
pub struct AccountType {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct CreateAccountType {
    pub name: String,
}

impl Validate for CreateAccountType {
    fn validate(&self) -> Result<(), AppError> {
        v::required("name", &self.name)
    }
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateAccountType {
    #[schema(value_type = Option<String>)]
    pub name: Field<String>,
}

impl Validate for UpdateAccountType {
    fn validate(&self) -> Result<(), AppError> {
        v::present_required("name", &self.name)
    }
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct AccountTypeFilter {
    #[serde(default)]
    pub id: Option<String>,
}

impl Validate for AccountTypeFilter {
    fn validate(&self) -> Result<(), AppError> {
        v::single_criterion(&[("id", self.id.as_deref())])?;
        v::optional_uuid("id", self.id.as_deref())
    }
}

impl Resource for AccountType {
    type Record = AccountType;
    type Create = CreateAccountType;
    type Update = UpdateAccountType;
    type Changes = UpdateAccountType;
    type Filter = AccountTypeFilter;

    const NAME: &'static str = "account type";
    const TABLE: TableSpec = TableSpec {
        name: "account_types",
        id_column: "id",
        columns: &["id", "name"],
        soft_delete: None,
        preloads: &[],
    };

    fn id(record: &AccountType) -> &str {
        &record.id
    }

    fn display_name(record: &AccountType) -> &str {
        &record.name
    }

    fn by_id(id: &str) -> AccountTypeFilter {
        AccountTypeFilter {
            id: Some(id.to_string()),
        }
    }

    fn new_record(input: CreateAccountType, _audit: &Audit) -> AccountType {
        AccountType {
            id: new_id(),
            name: input.name,
        }
    }

    fn changes(input: UpdateAccountType, _audit: &Audit) -> UpdateAccountType {
        input
    }

    fn insert_values(r: &AccountType) -> Vec<(&'static str, BindValue)> {
        vec![("id", r.id.clone().into()), ("name", r.name.clone().into())]
    }

    fn assignments(c: &UpdateAccountType) -> Vec<(&'static str, BindValue)> {
        let mut out = Vec::new();
        assign(&mut out, "name", &c.name);
        out
    }

    fn predicate(f: &AccountTypeFilter) -> Option<Predicate> {
        f.id.clone().map(|id| Predicate::eq("id", canonical(id)))
    }
}
