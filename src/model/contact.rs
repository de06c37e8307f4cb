//! Contacts reference a supervisor (another contact), an account and a salesperson.
//! Salesperson and audit user names are preloaded with the row; supervisor and account
//! names are resolved afterwards by the enrichment stage.

use super::{assign, canonical, canonical_ref, new_id, Stamped};
use crate::error::AppError;
use crate::field::Field;
use crate::service::validation::{self as v, Validate};
use crate::sql::{BindValue, Predicate, Preload, TableSpec};
use crate::store::{Audit, Resource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, FromRow, ToSchema)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub title: String,
    pub tel: String,
    pub mobile: String,
    pub email: String,
    pub department: String,
    pub supervisor_id: Option<String>,
    pub account_id: Option<String>,
    pub salesperson_id: Option<String>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(default)]
    #[serde(skip)]
    pub salesperson_name: Option<String>,
    #[sqlx(default)]
    #[serde(skip)]
    pub created_by_name: Option<String>,
    #[sqlx(default)]
    #[serde(skip)]
    pub updated_by_name: Option<String>,
}

/// A contact with every reference resolved to a display name. Unresolved names are empty.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct ContactView {
    #[serde(flatten)]
    pub contact: Contact,
    pub supervisor_name: String,
    pub account_name: String,
    pub salesperson_name: String,
    pub created_by_name: String,
    pub updated_by_name: String,
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct CreateContact {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tel: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub supervisor_id: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub salesperson_id: Option<String>,
}

impl Validate for CreateContact {
    fn validate(&self) -> Result<(), AppError> {
        v::required("name", &self.name)?;
        v::max_length("title", &self.title, v::MAX_TEXT)?;
        v::max_length("tel", &self.tel, v::MAX_TEXT)?;
        v::max_length("mobile", &self.mobile, v::MAX_TEXT)?;
        v::email("email", &self.email)?;
        v::max_length("department", &self.department, v::MAX_TEXT)?;
        v::optional_uuid("supervisor_id", self.supervisor_id.as_deref())?;
        v::optional_uuid("account_id", self.account_id.as_deref())?;
        v::optional_uuid("salesperson_id", self.salesperson_id.as_deref())
    }
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateContact {
    #[schema(value_type = Option<String>)]
    pub name: Field<String>,
    #[schema(value_type = Option<String>)]
    pub title: Field<String>,
    #[schema(value_type = Option<String>)]
    pub tel: Field<String>,
    #[schema(value_type = Option<String>)]
    pub mobile: Field<String>,
    #[schema(value_type = Option<String>)]
    pub email: Field<String>,
    #[schema(value_type = Option<String>)]
    pub department: Field<String>,
    #[schema(value_type = Option<String>)]
    pub supervisor_id: Field<Option<String>>,
    #[schema(value_type = Option<String>)]
    pub account_id: Field<Option<String>>,
    #[schema(value_type = Option<String>)]
    pub salesperson_id: Field<Option<String>>,
}

impl Validate for UpdateContact {
    fn validate(&self) -> Result<(), AppError> {
        v::present_required("name", &self.name)?;
        v::present_text("title", &self.title)?;
        v::present_text("tel", &self.tel)?;
        v::present_text("mobile", &self.mobile)?;
        if let Some(email) = self.email.as_present() {
            v::email("email", email)?;
        }
        v::present_text("department", &self.department)?;
        v::present_uuid("supervisor_id", &self.supervisor_id)?;
        v::present_uuid("account_id", &self.account_id)?;
        v::present_uuid("salesperson_id", &self.salesperson_id)
    }
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct ContactFilter {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
}

impl Validate for ContactFilter {
    fn validate(&self) -> Result<(), AppError> {
        v::single_criterion(&[
            ("id", self.id.as_deref()),
            ("account_id", self.account_id.as_deref()),
        ])?;
        v::optional_uuid("id", self.id.as_deref())?;
        v::optional_uuid("account_id", self.account_id.as_deref())
    }
}

impl Resource for Contact {
    type Record = Contact;
    type Create = CreateContact;
    type Update = UpdateContact;
    type Changes = Stamped<UpdateContact>;
    type Filter = ContactFilter;

    const NAME: &'static str = "contact";
    const TABLE: TableSpec = TableSpec {
        name: "contacts",
        id_column: "id",
        columns: &[
            "id",
            "name",
            "title",
            "tel",
            "mobile",
            "email",
            "department",
            "supervisor_id",
            "account_id",
            "salesperson_id",
            "created_by",
            "updated_by",
            "created_at",
            "updated_at",
        ],
        soft_delete: None,
        preloads: &[
            Preload {
                alias: "salesperson_name",
                our_key: "salesperson_id",
                table: "accounts",
                their_key: "id",
                their_column: "name",
            },
            Preload {
                alias: "created_by_name",
                our_key: "created_by",
                table: "accounts",
                their_key: "id",
                their_column: "name",
            },
            Preload {
                alias: "updated_by_name",
                our_key: "updated_by",
                table: "accounts",
                their_key: "id",
                their_column: "name",
            },
        ],
    };

    fn id(record: &Contact) -> &str {
        &record.id
    }

    fn display_name(record: &Contact) -> &str {
        &record.name
    }

    fn by_id(id: &str) -> ContactFilter {
        ContactFilter {
            id: Some(id.to_string()),
            ..Default::default()
        }
    }

    fn new_record(input: CreateContact, audit: &Audit) -> Contact {
        Contact {
            id: new_id(),
            name: input.name,
            title: input.title,
            tel: input.tel,
            mobile: input.mobile,
            email: input.email,
            department: input.department,
            supervisor_id: canonical_ref(input.supervisor_id),
            account_id: canonical_ref(input.account_id),
            salesperson_id: canonical_ref(input.salesperson_id),
            created_by: audit.operator.clone(),
            updated_by: audit.operator.clone(),
            created_at: audit.at,
            updated_at: audit.at,
            salesperson_name: None,
            created_by_name: None,
            updated_by_name: None,
        }
    }

    fn changes(mut input: UpdateContact, audit: &Audit) -> Stamped<UpdateContact> {
        input.supervisor_id = input.supervisor_id.map(canonical_ref);
        input.account_id = input.account_id.map(canonical_ref);
        input.salesperson_id = input.salesperson_id.map(canonical_ref);
        Stamped::new(input, audit)
    }

    fn insert_values(r: &Contact) -> Vec<(&'static str, BindValue)> {
        vec![
            ("id", r.id.clone().into()),
            ("name", r.name.clone().into()),
            ("title", r.title.clone().into()),
            ("tel", r.tel.clone().into()),
            ("mobile", r.mobile.clone().into()),
            ("email", r.email.clone().into()),
            ("department", r.department.clone().into()),
            ("supervisor_id", r.supervisor_id.clone().into()),
            ("account_id", r.account_id.clone().into()),
            ("salesperson_id", r.salesperson_id.clone().into()),
            ("created_by", r.created_by.clone().into()),
            ("updated_by", r.updated_by.clone().into()),
            ("created_at", r.created_at.into()),
            ("updated_at", r.updated_at.into()),
        ]
    }

    fn assignments(c: &Stamped<UpdateContact>) -> Vec<(&'static str, BindValue)> {
        let p = &c.patch;
        let mut out = Vec::new();
        assign(&mut out, "name", &p.name);
        assign(&mut out, "title", &p.title);
        assign(&mut out, "tel", &p.tel);
        assign(&mut out, "mobile", &p.mobile);
        assign(&mut out, "email", &p.email);
        assign(&mut out, "department", &p.department);
        assign(&mut out, "supervisor_id", &p.supervisor_id);
        assign(&mut out, "account_id", &p.account_id);
        assign(&mut out, "salesperson_id", &p.salesperson_id);
        c.stamp(&mut out);
        out
    }

    fn predicate(f: &ContactFilter) -> Option<Predicate> {
        if let Some(id) = &f.id {
            return Some(Predicate::eq("id", canonical(id.clone())));
        }
        f.account_id
            .clone()
            .map(|a| Predicate::eq("account_id", canonical(a)))
    }
}
