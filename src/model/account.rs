//! Accounts: login identities. Deleting an account only flags it.

use super::{assign, canonical, canonical_ref, new_id, Stamped};
use crate::error::AppError;
use crate::field::Field;
use crate::service::validation::{self as v, Validate};
use crate::sql::{BindValue, Predicate, TableSpec};
use crate::store::{Audit, Resource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, FromRow, ToSchema)]
pub struct Account {
    pub id: String,
    pub company_id: Option<String>,
    pub login_name: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub is_deleted: bool,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct CreateAccount {
    #[serde(default)]
    pub company_id: Option<String>,
    pub login_name: String,
    pub name: String,
    pub password: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
}

impl Validate for CreateAccount {
    fn validate(&self) -> Result<(), AppError> {
        v::optional_uuid("company_id", self.company_id.as_deref())?;
        v::required("login_name", &self.login_name)?;
        v::required("name", &self.name)?;
        v::required("password", &self.password)?;
        v::optional_email("email", self.email.as_deref())?;
        v::max_length("phone", self.phone.as_deref().unwrap_or(""), v::MAX_TEXT)?;
        v::max_length("mobile", self.mobile.as_deref().unwrap_or(""), v::MAX_TEXT)
    }
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateAccount {
    #[schema(value_type = Option<String>)]
    pub company_id: Field<Option<String>>,
    #[schema(value_type = Option<String>)]
    pub login_name: Field<String>,
    #[schema(value_type = Option<String>)]
    pub name: Field<String>,
    #[schema(value_type = Option<String>)]
    pub password: Field<String>,
    #[schema(value_type = Option<String>)]
    pub email: Field<Option<String>>,
    #[schema(value_type = Option<String>)]
    pub phone: Field<Option<String>>,
    #[schema(value_type = Option<String>)]
    pub mobile: Field<Option<String>>,
}

impl Validate for UpdateAccount {
    fn validate(&self) -> Result<(), AppError> {
        v::present_uuid("company_id", &self.company_id)?;
        v::present_required("login_name", &self.login_name)?;
        v::present_required("name", &self.name)?;
        v::present_required("password", &self.password)?;
        if let Some(email) = self.email.as_present() {
            v::optional_email("email", email.as_deref())?;
        }
        v::present_optional_text("phone", &self.phone)?;
        v::present_optional_text("mobile", &self.mobile)
    }
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct AccountFilter {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub company_id: Option<String>,
}

impl Validate for AccountFilter {
    fn validate(&self) -> Result<(), AppError> {
        v::single_criterion(&[
            ("id", self.id.as_deref()),
            ("company_id", self.company_id.as_deref()),
        ])?;
        v::optional_uuid("id", self.id.as_deref())?;
        v::optional_uuid("company_id", self.company_id.as_deref())
    }
}

impl Resource for Account {
    type Record = Account;
    type Create = CreateAccount;
    type Update = UpdateAccount;
    type Changes = Stamped<UpdateAccount>;
    type Filter = AccountFilter;

    const NAME: &'static str = "account";
    const TABLE: TableSpec = TableSpec {
        name: "accounts",
        id_column: "id",
        columns: &[
            "id",
            "company_id",
            "login_name",
            "name",
            "password",
            "is_deleted",
            "email",
            "phone",
            "mobile",
            "created_by",
            "updated_by",
            "created_at",
            "updated_at",
        ],
        soft_delete: Some("is_deleted"),
        preloads: &[],
    };

    fn id(record: &Account) -> &str {
        &record.id
    }

    fn display_name(record: &Account) -> &str {
        &record.name
    }

    fn by_id(id: &str) -> AccountFilter {
        AccountFilter {
            id: Some(id.to_string()),
            ..Default::default()
        }
    }

    fn new_record(input: CreateAccount, audit: &Audit) -> Account {
        Account {
            id: new_id(),
            company_id: canonical_ref(input.company_id),
            login_name: input.login_name,
            name: input.name,
            password: input.password,
            is_deleted: false,
            email: input.email,
            phone: input.phone,
            mobile: input.mobile,
            created_by: audit.operator.clone(),
            updated_by: audit.operator.clone(),
            created_at: audit.at,
            updated_at: audit.at,
        }
    }

    fn changes(mut input: UpdateAccount, audit: &Audit) -> Stamped<UpdateAccount> {
        input.company_id = input.company_id.map(canonical_ref);
        Stamped::new(input, audit)
    }

    fn insert_values(r: &Account) -> Vec<(&'static str, BindValue)> {
        vec![
            ("id", r.id.clone().into()),
            ("company_id", r.company_id.clone().into()),
            ("login_name", r.login_name.clone().into()),
            ("name", r.name.clone().into()),
            ("password", r.password.clone().into()),
            ("is_deleted", r.is_deleted.into()),
            ("email", r.email.clone().into()),
            ("phone", r.phone.clone().into()),
            ("mobile", r.mobile.clone().into()),
            ("created_by", r.created_by.clone().into()),
            ("updated_by", r.updated_by.clone().into()),
            ("created_at", r.created_at.into()),
            ("updated_at", r.updated_at.into()),
        ]
    }

    fn assignments(c: &Stamped<UpdateAccount>) -> Vec<(&'static str, BindValue)> {
        let p = &c.patch;
        let mut out = Vec::new();
        assign(&mut out, "company_id", &p.company_id);
        assign(&mut out, "login_name", &p.login_name);
        assign(&mut out, "name", &p.name);
        assign(&mut out, "password", &p.password);
        assign(&mut out, "email", &p.email);
        assign(&mut out, "phone", &p.phone);
        assign(&mut out, "mobile", &p.mobile);
        c.stamp(&mut out);
        out
    }

    fn predicate(f: &AccountFilter) -> Option<Predicate> {
        if let Some(id) = &f.id {
            return Some(Predicate::eq("id", canonical(id.clone())));
        }
        f.company_id
            .clone()
            .map(|c| Predicate::eq("company_id", canonical(c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_is_never_serialized() {
        let a = Account::new_record(
            CreateAccount {
                company_id: None,
                login_name: "jdoe".into(),
                name: "Jane".into(),
                password: "secret".into(),
                email: None,
                phone: None,
                mobile: None,
            },
            &Audit::now(None),
        );
        let json = serde_json::to_value(&a).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["is_deleted"], false);
    }

    #[test]
    fn company_filter_predicate() {
        let f = AccountFilter {
            company_id: Some("0F8FAD5B-D9CB-469F-A165-70867728950E".into()),
            ..Default::default()
        };
        assert_eq!(
            Account::predicate(&f),
            Some(Predicate::eq("company_id", "0f8fad5b-d9cb-469f-a165-70867728950e"))
        );
        assert!(Account::predicate(&AccountFilter::default()).is_none());
    }

    #[test]
    fn sparse_update_assigns_only_present_fields() {
        let patch: UpdateAccount = serde_json::from_str(r#"{"name": "New", "email": null}"#).unwrap();
        let cols: Vec<&str> = Account::assignments(&Stamped::new(patch, &Audit::now(None)))
            .into_iter()
            .map(|(c, _)| c)
            .collect();
        assert_eq!(cols, vec!["name", "email", "updated_at"]);
    }

    #[test]
    fn update_checks_phone_and_mobile_length() {
        let long = "9".repeat(v::MAX_TEXT + 1);
        let patch: UpdateAccount =
            serde_json::from_value(serde_json::json!({ "phone": &long })).unwrap();
        assert!(matches!(patch.validate(), Err(AppError::Format(_))));
        let patch: UpdateAccount =
            serde_json::from_value(serde_json::json!({ "mobile": &long, "phone": null })).unwrap();
        assert!(patch.validate().is_err());
        let cleared: UpdateAccount = serde_json::from_str(r#"{"phone": null}"#).unwrap();
        assert!(cleared.validate().is_ok());
    }

    #[test]
    fn company_reference_is_stored_canonical() {
        let patch: UpdateAccount = serde_json::from_str(
            r#"{"company_id": "urn:uuid:0F8FAD5B-D9CB-469F-A165-70867728950E"}"#,
        )
        .unwrap();
        patch.validate().unwrap();
        let changes = Account::changes(patch, &Audit::now(None));
        assert_eq!(
            changes.patch.company_id,
            Field::Present(Some("0f8fad5b-d9cb-469f-a165-70867728950e".into()))
        );
    }
}
