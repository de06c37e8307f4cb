//! Customers are keyed by a caller-supplied `c_id`.

use super::{assign, Stamped};
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
pub struct Customer {
    pub c_id: String,
    /// Legal name.
    pub name: String,
    pub short_name: String,
    pub eng_name: String,
    pub zip_code: String,
    pub address: String,
    pub eng_address: String,
    pub tel: String,
    pub fax: String,
    pub email: String,
    pub contact_person: String,
    pub tax_id_number: String,
    pub remark: String,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct CreateCustomer {
    pub c_id: String,
    pub name: String,
    pub short_name: String,
    #[serde(default)]
    pub eng_name: String,
    pub zip_code: String,
    pub address: String,
    #[serde(default)]
    pub eng_address: String,
    pub tel: String,
    #[serde(default)]
    pub fax: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub contact_person: String,
    pub tax_id_number: String,
    #[serde(default)]
    pub remark: String,
}

impl Validate for CreateCustomer {
    fn validate(&self) -> Result<(), AppError> {
        v::required("c_id", &self.c_id)?;
        v::required("name", &self.name)?;
        v::required("short_name", &self.short_name)?;
        v::max_length("eng_name", &self.eng_name, v::MAX_TEXT)?;
        v::required("zip_code", &self.zip_code)?;
        v::required("address", &self.address)?;
        v::max_length("eng_address", &self.eng_address, v::MAX_TEXT)?;
        v::required("tel", &self.tel)?;
        v::max_length("fax", &self.fax, v::MAX_TEXT)?;
        v::email("email", &self.email)?;
        v::max_length("contact_person", &self.contact_person, v::MAX_TEXT)?;
        v::required("tax_id_number", &self.tax_id_number)?;
        v::max_length("remark", &self.remark, 1000)
    }
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateCustomer {
    #[schema(value_type = Option<String>)]
    pub name: Field<String>,
    #[schema(value_type = Option<String>)]
    pub short_name: Field<String>,
    #[schema(value_type = Option<String>)]
    pub eng_name: Field<String>,
    #[schema(value_type = Option<String>)]
    pub zip_code: Field<String>,
    #[schema(value_type = Option<String>)]
    pub address: Field<String>,
    #[schema(value_type = Option<String>)]
    pub eng_address: Field<String>,
    #[schema(value_type = Option<String>)]
    pub tel: Field<String>,
    #[schema(value_type = Option<String>)]
    pub fax: Field<String>,
    #[schema(value_type = Option<String>)]
    pub email: Field<String>,
    #[schema(value_type = Option<String>)]
    pub contact_person: Field<String>,
    #[schema(value_type = Option<String>)]
    pub tax_id_number: Field<String>,
    #[schema(value_type = Option<String>)]
    pub remark: Field<String>,
}

impl Validate for UpdateCustomer {
    fn validate(&self) -> Result<(), AppError> {
        v::present_required("name", &self.name)?;
        v::present_required("short_name", &self.short_name)?;
        v::present_text("eng_name", &self.eng_name)?;
        v::present_required("zip_code", &self.zip_code)?;
        v::present_required("address", &self.address)?;
        v::present_text("eng_address", &self.eng_address)?;
        v::present_required("tel", &self.tel)?;
        v::present_text("fax", &self.fax)?;
        if let Some(email) = self.email.as_present() {
            v::email("email", email)?;
        }
        v::present_text("contact_person", &self.contact_person)?;
        v::present_required("tax_id_number", &self.tax_id_number)?;
        if let Some(remark) = self.remark.as_present() {
            v::max_length("remark", remark, 1000)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
pub struct CustomerFilter {
    #[serde(default)]
    pub c_id: Option<String>,
}

impl Validate for CustomerFilter {
    fn validate(&self) -> Result<(), AppError> {
        v::single_criterion(&[("c_id", self.c_id.as_deref())])
    }
}

impl Resource for Customer {
    type Record = Customer;
    type Create = CreateCustomer;
    type Update = UpdateCustomer;
    type Changes = Stamped<UpdateCustomer>;
    type Filter = CustomerFilter;

    const NAME: &'static str = "customer";
    const TABLE: TableSpec = TableSpec {
        name: "customers",
        id_column: "c_id",
        columns: &[
            "c_id",
            "name",
            "short_name",
            "eng_name",
            "zip_code",
            "address",
            "eng_address",
            "tel",
            "fax",
            "email",
            "contact_person",
            "tax_id_number",
            "remark",
            "created_by",
            "updated_by",
            "created_at",
            "updated_at",
        ],
        soft_delete: None,
        preloads: &[],
    };

    fn id(record: &Customer) -> &str {
        &record.c_id
    }

    fn display_name(record: &Customer) -> &str {
        &record.name
    }

    fn by_id(id: &str) -> CustomerFilter {
        CustomerFilter {
            c_id: Some(id.to_string()),
        }
    }

    fn normalize_id(id: &str) -> Result<String, AppError> {
        v::required("c_id", id)?;
        Ok(id.to_string())
    }

    fn new_record(input: CreateCustomer, audit: &Audit) -> Customer {
        Customer {
            c_id: input.c_id,
            name: input.name,
            short_name: input.short_name,
            eng_name: input.eng_name,
            zip_code: input.zip_code,
            address: input.address,
            eng_address: input.eng_address,
            tel: input.tel,
            fax: input.fax,
            email: input.email,
            contact_person: input.contact_person,
            tax_id_number: input.tax_id_number,
            remark: input.remark,
            created_by: audit.operator.clone(),
            updated_by: audit.operator.clone(),
            created_at: audit.at,
            updated_at: audit.at,
        }
    }

    fn changes(input: UpdateCustomer, audit: &Audit) -> Stamped<UpdateCustomer> {
        Stamped::new(input, audit)
    }

    fn insert_values(r: &Customer) -> Vec<(&'static str, BindValue)> {
        vec![
            ("c_id", r.c_id.clone().into()),
            ("name", r.name.clone().into()),
            ("short_name", r.short_name.clone().into()),
            ("eng_name", r.eng_name.clone().into()),
            ("zip_code", r.zip_code.clone().into()),
            ("address", r.address.clone().into()),
            ("eng_address", r.eng_address.clone().into()),
            ("tel", r.tel.clone().into()),
            ("fax", r.fax.clone().into()),
            ("email", r.email.clone().into()),
            ("contact_person", r.contact_person.clone().into()),
            ("tax_id_number", r.tax_id_number.clone().into()),
            ("remark", r.remark.clone().into()),
            ("created_by", r.created_by.clone().into()),
            ("updated_by", r.updated_by.clone().into()),
            ("created_at", r.created_at.into()),
            ("updated_at", r.updated_at.into()),
        ]
    }

    fn assignments(c: &Stamped<UpdateCustomer>) -> Vec<(&'static str, BindValue)> {
        let p = &c.patch;
        let mut out = Vec::new();
        assign(&mut out, "name", &p.name);
        assign(&mut out, "short_name", &p.short_name);
        assign(&mut out, "eng_name", &p.eng_name);
        assign(&mut out, "zip_code", &p.zip_code);
        assign(&mut out, "address", &p.address);
        assign(&mut out, "eng_address", &p.eng_address);
        assign(&mut out, "tel", &p.tel);
        assign(&mut out, "fax", &p.fax);
        assign(&mut out, "email", &p.email);
        assign(&mut out, "contact_person", &p.contact_person);
        assign(&mut out, "tax_id_number", &p.tax_id_number);
        assign(&mut out, "remark", &p.remark);
        c.stamp(&mut out);
        out
    }

    fn predicate(f: &CustomerFilter) -> Option<Predicate> {
        f.c_id.as_deref().map(|id| Predicate::eq("c_id", id))
    }
}
