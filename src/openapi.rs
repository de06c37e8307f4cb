use crate::model::{
    Account, AccountFilter, AccountType, AccountTypeFilter, Contact, ContactFilter, ContactView,
    CreateAccount, CreateAccountType, CreateContact, CreateCustomer, Customer, CustomerFilter,
    UpdateAccount, UpdateAccountType, UpdateContact, UpdateCustomer,
};
use crate::pagination::{PageParams, Pagination};
use crate::response::ResponseStatus;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "crm-service", description = "Accounts, account types, contacts and customers"),
    components(schemas(
        Account,
        CreateAccount,
        UpdateAccount,
        AccountFilter,
        AccountType,
        CreateAccountType,
        UpdateAccountType,
        AccountTypeFilter,
        Contact,
        ContactView,
        CreateContact,
        UpdateContact,
        ContactFilter,
        Customer,
        CreateCustomer,
        UpdateCustomer,
        CustomerFilter,
        PageParams,
        Pagination,
        ResponseStatus,
    ))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_resource_schemas() {
        let doc = ApiDoc::openapi();
        let schemas = doc.components.map(|c| c.schemas).unwrap_or_default();
        for name in ["Account", "ContactView", "UpdateCustomer", "Pagination"] {
            assert!(schemas.contains_key(name), "missing schema {name}");
        }
    }
}
