//! Resource routers, mounted by the caller under `/api/v1`.

use crate::handlers::{contact, resource};
use crate::model::{Account, AccountType, Customer};
use crate::state::{AppState, Managed};
use crate::store::Resource;
use axum::{routing::get, routing::post, Router};

fn crud<R: Resource>() -> Router<AppState>
where
    AppState: Managed<R>,
{
    Router::new()
        .route("/", get(resource::list::<R>).post(resource::create::<R>))
        .route("/list", post(resource::list_body::<R>))
        .route(
            "/:id",
            get(resource::read::<R>)
                .patch(resource::update::<R>)
                .delete(resource::delete::<R>),
        )
}

fn contacts() -> Router<AppState> {
    Router::new()
        .route("/", get(contact::list).post(contact::create))
        .route("/list", post(contact::list_body))
        .route(
            "/:id",
            get(contact::read).patch(contact::update).delete(contact::delete),
        )
}

pub fn resource_routes(state: AppState) -> Router {
    Router::new()
        .nest("/accounts", crud::<Account>())
        .nest("/account-types", crud::<AccountType>())
        .nest("/contacts", contacts())
        .nest("/customers", crud::<Customer>())
        .with_state(state)
}
