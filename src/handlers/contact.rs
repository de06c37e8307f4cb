//! Contact handlers: same workflows as the generic ones, but reads return enriched views.

use super::{begin, ListBody};
use crate::error::AppError;
use crate::extractors::{FormatJson, FormatPath, FormatQuery, Operator};
use crate::model::{ContactFilter, ContactView, CreateContact, UpdateContact};
use crate::pagination::PageParams;
use crate::response::Envelope;
use crate::state::AppState;
use axum::extract::State;

pub async fn create(
    State(state): State<AppState>,
    Operator(operator): Operator,
    FormatJson(input): FormatJson<CreateContact>,
) -> Result<Envelope<ContactView>, AppError> {
    let tx = begin(&state).await?;
    let view = state.contacts.create(tx, input, operator).await?;
    Ok(Envelope::created(view))
}

pub async fn list(
    State(state): State<AppState>,
    FormatQuery(page): FormatQuery<PageParams>,
    FormatQuery(filter): FormatQuery<ContactFilter>,
) -> Result<Envelope<Vec<ContactView>>, AppError> {
    let page = state.settings.page_request(page)?;
    let (views, pagination) = state.contacts.get_by_list(filter, page).await?;
    Ok(Envelope::page(views, pagination))
}

pub async fn list_body(
    State(state): State<AppState>,
    FormatJson(body): FormatJson<ListBody<ContactFilter>>,
) -> Result<Envelope<Vec<ContactView>>, AppError> {
    let (page, filter) = body.split();
    let page = state.settings.page_request(page)?;
    let (views, pagination) = state.contacts.get_by_list(filter, page).await?;
    Ok(Envelope::page(views, pagination))
}

pub async fn read(
    State(state): State<AppState>,
    FormatPath(id): FormatPath<String>,
) -> Result<Envelope<ContactView>, AppError> {
    Ok(Envelope::ok(state.contacts.get_by_single(&id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Operator(operator): Operator,
    FormatPath(id): FormatPath<String>,
    FormatJson(input): FormatJson<UpdateContact>,
) -> Result<Envelope<ContactView>, AppError> {
    let view = state.contacts.update(&id, input, operator).await?;
    Ok(Envelope::ok(view))
}

pub async fn delete(
    State(state): State<AppState>,
    Operator(operator): Operator,
    FormatPath(id): FormatPath<String>,
) -> Result<Envelope<()>, AppError> {
    state.contacts.delete(&id, operator).await?;
    Ok(Envelope::empty())
}
