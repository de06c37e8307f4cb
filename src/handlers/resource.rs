//! CRUD handlers shared by every resource without read-time enrichment.

use super::{begin, ListBody};
use crate::error::AppError;
use crate::extractors::{FormatJson, FormatPath, FormatQuery, Operator};
use crate::pagination::PageParams;
use crate::response::Envelope;
use crate::state::{AppState, Managed};
use crate::store::Resource;
use axum::extract::State;

pub async fn create<R: Resource>(
    State(state): State<AppState>,
    Operator(operator): Operator,
    FormatJson(input): FormatJson<R::Create>,
) -> Result<Envelope<R::Record>, AppError>
where
    AppState: Managed<R>,
{
    let tx = begin(&state).await?;
    let record = Managed::<R>::manager(&state).create(tx, input, operator).await?;
    Ok(Envelope::created(record))
}

pub async fn list<R: Resource>(
    State(state): State<AppState>,
    FormatQuery(page): FormatQuery<PageParams>,
    FormatQuery(filter): FormatQuery<R::Filter>,
) -> Result<Envelope<Vec<R::Record>>, AppError>
where
    AppState: Managed<R>,
{
    let page = state.settings.page_request(page)?;
    let (records, pagination) = Managed::<R>::manager(&state).get_by_list(filter, page).await?;
    Ok(Envelope::page(records, pagination))
}

pub async fn list_body<R: Resource>(
    State(state): State<AppState>,
    FormatJson(body): FormatJson<ListBody<R::Filter>>,
) -> Result<Envelope<Vec<R::Record>>, AppError>
where
    AppState: Managed<R>,
{
    let (page, filter) = body.split();
    let page = state.settings.page_request(page)?;
    let (records, pagination) = Managed::<R>::manager(&state).get_by_list(filter, page).await?;
    Ok(Envelope::page(records, pagination))
}

pub async fn read<R: Resource>(
    State(state): State<AppState>,
    FormatPath(id): FormatPath<String>,
) -> Result<Envelope<R::Record>, AppError>
where
    AppState: Managed<R>,
{
    let record = Managed::<R>::manager(&state).get_by_single(&id).await?;
    Ok(Envelope::ok(record))
}

pub async fn update<R: Resource>(
    State(state): State<AppState>,
    Operator(operator): Operator,
    FormatPath(id): FormatPath<String>,
    FormatJson(input): FormatJson<R::Update>,
) -> Result<Envelope<R::Record>, AppError>
where
    AppState: Managed<R>,
{
    let record = Managed::<R>::manager(&state).update(&id, input, operator).await?;
    Ok(Envelope::ok(record))
}

pub async fn delete<R: Resource>(
    State(state): State<AppState>,
    Operator(operator): Operator,
    FormatPath(id): FormatPath<String>,
) -> Result<Envelope<()>, AppError>
where
    AppState: Managed<R>,
{
    Managed::<R>::manager(&state).delete(&id, operator).await?;
    Ok(Envelope::empty())
}
