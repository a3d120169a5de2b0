//! HTTP handlers for `/cats`

use axum::{
    extract::{Path, State},
    Json,
};

use super::dto::{CreateCatRequest, ListCatsQuery, UpdateCatRequest};
use super::model::Cat;
use crate::{
    filter::ApiError,
    repository::CatRepository,
    responses::{Created, Page},
    state::AppState,
    validation::{ValidatedJson, ValidatedQuery},
};

/// `GET /cats`
pub async fn list_cats<R: CatRepository>(
    State(state): State<AppState<R>>,
    ValidatedQuery(query): ValidatedQuery<ListCatsQuery>,
) -> Result<Page<Cat>, ApiError> {
    Ok(state.cats().find_all(query).await?)
}

/// `POST /cats`
pub async fn create_cat<R: CatRepository>(
    State(state): State<AppState<R>>,
    ValidatedJson(request): ValidatedJson<CreateCatRequest>,
) -> Result<Created<Cat>, ApiError> {
    let cat = state.cats().create(request.into()).await?;
    let location = format!("/cats/{}", cat.id);
    Ok(Created::new(cat).with_location(location))
}

/// `PATCH /cats/{id}`
pub async fn update_cat<R: CatRepository>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateCatRequest>,
) -> Result<Json<Cat>, ApiError> {
    Ok(Json(state.cats().update(&id, request.into()).await?))
}

/// `DELETE /cats/{id}`
pub async fn delete_cat<R: CatRepository>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<Json<Cat>, ApiError> {
    Ok(Json(state.cats().delete(&id).await?))
}
