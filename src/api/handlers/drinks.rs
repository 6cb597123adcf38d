/*
 * Responsibility
 * - /drinks CRUD handlers
 * - Protected routes receive verified claims via the Claims extractor;
 *   by the time a handler runs, the guard has already enforced the
 *   required permission
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    api::dto::drinks::{
        CreateDrinkRequest, DeleteResponse, DrinkLong, DrinkShort, DrinksResponse,
        UpdateDrinkRequest,
    },
    api::extractors::Claims,
    error::AppError,
    repos::{drink_repo, error::RepoError},
    state::AppState,
};

/// GET /drinks — public menu, short recipe form.
pub async fn list_drinks(
    State(state): State<AppState>,
) -> Result<Json<DrinksResponse<DrinkShort>>, AppError> {
    let rows = drink_repo::list(&state.db).await?;
    let drinks = rows.into_iter().map(DrinkShort::from).collect();

    Ok(Json(DrinksResponse::new(drinks)))
}

/// GET /drinks-detail — full recipes, requires get:drinks-detail.
pub async fn list_drinks_detail(
    State(state): State<AppState>,
    Claims(_claims): Claims,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    let rows = drink_repo::list(&state.db).await?;
    let drinks = rows.into_iter().map(DrinkLong::from).collect();

    Ok(Json(DrinksResponse::new(drinks)))
}

/// POST /drinks — requires post:drinks.
pub async fn create_drink(
    State(state): State<AppState>,
    Claims(_claims): Claims,
    Json(req): Json<CreateDrinkRequest>,
) -> Result<(StatusCode, Json<DrinksResponse<DrinkLong>>), AppError> {
    req.validate().map_err(AppError::bad_request)?;

    let row = drink_repo::create(&state.db, &req.title, &req.recipe)
        .await
        .map_err(|e| match e {
            RepoError::Conflict => AppError::conflict("a drink with this title already exists."),
            other => other.into(),
        })?;

    Ok((
        StatusCode::CREATED,
        Json(DrinksResponse::new(vec![DrinkLong::from(row)])),
    ))
}

/// PATCH /drinks/{drink_id} — requires patch:drinks. Partial update;
/// omitted fields keep their stored value.
pub async fn update_drink(
    State(state): State<AppState>,
    Claims(_claims): Claims,
    Path(drink_id): Path<i64>,
    Json(req): Json<UpdateDrinkRequest>,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    req.validate().map_err(AppError::bad_request)?;

    let row = drink_repo::update(
        &state.db,
        drink_id,
        req.title.as_deref(),
        req.recipe.as_deref(),
    )
    .await
    .map_err(|e| match e {
        RepoError::Conflict => AppError::conflict("a drink with this title already exists."),
        other => other.into(),
    })?
    .ok_or(AppError::not_found("drink"))?;

    Ok(Json(DrinksResponse::new(vec![DrinkLong::from(row)])))
}

/// DELETE /drinks/{drink_id} — requires delete:drinks. Echoes the
/// deleted id so clients can reconcile their local list.
pub async fn delete_drink(
    State(state): State<AppState>,
    Claims(_claims): Claims,
    Path(drink_id): Path<i64>,
) -> Result<Json<DeleteResponse>, AppError> {
    let deleted = drink_repo::delete(&state.db, drink_id).await?;

    if !deleted {
        return Err(AppError::not_found("drink"));
    }

    Ok(Json(DeleteResponse {
        success: true,
        delete: drink_id,
    }))
}
