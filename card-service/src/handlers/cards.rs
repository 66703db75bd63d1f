use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

use crate::dtos::{CardRequest, PageParams};
use crate::middleware::AuthUser;
use crate::models::Card;
use crate::utils::{ApiJson, ApiPath, ApiQuery};
use crate::AppState;

pub async fn get_card(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Card>, AppError> {
    let card = state.cards.find(&principal, id).await?;
    Ok(Json(card))
}

pub async fn list_cards(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiQuery(pairs): ApiQuery<Vec<(String, String)>>,
) -> Result<Json<Vec<Card>>, AppError> {
    let params = PageParams::from_pairs(pairs);
    let plan = state.cards.pagination().plan(
        &principal,
        params.page.as_deref(),
        params.size.as_deref(),
        params.sort.as_deref(),
    );

    tracing::debug!(
        owner = %plan.owner,
        offset = plan.offset,
        limit = plan.limit,
        sort = %plan.sort.field,
        "Listing cards"
    );

    let cards = state.cards.list(&plan).await?;
    Ok(Json(cards))
}

pub async fn create_card(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiJson(request): ApiJson<CardRequest>,
) -> Result<impl IntoResponse, AppError> {
    let card = state.cards.create(&principal, request.amount).await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/cards/{}", card.id))],
    ))
}

pub async fn update_card(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<CardRequest>,
) -> Result<StatusCode, AppError> {
    state.cards.update(&principal, id, request.amount).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_card(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, AppError> {
    state.cards.delete(&principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Paths under `/cards` that match no route. Reached only after the
/// authentication and role layers.
pub async fn unknown_card_route() -> AppError {
    AppError::NotFound(anyhow::anyhow!("No card route for this path"))
}
