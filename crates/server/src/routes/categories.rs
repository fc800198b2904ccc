use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use models::menu_item;

use crate::errors::ApiError;
use crate::startup::AppState;

#[derive(Debug, Deserialize)]
pub struct ItemInput {
    pub name: String,
    pub price_cents: i32,
}

pub async fn delete_category(State(state): State<AppState>, Path(id): Path<i32>) -> Result<StatusCode, ApiError> {
    state.menu.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_items(
    State(state): State<AppState>,
    Path(category_id): Path<i32>,
) -> Result<Json<Vec<menu_item::Model>>, ApiError> {
    Ok(Json(state.menu.list_items(category_id).await?))
}

pub async fn create_item(
    State(state): State<AppState>,
    Path(category_id): Path<i32>,
    Json(input): Json<ItemInput>,
) -> Result<(StatusCode, Json<menu_item::Model>), ApiError> {
    let item = state.menu.add_item(category_id, &input.name, input.price_cents).await?;
    Ok((StatusCode::CREATED, Json(item)))
}
