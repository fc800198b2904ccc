use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use models::{bus, category};

use crate::errors::ApiError;
use crate::startup::AppState;

#[derive(Debug, Deserialize)]
pub struct BusInput {
    pub plate_number: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryInput {
    pub name: String,
}

pub async fn list_buses(State(state): State<AppState>) -> Result<Json<Vec<bus::Model>>, ApiError> {
    Ok(Json(state.fleet.list().await?))
}

pub async fn create_bus(
    State(state): State<AppState>,
    Json(input): Json<BusInput>,
) -> Result<(StatusCode, Json<bus::Model>), ApiError> {
    let created = state.fleet.create(&input.plate_number, input.description.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_bus(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<bus::Model>, ApiError> {
    state.fleet.get(id).await?.map(Json).ok_or_else(|| ApiError::not_found("bus"))
}

pub async fn update_bus(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<BusInput>,
) -> Result<Json<bus::Model>, ApiError> {
    Ok(Json(state.fleet.update(id, &input.plate_number, input.description.as_deref()).await?))
}

/// `204` once the bus row is gone. The menu cascade has already run by
/// then, but its failures are only logged.
pub async fn delete_bus(State(state): State<AppState>, Path(id): Path<i32>) -> Result<StatusCode, ApiError> {
    if state.fleet.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("bus"))
    }
}

pub async fn list_categories(
    State(state): State<AppState>,
    Path(bus_id): Path<i32>,
) -> Result<Json<Vec<category::Model>>, ApiError> {
    Ok(Json(state.menu.list_categories(bus_id).await?))
}

/// Only for buses that currently exist.
pub async fn create_category(
    State(state): State<AppState>,
    Path(bus_id): Path<i32>,
    Json(input): Json<CategoryInput>,
) -> Result<(StatusCode, Json<category::Model>), ApiError> {
    if state.fleet.get(bus_id).await?.is_none() {
        return Err(ApiError::not_found("bus"));
    }
    let created = state.menu.create_category(bus_id, &input.name).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
