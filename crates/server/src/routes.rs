use axum::{
    routing::{delete, get},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::startup::AppState;

pub mod buses;
pub mod categories;

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Build the full application router.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let fleet = Router::new()
        .route("/buses", get(buses::list_buses).post(buses::create_bus))
        .route("/buses/:id", get(buses::get_bus).put(buses::update_bus).delete(buses::delete_bus))
        .route("/buses/:id/categories", get(buses::list_categories).post(buses::create_category));

    let menu = Router::new()
        .route("/categories/:id", delete(categories::delete_category))
        .route("/categories/:id/items", get(categories::list_items).post(categories::create_item));

    Router::new()
        .route("/health", get(health))
        .merge(fleet)
        .merge(menu)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
