use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
};
use crate::{errors::ApiError, handlers::AppState};
use axum::{
    extract::{Json, Path, State},
    routing::{delete, get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Request and response DTOs

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStockLocationRequest {
    #[validate(length(min = 1, max = 255, message = "Location name must be between 1 and 255 characters"))]
    pub name: String,
    /// Marks the pseudo-location goods are received from
    #[serde(default)]
    pub is_supplier_location: bool,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStockLocationRequest {
    #[validate(length(min = 1, max = 255, message = "Location name must be between 1 and 255 characters"))]
    pub name: Option<String>,
    pub is_supplier_location: Option<bool>,
}

// Handler functions

/// Create a new stock location
#[utoipa::path(
    post,
    path = "/api/v1/stock-locations",
    request_body = CreateStockLocationRequest,
    responses(
        (status = 201, description = "Stock location created", body = serde_json::Value),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "stock-locations"
)]
pub async fn create_stock_location(
    State(state): State<AppState>,
    Json(payload): Json<CreateStockLocationRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let location = state
        .services
        .inventory
        .create_location(payload.name, payload.is_supplier_location)
        .await
        .map_err(map_service_error)?;

    info!("Stock location created: {}", location.id);

    Ok(created_response(location))
}

/// List all stock locations
#[utoipa::path(
    get,
    path = "/api/v1/stock-locations",
    responses(
        (status = 200, description = "Stock locations fetched", body = serde_json::Value)
    ),
    tag = "stock-locations"
)]
pub async fn list_stock_locations(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let locations = state
        .services
        .inventory
        .list_locations()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(locations))
}

/// Get a stock location by ID
#[utoipa::path(
    get,
    path = "/api/v1/stock-locations/{id}",
    params(
        ("id" = Uuid, Path, description = "Stock location ID")
    ),
    responses(
        (status = 200, description = "Stock location fetched", body = serde_json::Value),
        (status = 404, description = "Stock location not found", body = crate::errors::ErrorResponse)
    ),
    tag = "stock-locations"
)]
pub async fn get_stock_location(
    State(state): State<AppState>,
    Path(location_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let location = state
        .services
        .inventory
        .get_location(&location_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Stock location with ID {} not found", location_id))
        })?;

    Ok(success_response(location))
}

/// Update a stock location
#[utoipa::path(
    put,
    path = "/api/v1/stock-locations/{id}",
    request_body = UpdateStockLocationRequest,
    params(
        ("id" = Uuid, Path, description = "Stock location ID")
    ),
    responses(
        (status = 200, description = "Stock location updated", body = serde_json::Value),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Stock location not found", body = crate::errors::ErrorResponse)
    ),
    tag = "stock-locations"
)]
pub async fn update_stock_location(
    State(state): State<AppState>,
    Path(location_id): Path<Uuid>,
    Json(payload): Json<UpdateStockLocationRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let location = state
        .services
        .inventory
        .update_location(&location_id, payload.name, payload.is_supplier_location)
        .await
        .map_err(map_service_error)?;

    info!("Stock location updated: {}", location_id);

    Ok(success_response(location))
}

/// Delete a stock location without recorded moves
#[utoipa::path(
    delete,
    path = "/api/v1/stock-locations/{id}",
    params(
        ("id" = Uuid, Path, description = "Stock location ID")
    ),
    responses(
        (status = 204, description = "Stock location deleted"),
        (status = 400, description = "Location has recorded stock moves", body = crate::errors::ErrorResponse),
        (status = 404, description = "Stock location not found", body = crate::errors::ErrorResponse)
    ),
    tag = "stock-locations"
)]
pub async fn delete_stock_location(
    State(state): State<AppState>,
    Path(location_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state
        .services
        .inventory
        .delete_location(&location_id)
        .await
        .map_err(map_service_error)?;

    info!("Stock location deleted: {}", location_id);

    Ok(no_content_response())
}

/// Creates the router for stock location endpoints
pub fn stock_location_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_stock_location))
        .route("/", get(list_stock_locations))
        .route("/:id", get(get_stock_location))
        .route("/:id", put(update_stock_location))
        .route("/:id", delete(delete_stock_location))
}
