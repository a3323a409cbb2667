use super::common::{map_service_error, success_response, validate_input};
use crate::{errors::ApiError, handlers::AppState};
use axum::{
    extract::{Json, State},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use validator::Validate;

// Request and response DTOs

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInventorySettingsRequest {
    /// Name of the stock location that receives purchase orders.
    /// Clearing it disables receiving until reconfigured.
    #[validate(length(min = 1, max = 255, message = "Warehouse name must be between 1 and 255 characters"))]
    pub default_warehouse: Option<String>,
}

// Handler functions

/// Get the inventory settings
#[utoipa::path(
    get,
    path = "/api/v1/settings/inventory",
    responses(
        (status = 200, description = "Inventory settings fetched", body = serde_json::Value)
    ),
    tag = "settings"
)]
pub async fn get_inventory_settings(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let settings = state
        .services
        .inventory
        .get_settings()
        .await
        .map_err(map_service_error)?;

    // Before the first save there is no row; answer with an unset shape
    // instead of a 404 so clients can render the settings form.
    match settings {
        Some(settings) => Ok(success_response(settings)),
        None => Ok(success_response(serde_json::json!({
            "defaultWarehouse": null,
        }))),
    }
}

/// Create or update the inventory settings
#[utoipa::path(
    put,
    path = "/api/v1/settings/inventory",
    request_body = UpdateInventorySettingsRequest,
    responses(
        (status = 200, description = "Inventory settings saved", body = serde_json::Value),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "settings"
)]
pub async fn update_inventory_settings(
    State(state): State<AppState>,
    Json(payload): Json<UpdateInventorySettingsRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let settings = state
        .services
        .inventory
        .upsert_settings(payload.default_warehouse)
        .await
        .map_err(map_service_error)?;

    info!(
        "Inventory settings saved: default_warehouse={:?}",
        settings.default_warehouse
    );

    Ok(success_response(settings))
}

/// Creates the router for settings endpoints
pub fn settings_routes() -> Router<AppState> {
    Router::new().route(
        "/inventory",
        get(get_inventory_settings).put(update_inventory_settings),
    )
}
