use super::common::{
    created_response, map_service_error, success_response, validate_input, PaginatedResponse,
};
use crate::{
    entities::purchase_order::PurchaseOrderStatus, errors::ApiError, handlers::AppState,
    services::procurement::PurchaseOrderLine,
};
use axum::{
    extract::{Json, Path, Query, State},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

// Request and response DTOs

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePurchaseOrderRequest {
    /// Human-readable order reference; generated when omitted
    #[validate(length(min = 1, max = 64, message = "Reference must be between 1 and 64 characters"))]
    pub reference: Option<String>,
    #[validate(length(max = 255, message = "Supplier name must be at most 255 characters"))]
    pub supplier_name: Option<String>,
    #[validate]
    #[serde(default)]
    pub items: Vec<PurchaseOrderLineRequest>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderLineRequest {
    pub product_variant_id: Option<Uuid>,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PurchaseOrderListQuery {
    #[serde(default = "super::common::default_page")]
    pub page: u64,
    #[serde(default = "super::common::default_limit")]
    pub limit: u64,
    /// Restrict to one status ("pending" or "received")
    pub status: Option<PurchaseOrderStatus>,
}

// Handler functions

/// Create a new purchase order
#[utoipa::path(
    post,
    path = "/api/v1/purchase-orders",
    request_body = CreatePurchaseOrderRequest,
    responses(
        (status = 201, description = "Purchase order created", body = serde_json::Value),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Referenced variant not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn create_purchase_order(
    State(state): State<AppState>,
    Json(payload): Json<CreatePurchaseOrderRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let lines = payload
        .items
        .into_iter()
        .map(|item| PurchaseOrderLine {
            product_variant_id: item.product_variant_id,
            quantity: item.quantity,
        })
        .collect();

    let order = state
        .services
        .procurement
        .create_purchase_order(payload.reference, payload.supplier_name, lines)
        .await
        .map_err(map_service_error)?;

    info!("Purchase order created: {}", order.id);

    Ok(created_response(serde_json::json!({
        "purchaseOrder": order,
        "message": "Purchase order created successfully"
    })))
}

/// List purchase orders with pagination
#[utoipa::path(
    get,
    path = "/api/v1/purchase-orders",
    params(PurchaseOrderListQuery),
    responses(
        (status = 200, description = "Purchase orders fetched", body = serde_json::Value)
    ),
    tag = "purchase-orders"
)]
pub async fn list_purchase_orders(
    State(state): State<AppState>,
    Query(query): Query<PurchaseOrderListQuery>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let page = query.page.max(1);
    let limit = query
        .limit
        .clamp(1, state.config.api_max_page_size as u64);

    let (orders, total) = state
        .services
        .procurement
        .list_purchase_orders(page, limit, query.status)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        orders, page, limit, total,
    )))
}

/// Get a purchase order with its lines
#[utoipa::path(
    get,
    path = "/api/v1/purchase-orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Purchase order ID")
    ),
    responses(
        (status = 200, description = "Purchase order fetched", body = serde_json::Value),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn get_purchase_order(
    State(state): State<AppState>,
    Path(po_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (order, items) = state
        .services
        .procurement
        .get_purchase_order_with_items(&po_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound("Purchase order not found".to_string()))?;

    Ok(success_response(serde_json::json!({
        "purchaseOrder": order,
        "items": items,
    })))
}

/// Receive a purchase order into the default warehouse
#[utoipa::path(
    post,
    path = "/api/v1/purchase-orders/{id}/receive",
    params(
        ("id" = Uuid, Path, description = "Purchase order ID")
    ),
    responses(
        (status = 200, description = "Purchase order received", body = serde_json::Value),
        (status = 400, description = "Already received or receiving is misconfigured", body = crate::errors::ErrorResponse),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn receive_purchase_order(
    State(state): State<AppState>,
    Path(po_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let outcome = state
        .services
        .receiving
        .receive_purchase_order(po_id)
        .await
        .map_err(map_service_error)?;

    info!(
        "Purchase order received: {} ({} moves)",
        po_id, outcome.moves_recorded
    );

    Ok(success_response(serde_json::json!({
        "message": "Purchase order received successfully",
        "purchaseOrder": outcome.purchase_order,
    })))
}

/// Creates the router for purchase order endpoints
pub fn purchase_order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_purchase_order))
        .route("/", get(list_purchase_orders))
        .route("/:id", get(get_purchase_order))
        .route("/:id/receive", post(receive_purchase_order))
}
