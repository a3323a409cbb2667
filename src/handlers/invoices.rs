use super::common::{
    map_service_error, success_response, validate_input, PaginatedResponse, PaginationParams,
};
use crate::{errors::ApiError, handlers::AppState, services::sales::CartLine};
use axum::{
    extract::{Json, Path, Query, State},
    routing::{get, post},
    Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Request and response DTOs

/// Product reference inside a cart line.
///
/// Clients send the product they displayed, but the catalog stays
/// authoritative: name and price are re-read server side before the
/// invoice is written, so a stale or tampered price never lands.
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CartProductRequest {
    pub id: Uuid,
    pub name: Option<String>,
    pub price: Option<Decimal>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CartLineRequest {
    #[validate]
    pub product: CartProductRequest,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessSaleRequest {
    #[validate]
    pub cart: Vec<CartLineRequest>,
    pub customer_id: Option<Uuid>,
}

/// Aggregated dashboard figures, fixed to two decimal places
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStatsResponse {
    #[schema(example = "1250.00")]
    pub total_sales: String,
    #[schema(example = "430.50")]
    pub total_profit: String,
    #[schema(example = "8200.00")]
    pub total_inventory_value: String,
    #[schema(example = "2950.00")]
    pub total_potential_profit: String,
}

// Handler functions

/// Process a cart into a completed invoice
#[utoipa::path(
    post,
    path = "/api/v1/invoices/process-sale",
    request_body = ProcessSaleRequest,
    responses(
        (status = 200, description = "Sale processed, invoice and line items returned", body = serde_json::Value),
        (status = 400, description = "Cart empty or invalid", body = crate::errors::ErrorResponse),
        (status = 500, description = "Sale could not be processed", body = crate::errors::ErrorResponse)
    ),
    tag = "invoices"
)]
pub async fn process_sale(
    State(state): State<AppState>,
    Json(payload): Json<ProcessSaleRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let lines = payload
        .cart
        .into_iter()
        .map(|line| CartLine {
            product_id: line.product.id,
            quantity: line.quantity,
        })
        .collect();

    let (invoice, items) = state
        .services
        .sales
        .process_sale(lines, payload.customer_id)
        .await
        .map_err(map_service_error)?;

    info!("Sale processed: invoice {}", invoice.id);

    Ok(success_response(serde_json::json!({
        "invoice": invoice,
        "invoiceItems": items,
    })))
}

/// Get aggregated dashboard statistics
#[utoipa::path(
    get,
    path = "/api/v1/invoices/dashboard-stats",
    responses(
        (status = 200, description = "Dashboard totals", body = DashboardStatsResponse),
        (status = 500, description = "Aggregation failed", body = crate::errors::ErrorResponse)
    ),
    tag = "invoices"
)]
pub async fn dashboard_stats(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let totals = state
        .services
        .dashboard
        .get_dashboard_totals()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(DashboardStatsResponse {
        total_sales: format!("{:.2}", totals.total_sales),
        total_profit: format!("{:.2}", totals.total_profit),
        total_inventory_value: format!("{:.2}", totals.total_inventory_value),
        total_potential_profit: format!("{:.2}", totals.total_potential_profit),
    }))
}

/// List invoices, newest sale first
#[utoipa::path(
    get,
    path = "/api/v1/invoices",
    params(PaginationParams),
    responses(
        (status = 200, description = "Invoices fetched", body = serde_json::Value)
    ),
    tag = "invoices"
)]
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (page, limit) = pagination.clamped(state.config.api_max_page_size as u64);

    let invoices = state
        .services
        .sales
        .list_invoices(limit, (page - 1) * limit)
        .await
        .map_err(map_service_error)?;
    let total = state
        .services
        .sales
        .count_invoices()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        invoices, page, limit, total,
    )))
}

/// Get an invoice with its line items
#[utoipa::path(
    get,
    path = "/api/v1/invoices/{id}",
    params(
        ("id" = Uuid, Path, description = "Invoice ID")
    ),
    responses(
        (status = 200, description = "Invoice fetched", body = serde_json::Value),
        (status = 404, description = "Invoice not found", body = crate::errors::ErrorResponse)
    ),
    tag = "invoices"
)]
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (invoice, items) = state
        .services
        .sales
        .get_invoice_with_items(&invoice_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Invoice with ID {} not found", invoice_id)))?;

    Ok(success_response(serde_json::json!({
        "invoice": invoice,
        "invoiceItems": items,
    })))
}

/// Creates the router for invoice endpoints
pub fn invoice_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_invoices))
        .route("/process-sale", post(process_sale))
        .route("/dashboard-stats", get(dashboard_stats))
        .route("/:id", get(get_invoice))
}
