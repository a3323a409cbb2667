use super::common::{map_service_error, success_response, PaginatedResponse};
use crate::{
    errors::ApiError, handlers::AppState, services::inventory::StockMoveFilter,
};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

// Request and response DTOs

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct StockMoveListQuery {
    #[serde(default = "super::common::default_page")]
    pub page: u64,
    #[serde(default = "super::common::default_limit")]
    pub limit: u64,
    /// Restrict to moves of one product variant
    pub product_variant_id: Option<Uuid>,
    /// Restrict to moves touching one location, as source or destination
    pub location_id: Option<Uuid>,
    /// Restrict to moves recorded by one purchase order receipt
    pub purchase_order_id: Option<Uuid>,
}

// Handler functions

/// List stock moves, newest first
#[utoipa::path(
    get,
    path = "/api/v1/stock-moves",
    params(StockMoveListQuery),
    responses(
        (status = 200, description = "Stock moves fetched", body = serde_json::Value)
    ),
    tag = "stock-moves"
)]
pub async fn list_stock_moves(
    State(state): State<AppState>,
    Query(query): Query<StockMoveListQuery>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let page = query.page.max(1);
    let limit = query
        .limit
        .clamp(1, state.config.api_max_page_size as u64);

    let filter = StockMoveFilter {
        product_variant_id: query.product_variant_id,
        location_id: query.location_id,
        purchase_order_id: query.purchase_order_id,
    };

    let (moves, total) = state
        .services
        .inventory
        .list_stock_moves(page, limit, filter)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        moves, page, limit, total,
    )))
}

/// Get a stock move by ID
#[utoipa::path(
    get,
    path = "/api/v1/stock-moves/{id}",
    params(
        ("id" = Uuid, Path, description = "Stock move ID")
    ),
    responses(
        (status = 200, description = "Stock move fetched", body = serde_json::Value),
        (status = 404, description = "Stock move not found", body = crate::errors::ErrorResponse)
    ),
    tag = "stock-moves"
)]
pub async fn get_stock_move(
    State(state): State<AppState>,
    Path(move_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let stock_move = state
        .services
        .inventory
        .get_stock_move(&move_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Stock move with ID {} not found", move_id)))?;

    Ok(success_response(stock_move))
}

/// Creates the router for stock move endpoints
pub fn stock_move_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_stock_moves))
        .route("/:id", get(get_stock_move))
}
