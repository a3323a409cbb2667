use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    PaginatedResponse,
};
use crate::{errors::ApiError, handlers::AppState};
use axum::{
    extract::{Json, Path, Query, State},
    routing::{delete, get, post},
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
pub struct CreateVariantRequest {
    #[validate(length(min = 1, max = 255, message = "Variant name must be between 1 and 255 characters"))]
    pub name: String,
    #[validate(length(max = 64, message = "SKU must be at most 64 characters"))]
    pub sku: Option<String>,
    pub product_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct VariantListQuery {
    #[serde(default = "super::common::default_page")]
    pub page: u64,
    #[serde(default = "super::common::default_limit")]
    pub limit: u64,
    /// Restrict to variants of one product
    pub product_id: Option<Uuid>,
}

// Handler functions

/// Create a new product variant
#[utoipa::path(
    post,
    path = "/api/v1/product-variants",
    request_body = CreateVariantRequest,
    responses(
        (status = 201, description = "Variant created", body = serde_json::Value),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Referenced product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "product-variants"
)]
pub async fn create_variant(
    State(state): State<AppState>,
    Json(payload): Json<CreateVariantRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let variant = state
        .services
        .catalog
        .create_variant(payload.name, payload.sku, payload.product_id)
        .await
        .map_err(map_service_error)?;

    info!("Product variant created: {}", variant.id);

    Ok(created_response(variant))
}

/// List product variants
#[utoipa::path(
    get,
    path = "/api/v1/product-variants",
    params(VariantListQuery),
    responses(
        (status = 200, description = "Variants fetched", body = serde_json::Value)
    ),
    tag = "product-variants"
)]
pub async fn list_variants(
    State(state): State<AppState>,
    Query(query): Query<VariantListQuery>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let page = query.page.max(1);
    let limit = query
        .limit
        .clamp(1, state.config.api_max_page_size as u64);

    let (variants, total) = state
        .services
        .catalog
        .list_variants(page, limit, query.product_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        variants, page, limit, total,
    )))
}

/// Get a product variant by ID
#[utoipa::path(
    get,
    path = "/api/v1/product-variants/{id}",
    params(
        ("id" = Uuid, Path, description = "Variant ID")
    ),
    responses(
        (status = 200, description = "Variant fetched", body = serde_json::Value),
        (status = 404, description = "Variant not found", body = crate::errors::ErrorResponse)
    ),
    tag = "product-variants"
)]
pub async fn get_variant(
    State(state): State<AppState>,
    Path(variant_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let variant = state
        .services
        .catalog
        .get_variant(&variant_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Variant with ID {} not found", variant_id)))?;

    Ok(success_response(variant))
}

/// Delete a product variant
#[utoipa::path(
    delete,
    path = "/api/v1/product-variants/{id}",
    params(
        ("id" = Uuid, Path, description = "Variant ID")
    ),
    responses(
        (status = 204, description = "Variant deleted"),
        (status = 404, description = "Variant not found", body = crate::errors::ErrorResponse)
    ),
    tag = "product-variants"
)]
pub async fn delete_variant(
    State(state): State<AppState>,
    Path(variant_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state
        .services
        .catalog
        .delete_variant(variant_id)
        .await
        .map_err(map_service_error)?;

    info!("Product variant deleted: {}", variant_id);

    Ok(no_content_response())
}

/// Creates the router for product variant endpoints
pub fn product_variant_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_variant))
        .route("/", get(list_variants))
        .route("/:id", get(get_variant))
        .route("/:id", delete(delete_variant))
}
