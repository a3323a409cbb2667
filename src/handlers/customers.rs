use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    PaginatedResponse, PaginationParams,
};
use crate::{errors::ApiError, handlers::AppState};
use axum::{
    extract::{Json, Path, Query, State},
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
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, max = 255, message = "Customer name must be between 1 and 255 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(length(max = 32, message = "Phone number must be at most 32 characters"))]
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerRequest {
    #[validate(length(min = 1, max = 255, message = "Customer name must be between 1 and 255 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(length(max = 32, message = "Phone number must be at most 32 characters"))]
    pub phone: Option<String>,
}

// Handler functions

/// Create a new customer
#[utoipa::path(
    post,
    path = "/api/v1/customers",
    request_body = CreateCustomerRequest,
    responses(
        (status = 201, description = "Customer created", body = serde_json::Value),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "customers"
)]
pub async fn create_customer(
    State(state): State<AppState>,
    Json(payload): Json<CreateCustomerRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let customer = state
        .services
        .customers
        .create_customer(payload.name, payload.email, payload.phone)
        .await
        .map_err(map_service_error)?;

    info!("Customer created: {}", customer.id);

    Ok(created_response(customer))
}

/// List customers, newest first
#[utoipa::path(
    get,
    path = "/api/v1/customers",
    params(PaginationParams),
    responses(
        (status = 200, description = "Customers fetched", body = serde_json::Value)
    ),
    tag = "customers"
)]
pub async fn list_customers(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (page, limit) = pagination.clamped(state.config.api_max_page_size as u64);

    let customers = state
        .services
        .customers
        .list_customers(limit, (page - 1) * limit)
        .await
        .map_err(map_service_error)?;
    let total = state
        .services
        .customers
        .count_customers()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        customers, page, limit, total,
    )))
}

/// Get a customer by ID
#[utoipa::path(
    get,
    path = "/api/v1/customers/{id}",
    params(
        ("id" = Uuid, Path, description = "Customer ID")
    ),
    responses(
        (status = 200, description = "Customer fetched", body = serde_json::Value),
        (status = 404, description = "Customer not found", body = crate::errors::ErrorResponse)
    ),
    tag = "customers"
)]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let customer = state
        .services
        .customers
        .get_customer(&customer_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Customer with ID {} not found", customer_id)))?;

    Ok(success_response(customer))
}

/// Look up a customer by email
#[utoipa::path(
    get,
    path = "/api/v1/customers/by-email/{email}",
    params(
        ("email" = String, Path, description = "Customer email address")
    ),
    responses(
        (status = 200, description = "Customer fetched", body = serde_json::Value),
        (status = 404, description = "Customer not found", body = crate::errors::ErrorResponse)
    ),
    tag = "customers"
)]
pub async fn get_customer_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let customer = state
        .services
        .customers
        .get_customer_by_email(&email)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Customer with email {} not found", email)))?;

    Ok(success_response(customer))
}

/// Update a customer
#[utoipa::path(
    put,
    path = "/api/v1/customers/{id}",
    request_body = UpdateCustomerRequest,
    params(
        ("id" = Uuid, Path, description = "Customer ID")
    ),
    responses(
        (status = 200, description = "Customer updated", body = serde_json::Value),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Customer not found", body = crate::errors::ErrorResponse)
    ),
    tag = "customers"
)]
pub async fn update_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
    Json(payload): Json<UpdateCustomerRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let customer = state
        .services
        .customers
        .update_customer(customer_id, payload.name, payload.email, payload.phone)
        .await
        .map_err(map_service_error)?;

    info!("Customer updated: {}", customer_id);

    Ok(success_response(customer))
}

/// Delete a customer
#[utoipa::path(
    delete,
    path = "/api/v1/customers/{id}",
    params(
        ("id" = Uuid, Path, description = "Customer ID")
    ),
    responses(
        (status = 204, description = "Customer deleted"),
        (status = 404, description = "Customer not found", body = crate::errors::ErrorResponse)
    ),
    tag = "customers"
)]
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state
        .services
        .customers
        .delete_customer(customer_id)
        .await
        .map_err(map_service_error)?;

    info!("Customer deleted: {}", customer_id);

    Ok(no_content_response())
}

/// Creates the router for customer endpoints
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_customer))
        .route("/", get(list_customers))
        .route("/by-email/:email", get(get_customer_by_email))
        .route("/:id", get(get_customer))
        .route("/:id", put(update_customer))
        .route("/:id", delete(delete_customer))
}
