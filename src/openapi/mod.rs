use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "POS API",
        description = r#"
# Point-of-Sale and Inventory API

Backend for a point-of-sale system: sale processing, purchase order
receiving, a stock movement ledger, and dashboard analytics.

## Core flows

- **Sale processing**: `POST /invoices/process-sale` turns a cart into a
  completed invoice with snapshot line items and decrements product stock,
  floored at zero.
- **Purchase order receiving**: `POST /purchase-orders/{id}/receive` records
  one stock move per order line from the supplier location into the
  configured default warehouse and marks the order received.
- **Dashboard**: `GET /invoices/dashboard-stats` returns total sales, realized
  profit, inventory value, and potential profit as fixed two-decimal strings.

## Error Handling

Errors use a consistent JSON body with appropriate HTTP status codes:

```json
{
  "error": "Bad Request",
  "message": "Cart cannot be empty.",
  "timestamp": "2024-01-01T00:00:00Z"
}
```

## Pagination

List endpoints accept `page` (default 1) and `limit` (default 20) query
parameters and respond with the items under `data` plus a `pagination` block.
        "#,
        contact(
            name = "Tillworks",
            email = "dev@tillworks.io",
            url = "https://github.com/tillworks/pos-api"
        ),
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "invoices", description = "Sale processing, invoices, and dashboard statistics"),
        (name = "products", description = "Product catalog endpoints"),
        (name = "product-variants", description = "Product variant endpoints"),
        (name = "customers", description = "Customer management endpoints"),
        (name = "purchase-orders", description = "Purchase order and receiving endpoints"),
        (name = "stock-locations", description = "Stock location endpoints"),
        (name = "stock-moves", description = "Stock movement ledger endpoints"),
        (name = "settings", description = "Inventory configuration endpoints")
    ),
    paths(
        // Invoices and dashboard
        crate::handlers::invoices::process_sale,
        crate::handlers::invoices::dashboard_stats,
        crate::handlers::invoices::list_invoices,
        crate::handlers::invoices::get_invoice,

        // Products
        crate::handlers::products::create_product,
        crate::handlers::products::list_products,
        crate::handlers::products::get_product,
        crate::handlers::products::update_product,
        crate::handlers::products::delete_product,

        // Product variants
        crate::handlers::product_variants::create_variant,
        crate::handlers::product_variants::list_variants,
        crate::handlers::product_variants::get_variant,
        crate::handlers::product_variants::delete_variant,

        // Customers
        crate::handlers::customers::create_customer,
        crate::handlers::customers::list_customers,
        crate::handlers::customers::get_customer,
        crate::handlers::customers::get_customer_by_email,
        crate::handlers::customers::update_customer,
        crate::handlers::customers::delete_customer,

        // Purchase orders
        crate::handlers::purchase_orders::create_purchase_order,
        crate::handlers::purchase_orders::list_purchase_orders,
        crate::handlers::purchase_orders::get_purchase_order,
        crate::handlers::purchase_orders::receive_purchase_order,

        // Stock locations and moves
        crate::handlers::stock_locations::create_stock_location,
        crate::handlers::stock_locations::list_stock_locations,
        crate::handlers::stock_locations::get_stock_location,
        crate::handlers::stock_locations::update_stock_location,
        crate::handlers::stock_locations::delete_stock_location,
        crate::handlers::stock_moves::list_stock_moves,
        crate::handlers::stock_moves::get_stock_move,

        // Settings
        crate::handlers::settings::get_inventory_settings,
        crate::handlers::settings::update_inventory_settings,
    ),
    components(
        schemas(
            // Common types
            crate::ApiResponse<serde_json::Value>,
            crate::handlers::common::PaginatedResponse<serde_json::Value>,
            crate::handlers::common::PaginationMeta,

            // Invoice types
            crate::handlers::invoices::ProcessSaleRequest,
            crate::handlers::invoices::CartLineRequest,
            crate::handlers::invoices::CartProductRequest,
            crate::handlers::invoices::DashboardStatsResponse,

            // Catalog types
            crate::handlers::products::CreateProductRequest,
            crate::handlers::products::UpdateProductRequest,
            crate::handlers::product_variants::CreateVariantRequest,

            // Customer types
            crate::handlers::customers::CreateCustomerRequest,
            crate::handlers::customers::UpdateCustomerRequest,

            // Purchasing types
            crate::handlers::purchase_orders::CreatePurchaseOrderRequest,
            crate::handlers::purchase_orders::PurchaseOrderLineRequest,

            // Stock types
            crate::handlers::stock_locations::CreateStockLocationRequest,
            crate::handlers::stock_locations::UpdateStockLocationRequest,
            crate::handlers::settings::UpdateInventorySettingsRequest,

            // Error types
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
