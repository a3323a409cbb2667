//! Integration tests for the dashboard aggregates endpoint.

mod common;

use axum::{body, http::Method, response::Response};
use common::TestApp;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

#[tokio::test]
async fn empty_catalog_reports_zero_totals() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::GET, "/api/v1/invoices/dashboard-stats", None)
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    assert_eq!(body["totalSales"], "0.00");
    assert_eq!(body["totalProfit"], "0.00");
    assert_eq!(body["totalInventoryValue"], "0.00");
    assert_eq!(body["totalPotentialProfit"], "0.00");
}

#[tokio::test]
async fn totals_reflect_sales_and_stock_on_hand() {
    let app = TestApp::new().await;

    // One product: price 10, cost 4, stock 5. Sell two units, then put
    // the stock level back so the on-hand figures stay at five units.
    let product = app.seed_product("Widget", dec!(10), dec!(4), 5).await;

    let sale = app
        .request(
            Method::POST,
            "/api/v1/invoices/process-sale",
            Some(json!({
                "cart": [
                    { "product": { "id": product.id }, "quantity": 2 }
                ]
            })),
        )
        .await;
    assert_eq!(sale.status(), 200);

    let restock = app
        .request(
            Method::PUT,
            &format!("/api/v1/products/{}", product.id),
            Some(json!({ "stock": 5 })),
        )
        .await;
    assert_eq!(restock.status(), 200);

    let response = app
        .request(Method::GET, "/api/v1/invoices/dashboard-stats", None)
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    // Sales: 2 * 10. Profit: 2 * (10 - 4). Inventory: 5 * 10.
    // Potential profit: 5 * (10 - 4).
    assert_eq!(body["totalSales"], "20.00");
    assert_eq!(body["totalProfit"], "12.00");
    assert_eq!(body["totalInventoryValue"], "50.00");
    assert_eq!(body["totalPotentialProfit"], "30.00");
}

#[tokio::test]
async fn profit_treats_deleted_products_as_zero_cost() {
    let app = TestApp::new().await;

    let product = app.seed_product("Gadget", dec!(8), dec!(3), 10).await;

    let sale = app
        .request(
            Method::POST,
            "/api/v1/invoices/process-sale",
            Some(json!({
                "cart": [
                    { "product": { "id": product.id }, "quantity": 1 }
                ]
            })),
        )
        .await;
    assert_eq!(sale.status(), 200);

    let deleted = app
        .request(
            Method::DELETE,
            &format!("/api/v1/products/{}", product.id),
            None,
        )
        .await;
    assert_eq!(deleted.status(), 204);

    let response = app
        .request(Method::GET, "/api/v1/invoices/dashboard-stats", None)
        .await;
    let body = response_json(response).await;

    // The sale is still counted; without a catalog row its cost reads
    // as zero, so the full sale price counts as profit.
    assert_eq!(body["totalSales"], "8.00");
    assert_eq!(body["totalProfit"], "8.00");
    assert_eq!(body["totalInventoryValue"], "0.00");
    assert_eq!(body["totalPotentialProfit"], "0.00");
}
