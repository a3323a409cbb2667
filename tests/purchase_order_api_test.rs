//! Integration tests for purchase order creation and listing.
//!
//! Receiving has its own flow tests; this file covers the order
//! lifecycle up to that point.

mod common;

use axum::{body, http::Method, response::Response};
use common::TestApp;
use serde_json::{json, Value};
use uuid::Uuid;

async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

#[tokio::test]
async fn create_order_generates_a_reference() {
    let app = TestApp::new().await;

    let variant = app.seed_variant("Beans 1kg").await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/purchase-orders",
            Some(json!({
                "supplierName": "Roastery Co",
                "items": [{ "productVariantId": variant.id, "quantity": 4 }]
            })),
        )
        .await;
    assert_eq!(response.status(), 201);

    let body = response_json(response).await;
    assert_eq!(body["message"], "Purchase order created successfully");

    let order = &body["purchaseOrder"];
    assert_eq!(order["status"], "pending");
    assert_eq!(order["supplierName"], "Roastery Co");
    assert!(order["receivedAt"].is_null());

    let reference = order["reference"].as_str().expect("reference string");
    assert!(reference.starts_with("PO-"), "got: {}", reference);
    assert_eq!(reference.len(), 11);
    assert!(
        reference[3..]
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()),
        "got: {}",
        reference
    );
}

#[tokio::test]
async fn create_order_keeps_an_explicit_reference() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/purchase-orders",
            Some(json!({ "reference": "PO-2026-0042", "items": [] })),
        )
        .await;
    assert_eq!(response.status(), 201);

    let body = response_json(response).await;
    assert_eq!(body["purchaseOrder"]["reference"], "PO-2026-0042");
}

#[tokio::test]
async fn create_order_rejects_unknown_variants() {
    let app = TestApp::new().await;

    let missing = Uuid::new_v4();
    let response = app
        .request(
            Method::POST,
            "/api/v1/purchase-orders",
            Some(json!({
                "items": [{ "productVariantId": missing, "quantity": 1 }]
            })),
        )
        .await;
    assert_eq!(response.status(), 404);

    let body = response_json(response).await;
    assert_eq!(
        body["message"],
        format!("Product variant with ID {} not found", missing)
    );

    // Nothing may be half-created.
    let response = app
        .request(Method::GET, "/api/v1/purchase-orders", None)
        .await;
    let body = response_json(response).await;
    assert_eq!(body["pagination"]["total"], 0);
}

#[tokio::test]
async fn create_order_rejects_non_positive_quantities() {
    let app = TestApp::new().await;

    let variant = app.seed_variant("Filters").await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/purchase-orders",
            Some(json!({
                "items": [{ "productVariantId": variant.id, "quantity": 0 }]
            })),
        )
        .await;
    assert_eq!(response.status(), 400);

    let body = response_json(response).await;
    let message = body["message"].as_str().expect("message string");
    assert!(message.starts_with("Validation failed"), "got: {}", message);
}

#[tokio::test]
async fn order_fetch_includes_items() {
    let app = TestApp::new().await;

    let beans = app.seed_variant("Beans").await;
    let filters = app.seed_variant("Filters").await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/purchase-orders",
            Some(json!({
                "items": [
                    { "productVariantId": beans.id, "quantity": 10 },
                    { "productVariantId": filters.id, "quantity": 200 }
                ]
            })),
        )
        .await;
    assert_eq!(response.status(), 201);
    let created = response_json(response).await;
    let order_id = created["purchaseOrder"]["id"]
        .as_str()
        .expect("order id")
        .to_string();

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/purchase-orders/{}", order_id),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    assert_eq!(body["purchaseOrder"]["id"], order_id.as_str());

    let items = body["items"].as_array().expect("items array");
    assert_eq!(items.len(), 2);
    for item in items {
        assert_eq!(item["purchaseOrderId"], order_id.as_str());
    }

    let mut quantities: Vec<i64> = items
        .iter()
        .map(|item| item["quantity"].as_i64().expect("quantity"))
        .collect();
    quantities.sort_unstable();
    assert_eq!(quantities, vec![10, 200]);
}

#[tokio::test]
async fn fetching_an_unknown_order_is_not_found() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/purchase-orders/{}", Uuid::new_v4()),
            None,
        )
        .await;
    assert_eq!(response.status(), 404);

    let body = response_json(response).await;
    assert_eq!(body["message"], "Purchase order not found");
}

#[tokio::test]
async fn order_listing_filters_by_status() {
    let app = TestApp::new().await;

    app.seed_location("Supplier", true).await;
    app.seed_location("Main Warehouse", false).await;
    app.set_default_warehouse("Main Warehouse").await;

    for _ in 0..2 {
        let response = app
            .request(
                Method::POST,
                "/api/v1/purchase-orders",
                Some(json!({ "items": [] })),
            )
            .await;
        assert_eq!(response.status(), 201);
    }

    // Receive one of the two so both statuses exist.
    let response = app
        .request(Method::GET, "/api/v1/purchase-orders", None)
        .await;
    let body = response_json(response).await;
    let first_id = body["data"][0]["id"].as_str().expect("order id").to_string();

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/purchase-orders/{}/receive", first_id),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);

    let response = app
        .request(Method::GET, "/api/v1/purchase-orders?status=pending", None)
        .await;
    let body = response_json(response).await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["status"], "pending");

    let response = app
        .request(Method::GET, "/api/v1/purchase-orders?status=received", None)
        .await;
    let body = response_json(response).await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["id"], first_id.as_str());
    assert_eq!(body["data"][0]["status"], "received");
}
