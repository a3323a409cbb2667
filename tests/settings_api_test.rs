//! Integration tests for inventory settings, stock locations and the
//! stock move ledger endpoints.

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
async fn settings_read_before_first_save_is_unset() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::GET, "/api/v1/settings/inventory", None)
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    assert!(body["defaultWarehouse"].is_null());
}

#[tokio::test]
async fn settings_upsert_and_clear() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::PUT,
            "/api/v1/settings/inventory",
            Some(json!({ "defaultWarehouse": "Main Warehouse" })),
        )
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    assert_eq!(body["defaultWarehouse"], "Main Warehouse");
    assert_eq!(body["id"], Uuid::nil().to_string().as_str());

    let response = app
        .request(
            Method::PUT,
            "/api/v1/settings/inventory",
            Some(json!({ "defaultWarehouse": "Back Room" })),
        )
        .await;
    assert_eq!(response.status(), 200);

    let response = app
        .request(Method::GET, "/api/v1/settings/inventory", None)
        .await;
    let body = response_json(response).await;
    assert_eq!(body["defaultWarehouse"], "Back Room");

    // A null value clears the warehouse again.
    let response = app
        .request(
            Method::PUT,
            "/api/v1/settings/inventory",
            Some(json!({ "defaultWarehouse": null })),
        )
        .await;
    assert_eq!(response.status(), 200);

    let response = app
        .request(Method::GET, "/api/v1/settings/inventory", None)
        .await;
    let body = response_json(response).await;
    assert!(body["defaultWarehouse"].is_null());
}

#[tokio::test]
async fn empty_warehouse_name_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::PUT,
            "/api/v1/settings/inventory",
            Some(json!({ "defaultWarehouse": "" })),
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn stock_location_crud() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/stock-locations",
            Some(json!({ "name": "Shop Floor" })),
        )
        .await;
    assert_eq!(response.status(), 201);

    let created = response_json(response).await;
    let location_id = created["id"].as_str().expect("id string").to_string();
    assert_eq!(created["name"], "Shop Floor");
    assert_eq!(created["isSupplierLocation"], false);

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/stock-locations/{}", location_id),
            Some(json!({ "name": "Shop Floor A", "isSupplierLocation": true })),
        )
        .await;
    assert_eq!(response.status(), 200);

    let updated = response_json(response).await;
    assert_eq!(updated["name"], "Shop Floor A");
    assert_eq!(updated["isSupplierLocation"], true);

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/v1/stock-locations/{}", location_id),
            None,
        )
        .await;
    assert_eq!(response.status(), 204);

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/stock-locations/{}", location_id),
            None,
        )
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn stock_locations_list_sorted_by_name() {
    let app = TestApp::new().await;

    app.seed_location("Warehouse B", false).await;
    app.seed_location("Annex", false).await;
    app.seed_location("Supplier", true).await;

    let response = app
        .request(Method::GET, "/api/v1/stock-locations", None)
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    let names: Vec<&str> = body
        .as_array()
        .expect("locations array")
        .iter()
        .map(|location| location["name"].as_str().expect("name string"))
        .collect();
    assert_eq!(names, vec!["Annex", "Supplier", "Warehouse B"]);
}

#[tokio::test]
async fn location_with_recorded_moves_cannot_be_deleted() {
    let app = TestApp::new().await;

    app.seed_location("Supplier", true).await;
    let warehouse = app.seed_location("Main Warehouse", false).await;
    app.set_default_warehouse("Main Warehouse").await;

    let variant = app.seed_variant("Beans").await;
    let response = app
        .request(
            Method::POST,
            "/api/v1/purchase-orders",
            Some(json!({
                "items": [{ "productVariantId": variant.id, "quantity": 3 }]
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
            Method::POST,
            &format!("/api/v1/purchase-orders/{}/receive", order_id),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/v1/stock-locations/{}", warehouse.id),
            None,
        )
        .await;
    assert_eq!(response.status(), 400);

    let body = response_json(response).await;
    assert_eq!(
        body["message"],
        "Stock location 'Main Warehouse' has recorded stock moves and cannot be deleted"
    );

    // The location must still exist afterwards.
    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/stock-locations/{}", warehouse.id),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn stock_moves_can_be_fetched_by_id() {
    let app = TestApp::new().await;

    app.seed_location("Supplier", true).await;
    app.seed_location("Main Warehouse", false).await;
    app.set_default_warehouse("Main Warehouse").await;

    let variant = app.seed_variant("Filters").await;
    let response = app
        .request(
            Method::POST,
            "/api/v1/purchase-orders",
            Some(json!({
                "items": [{ "productVariantId": variant.id, "quantity": 7 }]
            })),
        )
        .await;
    let created = response_json(response).await;
    let order_id = created["purchaseOrder"]["id"]
        .as_str()
        .expect("order id")
        .to_string();

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/purchase-orders/{}/receive", order_id),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/stock-moves?productVariantId={}", variant.id),
            None,
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["pagination"]["total"], 1);
    let move_id = body["data"][0]["id"].as_str().expect("move id").to_string();

    let response = app
        .request(Method::GET, &format!("/api/v1/stock-moves/{}", move_id), None)
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    assert_eq!(body["id"], move_id.as_str());
    assert_eq!(body["quantity"], 7);
    assert_eq!(
        body["productVariantId"].as_str(),
        Some(variant.id.to_string().as_str())
    );

    let missing = Uuid::new_v4();
    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/stock-moves/{}", missing),
            None,
        )
        .await;
    assert_eq!(response.status(), 404);

    let body = response_json(response).await;
    assert_eq!(
        body["message"],
        format!("Stock move with ID {} not found", missing)
    );
}
