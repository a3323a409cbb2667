//! Integration tests for the product catalog API.
//!
//! Exercises product CRUD with pagination and name search, plus the
//! variant endpoints and their product reference checks.

mod common;

use axum::{body, http::Method, response::Response};
use common::TestApp;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use uuid::Uuid;

async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

fn decimal_field(value: &Value) -> Decimal {
    value
        .as_str()
        .expect("decimal fields serialize as strings")
        .parse()
        .expect("decimal field parses")
}

#[tokio::test]
async fn create_product_returns_camel_case_fields() {
    let app = TestApp::new().await;

    let payload = json!({
        "name": "Mechanical Keyboard",
        "price": "49.90",
        "cost": "21.00",
        "stock": 10,
        "reorderPoint": 3
    });

    let response = app
        .request(Method::POST, "/api/v1/products", Some(payload))
        .await;
    assert_eq!(response.status(), 201);

    let body = response_json(response).await;
    assert_eq!(body["name"], "Mechanical Keyboard");
    assert_eq!(decimal_field(&body["price"]), dec!(49.90));
    assert_eq!(decimal_field(&body["cost"]), dec!(21.00));
    assert_eq!(body["stock"], 10);
    assert_eq!(body["reorderPoint"], 3);
    assert!(body["id"].as_str().expect("id string").parse::<Uuid>().is_ok());
    assert!(body["createdAt"].is_string());
}

#[tokio::test]
async fn create_product_defaults_cost_and_stock() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/products",
            Some(json!({ "name": "Sticker", "price": "1.50" })),
        )
        .await;
    assert_eq!(response.status(), 201);

    let body = response_json(response).await;
    assert_eq!(decimal_field(&body["cost"]), Decimal::ZERO);
    assert_eq!(body["stock"], 0);
    assert!(body["reorderPoint"].is_null());
}

#[tokio::test]
async fn product_listing_paginates() {
    let app = TestApp::new().await;

    for name in ["Desk", "Chair", "Lamp"] {
        app.seed_product(name, dec!(10.00), dec!(4.00), 1).await;
    }

    let response = app
        .request(Method::GET, "/api/v1/products?page=1&limit=2", None)
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    assert_eq!(body["data"].as_array().expect("data array").len(), 2);
    assert_eq!(body["pagination"]["page"], 1);
    assert_eq!(body["pagination"]["limit"], 2);
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["pagination"]["totalPages"], 2);

    let response = app
        .request(Method::GET, "/api/v1/products?page=2&limit=2", None)
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"].as_array().expect("data array").len(), 1);
    assert_eq!(body["pagination"]["page"], 2);
}

#[tokio::test]
async fn product_listing_filters_by_name_search() {
    let app = TestApp::new().await;

    app.seed_product("Espresso Machine", dec!(250.00), dec!(120.00), 2)
        .await;
    app.seed_product("Milk Frother", dec!(35.00), dec!(12.00), 5)
        .await;
    app.seed_product("Espresso Cups", dec!(18.00), dec!(6.00), 20)
        .await;

    let response = app
        .request(Method::GET, "/api/v1/products?search=Espresso", None)
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    assert_eq!(body["pagination"]["total"], 2);
    for product in body["data"].as_array().expect("data array") {
        let name = product["name"].as_str().expect("name string");
        assert!(name.contains("Espresso"), "unexpected match: {}", name);
    }
}

#[tokio::test]
async fn fetching_an_unknown_product_is_not_found() {
    let app = TestApp::new().await;

    let missing = Uuid::new_v4();
    let response = app
        .request(Method::GET, &format!("/api/v1/products/{}", missing), None)
        .await;
    assert_eq!(response.status(), 404);

    let body = response_json(response).await;
    assert_eq!(
        body["message"],
        format!("Product with ID {} not found", missing)
    );
}

#[tokio::test]
async fn update_product_changes_only_provided_fields() {
    let app = TestApp::new().await;

    let product = app
        .seed_product("Notebook", dec!(4.00), dec!(1.20), 30)
        .await;

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/products/{}", product.id),
            Some(json!({ "price": "4.50", "stock": 25 })),
        )
        .await;
    assert_eq!(response.status(), 200);

    let body = response_json(response).await;
    assert_eq!(body["name"], "Notebook");
    assert_eq!(decimal_field(&body["price"]), dec!(4.50));
    assert_eq!(decimal_field(&body["cost"]), dec!(1.20));
    assert_eq!(body["stock"], 25);
}

#[tokio::test]
async fn deleted_product_is_gone() {
    let app = TestApp::new().await;

    let product = app.seed_product("Mug", dec!(9.00), dec!(3.00), 8).await;

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/v1/products/{}", product.id),
            None,
        )
        .await;
    assert_eq!(response.status(), 204);

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/products/{}", product.id),
            None,
        )
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn negative_price_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/products",
            Some(json!({ "name": "Broken", "price": "-1.00" })),
        )
        .await;
    assert_eq!(response.status(), 400);

    let body = response_json(response).await;
    let message = body["message"].as_str().expect("message string");
    assert!(message.starts_with("Validation failed"), "got: {}", message);
}

#[tokio::test]
async fn empty_product_name_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/products",
            Some(json!({ "name": "", "price": "5.00" })),
        )
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn variant_creation_requires_an_existing_product() {
    let app = TestApp::new().await;

    let missing = Uuid::new_v4();
    let response = app
        .request(
            Method::POST,
            "/api/v1/product-variants",
            Some(json!({ "name": "Large", "productId": missing })),
        )
        .await;
    assert_eq!(response.status(), 404);

    let body = response_json(response).await;
    assert_eq!(
        body["message"],
        format!("Product with ID {} not found", missing)
    );
}

#[tokio::test]
async fn variants_can_be_scoped_to_a_product() {
    let app = TestApp::new().await;

    let shirt = app.seed_product("Shirt", dec!(20.00), dec!(7.00), 50).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/product-variants",
            Some(json!({
                "name": "Shirt / Large",
                "sku": "SHIRT-L",
                "productId": shirt.id
            })),
        )
        .await;
    assert_eq!(response.status(), 201);

    let created = response_json(response).await;
    assert_eq!(created["name"], "Shirt / Large");
    assert_eq!(created["sku"], "SHIRT-L");
    assert_eq!(
        created["productId"].as_str(),
        Some(shirt.id.to_string().as_str())
    );

    // An unrelated variant must not show up in the scoped listing.
    app.seed_variant("Loose Widget").await;

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/product-variants?productId={}", shirt.id),
            None,
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["name"], "Shirt / Large");
}

#[tokio::test]
async fn variant_without_product_stands_alone() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/product-variants",
            Some(json!({ "name": "Gift Card" })),
        )
        .await;
    assert_eq!(response.status(), 201);

    let body = response_json(response).await;
    assert!(body["productId"].is_null());
    assert!(body["sku"].is_null());
}

#[tokio::test]
async fn variant_lookup_and_delete() {
    let app = TestApp::new().await;

    let variant = app.seed_variant("Sample Pack").await;

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/product-variants/{}", variant.id),
            None,
        )
        .await;
    assert_eq!(response.status(), 200);

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/v1/product-variants/{}", variant.id),
            None,
        )
        .await;
    assert_eq!(response.status(), 204);

    let missing = Uuid::new_v4();
    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/product-variants/{}", missing),
            None,
        )
        .await;
    assert_eq!(response.status(), 404);

    let body = response_json(response).await;
    assert_eq!(
        body["message"],
        format!("Variant with ID {} not found", missing)
    );
}
