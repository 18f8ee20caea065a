// Drives the storefront router end to end with in-memory sessions.

use axum::{body::Body, http::{Request, StatusCode}, Router};
use opensase_storefront::{api, state::AppState, Config};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    api::router(AppState::new(Config::default()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, String) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(b) => builder.header("content-type", "application/json").body(Body::from(b.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, text) = send(app, method, uri, body).await;
    (status, if text.is_empty() { Value::Null } else { serde_json::from_str(&text).unwrap() })
}

fn money(v: &Value) -> f64 { v.as_f64().unwrap() }

#[tokio::test]
async fn health() {
    let (status, body) = send_json(&app(), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn stateless_breakdown_with_wallet() {
    let body = json!({
        "items": [{ "product": { "_id": "P1", "mrp": "1000", "price": 800, "discount": 0, "deliveryCharge": 50 }, "qty": 2 }],
        "useWallet": true,
        "remainingReward": 2000
    });
    let (status, out) = send_json(&app(), "POST", "/api/v1/pricing/breakdown", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(money(&out["breakdown"]["subtotal"]), 2000.0);
    assert_eq!(money(&out["breakdown"]["lineDiscountTotal"]), 400.0);
    assert_eq!(money(&out["breakdown"]["grandTotal"]), 1600.0);
    assert_eq!(money(&out["payable"]["priceWithDelivery"]), 1650.0);
    assert_eq!(money(&out["payable"]["payable"]), 0.0);
}

#[tokio::test]
async fn cart_quantity_buttons() {
    let app = app();
    let add = json!({ "product": { "_id": "P1", "name": "Kurta", "mrp": 500, "price": 500, "gst": "18" }, "quantity": 1 });
    let (status, cart) = send_json(&app, "POST", "/api/v1/cart/s1/items", Some(add)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(money(&cart["breakdown"]["grandTotal"]), 590.0);

    let (_, cart) = send_json(&app, "POST", "/api/v1/cart/s1/items/P1/increment", None).await;
    assert_eq!(cart["lines"][0]["quantity"], 2);
    assert_eq!(money(&cart["breakdown"]["gstTotal"]), 180.0);

    let (_, cart) = send_json(&app, "POST", "/api/v1/cart/s1/items/P1/decrement", None).await;
    assert_eq!(cart["lines"][0]["quantity"], 1);
    let (_, cart) = send_json(&app, "POST", "/api/v1/cart/s1/items/P1/decrement", None).await;
    assert_eq!(cart["lines"][0]["quantity"], 1);

    let (status, _) = send_json(&app, "POST", "/api/v1/cart/s1/items/nope/increment", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(&app, "DELETE", "/api/v1/cart/s1/items/P1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, cart) = send_json(&app, "GET", "/api/v1/cart/s1", None).await;
    assert_eq!(cart["itemCount"], 0);
}

#[tokio::test]
async fn rejects_zero_quantity() {
    let add = json!({ "product": { "_id": "P1", "mrp": 10, "price": 10 }, "quantity": 0 });
    let (status, body) = send_json(&app(), "POST", "/api/v1/cart/s1/items", Some(add)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("quantity"));
}

#[tokio::test]
async fn wallet_below_threshold_is_ignored() {
    let app = app();
    let items = json!([{ "product": { "_id": "P1", "mrp": 150, "price": 150 }, "qty": 1 }]);
    send_json(&app, "PUT", "/api/v1/cart/s2", Some(items)).await;
    send_json(&app, "PUT", "/api/v1/wallet/s2", Some(json!({ "remainingReward": 100 }))).await;
    let (_, checkout) = send_json(&app, "POST", "/api/v1/wallet/s2/toggle", Some(json!({ "useWallet": true }))).await;
    assert_eq!(checkout["payable"]["walletEligible"], false);
    assert_eq!(money(&checkout["payable"]["payable"]), 150.0);
}

#[tokio::test]
async fn checkout_and_invoice() {
    let app = app();
    let items = json!([
        { "product": { "_id": "A", "name": "Saree", "mrp": 1000, "price": 800, "sgst": 9, "igst": 9, "deliveryCharge": 40 }, "qty": 1 },
        { "product": { "_id": "B", "name": "Dupatta", "mrp": "300", "price": "300" }, "qty": "2" }
    ]);
    send_json(&app, "PUT", "/api/v1/cart/s3", Some(items)).await;
    send_json(&app, "PUT", "/api/v1/wallet/s3", Some(json!({ "remainingReward": "100" }))).await;
    send_json(&app, "POST", "/api/v1/wallet/s3/toggle", Some(json!({ "useWallet": true }))).await;

    // subtotal 1600, markdown 200, igst 72, sgst 72 -> 1544; + 40 delivery - 100 wallet
    let (status, checkout) = send_json(&app, "GET", "/api/v1/checkout/s3", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(money(&checkout["breakdown"]["grandTotal"]), 1544.0);
    assert_eq!(money(&checkout["payable"]["payable"]), 1484.0);

    let (status, html) = send(&app, "POST", "/api/v1/invoice/s3", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Saree"));
    assert!(html.contains("INR 1484.00"));
}

#[tokio::test]
async fn invoice_for_empty_cart() {
    let (status, _) = send_json(&app(), "POST", "/api/v1/invoice/empty", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn invoice_is_not_a_get() {
    let app = app();
    send_json(&app, "PUT", "/api/v1/cart/s5", Some(json!([{ "product": { "_id": "A", "mrp": 10, "price": 10 }, "qty": 1 }]))).await;
    let (status, _) = send(&app, "GET", "/api/v1/invoice/s5", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn unnamed_products_do_not_collide() {
    let app = app();
    let items = json!([
        { "product": { "name": "First", "mrp": 100, "price": 100 }, "qty": 1 },
        { "product": { "name": "Second", "mrp": 500, "price": 500 }, "qty": 1 }
    ]);
    send_json(&app, "PUT", "/api/v1/cart/s6", Some(items)).await;
    let (status, _) = send_json(&app, "DELETE", "/api/v1/cart/s6/items/line-0", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let add = json!({ "product": { "name": "Third", "mrp": 10, "price": 10 }, "quantity": 1 });
    let (status, cart) = send_json(&app, "POST", "/api/v1/cart/s6/items", Some(add)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(cart["itemCount"], 2);
    let second = cart["lines"].as_array().unwrap().iter().find(|l| l["product"]["name"] == "Second").unwrap();
    assert_eq!(money(&second["product"]["mrp"]), 500.0);
    assert_eq!(second["quantity"], 1);
}

#[tokio::test]
async fn sign_in_and_out() {
    let app = app();
    let (status, _) = send_json(&app, "PUT", "/api/v1/session/s4", Some(json!({ "token": "abc", "email": "asha@example.com" }))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send_json(&app, "PUT", "/api/v1/session/s4", Some(json!({ "token": "abc", "email": "not-an-email" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (status, _) = send_json(&app, "DELETE", "/api/v1/session/s4", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
