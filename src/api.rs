//! HTTP surface

use axum::{extract::{Path, State}, http::{header, StatusCode}, response::{IntoResponse, Response}, routing::{delete, get, post, put}, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use validator::Validate;
use crate::domain::aggregates::CartLine;
use crate::domain::value_objects::{ProductId, Quantity};
use crate::invoice::Invoice;
use crate::normalize::{normalize_cart, normalize_product, normalize_reward, RawCartEntry, RawReward};
use crate::pricing::wallet::{apply_wallet, Payable};
use crate::pricing::{compute_breakdown, PriceBreakdown};
use crate::state::{AppState, Checkout, Session};
use crate::StorefrontError;

impl IntoResponse for StorefrontError {
    fn into_response(self) -> Response {
        let status = match &self {
            StorefrontError::Cart(_) => StatusCode::NOT_FOUND,
            StorefrontError::Order(_) | StorefrontError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        tracing::warn!(error = %self, %status, "request rejected");
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

type ApiResult<T> = Result<T, StorefrontError>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "opensase-storefront"})) }))
        .route("/api/v1/pricing/breakdown", post(price_snapshot))
        .route("/api/v1/cart/:session", get(get_cart).put(replace_cart).delete(clear_cart))
        .route("/api/v1/cart/:session/items", post(add_to_cart))
        .route("/api/v1/cart/:session/items/:product", delete(remove_from_cart))
        .route("/api/v1/cart/:session/items/:product/increment", post(increment_item))
        .route("/api/v1/cart/:session/items/:product/decrement", post(decrement_item))
        .route("/api/v1/wallet/:session", put(set_wallet))
        .route("/api/v1/wallet/:session/toggle", post(toggle_wallet))
        .route("/api/v1/session/:session", put(sign_in).delete(sign_out))
        .route("/api/v1/checkout/:session", get(checkout))
        .route("/api/v1/invoice/:session", post(invoice))
        .layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()).with_state(state)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSnapshotRequest {
    #[serde(default)]
    pub items: Vec<RawCartEntry>,
    #[serde(default)]
    pub use_wallet: bool,
    #[serde(default)]
    pub remaining_reward: Value,
}

#[derive(Debug, Serialize)]
pub struct PriceSnapshotResponse { pub breakdown: PriceBreakdown, pub payable: Payable }

async fn price_snapshot(Json(r): Json<PriceSnapshotRequest>) -> Json<PriceSnapshotResponse> {
    let lines = normalize_cart(&r.items);
    let breakdown = compute_breakdown(&lines);
    let balance = normalize_reward(&RawReward { remaining_reward: r.remaining_reward });
    Json(PriceSnapshotResponse { breakdown, payable: apply_wallet(&breakdown, r.use_wallet, balance) })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse { pub lines: Vec<CartLine>, pub item_count: usize, pub breakdown: PriceBreakdown }

impl From<&Session> for CartResponse {
    fn from(s: &Session) -> Self {
        Self { lines: s.cart.lines().to_vec(), item_count: s.cart.item_count(), breakdown: s.cart.breakdown() }
    }
}

async fn get_cart(State(s): State<AppState>, Path(session): Path<String>) -> Json<CartResponse> {
    Json(CartResponse::from(&s.store.snapshot(&session).await))
}

async fn replace_cart(State(s): State<AppState>, Path(session): Path<String>, Json(items): Json<Vec<RawCartEntry>>) -> Json<CartResponse> {
    let updated = s.store.replace_cart(&session, normalize_cart(&items)).await;
    Json(CartResponse::from(&updated))
}

async fn clear_cart(State(s): State<AppState>, Path(session): Path<String>) -> ApiResult<StatusCode> {
    s.store.update_cart(&session, |c| { c.clear(); Ok(()) }).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddToCartRequest {
    pub product: Value,
    #[validate(range(min = 1, max = 999))]
    pub quantity: u32,
}

async fn add_to_cart(State(s): State<AppState>, Path(session): Path<String>, Json(r): Json<AddToCartRequest>) -> ApiResult<(StatusCode, Json<CartResponse>)> {
    r.validate()?;
    s.store.update_cart(&session, |c| {
        let product = normalize_product(&r.product, || c.unused_line_id());
        c.add_item(CartLine::new(product, Quantity::new(r.quantity)));
        Ok(())
    }).await?;
    Ok((StatusCode::CREATED, Json(CartResponse::from(&s.store.snapshot(&session).await))))
}

async fn increment_item(State(s): State<AppState>, Path((session, product)): Path<(String, String)>) -> ApiResult<Json<CartResponse>> {
    s.store.update_cart(&session, |c| c.increment(&ProductId::new(product))).await?;
    Ok(Json(CartResponse::from(&s.store.snapshot(&session).await)))
}

async fn decrement_item(State(s): State<AppState>, Path((session, product)): Path<(String, String)>) -> ApiResult<Json<CartResponse>> {
    s.store.update_cart(&session, |c| c.decrement(&ProductId::new(product))).await?;
    Ok(Json(CartResponse::from(&s.store.snapshot(&session).await)))
}

async fn remove_from_cart(State(s): State<AppState>, Path((session, product)): Path<(String, String)>) -> ApiResult<StatusCode> {
    s.store.update_cart(&session, |c| c.remove_item(&ProductId::new(product))).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn set_wallet(State(s): State<AppState>, Path(session): Path<String>, Json(r): Json<RawReward>) -> Json<Checkout> {
    Json(s.store.set_wallet_balance(&session, normalize_reward(&r)).await.checkout())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleWalletRequest { pub use_wallet: bool }

async fn toggle_wallet(State(s): State<AppState>, Path(session): Path<String>, Json(r): Json<ToggleWalletRequest>) -> Json<Checkout> {
    Json(s.store.toggle_wallet(&session, r.use_wallet).await.checkout())
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    #[validate(length(min = 1))]
    pub token: String,
    #[validate(email)]
    pub email: Option<String>,
}

async fn sign_in(State(s): State<AppState>, Path(session): Path<String>, Json(r): Json<SignInRequest>) -> ApiResult<StatusCode> {
    r.validate()?;
    s.store.sign_in(&session, r.token, r.email).await;
    Ok(StatusCode::NO_CONTENT)
}

async fn sign_out(State(s): State<AppState>, Path(session): Path<String>) -> StatusCode {
    s.store.sign_out(&session).await;
    StatusCode::NO_CONTENT
}

async fn checkout(State(s): State<AppState>, Path(session): Path<String>) -> Json<Checkout> {
    Json(s.store.checkout(&session).await)
}

async fn invoice(State(s): State<AppState>, Path(session): Path<String>) -> ApiResult<impl IntoResponse> {
    let order = s.store.place_order(&session).await?;
    let html = Invoice::new(&order, &s.config.store_name, &s.config.currency).render_html();
    Ok(([(header::CONTENT_TYPE, "text/html; charset=utf-8")], html))
}
