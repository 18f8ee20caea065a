//! Backend payload normalisation
//!
//! The catalogue backend is loosely typed: prices arrive as numbers or
//! numeric strings, optional fields may be null or missing. This is the only
//! place that copes with that. Anything that does not parse as a number
//! counts as zero; normalisation never fails.

use rust_decimal::prelude::*;
use serde::Deserialize;
use serde_json::Value;
use crate::domain::aggregates::{CartLine, Product, TaxMode};
use crate::domain::value_objects::{Money, Percent, ProductId, Quantity};

/// One entry of the backend's cart listing: `{ "product": {...}, "qty": n }`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawCartEntry {
    #[serde(default)]
    pub product: Value,
    #[serde(default)]
    pub qty: Value,
}

/// The backend's wallet payload: `{ "remainingReward": n }`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawReward {
    #[serde(default, rename = "remainingReward")]
    pub remaining_reward: Value,
}

/// Parses a loosely typed number. `None` for anything that is not one.
pub fn parse_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else if let Some(u) = n.as_u64() {
                Some(Decimal::from(u))
            } else {
                n.as_f64().and_then(Decimal::from_f64)
            }
        }
        Value::String(s) => {
            let s = s.trim();
            s.parse::<Decimal>().ok().or_else(|| Decimal::from_scientific(s).ok())
        }
        _ => None,
    }
}

/// [`parse_decimal`], coalescing to zero.
pub fn coerce_decimal(value: &Value) -> Decimal {
    parse_decimal(value).unwrap_or(Decimal::ZERO)
}

fn field<'a>(product: &'a Value, key: &str) -> Option<&'a Value> {
    product.get(key).filter(|v| !v.is_null())
}

fn decimal_field(product: &Value, key: &str) -> Decimal {
    match field(product, key) {
        None => Decimal::ZERO,
        Some(v) => parse_decimal(v).unwrap_or_else(|| {
            tracing::debug!(field = key, value = %v, "non-numeric field treated as zero");
            Decimal::ZERO
        }),
    }
}

fn money_field(product: &Value, key: &str) -> Money { Money::new(decimal_field(product, key)) }
fn percent_field(product: &Value, key: &str) -> Percent { Percent::new(decimal_field(product, key)) }

fn product_id(product: &Value) -> Option<ProductId> {
    ["_id", "id"].iter().find_map(|key| match field(product, key) {
        Some(Value::String(s)) if !s.is_empty() => Some(ProductId::new(s.clone())),
        Some(Value::Number(n)) => Some(ProductId::new(n.to_string())),
        _ => None,
    })
}

fn tax_mode(product: &Value) -> TaxMode {
    if field(product, "gst").is_some() {
        TaxMode::Gst { gst_percent: percent_field(product, "gst") }
    } else if field(product, "sgst").is_some() || field(product, "igst").is_some() {
        TaxMode::Split { sgst_percent: percent_field(product, "sgst"), igst_percent: percent_field(product, "igst") }
    } else {
        TaxMode::None
    }
}

/// Builds a [`Product`] from the backend's product object. `fallback` names
/// the product when the payload carries no id.
pub fn normalize_product(product: &Value, fallback: impl FnOnce() -> ProductId) -> Product {
    let name = field(product, "name").and_then(Value::as_str).unwrap_or_default();
    let discount = field(product, "discount").map(|_| percent_field(product, "discount"));
    Product {
        id: product_id(product).unwrap_or_else(fallback),
        name: name.to_string(),
        mrp: money_field(product, "mrp"),
        price: money_field(product, "price"),
        discount,
        tax: tax_mode(product),
        delivery_charge: money_field(product, "deliveryCharge"),
    }
}

/// Quantity from a loose value; fractional parts are dropped and anything
/// below one becomes one.
pub fn normalize_quantity(qty: &Value) -> Quantity {
    Quantity::new(coerce_decimal(qty).trunc().to_u32().unwrap_or(1))
}

pub fn normalize_line(index: usize, entry: &RawCartEntry) -> CartLine {
    let fallback = || ProductId::new(format!("line-{}", index));
    CartLine::new(normalize_product(&entry.product, fallback), normalize_quantity(&entry.qty))
}

pub fn normalize_cart(entries: &[RawCartEntry]) -> Vec<CartLine> {
    entries.iter().enumerate().map(|(i, e)| normalize_line(i, e)).collect()
}

pub fn normalize_reward(reward: &RawReward) -> Money {
    Money::new(coerce_decimal(&reward.remaining_reward)).clamp_non_negative()
}
