//! Product pricing as carried on a cart line

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use crate::domain::value_objects::{Money, Percent, ProductId};

/// Which tax fields a product carries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaxMode {
    /// Single combined rate.
    #[serde(rename_all = "camelCase")]
    Gst { gst_percent: Percent },
    /// Independent state and integrated rates.
    #[serde(rename_all = "camelCase")]
    Split { sgst_percent: Percent, igst_percent: Percent },
    #[default]
    None,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    pub mrp: Money,
    pub price: Money,
    #[serde(default)]
    pub discount: Option<Percent>,
    #[serde(default)]
    pub tax: TaxMode,
    #[serde(default)]
    pub delivery_charge: Money,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>, mrp: Money, price: Money) -> Self {
        Self { id, name: name.into(), mrp, price, discount: None, tax: TaxMode::None, delivery_charge: Money::ZERO }
    }

    pub fn with_discount(mut self, discount: Percent) -> Self { self.discount = Some(discount); self }
    pub fn with_tax(mut self, tax: TaxMode) -> Self { self.tax = tax; self }
    pub fn with_delivery_charge(mut self, charge: Money) -> Self { self.delivery_charge = charge; self }

    /// Extra promotional discount, zero when the product has none.
    pub fn extra_discount(&self) -> Percent { self.discount.unwrap_or(Percent::ZERO) }

    /// Whole-number markdown badge ("20% off") shown next to the price.
    /// A product without an MRP shows no markdown.
    pub fn markdown_percent(&self) -> Decimal {
        if self.mrp.is_zero() {
            return Decimal::ZERO;
        }
        self.mrp.amount()
            .checked_sub(self.price.amount())
            .and_then(|gap| gap.checked_div(self.mrp.amount()))
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .map(|pct| pct.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .unwrap_or(Decimal::ZERO)
    }
}
