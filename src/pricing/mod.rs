//! Order pricing
//!
//! One calculator for every screen that shows money: the cart summary, the
//! checkout summary and the printed invoice all read the same
//! [`PriceBreakdown`]. Nothing here performs I/O or keeps state, so callers
//! may recompute as often as they like.

pub mod discount;
pub mod tax;
pub mod wallet;

use serde::{Deserialize, Serialize};
use crate::domain::aggregates::CartLine;
use crate::domain::value_objects::Money;

/// Itemised totals for a cart snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    /// Sum of MRP × quantity.
    pub subtotal: Money,
    /// Sum of (MRP − price) × quantity.
    pub line_discount_total: Money,
    pub extra_discount_total: Money,
    pub gst_total: Money,
    pub igst_total: Money,
    pub sgst_total: Money,
    pub delivery_charge: Money,
    /// Never negative.
    pub grand_total: Money,
}

impl PriceBreakdown {
    pub fn price_with_delivery(&self) -> Money { self.grand_total + self.delivery_charge }

    /// The tax that enters the grand total: combined GST when it rounds to a
    /// non-zero amount, otherwise IGST plus SGST.
    pub fn applicable_tax(&self) -> Money {
        let gst = self.gst_total.round_to_unit();
        if !gst.is_zero() {
            gst
        } else {
            self.igst_total.round_to_unit() + self.sgst_total.round_to_unit()
        }
    }
}

pub fn compute_breakdown(lines: &[CartLine]) -> PriceBreakdown {
    let baseline = discount::baseline(lines);
    let extra_discount_total = discount::extra_discount(lines, baseline.line_discount_total);
    let taxes = tax::compute(lines);
    let delivery_charge: Money = lines.iter().map(CartLine::delivery_charge).sum();

    let mut breakdown = PriceBreakdown {
        subtotal: baseline.subtotal,
        line_discount_total: baseline.line_discount_total,
        extra_discount_total,
        gst_total: taxes.gst,
        igst_total: taxes.igst,
        sgst_total: taxes.sgst,
        delivery_charge,
        grand_total: Money::ZERO,
    };
    let total = breakdown.subtotal - extra_discount_total.round_to_unit() - breakdown.line_discount_total + breakdown.applicable_tax();
    breakdown.grand_total = total.clamp_non_negative();

    tracing::debug!(lines = lines.len(), subtotal = %breakdown.subtotal, grand_total = %breakdown.grand_total, "computed price breakdown");
    breakdown
}
