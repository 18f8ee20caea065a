//! Wallet (store credit) application at checkout

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use crate::domain::value_objects::Money;
use crate::pricing::PriceBreakdown;

/// Wallet credit is only offered on orders whose total exceeds this amount.
pub const WALLET_THRESHOLD: Decimal = Decimal::from_parts(200, 0, 0, false, 0);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payable {
    pub price_with_delivery: Money,
    /// Whether the wallet option is offered at all.
    pub wallet_eligible: bool,
    pub wallet_applied: Money,
    pub payable: Money,
}

pub fn wallet_eligible(breakdown: &PriceBreakdown) -> bool {
    breakdown.grand_total.amount() > WALLET_THRESHOLD
}

pub fn apply_wallet(breakdown: &PriceBreakdown, use_wallet: bool, balance: Money) -> Payable {
    let price_with_delivery = breakdown.price_with_delivery().clamp_non_negative();
    let eligible = wallet_eligible(breakdown);
    let wallet_applied = if use_wallet && eligible {
        balance.clamp_non_negative().min(price_with_delivery)
    } else {
        Money::ZERO
    };
    if use_wallet && !eligible {
        tracing::debug!(total = %breakdown.grand_total, "wallet requested below threshold, ignored");
    }
    Payable {
        price_with_delivery,
        wallet_eligible: eligible,
        wallet_applied,
        payable: (price_with_delivery - wallet_applied).clamp_non_negative(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breakdown(total: i64, delivery: i64) -> PriceBreakdown {
        PriceBreakdown { grand_total: Money::from_units(total), delivery_charge: Money::from_units(delivery), ..PriceBreakdown::default() }
    }

    #[test]
    fn test_wallet_covers_everything() {
        let p = apply_wallet(&breakdown(1600, 50), true, Money::from_units(2000));
        assert_eq!(p.price_with_delivery, Money::from_units(1650));
        assert_eq!(p.wallet_applied, Money::from_units(1650));
        assert_eq!(p.payable, Money::ZERO);
    }

    #[test]
    fn test_partial_wallet() {
        let p = apply_wallet(&breakdown(1600, 50), true, Money::from_units(150));
        assert_eq!(p.payable, Money::from_units(1500));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let p = apply_wallet(&breakdown(200, 40), true, Money::from_units(100));
        assert!(!p.wallet_eligible);
        assert_eq!(p.wallet_applied, Money::ZERO);
        assert_eq!(p.payable, Money::from_units(240));
        assert!(apply_wallet(&breakdown(201, 0), false, Money::from_units(100)).wallet_eligible);
    }

    #[test]
    fn test_wallet_not_requested() {
        let p = apply_wallet(&breakdown(900, 0), false, Money::from_units(500));
        assert_eq!(p.payable, Money::from_units(900));
    }
}
