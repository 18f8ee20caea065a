// Property tests for the order pricing calculator.

use opensase_storefront::{apply_wallet, compute_breakdown, CartLine, Money, Percent, PriceBreakdown, Product, ProductId, Quantity, TaxMode};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn tax_mode() -> impl Strategy<Value = TaxMode> {
    prop_oneof![
        Just(TaxMode::None),
        (0u32..=28).prop_map(|g| TaxMode::Gst { gst_percent: Percent::new(Decimal::from(g)) }),
        (0u32..=14, 0u32..=28).prop_map(|(s, i)| TaxMode::Split {
            sgst_percent: Percent::new(Decimal::from(s)),
            igst_percent: Percent::new(Decimal::from(i)),
        }),
    ]
}

prop_compose! {
    fn cart_line(id: usize)(
        mrp in 0i64..100_000,
        markdown_pct in 0i64..=100,
        discount in proptest::option::of(0u32..=50),
        qty in 1u32..20,
        tax in tax_mode(),
        delivery in 0i64..200,
    ) -> CartLine {
        let price = mrp * (100 - markdown_pct) / 100;
        let mut product = Product::new(ProductId::new(format!("P{}", id)), "item", Money::from_units(mrp), Money::from_units(price))
            .with_tax(tax)
            .with_delivery_charge(Money::from_units(delivery));
        if let Some(d) = discount { product = product.with_discount(Percent::new(Decimal::from(d))); }
        CartLine::new(product, Quantity::new(qty))
    }
}

fn cart() -> impl Strategy<Value = Vec<CartLine>> {
    (0usize..6).prop_flat_map(|n| (0..n).map(cart_line).collect::<Vec<_>>())
}

proptest! {
    #[test]
    fn breakdown_is_deterministic(lines in cart()) {
        prop_assert_eq!(compute_breakdown(&lines), compute_breakdown(&lines));
    }

    #[test]
    fn grand_total_never_negative(lines in cart()) {
        prop_assert!(compute_breakdown(&lines).grand_total >= Money::ZERO);
    }

    #[test]
    fn full_price_lines_have_no_discount(mrp in 0i64..50_000, qty in 1u32..50) {
        let line = CartLine::new(Product::new(ProductId::new("P"), "p", Money::from_units(mrp), Money::from_units(mrp)), Quantity::new(qty));
        let b = compute_breakdown(&[line]);
        prop_assert_eq!(b.line_discount_total, Money::ZERO);
        prop_assert_eq!(b.extra_discount_total, Money::ZERO);
    }

    #[test]
    fn tax_regimes_are_exclusive(lines in cart()) {
        let split_only: Vec<CartLine> = lines.iter().filter(|l| matches!(l.tax_mode(), TaxMode::Split { .. })).cloned().collect();
        prop_assert_eq!(compute_breakdown(&split_only).gst_total, Money::ZERO);
        let gst_only: Vec<CartLine> = lines.iter().filter(|l| matches!(l.tax_mode(), TaxMode::Gst { .. })).cloned().collect();
        let b = compute_breakdown(&gst_only);
        prop_assert_eq!(b.igst_total, Money::ZERO);
        prop_assert_eq!(b.sgst_total, Money::ZERO);
    }

    #[test]
    fn wallet_covering_total_leaves_nothing_to_pay(lines in cart(), extra in 0i64..1_000) {
        let b = compute_breakdown(&lines);
        let balance = b.price_with_delivery() + Money::from_units(extra);
        let p = apply_wallet(&b, true, balance);
        if p.wallet_eligible {
            prop_assert_eq!(p.payable, Money::ZERO);
        }
    }

    #[test]
    fn wallet_has_no_effect_at_or_below_threshold(total in 0i64..=200, delivery in 0i64..100, balance in 0i64..5_000) {
        let b = PriceBreakdown { grand_total: Money::from_units(total), delivery_charge: Money::from_units(delivery), ..PriceBreakdown::default() };
        let with = apply_wallet(&b, true, Money::from_units(balance));
        let without = apply_wallet(&b, false, Money::from_units(balance));
        prop_assert_eq!(with.payable, without.payable);
        prop_assert_eq!(with.payable, Money::from_units(total + delivery));
    }
}
