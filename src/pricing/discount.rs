//! Markdown and extra-discount totals

use crate::domain::aggregates::CartLine;
use crate::domain::value_objects::Money;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Baseline {
    pub subtotal: Money,
    pub line_discount_total: Money,
}

/// MRP subtotal and the MRP-to-price markdown across all lines.
pub fn baseline(lines: &[CartLine]) -> Baseline {
    lines.iter().fold(Baseline::default(), |acc, line| Baseline {
        subtotal: acc.subtotal + line.mrp_total(),
        line_discount_total: acc.line_discount_total + line.markdown(),
    })
}

/// Extra promotional discount.
///
/// Each line's discount base is its MRP total less the *cart-wide* markdown,
/// not the line's own markdown. Lines whose base is not positive get nothing.
pub fn extra_discount(lines: &[CartLine], line_discount_total: Money) -> Money {
    lines
        .iter()
        .map(|line| {
            let base = line.mrp_total() - line_discount_total;
            if base.is_positive() { base.percent(line.discount_percent()) } else { Money::ZERO }
        })
        .sum()
}
