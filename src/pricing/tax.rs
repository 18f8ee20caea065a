//! GST and IGST/SGST totals

use crate::domain::aggregates::{CartLine, TaxMode};
use crate::domain::value_objects::Money;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TaxTotals {
    pub gst: Money,
    pub igst: Money,
    pub sgst: Money,
}

/// Tax on a single unit at the selling price.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct UnitTax {
    gst: Money,
    igst: Money,
    sgst: Money,
}

fn unit_tax(line: &CartLine) -> UnitTax {
    let price = line.unit_price();
    match line.tax_mode() {
        TaxMode::Gst { gst_percent } => UnitTax { gst: price.percent(*gst_percent), ..UnitTax::default() },
        TaxMode::Split { sgst_percent, igst_percent } => UnitTax {
            gst: Money::ZERO,
            igst: price.percent(*igst_percent),
            sgst: price.percent(*sgst_percent),
        },
        TaxMode::None => UnitTax::default(),
    }
}

pub fn compute(lines: &[CartLine]) -> TaxTotals {
    let per_unit: Vec<UnitTax> = lines.iter().map(unit_tax).collect();
    lines.iter().zip(per_unit).fold(TaxTotals::default(), |acc, (line, unit)| TaxTotals {
        gst: acc.gst + unit.gst.multiply(line.quantity),
        igst: acc.igst + unit.igst.multiply(line.quantity),
        sgst: acc.sgst + unit.sgst.multiply(line.quantity),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use crate::domain::aggregates::Product;
    use crate::domain::value_objects::{Percent, ProductId, Quantity};

    fn taxed(price: i64, qty: u32, tax: TaxMode) -> CartLine {
        CartLine::new(Product::new(ProductId::new("P"), "P", Money::from_units(price), Money::from_units(price)).with_tax(tax), Quantity::new(qty))
    }

    #[test]
    fn test_tax_scales_with_quantity() {
        let t = compute(&[taxed(250, 4, TaxMode::Gst { gst_percent: Percent::new(dec!(12)) })]);
        assert_eq!(t.gst, Money::from_units(120));
        assert_eq!(t.igst, Money::ZERO);
    }

    #[test]
    fn test_regimes_are_exclusive() {
        let t = compute(&[
            taxed(100, 1, TaxMode::Split { sgst_percent: Percent::new(dec!(2.5)), igst_percent: Percent::new(dec!(5)) }),
            taxed(100, 1, TaxMode::None),
        ]);
        assert_eq!(t, TaxTotals { gst: Money::ZERO, igst: Money::from_units(5), sgst: Money::new(dec!(2.5)) });
    }
}
