//! Value Objects for the storefront

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};

/// Product identifier as issued by the catalogue backend
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(value: impl Into<String>) -> Self { Self(value.into()) }
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// Money value object.
///
/// The storefront trades in a single currency, so the amount is all that is
/// carried here; the currency code only matters when rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self { Self(amount) }
    pub fn from_units(units: i64) -> Self { Self(Decimal::from(units)) }
    pub fn amount(&self) -> Decimal { self.0 }
    pub fn is_zero(&self) -> bool { self.0.is_zero() }
    pub fn is_positive(&self) -> bool { self.0 > Decimal::ZERO }

    // Arithmetic saturates at the Decimal bounds; backend numbers are not range-checked.
    pub fn multiply(&self, qty: Quantity) -> Money { Money(self.0.saturating_mul(Decimal::from(qty.value()))) }

    /// `rate` percent of this amount, unrounded.
    pub fn percent(&self, rate: Percent) -> Money { Money(self.0.saturating_mul(rate.value()) / Decimal::ONE_HUNDRED) }

    /// Nearest whole currency unit, halves away from zero.
    pub fn round_to_unit(&self) -> Money {
        Money(self.0.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
    }

    pub fn clamp_non_negative(&self) -> Money { Money(self.0.max(Decimal::ZERO)) }
}

impl Add for Money {
    type Output = Money;
    fn add(self, rhs: Money) -> Money { Money(self.0.saturating_add(rhs.0)) }
}

impl Sub for Money {
    type Output = Money;
    fn sub(self, rhs: Money) -> Money { Money(self.0.saturating_sub(rhs.0)) }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money { iter.fold(Money::ZERO, Add::add) }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }
}

/// Quantity value object. A cart line always holds at least one unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    pub fn new(value: u32) -> Self { Self(value.max(1)) }
    pub fn value(&self) -> u32 { self.0 }
    pub fn add(&self, other: Quantity) -> Self { Self(self.0.saturating_add(other.0)) }
    pub fn increment(&self) -> Self { Self(self.0.saturating_add(1)) }
    pub fn decrement(&self) -> Self { Self(self.0.saturating_sub(1).max(1)) }
}

impl Default for Quantity { fn default() -> Self { Self(1) } }
impl From<u32> for Quantity { fn from(value: u32) -> Self { Self::new(value) } }
impl From<Quantity> for u32 { fn from(q: Quantity) -> u32 { q.0 } }

/// Percentage in the closed range 0..=100.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Decimal", into = "Decimal")]
pub struct Percent(Decimal);

impl Percent {
    pub const ZERO: Percent = Percent(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self { Self(value.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)) }
    pub fn value(&self) -> Decimal { self.0 }
    pub fn is_zero(&self) -> bool { self.0.is_zero() }
}

impl From<Decimal> for Percent { fn from(value: Decimal) -> Self { Self::new(value) } }
impl From<Percent> for Decimal { fn from(p: Percent) -> Decimal { p.0 } }
