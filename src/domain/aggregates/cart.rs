//! Cart Aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::domain::aggregates::product::{Product, TaxMode};
use crate::domain::events::{CartEvent, DomainEvent};
use crate::domain::value_objects::{Money, Percent, ProductId, Quantity};
use crate::pricing::{compute_breakdown, PriceBreakdown};

/// One product in the cart and how many units of it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    pub quantity: Quantity,
}

impl CartLine {
    pub fn new(product: Product, quantity: Quantity) -> Self { Self { product, quantity } }

    pub fn product_id(&self) -> &ProductId { &self.product.id }
    pub fn unit_mrp(&self) -> Money { self.product.mrp }
    pub fn unit_price(&self) -> Money { self.product.price }
    pub fn discount_percent(&self) -> Percent { self.product.extra_discount() }
    pub fn tax_mode(&self) -> &TaxMode { &self.product.tax }
    pub fn delivery_charge(&self) -> Money { self.product.delivery_charge }

    pub fn mrp_total(&self) -> Money { self.unit_mrp().multiply(self.quantity) }
    pub fn price_total(&self) -> Money { self.unit_price().multiply(self.quantity) }
    pub fn markdown(&self) -> Money { (self.unit_mrp() - self.unit_price()).multiply(self.quantity) }
}

#[derive(Clone, Debug)]
pub struct Cart {
    id: String,
    lines: Vec<CartLine>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    events: Vec<DomainEvent>,
}

impl Default for Cart {
    fn default() -> Self { Self::new() }
}

impl Cart {
    pub fn new() -> Self {
        let now = Utc::now();
        Self { id: Uuid::new_v4().to_string(), lines: vec![], created_at: now, updated_at: now, events: vec![] }
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn lines(&self) -> &[CartLine] { &self.lines }
    pub fn item_count(&self) -> usize { self.lines.len() }
    pub fn unit_count(&self) -> u32 { self.lines.iter().map(|l| l.quantity.value()).sum() }
    pub fn is_empty(&self) -> bool { self.lines.is_empty() }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }
    pub fn updated_at(&self) -> DateTime<Utc> { self.updated_at }

    pub fn breakdown(&self) -> PriceBreakdown { compute_breakdown(&self.lines) }

    pub fn contains(&self, product_id: &ProductId) -> bool { self.lines.iter().any(|l| l.product_id() == product_id) }

    /// A `line-N` id for a product the backend sent without one, unused in this cart.
    pub fn unused_line_id(&self) -> ProductId {
        let mut n = self.lines.len();
        loop {
            let id = ProductId::new(format!("line-{}", n));
            if !self.contains(&id) { return id; }
            n += 1;
        }
    }

    /// Adds a line, merging into an existing line for the same product.
    /// The newer product snapshot wins so that repricing reaches the cart.
    pub fn add_item(&mut self, line: CartLine) {
        let product_id = line.product_id().clone();
        let quantity = match self.lines.iter().position(|l| l.product_id() == &product_id) {
            Some(idx) => {
                let existing = &mut self.lines[idx];
                existing.quantity = existing.quantity.add(line.quantity);
                existing.product = line.product;
                existing.quantity
            }
            None => {
                let q = line.quantity;
                self.lines.push(line);
                q
            }
        };
        self.touch();
        self.raise_event(CartEvent::ItemAdded { product_id, quantity: quantity.value() });
    }

    pub fn increment(&mut self, product_id: &ProductId) -> Result<Quantity, CartError> {
        self.change_quantity(product_id, |q| q.increment())
    }

    /// Lowers the quantity by one; a line never drops below one unit.
    pub fn decrement(&mut self, product_id: &ProductId) -> Result<Quantity, CartError> {
        self.change_quantity(product_id, |q| q.decrement())
    }

    pub fn remove_item(&mut self, product_id: &ProductId) -> Result<(), CartError> {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id() != product_id);
        if self.lines.len() == before { return Err(CartError::ItemNotFound(product_id.clone())); }
        self.touch();
        self.raise_event(CartEvent::ItemRemoved { product_id: product_id.clone() });
        Ok(())
    }

    /// Swaps in a fresh snapshot from the backend.
    pub fn replace(&mut self, lines: Vec<CartLine>) {
        self.lines.clear();
        for line in lines {
            match self.lines.iter().position(|l| l.product_id() == line.product_id()) {
                Some(idx) => {
                    let existing = &mut self.lines[idx];
                    existing.quantity = existing.quantity.add(line.quantity);
                    existing.product = line.product;
                }
                None => self.lines.push(line),
            }
        }
        self.touch();
        self.raise_event(CartEvent::Replaced { lines: self.lines.len() });
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.touch();
        self.raise_event(CartEvent::Cleared);
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }

    fn change_quantity(&mut self, product_id: &ProductId, f: impl FnOnce(Quantity) -> Quantity) -> Result<Quantity, CartError> {
        let line = self.lines.iter_mut().find(|l| l.product_id() == product_id).ok_or_else(|| CartError::ItemNotFound(product_id.clone()))?;
        line.quantity = f(line.quantity);
        let quantity = line.quantity;
        self.touch();
        self.raise_event(CartEvent::QuantityChanged { product_id: product_id.clone(), quantity: quantity.value() });
        Ok(quantity)
    }

    fn raise_event(&mut self, e: CartEvent) { self.events.push(DomainEvent::Cart(e)); }
    fn touch(&mut self) { self.updated_at = Utc::now(); }
}

#[derive(Debug, Clone, PartialEq)] pub enum CartError { ItemNotFound(ProductId) }
impl std::error::Error for CartError {}
impl std::fmt::Display for CartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self { Self::ItemNotFound(id) => write!(f, "Item {} not in cart", id) }
    }
}
