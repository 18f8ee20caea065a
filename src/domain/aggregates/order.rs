//! Order Aggregate
//!
//! A priced snapshot of a cart taken at checkout. The invoice is printed
//! from it, so it never reprices itself after placement.

use chrono::{DateTime, Utc};
use uuid::Uuid;
use crate::domain::aggregates::cart::{Cart, CartLine};
use crate::domain::events::{DomainEvent, OrderEvent};
use crate::domain::value_objects::Money;
use crate::pricing::wallet::{apply_wallet, Payable};
use crate::pricing::PriceBreakdown;

#[derive(Clone, Debug)]
pub struct Order {
    id: String,
    order_number: String,
    customer: Option<String>,
    lines: Vec<CartLine>,
    breakdown: PriceBreakdown,
    payable: Payable,
    placed_at: DateTime<Utc>,
    events: Vec<DomainEvent>,
}

impl Order {
    pub fn place(cart: &Cart, customer: Option<String>, use_wallet: bool, wallet_balance: Money) -> Result<Self, OrderError> {
        if cart.is_empty() { return Err(OrderError::NoItems); }
        let id = Uuid::now_v7();
        let simple = id.simple().to_string();
        let order_number = format!("ORD-{}", simple[simple.len() - 8..].to_uppercase());
        let breakdown = cart.breakdown();
        let payable = apply_wallet(&breakdown, use_wallet, wallet_balance);
        let mut order = Self {
            id: id.to_string(), order_number, customer, lines: cart.lines().to_vec(),
            breakdown, payable, placed_at: Utc::now(), events: vec![],
        };
        order.raise_event(DomainEvent::Order(OrderEvent::Placed {
            order_id: order.id.clone(), order_number: order.order_number.clone(), payable: payable.payable,
        }));
        Ok(order)
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn order_number(&self) -> &str { &self.order_number }
    pub fn customer(&self) -> Option<&str> { self.customer.as_deref() }
    pub fn lines(&self) -> &[CartLine] { &self.lines }
    pub fn breakdown(&self) -> &PriceBreakdown { &self.breakdown }
    pub fn payable(&self) -> &Payable { &self.payable }
    pub fn placed_at(&self) -> DateTime<Utc> { self.placed_at }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }
}

#[derive(Debug, Clone, PartialEq)] pub enum OrderError { NoItems }
impl std::error::Error for OrderError {}
impl std::fmt::Display for OrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self { Self::NoItems => write!(f, "Cart is empty") }
    }
}
