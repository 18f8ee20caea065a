//! Aggregates module
pub mod product;
pub mod order;
pub mod cart;

pub use product::{Product, TaxMode};
pub use order::{Order, OrderError};
pub use cart::{Cart, CartError, CartLine};
