//! OpenSASE Storefront
//!
//! Pricing service behind the storefront's cart, checkout and invoice
//! screens. Every screen asks the same calculator for its numbers.
//!
//! ## Features
//! - Order pricing (MRP markdown, extra discount, GST / IGST+SGST)
//! - Wallet credit application at checkout
//! - Session-scoped cart and wallet state
//! - Printable HTML invoices

pub mod api;
pub mod config;
pub mod domain;
pub mod invoice;
pub mod normalize;
pub mod pricing;
pub mod state;

use thiserror::Error;

use crate::domain::aggregates::{CartError, OrderError};

pub use crate::config::Config;
pub use crate::domain::aggregates::{Cart, CartLine, Order, Product, TaxMode};
pub use crate::domain::value_objects::{Money, Percent, ProductId, Quantity};
pub use crate::pricing::{compute_breakdown, PriceBreakdown};
pub use crate::pricing::wallet::{apply_wallet, Payable};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error("Invalid request: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
