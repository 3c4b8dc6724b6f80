//! Domain layer for the storefront.
//!
//! Core types independent of the event bus, the HTTP client and the view layer.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`product`]: Catalog products and categories
//! - [`order`]: Draft order, validation errors, and submission payloads

pub mod error;
pub mod order;
pub mod product;

pub use error::{Result, StorefrontError};
pub use order::{
    DraftOrder, FormErrors, OrderField, OrderOutcome, OrderRequest, OrderResult, PaymentMethod,
};
pub use product::{Category, Product, ProductList};
