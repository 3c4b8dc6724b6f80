//! Shop API abstraction.
//!
//! The [`ShopApi`] trait covers exactly the two calls the storefront makes, so the
//! runtime can be driven by the HTTP client in production and by an in-memory double
//! in tests.

use crate::domain::error::Result;
use crate::domain::{OrderRequest, OrderResult, ProductList};
use async_trait::async_trait;

/// Remote catalog and ordering service.
///
/// # Implementations
///
/// - [`HttpShopApi`](super::HttpShopApi): `reqwest` client for the REST API
#[async_trait]
pub trait ShopApi: Send + Sync {
    /// Fetches the full catalog.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or an
    /// undecodable body.
    async fn get_products(&self) -> Result<ProductList>;

    /// Submits an order.
    ///
    /// The shop refuses an order either with an [`OrderResult`] whose `error` is set or
    /// with a client-error status carrying `{ error }`;
    /// [`execute`](super::execute) reports both as a rejection.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or an
    /// undecodable body.
    async fn create_order(&self, order: &OrderRequest) -> Result<OrderResult>;
}
