//! Request and response types crossing the asynchronous API boundary.
//!
//! The coordinator never awaits anything. It queues an [`ApiRequest`]; the runtime
//! executes it against a [`ShopApi`](super::ShopApi) and feeds the [`ApiResponse`] back,
//! where it re-enters the event bus through a fresh emit.

use crate::domain::{OrderOutcome, OrderRequest, OrderResult, ProductList};
use serde::{Deserialize, Serialize};

/// Work for the API layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiRequest {
    /// `GET /product`.
    FetchProducts,
    /// `POST /order`.
    CreateOrder(OrderRequest),
}

impl ApiRequest {
    /// Short operation name for logs and spans.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::FetchProducts => "fetch products",
            Self::CreateOrder(_) => "create order",
        }
    }
}

/// Completion of an [`ApiRequest`], successful or not.
///
/// Failures are flattened to their message. For orders, a client-error status with an
/// `{ error }` body is a refusal by the shop (`OrderRejected`); anything else means the
/// order never reached a verdict (`OrderFailed`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiResponse {
    ProductsLoaded(ProductList),
    ProductsFailed { message: String },
    OrderPlaced(OrderResult),
    OrderRejected { message: String },
    OrderFailed { message: String },
}

impl ApiResponse {
    /// The order outcome carried by an order response, if this is one.
    #[must_use]
    pub fn order_outcome(&self) -> Option<OrderOutcome> {
        match self {
            Self::OrderPlaced(result) => Some(OrderOutcome::from(result.clone())),
            Self::OrderRejected { message } => Some(OrderOutcome::Rejected(message.clone())),
            Self::OrderFailed { message } => Some(OrderOutcome::Unreachable(message.clone())),
            Self::ProductsLoaded(_) | Self::ProductsFailed { .. } => None,
        }
    }
}
