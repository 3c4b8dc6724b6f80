//! Shop API layer: the only asynchronous boundary of the storefront.
//!
//! # Modules
//!
//! - `backend`: [`ShopApi`] trait
//! - `http`: [`HttpShopApi`], the `reqwest` implementation
//! - `messages`: [`ApiRequest`] / [`ApiResponse`] exchanged with the coordinator

pub mod backend;
pub mod http;
pub mod messages;

pub use backend::ShopApi;
pub use http::HttpShopApi;
pub use messages::{ApiRequest, ApiResponse};

use crate::domain::error::{Result, StorefrontError};
use tracing::Instrument;

/// Executes one request and folds the result into an [`ApiResponse`].
///
/// Failures never escape: they are logged and reported as the matching `*Failed`
/// (or, for a refused order, `OrderRejected`) response so the flow can render them.
pub async fn execute(api: &dyn ShopApi, request: ApiRequest) -> ApiResponse {
    let operation = request.operation();
    let span = tracing::info_span!("api_request", operation = operation);

    async move {
        match request {
            ApiRequest::FetchProducts => {
                handle_result(
                    operation,
                    api.get_products().await,
                    ApiResponse::ProductsLoaded,
                    |message| ApiResponse::ProductsFailed { message },
                )
            }
            ApiRequest::CreateOrder(order) => match api.create_order(&order).await {
                Err(StorefrontError::Api { status, message }) if (400..500).contains(&status) => {
                    tracing::warn!(
                        operation = operation,
                        status = status,
                        error = %message,
                        "order rejected"
                    );
                    ApiResponse::OrderRejected { message }
                }
                result => handle_result(operation, result, ApiResponse::OrderPlaced, |message| {
                    ApiResponse::OrderFailed { message }
                }),
            },
        }
    }
    .instrument(span)
    .await
}

/// Standardizes logging of API results.
fn handle_result<T>(
    operation: &str,
    result: Result<T>,
    on_success: impl FnOnce(T) -> ApiResponse,
    on_failure: impl FnOnce(String) -> ApiResponse,
) -> ApiResponse {
    match result {
        Ok(value) => {
            tracing::debug!(operation = operation, "api request successful");
            on_success(value)
        }
        Err(e) => {
            tracing::warn!(operation = operation, error = %e, "api request failed");
            on_failure(e.to_string())
        }
    }
}
