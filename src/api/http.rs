//! `reqwest`-backed implementation of [`ShopApi`].

use super::backend::ShopApi;
use crate::domain::error::{Result, StorefrontError};
use crate::domain::{OrderRequest, OrderResult, ProductList};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// Error body returned with non-success statuses: `{ "error": "..." }`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// HTTP client for the shop REST API.
#[derive(Debug, Clone)]
pub struct HttpShopApi {
    client: Client,
    base_url: String,
}

impl HttpShopApi {
    /// Creates a client for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Decodes a success body, or turns a failure status into [`StorefrontError::Api`].
    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

        Err(StorefrontError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl ShopApi for HttpShopApi {
    async fn get_products(&self) -> Result<ProductList> {
        let url = self.url("/product");
        tracing::debug!(url = %url, "GET products");

        let response = self.client.get(&url).send().await?;
        let list: ProductList = Self::read_json(response).await?;

        tracing::debug!(count = list.items.len(), total = list.total, "products received");
        Ok(list)
    }

    async fn create_order(&self, order: &OrderRequest) -> Result<OrderResult> {
        let url = self.url("/order");
        tracing::debug!(
            url = %url,
            items = order.items.len(),
            total = order.total,
            "POST order"
        );

        let response = self.client.post(&url).json(order).send().await?;
        Self::read_json(response).await
    }
}
