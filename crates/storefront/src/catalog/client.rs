//! HTTP client for the catalog API.

use std::sync::Arc;

use async_trait::async_trait;
use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use rocket_shoes_core::{Product, ProductId, Stock};

use super::{CatalogError, StockOracle};
use crate::config::CatalogConfig;

const STOCK_PATH: &str = "stock";
const PRODUCTS_PATH: &str = "products";
const PRODUCT_CACHE_CAPACITY: u64 = 1000;

/// Client for the catalog API.
///
/// Cheap to clone; clones share the connection pool and product cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
    api_token: Option<SecretString>,
    products: Option<Cache<ProductId, Product>>,
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("product_cache", &self.inner.products.is_some())
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot carry path segments or the
    /// HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        if config.base_url.cannot_be_a_base() {
            return Err(CatalogError::InvalidBaseUrl(config.base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        let products = config.product_cache_ttl.map(|ttl| {
            Cache::builder()
                .max_capacity(PRODUCT_CACHE_CAPACITY)
                .time_to_live(ttl)
                .build()
        });

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: config.base_url.clone(),
                api_token: config.api_token.clone(),
                products,
            }),
        })
    }

    /// Build `{base}/{collection}/{id}`, keeping any path prefix on the base.
    fn endpoint(&self, collection: &str, id: ProductId) -> Result<Url, CatalogError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| CatalogError::InvalidBaseUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .push(collection)
            .push(&id.to_string());
        Ok(url)
    }

    /// GET a URL and decode its JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        let mut request = self.inner.client.get(url.clone());
        if let Some(token) = &self.inner.api_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                url = %url,
                body = %body.chars().take(200).collect::<String>(),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Status {
                status,
                url: url.to_string(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(
                error = %e,
                url = %url,
                body = %body.chars().take(200).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }

    /// Get the current stock level for a product. Never cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the status is not 2xx, or the
    /// body is not a stock record.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_stock(&self, id: ProductId) -> Result<Stock, CatalogError> {
        let url = self.endpoint(STOCK_PATH, id)?;
        let stock: Stock = self.get_json(url).await?;
        debug!(available = stock.amount, "Fetched stock");
        Ok(stock)
    }

    /// Get a product record.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the status is not 2xx, or the
    /// body is not a product record.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        if let Some(cache) = &self.inner.products
            && let Some(product) = cache.get(&id).await
        {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let url = self.endpoint(PRODUCTS_PATH, id)?;
        let product: Product = self.get_json(url).await?;

        if let Some(cache) = &self.inner.products {
            cache.insert(id, product.clone()).await;
        }

        Ok(product)
    }
}

#[async_trait]
impl StockOracle for CatalogClient {
    async fn stock(&self, id: ProductId) -> Result<Stock, CatalogError> {
        self.get_stock(id).await
    }

    async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.get_product(id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> CatalogClient {
        CatalogClient::new(&CatalogConfig::new(Url::parse(base).unwrap())).unwrap()
    }

    #[test]
    fn test_endpoint_on_bare_host() {
        let url = client("http://localhost:3333")
            .endpoint(STOCK_PATH, ProductId::new(5))
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:3333/stock/5");
    }

    #[test]
    fn test_endpoint_keeps_path_prefix() {
        let with_slash = client("https://api.example.com/v1/")
            .endpoint(PRODUCTS_PATH, ProductId::new(12))
            .unwrap();
        assert_eq!(with_slash.as_str(), "https://api.example.com/v1/products/12");

        let without_slash = client("https://api.example.com/v1")
            .endpoint(PRODUCTS_PATH, ProductId::new(12))
            .unwrap();
        assert_eq!(
            without_slash.as_str(),
            "https://api.example.com/v1/products/12"
        );
    }

    #[test]
    fn test_rejects_cannot_be_a_base_url() {
        let config = CatalogConfig::new(Url::parse("mailto:shop@example.com").unwrap());
        assert!(matches!(
            CatalogClient::new(&config),
            Err(CatalogError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn test_debug_omits_token() {
        let mut config = CatalogConfig::new(Url::parse("http://localhost:3333").unwrap());
        config.api_token = Some(SecretString::from("super_secret_token"));
        let client = CatalogClient::new(&config).unwrap();

        let debug_output = format!("{client:?}");
        assert!(debug_output.contains("localhost:3333"));
        assert!(!debug_output.contains("super_secret_token"));
    }
}
