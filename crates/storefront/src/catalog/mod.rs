//! Catalog API: the stock oracle consulted before every cart mutation.
//!
//! # Endpoints
//!
//! - `GET {base}/stock/{id}` returns `{ "id": 1, "amount": 3 }`
//! - `GET {base}/products/{id}` returns the full product record
//!
//! # Architecture
//!
//! - [`StockOracle`] is the seam the cart manager depends on
//! - [`CatalogClient`] implements it over HTTP with `reqwest`
//! - Product metadata is cached via `moka`; stock never is

mod client;

pub use client::CatalogClient;

use async_trait::async_trait;
use thiserror::Error;

use rocket_shoes_core::{Product, ProductId, Stock};

/// Errors that can occur when talking to the catalog API.
///
/// The cart manager does not distinguish between them; every variant is an
/// unexpected failure from its point of view.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Catalog returned HTTP {status} for {url}")]
    Status {
        /// Response status code.
        status: reqwest::StatusCode,
        /// Requested URL.
        url: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured base URL cannot have paths appended to it.
    #[error("Invalid catalog base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Read-only source of stock levels and product metadata.
#[async_trait]
pub trait StockOracle: Send + Sync {
    /// Current available quantity for a product.
    async fn stock(&self, id: ProductId) -> Result<Stock, CatalogError>;

    /// Full product record for a product.
    async fn product(&self, id: ProductId) -> Result<Product, CatalogError>;
}
