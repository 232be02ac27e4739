//! Integration tests for Rocket Shoes.
//!
//! Tests drive the real [`CatalogClient`] and [`FileStore`] against an
//! in-process fake catalog API, so they need no external services.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocket-shoes-integration-tests
//! ```
//!
//! [`CatalogClient`]: rocket_shoes_storefront::catalog::CatalogClient
//! [`FileStore`]: rocket_shoes_storefront::storage::FileStore

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{OriginalUri, Path as UrlPath, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use parking_lot::RwLock;
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

use rocket_shoes_storefront::config::{CatalogConfig, StorageConfig, StorefrontConfig};

/// Path prefix the fake catalog also serves under, for base URLs with a path.
pub const API_PREFIX: &str = "/api";

/// How a route should misbehave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Answer with HTTP 500.
    ServerError,
    /// Answer 200 with a body that is not JSON.
    Malformed,
}

/// A request the fake catalog received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenRequest {
    /// Full request path, including any prefix.
    pub path: String,
    /// Raw `Authorization` header, if sent.
    pub authorization: Option<String>,
}

#[derive(Debug, Default)]
struct Catalog {
    stock: RwLock<HashMap<i32, i64>>,
    products: RwLock<HashMap<i32, Value>>,
    faults: RwLock<HashMap<String, Fault>>,
    seen: RwLock<Vec<SeenRequest>>,
}

impl Catalog {
    fn record(&self, uri: &axum::http::Uri, headers: &HeaderMap) -> Option<Fault> {
        let path = uri.path().to_string();
        let authorization = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let fault = self
            .faults
            .read()
            .get(path.trim_start_matches(API_PREFIX))
            .copied();
        self.seen.write().push(SeenRequest {
            path,
            authorization,
        });
        fault
    }
}

/// An in-process catalog API serving `/stock/{id}` and `/products/{id}`.
///
/// The server stops when the value is dropped.
#[derive(Debug)]
pub struct FakeCatalog {
    addr: SocketAddr,
    catalog: Arc<Catalog>,
    server: JoinHandle<()>,
}

impl FakeCatalog {
    /// Bind an ephemeral local port and start serving.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start() -> std::io::Result<Self> {
        let catalog = Arc::new(Catalog::default());

        let routes = Router::new()
            .route("/stock/{id}", get(stock))
            .route("/products/{id}", get(product));
        let app = Router::new()
            .merge(routes.clone())
            .nest(API_PREFIX, routes)
            .with_state(Arc::clone(&catalog));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            addr,
            catalog,
            server,
        })
    }

    /// Set the available quantity of a product.
    pub fn set_stock(&self, id: i32, amount: i64) {
        self.catalog.stock.write().insert(id, amount);
    }

    /// Set the record returned for a product.
    pub fn set_product(&self, id: i32, product: Value) {
        self.catalog.products.write().insert(id, product);
    }

    /// Make `path` (without prefix, e.g. `/stock/3`) misbehave.
    pub fn set_fault(&self, path: impl Into<String>, fault: Fault) {
        self.catalog.faults.write().insert(path.into(), fault);
    }

    /// Requests received so far, oldest first.
    #[must_use]
    pub fn seen(&self) -> Vec<SeenRequest> {
        self.catalog.seen.read().clone()
    }

    /// Number of requests received for `path` (prefix included).
    #[must_use]
    pub fn hits(&self, path: &str) -> usize {
        self.catalog
            .seen
            .read()
            .iter()
            .filter(|seen| seen.path == path)
            .count()
    }

    /// Base URL of the server, optionally with a path prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if `prefix` does not form a valid URL.
    pub fn base_url(&self, prefix: &str) -> Result<Url, url::ParseError> {
        Url::parse(&format!("http://{}{prefix}", self.addr))
    }

    /// Catalog configuration pointing at this server.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot be built.
    pub fn catalog_config(&self) -> Result<CatalogConfig, url::ParseError> {
        let mut config = CatalogConfig::new(self.base_url("/")?);
        config.timeout = Duration::from_secs(5);
        Ok(config)
    }

    /// Storefront configuration pointing at this server, storing the cart
    /// in `store_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot be built.
    pub fn storefront_config(
        &self,
        store_path: &Path,
    ) -> Result<StorefrontConfig, url::ParseError> {
        Ok(StorefrontConfig {
            catalog: self.catalog_config()?,
            storage: StorageConfig {
                path: store_path.to_path_buf(),
                ..StorageConfig::default()
            },
            sentry_dsn: None,
            sentry_environment: None,
        })
    }
}

impl Drop for FakeCatalog {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Attach a bearer token to a catalog configuration.
#[must_use]
pub fn with_token(mut config: CatalogConfig, token: &str) -> CatalogConfig {
    config.api_token = Some(SecretString::from(token.to_string()));
    config
}

/// A product record in the shape the catalog API serves.
#[must_use]
pub fn shoe(id: i32, title: &str, price: f64) -> Value {
    json!({
        "id": id,
        "title": title,
        "price": price,
        "image": format!("https://rocketshoes.example/images/{id}.jpg"),
    })
}

fn faulty(fault: Fault) -> Response {
    match fault {
        Fault::ServerError => {
            (StatusCode::INTERNAL_SERVER_ERROR, "catalog unavailable").into_response()
        }
        Fault::Malformed => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            "{\"id\": ",
        )
            .into_response(),
    }
}

async fn stock(
    State(catalog): State<Arc<Catalog>>,
    OriginalUri(uri): OriginalUri,
    UrlPath(id): UrlPath<i32>,
    headers: HeaderMap,
) -> Response {
    if let Some(fault) = catalog.record(&uri, &headers) {
        return faulty(fault);
    }

    let amount = catalog.stock.read().get(&id).copied();
    match amount {
        Some(amount) => Json(json!({ "id": id, "amount": amount })).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn product(
    State(catalog): State<Arc<Catalog>>,
    OriginalUri(uri): OriginalUri,
    UrlPath(id): UrlPath<i32>,
    headers: HeaderMap,
) -> Response {
    if let Some(fault) = catalog.record(&uri, &headers) {
        return faulty(fault);
    }

    let product = catalog.products.read().get(&id).cloned();
    match product {
        Some(product) => Json(product).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
