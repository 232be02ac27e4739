//! Catalog client behavior against a live HTTP server.

#![allow(clippy::unwrap_used)]

use rocket_shoes_core::ProductId;
use rocket_shoes_integration_tests::{API_PREFIX, FakeCatalog, Fault, shoe, with_token};
use rocket_shoes_storefront::catalog::{CatalogClient, CatalogError, StockOracle};
use rocket_shoes_storefront::config::CatalogConfig;

#[tokio::test]
async fn test_get_stock_and_product() {
    let catalog = FakeCatalog::start().await.unwrap();
    catalog.set_stock(2, 7);
    catalog.set_product(2, shoe(2, "Tênis VR Caminhada Confortável", 139.9));

    let client = CatalogClient::new(&catalog.catalog_config().unwrap()).unwrap();

    let stock = client.get_stock(ProductId::new(2)).await.unwrap();
    assert_eq!(stock.id, ProductId::new(2));
    assert_eq!(stock.amount, 7);

    let product = client.get_product(ProductId::new(2)).await.unwrap();
    assert_eq!(product.id, ProductId::new(2));
    assert_eq!(
        product.details["title"].as_str(),
        Some("Tênis VR Caminhada Confortável")
    );

    let paths: Vec<String> = catalog.seen().into_iter().map(|seen| seen.path).collect();
    assert_eq!(paths, vec!["/stock/2", "/products/2"]);
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let catalog = FakeCatalog::start().await.unwrap();
    catalog.set_stock(1, 1);

    let config = with_token(catalog.catalog_config().unwrap(), "s3cret");
    let client = CatalogClient::new(&config).unwrap();
    client.get_stock(ProductId::new(1)).await.unwrap();

    let seen = catalog.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].authorization.as_deref(), Some("Bearer s3cret"));
}

#[tokio::test]
async fn test_no_token_sends_no_authorization() {
    let catalog = FakeCatalog::start().await.unwrap();
    catalog.set_stock(1, 1);

    let client = CatalogClient::new(&catalog.catalog_config().unwrap()).unwrap();
    client.get_stock(ProductId::new(1)).await.unwrap();

    assert_eq!(catalog.seen()[0].authorization, None);
}

#[tokio::test]
async fn test_base_url_with_path_prefix() {
    let catalog = FakeCatalog::start().await.unwrap();
    catalog.set_stock(4, 2);

    for prefix in [API_PREFIX.to_string(), format!("{API_PREFIX}/")] {
        let config = CatalogConfig::new(catalog.base_url(&prefix).unwrap());
        let client = CatalogClient::new(&config).unwrap();
        let stock = client.get_stock(ProductId::new(4)).await.unwrap();
        assert_eq!(stock.amount, 2);
    }

    assert_eq!(catalog.hits("/api/stock/4"), 2);
}

#[tokio::test]
async fn test_products_are_cached_but_stock_is_not() {
    let catalog = FakeCatalog::start().await.unwrap();
    catalog.set_stock(1, 3);
    catalog.set_product(1, shoe(1, "Runner", 99.0));

    let client = CatalogClient::new(&catalog.catalog_config().unwrap()).unwrap();
    for _ in 0..3 {
        client.stock(ProductId::new(1)).await.unwrap();
        client.product(ProductId::new(1)).await.unwrap();
    }

    assert_eq!(catalog.hits("/stock/1"), 3);
    assert_eq!(catalog.hits("/products/1"), 1);
}

#[tokio::test]
async fn test_product_cache_can_be_disabled() {
    let catalog = FakeCatalog::start().await.unwrap();
    catalog.set_product(1, shoe(1, "Runner", 99.0));

    let mut config = catalog.catalog_config().unwrap();
    config.product_cache_ttl = None;
    let client = CatalogClient::new(&config).unwrap();
    client.get_product(ProductId::new(1)).await.unwrap();
    client.get_product(ProductId::new(1)).await.unwrap();

    assert_eq!(catalog.hits("/products/1"), 2);
}

#[tokio::test]
async fn test_failures_are_not_cached() {
    let catalog = FakeCatalog::start().await.unwrap();

    let client = CatalogClient::new(&catalog.catalog_config().unwrap()).unwrap();
    assert!(client.get_product(ProductId::new(8)).await.is_err());

    catalog.set_product(8, shoe(8, "Late Arrival", 120.0));
    let product = client.get_product(ProductId::new(8)).await.unwrap();
    assert_eq!(product.id, ProductId::new(8));
}

#[tokio::test]
async fn test_error_kinds() {
    let catalog = FakeCatalog::start().await.unwrap();
    catalog.set_stock(2, 1);
    catalog.set_fault("/stock/2", Fault::Malformed);
    catalog.set_fault("/stock/3", Fault::ServerError);

    let client = CatalogClient::new(&catalog.catalog_config().unwrap()).unwrap();

    let err = client.get_stock(ProductId::new(1)).await.unwrap_err();
    assert!(
        matches!(err, CatalogError::Status { status, .. } if status.as_u16() == 404),
        "{err:?}"
    );

    let err = client.get_stock(ProductId::new(2)).await.unwrap_err();
    assert!(matches!(err, CatalogError::Parse(_)), "{err:?}");

    let err = client.get_stock(ProductId::new(3)).await.unwrap_err();
    assert!(
        matches!(err, CatalogError::Status { status, .. } if status.as_u16() == 500),
        "{err:?}"
    );
}
