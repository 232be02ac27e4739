//! Catalog lookup commands.
//!
//! These talk to the catalog API directly and never touch the cart.

use rocket_shoes_core::ProductId;
use rocket_shoes_storefront::catalog::CatalogError;
use rocket_shoes_storefront::state::AppState;

/// Print the available stock of a product.
///
/// # Errors
///
/// Returns an error if the catalog lookup fails.
#[allow(clippy::print_stdout)]
pub async fn stock(state: &AppState, product_id: ProductId) -> Result<(), CatalogError> {
    let stock = state.catalog().get_stock(product_id).await?;
    println!("Product {}: {} in stock", stock.id, stock.amount);
    Ok(())
}

/// Print a product record as pretty JSON.
///
/// # Errors
///
/// Returns an error if the catalog lookup fails.
#[allow(clippy::print_stdout)]
pub async fn product(state: &AppState, product_id: ProductId) -> Result<(), CatalogError> {
    let product = state.catalog().get_product(product_id).await?;
    println!("{}", serde_json::to_string_pretty(&product)?);
    Ok(())
}
