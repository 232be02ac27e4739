//! Cart commands.
//!
//! Each mutating command runs the operation, prints whatever notices it
//! produced on stderr, then prints the resulting cart.

use std::fmt::Write as _;

use rocket_shoes_core::{Cart, LineItem, ProductId};
use rocket_shoes_storefront::cart::UpdateProductAmount;
use rocket_shoes_storefront::notice::MemoryNotifier;
use rocket_shoes_storefront::state::AppState;
use rocket_shoes_storefront::storage::StorageError;

const TITLE_WIDTH: usize = 40;

/// Print the current cart.
#[allow(clippy::print_stdout)]
pub fn show(state: &AppState) {
    print!("{}", render(&state.cart().cart()));
}

/// Add one unit of a product, then print the cart.
pub async fn add(state: &AppState, notices: &MemoryNotifier, product_id: ProductId) {
    state.cart().add_product(product_id).await;
    report(notices);
    show(state);
}

/// Remove a product, then print the cart.
pub async fn remove(state: &AppState, notices: &MemoryNotifier, product_id: ProductId) {
    state.cart().remove_product(product_id).await;
    report(notices);
    show(state);
}

/// Set a product's amount, then print the cart.
pub async fn update(state: &AppState, notices: &MemoryNotifier, product_id: ProductId, amount: i64) {
    state
        .cart()
        .update_product_amount(UpdateProductAmount { product_id, amount })
        .await;
    report(notices);
    show(state);
}

/// Delete the stored cart.
///
/// # Errors
///
/// Returns an error if the store cannot be written.
#[allow(clippy::print_stdout)]
pub fn clear(state: &AppState) -> Result<(), StorageError> {
    state.store().remove(state.cart().storage_key())?;
    println!("Cart cleared");
    Ok(())
}

/// Print and drain pending notices.
#[allow(clippy::print_stderr)]
fn report(notices: &MemoryNotifier) {
    for notice in notices.take() {
        eprintln!("! {notice}");
    }
}

/// Render a cart as a plain-text table with a summary line.
fn render(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Cart is empty\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>6}  {:<TITLE_WIDTH$}  {:>5}  {:>10}  {:>10}",
        "ID", "PRODUCT", "QTY", "PRICE", "SUBTOTAL"
    );
    for item in cart {
        let _ = writeln!(out, "{}", render_line(item));
    }
    let subtotal = cart
        .subtotal()
        .map_or_else(|| "-".to_string(), |price| price.to_string());
    let _ = writeln!(
        out,
        "{} product(s), {} unit(s), subtotal {subtotal}",
        cart.len(),
        cart.total_quantity(),
    );
    out
}

fn render_line(item: &LineItem) -> String {
    let title: String = item
        .title()
        .unwrap_or("(untitled)")
        .chars()
        .take(TITLE_WIDTH)
        .collect();
    let price = item.price().map_or_else(|| "-".to_string(), |p| p.to_string());
    let line_price = item
        .line_price()
        .map_or_else(|| "-".to_string(), |p| p.to_string());

    format!(
        "{:>6}  {:<TITLE_WIDTH$}  {:>5}  {:>10}  {:>10}",
        item.id, title, item.amount, price, line_price
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&Cart::new()), "Cart is empty\n");
    }

    #[test]
    fn test_render_lines_and_summary() {
        let cart = Cart::from(vec![
            LineItem::new(ProductId::new(1), 2)
                .with_detail("title", "Tênis de Caminhada")
                .with_detail("price", 179.9),
            LineItem::new(ProductId::new(2), 1),
        ]);

        let out = render(&cart);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[1].contains("Tênis de Caminhada"));
        assert!(lines[1].contains("$179.90"));
        assert!(lines[1].contains("$359.80"));
        assert!(lines[2].contains("(untitled)"));
        assert_eq!(lines[3], "2 product(s), 3 unit(s), subtotal $359.80");
    }

    #[test]
    fn test_render_huge_prices() {
        let cart = Cart::from_json(
            r#"[{"id":1,"amount":2,"title":"Gold","price":"7e28"},
                {"id":2,"amount":1,"title":"Plain","price":"7e28"},
                {"id":3,"amount":1,"title":"Also plain","price":"7e28"}]"#,
        )
        .unwrap();

        let out = render(&cart);
        let lines: Vec<&str> = out.lines().collect();

        // Unit price still shows; the overflowing line total does not
        assert!(lines[1].contains("Gold"));
        assert!(lines[1].trim_end().ends_with('-'));
        assert_eq!(lines[4], "3 product(s), 4 unit(s), subtotal -");
    }

    #[test]
    fn test_render_truncates_long_titles() {
        let cart = Cart::from(vec![
            LineItem::new(ProductId::new(1), 1).with_detail("name", "x".repeat(100)),
        ]);
        let out = render(&cart);
        assert!(out.contains(&"x".repeat(TITLE_WIDTH)));
        assert!(!out.contains(&"x".repeat(TITLE_WIDTH + 1)));
    }
}
