//! The cart: an ordered list of line items, at most one per product.
//!
//! Every transition returns a new [`Cart`] and leaves the receiver untouched,
//! so callers can swap a whole snapshot in one assignment.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;
use super::product::LineItem;

/// Ordered sequence of line items in insertion order.
///
/// Serializes as a plain JSON array of line items. Deserializing keeps the
/// first entry for any repeated product ID and drops lines with an amount of
/// zero, so hand-edited stores still give one line per product, each with at
/// least one unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Parse a cart from its stored JSON form.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error if the text is not a JSON
    /// array of line items.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the cart to its stored JSON form.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error if a metadata value cannot be
    /// serialized.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.items)
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Iterate over line items in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    /// Find the line item for a product.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Whether the cart holds a line for this product.
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all line amounts.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.amount)).sum()
    }

    /// Sum of `price * amount` over all lines.
    ///
    /// Lines without a usable line price count as zero. Returns `None` if the
    /// sum itself does not fit in a `Decimal`.
    #[must_use]
    pub fn subtotal(&self) -> Option<Price> {
        let zero = Price::zero();
        self.items
            .iter()
            .filter_map(LineItem::line_price)
            .try_fold(zero.amount, |total, price| total.checked_add(price.amount))
            .map(|amount| Price::new(amount, zero.currency_code))
    }

    /// A cart with one more unit of an existing line.
    ///
    /// Returns `None` if the product is not in the cart.
    #[must_use]
    pub fn with_incremented(&self, id: ProductId) -> Option<Self> {
        self.contains(id).then(|| self.map_item(id, |amount| amount.saturating_add(1)))
    }

    /// A cart with `item` appended at the end.
    ///
    /// If a line for the same product already exists it is replaced in place
    /// instead, keeping one line per product.
    #[must_use]
    pub fn with_appended(&self, item: LineItem) -> Self {
        let mut items = self.items.clone();
        match items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => *existing = item,
            None => items.push(item),
        }
        Self { items }
    }

    /// A cart without the line for this product.
    ///
    /// Returns `None` if the product is not in the cart.
    #[must_use]
    pub fn without(&self, id: ProductId) -> Option<Self> {
        self.contains(id).then(|| Self {
            items: self
                .items
                .iter()
                .filter(|item| item.id != id)
                .cloned()
                .collect(),
        })
    }

    /// A cart where this product's amount is replaced by `amount`.
    ///
    /// Other lines are untouched. If the product is absent the result equals
    /// the receiver.
    #[must_use]
    pub fn with_amount(&self, id: ProductId, amount: u32) -> Self {
        self.map_item(id, |_| amount)
    }

    fn map_item(&self, id: ProductId, f: impl Fn(u32) -> u32) -> Self {
        Self {
            items: self
                .items
                .iter()
                .map(|item| {
                    if item.id == id {
                        LineItem {
                            amount: f(item.amount),
                            ..item.clone()
                        }
                    } else {
                        item.clone()
                    }
                })
                .collect(),
        }
    }
}

impl From<Vec<LineItem>> for Cart {
    fn from(items: Vec<LineItem>) -> Self {
        let mut unique: Vec<LineItem> = Vec::with_capacity(items.len());
        for item in items {
            if item.amount > 0 && !unique.iter().any(|existing| existing.id == item.id) {
                unique.push(item);
            }
        }
        Self { items: unique }
    }
}

impl From<Cart> for Vec<LineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl FromIterator<LineItem> for Cart {
    fn from_iter<I: IntoIterator<Item = LineItem>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn item(id: i32, amount: u32) -> LineItem {
        LineItem::new(ProductId::new(id), amount)
    }

    fn sample() -> Cart {
        Cart::from(vec![
            item(1, 2).with_detail("price", 10),
            item(2, 1).with_detail("price", 5.5),
            item(3, 4),
        ])
    }

    #[test]
    fn test_with_incremented_existing() {
        let cart = sample();
        let next = cart.with_incremented(ProductId::new(2)).unwrap();

        assert_eq!(next.len(), 3);
        assert_eq!(next.get(ProductId::new(2)).unwrap().amount, 2);
        assert_eq!(next.get(ProductId::new(1)), cart.get(ProductId::new(1)));
        assert_eq!(next.get(ProductId::new(3)), cart.get(ProductId::new(3)));
        // Receiver untouched
        assert_eq!(cart.get(ProductId::new(2)).unwrap().amount, 1);
    }

    #[test]
    fn test_with_incremented_missing() {
        assert!(sample().with_incremented(ProductId::new(9)).is_none());
    }

    #[test]
    fn test_with_appended_new_item() {
        let next = sample().with_appended(item(9, 1));
        assert_eq!(next.len(), 4);
        assert_eq!(next.items().last().unwrap().id, ProductId::new(9));
    }

    #[test]
    fn test_with_appended_existing_replaces() {
        let next = sample().with_appended(item(1, 7));
        assert_eq!(next.len(), 3);
        assert_eq!(next.items().first().unwrap().amount, 7);
    }

    #[test]
    fn test_without() {
        let next = sample().without(ProductId::new(2)).unwrap();
        assert_eq!(next.len(), 2);
        assert!(!next.contains(ProductId::new(2)));
        assert!(sample().without(ProductId::new(9)).is_none());
    }

    #[test]
    fn test_with_amount() {
        let cart = sample();
        let next = cart.with_amount(ProductId::new(3), 1);
        assert_eq!(next.get(ProductId::new(3)).unwrap().amount, 1);
        assert_eq!(next.get(ProductId::new(1)), cart.get(ProductId::new(1)));

        assert_eq!(cart.with_amount(ProductId::new(9), 3), cart);
    }

    #[test]
    fn test_totals() {
        let cart = sample();
        assert_eq!(cart.total_quantity(), 7);
        assert_eq!(cart.subtotal().unwrap().amount, Decimal::new(255, 1));
        assert_eq!(cart.subtotal().unwrap().to_string(), "$25.50");
        assert_eq!(Cart::new().subtotal().unwrap().to_string(), "$0.00");
    }

    #[test]
    fn test_subtotal_skips_overflowing_line() {
        let cart = Cart::from_json(
            r#"[{"id":1,"amount":2,"price":"7e28"},{"id":2,"amount":1,"price":12.5}]"#,
        )
        .unwrap();
        assert_eq!(cart.subtotal().unwrap().to_string(), "$12.50");
    }

    #[test]
    fn test_subtotal_overflowing_sum() {
        let cart = Cart::from_json(
            r#"[{"id":1,"amount":1,"price":"7e28"},{"id":2,"amount":1,"price":"7e28"}]"#,
        )
        .unwrap();
        assert!(cart.subtotal().is_none());
        assert_eq!(cart.total_quantity(), 2);
    }

    #[test]
    fn test_json_round_trip() {
        let cart = sample();
        let json = cart.to_json().unwrap();
        assert_eq!(Cart::from_json(&json).unwrap(), cart);
    }

    #[test]
    fn test_serializes_as_array() {
        let cart = Cart::from(vec![item(5, 1).with_detail("name", "X")]);
        assert_eq!(
            serde_json::to_value(&cart).unwrap(),
            json!([{ "id": 5, "name": "X", "amount": 1 }])
        );
    }

    #[test]
    fn test_deserialize_drops_duplicate_ids() {
        let cart = Cart::from_json(r#"[{"id":1,"amount":2},{"id":1,"amount":5}]"#).unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(ProductId::new(1)).unwrap().amount, 2);
    }

    #[test]
    fn test_deserialize_drops_zero_amount_lines() {
        let cart = Cart::from_json(r#"[{"id":1,"amount":0},{"id":2,"amount":3}]"#).unwrap();
        assert_eq!(cart.len(), 1);
        assert!(!cart.contains(ProductId::new(1)));
        assert_eq!(cart.get(ProductId::new(2)).unwrap().amount, 3);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(Cart::from_json("not json").is_err());
        assert!(Cart::from_json(r#"{"id":1}"#).is_err());
    }
}
