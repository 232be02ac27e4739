//! Catalog records and cart line items.
//!
//! The catalog owns product metadata (title, price, image, ...). The cart only
//! cares about the product identity and the requested quantity, so every other
//! field is carried along untouched in a flattened JSON map. This keeps stored
//! carts faithful to whatever the catalog sent, field for field.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::ProductId;
use super::price::Price;

/// Metadata key holding the unit price.
const PRICE_KEY: &str = "price";
/// Metadata keys that may hold the display name, in lookup order.
const TITLE_KEYS: &[&str] = &["title", "name"];
/// Metadata key holding the image URL.
const IMAGE_KEY: &str = "image";
/// Quantity key used both by catalog records and line items.
const AMOUNT_KEY: &str = "amount";

/// Available quantity of a product, as reported by the stock endpoint.
///
/// Fetched fresh before every mutating cart operation; never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    /// Product the record describes.
    pub id: ProductId,
    /// Units available. Zero or less means out of stock.
    pub amount: i64,
}

/// A product record from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product identity.
    pub id: ProductId,
    /// Every other field the catalog sent.
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Product {
    /// Turn the catalog record into a fresh cart line with a quantity of one.
    ///
    /// Any `amount` the catalog included is discarded.
    #[must_use]
    pub fn into_line_item(mut self) -> LineItem {
        self.details.remove(AMOUNT_KEY);
        LineItem {
            id: self.id,
            amount: 1,
            details: self.details,
        }
    }
}

/// One product entry in the cart with its requested quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product identity, unique within a cart.
    pub id: ProductId,
    /// Requested quantity, at least one.
    pub amount: u32,
    /// Product metadata copied from the catalog.
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl LineItem {
    /// Create a line item without metadata.
    #[must_use]
    pub fn new(id: ProductId, amount: u32) -> Self {
        Self {
            id,
            amount,
            details: Map::new(),
        }
    }

    /// Attach a metadata field.
    #[must_use]
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Display name, taken from `title` or `name`.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        TITLE_KEYS
            .iter()
            .find_map(|key| self.details.get(*key).and_then(Value::as_str))
    }

    /// Image URL, if the catalog sent one.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.details.get(IMAGE_KEY).and_then(Value::as_str)
    }

    /// Unit price, if the metadata carries a usable one.
    #[must_use]
    pub fn price(&self) -> Option<Price> {
        self.details
            .get(PRICE_KEY)
            .and_then(|value| Price::from_json(value).ok())
    }

    /// Price of the whole line (unit price times amount).
    ///
    /// `None` if there is no usable unit price or the product overflows.
    #[must_use]
    pub fn line_price(&self) -> Option<Price> {
        self.price().and_then(|price| price.times(self.amount))
    }
}
