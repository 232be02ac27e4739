//! Cart operation errors.
//!
//! Errors never leave a cart operation. Each one is mapped to a [`Notice`]:
//! business-rule rejections to their specific notice, unexpected failures to
//! the generic notice of the operation that hit them.

use thiserror::Error;

use rocket_shoes_core::{Notice, ProductId};

use crate::catalog::CatalogError;

/// Reasons a cart operation did not change the cart.
#[derive(Debug, Error)]
pub enum CartError {
    /// Requested quantity exceeds available stock.
    #[error("Product {product_id}: requested {requested}, {available} in stock")]
    OutOfStock {
        /// Product being changed.
        product_id: ProductId,
        /// Quantity the operation would have produced.
        requested: i64,
        /// Quantity the stock oracle reported.
        available: i64,
    },

    /// The product is not in the cart.
    #[error("Product {0} is not in the cart")]
    NotInCart(ProductId),

    /// The catalog API failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

impl CartError {
    /// Whether this is an unexpected failure rather than a business-rule
    /// rejection.
    #[must_use]
    pub const fn is_unexpected(&self) -> bool {
        matches!(self, Self::Catalog(_))
    }

    /// The notice to show for this error.
    ///
    /// `fallback` is the operation's generic failure notice.
    #[must_use]
    pub const fn notice(&self, fallback: Notice) -> Notice {
        match self {
            Self::OutOfStock { .. } => Notice::OutOfStock,
            Self::NotInCart(_) | Self::Catalog(_) => fallback,
        }
    }
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
