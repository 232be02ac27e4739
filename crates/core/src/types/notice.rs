//! User-facing notices emitted by cart operations.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A fire-and-forget message shown to the user when a cart operation is
/// rejected or fails. There are no success notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    /// Requested quantity exceeds the available stock.
    OutOfStock,
    /// Adding a product failed unexpectedly.
    AddFailed,
    /// The product to remove is not in the cart, or removal failed.
    RemoveFailed,
    /// Changing a product's quantity failed unexpectedly.
    UpdateFailed,
}

impl Notice {
    /// The human-readable message for this notice.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::OutOfStock => "Requested quantity is out of stock",
            Self::AddFailed => "Failed to add product",
            Self::RemoveFailed => "Failed to remove product",
            Self::UpdateFailed => "Failed to update product quantity",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
