//! Core types for Rocket Shoes.
//!
//! This module provides type-safe wrappers for the cart domain.

pub mod cart;
pub mod id;
pub mod notice;
pub mod price;
pub mod product;

pub use cart::Cart;
pub use id::*;
pub use notice::Notice;
pub use price::{CurrencyCode, Price, PriceError};
pub use product::{LineItem, Product, Stock};
