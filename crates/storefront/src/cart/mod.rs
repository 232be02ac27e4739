//! Cart state management.
//!
//! [`CartManager`] owns the in-memory cart, checks every mutation against the
//! stock oracle, and mirrors each new cart to the store.

mod manager;

pub use manager::{CartManager, UpdateProductAmount};
