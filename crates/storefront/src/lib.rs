//! Rocket Shoes Storefront - cart state management.
//!
//! # Architecture
//!
//! - [`cart::CartManager`] owns the cart and applies add/remove/update
//! - [`catalog::StockOracle`] answers stock and product lookups over HTTP
//! - [`storage::CartStore`] mirrors every new cart to durable storage
//! - [`notice::Notifier`] shows rejections and failures to the user
//! - [`state::AppState`] wires them together from [`config::StorefrontConfig`]
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use rocket_shoes_core::ProductId;
//! use rocket_shoes_storefront::{config::StorefrontConfig, notice::MemoryNotifier, state::AppState};
//!
//! let notices = Arc::new(MemoryNotifier::new());
//! let state = AppState::new(StorefrontConfig::from_env()?, notices.clone())?;
//! state.cart().add_product(ProductId::new(1)).await;
//! for notice in notices.take() {
//!     eprintln!("{notice}");
//! }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod notice;
pub mod state;
pub mod storage;
