//! Rocket Shoes Core - Shared types library.
//!
//! This crate provides the types used across all Rocket Shoes components:
//! - `storefront` - Cart manager, catalog client and persistence adapters
//! - `cli` - Command-line front end for the cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure cart transitions - no I/O, no
//! HTTP clients, no storage. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, line items, stock records, prices, the cart
//!   itself and user-facing notices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
