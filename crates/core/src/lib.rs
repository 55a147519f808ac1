//! Imagine Shop Core - Shared types library.
//!
//! This crate provides common types used across all Imagine Shop components:
//! - `storefront` - Shopper-facing site and cart state manager
//! - `cli` - Command-line tools for inspecting the local cart and catalog
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no persistence. Currency formatting lives here so every surface
//! renders money through one implementation.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, the catalog product and BRL price formatting

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
