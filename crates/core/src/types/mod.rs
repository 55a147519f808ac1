//! Core types for Imagine Shop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod product;

pub use id::{CartItemId, ProductId};
pub use price::{DEFAULT_INSTALLMENTS, format_brl, installment};
pub use product::{Product, ProductError};
