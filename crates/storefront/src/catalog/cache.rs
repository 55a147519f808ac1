//! Cache types for catalog responses.

use std::sync::Arc;

use imagine_shop_core::{Product, ProductId};

/// Cache key for catalog responses.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Products,
    Product(ProductId),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Arc<[Product]>),
    Product(Box<Product>),
}
