//! Cache types for catalog API responses.

use std::sync::Arc;

use greenroot_core::{Category, CategoryId, Product};

/// Cache key for catalog responses.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Categories,
    AllProducts,
    CategoryProducts(CategoryId),
}

/// Cached value types.
///
/// Values are shared so cache hits hand out clones of the same list.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Categories(Arc<[Category]>),
    Products(Arc<[Product]>),
}
