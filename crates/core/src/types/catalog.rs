//! Canonical catalog records.
//!
//! These are the normalized shapes every remote response is reduced to.
//! They are recreated on every fetch and never mutated in place.

use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId};
use super::price::Price;

/// Display name used when a category entry has no usable name.
pub const UNKNOWN_CATEGORY_NAME: &str = "Unknown Category";
/// Display name used when a product entry has no usable name.
pub const UNKNOWN_PRODUCT_NAME: &str = "Unknown Tree";
/// Image shown for products without an image.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/400x300?text=No+Image";
/// Category label shown for products without a category.
pub const UNKNOWN_PRODUCT_CATEGORY: &str = "—";
/// Description shown for products without a description.
pub const DEFAULT_PRODUCT_DESCRIPTION: &str = "Native tree well-suited to urban habitats.";

/// A product category used to filter the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    #[must_use]
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A tree offered in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub image_url: String,
    pub price: Price,
    /// Category label as reported by the product record itself.
    pub category: String,
    pub description: String,
}

impl Product {
    /// Create a product with default image, category and description.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image_url: PLACEHOLDER_IMAGE_URL.to_string(),
            price,
            category: UNKNOWN_PRODUCT_CATEGORY.to_string(),
            description: DEFAULT_PRODUCT_DESCRIPTION.to_string(),
        }
    }

    /// Replace the category label.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Replace the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
