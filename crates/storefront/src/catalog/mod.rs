//! Remote catalog access.
//!
//! # Architecture
//!
//! - [`CatalogSource`] is the seam the session driver fetches through
//! - [`CatalogClient`] implements it over HTTP with `reqwest`
//! - Responses are normalized by [`normalize`] into canonical records
//! - Normalized results are cached in memory via `moka` (5 minute TTL by default)
//!
//! # Endpoints
//!
//! All paths are relative to the configured base URL:
//!
//! - `categories` - every category
//! - `plants` - every product
//! - `category/{id}` - products of one category

mod cache;
mod client;
pub mod normalize;

pub use client::CatalogClient;

use greenroot_core::{Category, CategoryId, Product};
use thiserror::Error;

/// Errors that can occur when fetching from the catalog API.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}")]
    Status {
        /// Numeric HTTP status code.
        status: u16,
        /// Endpoint that was requested.
        endpoint: String,
    },

    /// Response body was not valid JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be built.
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Source of catalog data.
///
/// Implementations must be usable from a single-threaded executor; nothing
/// here requires `Send`.
#[allow(async_fn_in_trait)]
pub trait CatalogSource {
    /// Fetch every category.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` on network, status, or parse failure.
    async fn fetch_categories(&self) -> Result<Vec<Category>, FetchError>;

    /// Fetch every product.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` on network, status, or parse failure.
    async fn fetch_all_products(&self) -> Result<Vec<Product>, FetchError>;

    /// Fetch the products of one category.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` on network, status, or parse failure.
    async fn fetch_products_by_category(
        &self,
        category_id: &CategoryId,
    ) -> Result<Vec<Product>, FetchError>;

    /// Fetch the products for a selection, where `None` means all products.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` on network, status, or parse failure.
    async fn fetch_products(
        &self,
        category_id: Option<&CategoryId>,
    ) -> Result<Vec<Product>, FetchError> {
        match category_id {
            Some(id) => self.fetch_products_by_category(id).await,
            None => self.fetch_all_products().await,
        }
    }
}
