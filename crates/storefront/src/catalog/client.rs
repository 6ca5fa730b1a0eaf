//! HTTP catalog client.
//!
//! Uses `reqwest` for HTTP and caches normalized results using `moka`.

use std::sync::Arc;

use greenroot_core::{Category, CategoryId, Product};
use moka::future::Cache;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use super::cache::{CacheKey, CacheValue};
use super::normalize::{
    ALL_PRODUCTS_ENVELOPES, CATEGORY_PRODUCTS_ENVELOPES, normalize_categories, normalize_products,
};
use super::{CatalogSource, FetchError};
use crate::config::CatalogConfig;

/// Longest body excerpt included in error logs.
const BODY_EXCERPT_CHARS: usize = 500;

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the remote tree catalog API.
///
/// Cheap to clone; clones share the HTTP connection pool and cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Option<Cache<CacheKey, CacheValue>>,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &CatalogConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        let cache = (!config.cache_ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(256)
                .time_to_live(config.cache_ttl)
                .build()
        });

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: config.base_url.clone(),
                cache,
            }),
        })
    }

    /// Resolve an endpoint path against the base URL.
    fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// GET an endpoint and parse its body as JSON.
    async fn get_json(&self, url: Url) -> Result<Value, FetchError> {
        let response = self.inner.client.get(url.clone()).send().await?;
        let status = response.status();

        // Read as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                endpoint = %url,
                body = %excerpt(&body),
                "Catalog API returned non-success status"
            );
            return Err(FetchError::Status {
                status: status.as_u16(),
                endpoint: url.to_string(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                endpoint = %url,
                body = %excerpt(&body),
                "Failed to parse catalog response"
            );
            FetchError::Parse(e)
        })
    }

    async fn cached(&self, key: &CacheKey) -> Option<CacheValue> {
        match &self.inner.cache {
            Some(cache) => cache.get(key).await,
            None => None,
        }
    }

    async fn store(&self, key: CacheKey, value: CacheValue) {
        if let Some(cache) = &self.inner.cache {
            cache.insert(key, value).await;
        }
    }

    /// Fetch a product list through the cache.
    async fn products(
        &self,
        key: CacheKey,
        path: &str,
        envelopes: &[&[&str]],
    ) -> Result<Vec<Product>, FetchError> {
        if let Some(CacheValue::Products(products)) = self.cached(&key).await {
            debug!("Cache hit for products");
            return Ok(products.to_vec());
        }

        let body = self.get_json(self.endpoint(path)?).await?;
        let products = normalize_products(&body, envelopes);
        debug!(count = products.len(), "Fetched products");

        self.store(key, CacheValue::Products(products.clone().into()))
            .await;
        Ok(products)
    }
}

impl CatalogSource for CatalogClient {
    #[instrument(skip(self))]
    async fn fetch_categories(&self) -> Result<Vec<Category>, FetchError> {
        let key = CacheKey::Categories;
        if let Some(CacheValue::Categories(categories)) = self.cached(&key).await {
            debug!("Cache hit for categories");
            return Ok(categories.to_vec());
        }

        let body = self.get_json(self.endpoint("categories")?).await?;
        let categories = normalize_categories(&body);
        debug!(count = categories.len(), "Fetched categories");

        self.store(key, CacheValue::Categories(categories.clone().into()))
            .await;
        Ok(categories)
    }

    #[instrument(skip(self))]
    async fn fetch_all_products(&self) -> Result<Vec<Product>, FetchError> {
        self.products(CacheKey::AllProducts, "plants", ALL_PRODUCTS_ENVELOPES)
            .await
    }

    #[instrument(skip(self), fields(category_id = %category_id))]
    async fn fetch_products_by_category(
        &self,
        category_id: &CategoryId,
    ) -> Result<Vec<Product>, FetchError> {
        let path = format!("category/{}", encode_segment(category_id.as_str()));
        self.products(
            CacheKey::CategoryProducts(category_id.clone()),
            &path,
            CATEGORY_PRODUCTS_ENVELOPES,
        )
        .await
    }
}

/// Percent-encode an id for use as a single path segment.
fn encode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}
