//! Normalization of raw catalog responses.
//!
//! The remote API is inconsistent about both envelope shape and field names.
//! Every accepted variant is listed here once, as ordered alias tables, and
//! applied by a single function per record kind. Malformed entries never
//! raise: each field falls back to its documented default.

use greenroot_core::{
    Category, CategoryId, DEFAULT_PRODUCT_DESCRIPTION, PLACEHOLDER_IMAGE_URL, Price, Product,
    ProductId, UNKNOWN_CATEGORY_NAME, UNKNOWN_PRODUCT_CATEGORY, UNKNOWN_PRODUCT_NAME,
    types::id::scalar_text,
};
use rand::seq::IndexedRandom;
use serde_json::Value;

// =============================================================================
// Alias tables
// =============================================================================

/// Envelope paths for the categories endpoint, in priority order.
pub const CATEGORY_ENVELOPES: &[&[&str]] = &[&["categories"], &["data"]];
/// Envelope paths for the all-products endpoint, in priority order.
pub const ALL_PRODUCTS_ENVELOPES: &[&[&str]] = &[&["plants"], &["data"]];
/// Envelope paths for the products-by-category endpoint, in priority order.
pub const CATEGORY_PRODUCTS_ENVELOPES: &[&[&str]] = &[&["plants"], &["data"], &["data", "plants"]];

pub const CATEGORY_ID_FIELDS: &[&str] = &["id", "category_id", "categoryId"];
pub const CATEGORY_NAME_FIELDS: &[&str] = &["category_name", "category", "name"];

pub const PRODUCT_ID_FIELDS: &[&str] = &["id", "plant_id"];
pub const PRODUCT_NAME_FIELDS: &[&str] = &["name", "plant_name"];
pub const PRODUCT_IMAGE_FIELDS: &[&str] = &["image", "img"];
pub const PRODUCT_PRICE_FIELDS: &[&str] = &["price", "cost"];
pub const PRODUCT_CATEGORY_FIELDS: &[&str] = &["category", "category_name"];
pub const PRODUCT_DESCRIPTION_FIELDS: &[&str] = &["short_description", "description"];

const TOKEN_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const TOKEN_LENGTH: usize = 7;

// =============================================================================
// Envelopes
// =============================================================================

/// Pull the entry list out of a response body.
///
/// The first envelope path that leads to an array wins. A key that exists but
/// holds something other than an array is skipped. No match yields an empty
/// list.
#[must_use]
pub fn extract_entries<'a>(body: &'a Value, envelopes: &[&[&str]]) -> &'a [Value] {
    envelopes
        .iter()
        .find_map(|path| {
            path.iter()
                .try_fold(body, |node, key| node.get(key))
                .and_then(Value::as_array)
        })
        .map(Vec::as_slice)
        .unwrap_or_default()
}

// =============================================================================
// Field resolution
// =============================================================================

/// First alias whose value is present and not `null`.
fn first_present<'a>(raw: &'a Value, fields: &[&str]) -> Option<&'a Value> {
    fields
        .iter()
        .filter_map(|field| raw.get(field))
        .find(|value| !value.is_null())
}

/// First alias that renders to text.
///
/// Only `null` and absent fields are skipped; a present non-scalar ends the
/// search with no value.
fn first_text(raw: &Value, fields: &[&str]) -> Option<String> {
    first_present(raw, fields).and_then(scalar_text)
}

/// First alias that renders to non-empty text.
fn first_non_empty_text(raw: &Value, fields: &[&str]) -> Option<String> {
    fields
        .iter()
        .filter_map(|field| raw.get(field).and_then(scalar_text))
        .find(|text| !text.is_empty())
}

/// Whether an identifier value counts as missing.
#[allow(clippy::float_cmp)]
fn is_blank_id(value: &Value) -> bool {
    match value {
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Bool(b) => !b,
        Value::Null | Value::Array(_) | Value::Object(_) => true,
    }
}

/// Generate an opaque product token for entries without an id.
#[must_use]
pub fn generate_token() -> String {
    let mut rng = rand::rng();
    (0..TOKEN_LENGTH)
        .filter_map(|_| TOKEN_ALPHABET.choose(&mut rng).copied().map(char::from))
        .collect()
}

// =============================================================================
// Records
// =============================================================================

/// Normalize one raw category entry.
///
/// Returns `None` when no usable id can be resolved.
#[must_use]
pub fn normalize_category(raw: &Value) -> Option<Category> {
    let id = first_present(raw, CATEGORY_ID_FIELDS)
        .filter(|value| !is_blank_id(value))
        .and_then(CategoryId::from_json)?;
    let name =
        first_text(raw, CATEGORY_NAME_FIELDS).unwrap_or_else(|| UNKNOWN_CATEGORY_NAME.to_string());

    Some(Category { id, name })
}

/// Normalize one raw product entry.
///
/// Always succeeds; every field has a default.
#[must_use]
pub fn normalize_product(raw: &Value) -> Product {
    let id = first_present(raw, PRODUCT_ID_FIELDS)
        .and_then(ProductId::from_json)
        .unwrap_or_else(|| ProductId::new(generate_token()));

    Product {
        id,
        name: first_text(raw, PRODUCT_NAME_FIELDS)
            .unwrap_or_else(|| UNKNOWN_PRODUCT_NAME.to_string()),
        image_url: first_non_empty_text(raw, PRODUCT_IMAGE_FIELDS)
            .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string()),
        price: first_present(raw, PRODUCT_PRICE_FIELDS).map_or(Price::ZERO, Price::from_json),
        category: first_text(raw, PRODUCT_CATEGORY_FIELDS)
            .unwrap_or_else(|| UNKNOWN_PRODUCT_CATEGORY.to_string()),
        description: first_text(raw, PRODUCT_DESCRIPTION_FIELDS)
            .unwrap_or_else(|| DEFAULT_PRODUCT_DESCRIPTION.to_string()),
    }
}

/// Normalize a categories response body.
#[must_use]
pub fn normalize_categories(body: &Value) -> Vec<Category> {
    extract_entries(body, CATEGORY_ENVELOPES)
        .iter()
        .filter_map(normalize_category)
        .collect()
}

/// Normalize a products response body using the given envelope table.
#[must_use]
pub fn normalize_products(body: &Value, envelopes: &[&[&str]]) -> Vec<Product> {
    extract_entries(body, envelopes)
        .iter()
        .map(normalize_product)
        .collect()
}
