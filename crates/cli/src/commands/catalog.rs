//! One-shot catalog listing commands.
//!
//! # Usage
//!
//! ```bash
//! greenroot categories
//! greenroot products --category 3
//! ```

use greenroot_core::{Category, CategoryId};
use greenroot_storefront::render::ProductCard;
use greenroot_storefront::{CatalogClient, CatalogSource, StorefrontConfig};

/// Fetch and print every category.
///
/// # Errors
///
/// Returns an error if the catalog API cannot be reached or answers with a
/// non-success status.
#[allow(clippy::print_stdout)]
pub async fn categories(config: &StorefrontConfig) -> greenroot_storefront::Result<()> {
    let client = CatalogClient::new(&config.catalog)?;
    let categories = client.fetch_categories().await?;
    tracing::info!(count = categories.len(), "Fetched categories");

    for line in category_lines(&categories) {
        println!("{line}");
    }
    Ok(())
}

/// Fetch and print product cards, optionally for one category.
///
/// # Errors
///
/// Returns an error if the catalog API cannot be reached or answers with a
/// non-success status.
#[allow(clippy::print_stdout)]
pub async fn products(
    config: &StorefrontConfig,
    category: Option<&str>,
) -> greenroot_storefront::Result<()> {
    let client = CatalogClient::new(&config.catalog)?;
    let category = category.map(CategoryId::new);
    let products = client.fetch_products(category.as_ref()).await?;
    tracing::info!(count = products.len(), "Fetched products");

    if products.is_empty() {
        println!("No trees found.");
        return Ok(());
    }

    let symbol = config.display.currency.symbol();
    for product in &products {
        println!("{}", card_line(&ProductCard::from(product), symbol));
    }
    Ok(())
}

fn category_lines(categories: &[Category]) -> Vec<String> {
    categories
        .iter()
        .map(|category| format!("{:>4}  {}", category.id, category.name))
        .collect()
}

/// One product card as a single line of text.
#[must_use]
pub fn card_line(card: &ProductCard, symbol: &str) -> String {
    format!(
        "{:>8}  {:<28} {}{:>9}  [{}]",
        card.id, card.name, symbol, card.price, card.category
    )
}
