//! Typed user intents.

use greenroot_core::{CategoryId, Product, ProductId};

/// Something the user asked the storefront to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Filter the grid by category; `None` shows every product.
    SelectCategory(Option<CategoryId>),
    /// Add one unit of a product to the cart.
    AddToCart(Product),
    /// Remove a product's whole line from the cart.
    RemoveFromCart(ProductId),
    /// Empty the cart.
    ClearCart,
    /// Open the detail view for a product.
    OpenDetail(Product),
    /// Dismiss the detail view.
    CloseDetail,
}

impl Intent {
    /// Short label used for breadcrumbs and logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SelectCategory(_) => "select_category",
            Self::AddToCart(_) => "add_to_cart",
            Self::RemoveFromCart(_) => "remove_from_cart",
            Self::ClearCart => "clear_cart",
            Self::OpenDetail(_) => "open_detail",
            Self::CloseDetail => "close_detail",
        }
    }
}
