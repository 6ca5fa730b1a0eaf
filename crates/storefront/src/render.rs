//! Render/sync layer.
//!
//! [`render`] derives a complete [`Frame`] from the current cart, catalog view
//! model, and overlay state. It never patches a previous frame: rendering the
//! same state twice yields equal frames. [`RenderSync`] watches the stores'
//! revision channels so the session only pushes a frame to the [`Presenter`]
//! when something actually changed.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use greenroot_core::{CartLine, CategoryId, Product, ProductId};
use serde::Serialize;
use tokio::sync::watch;

use crate::cart::CartStore;
use crate::config::DisplayConfig;
use crate::view_model::{CatalogViewModel, CategoryList};

/// Label of the control that clears the category filter.
pub const ALL_CATEGORIES_LABEL: &str = "All Trees";

/// Fixed description shown by the detail view under the demonstrative policy.
pub const DEMONSTRATIVE_DESCRIPTION: &str = "A majestic shade tree with a vast canopy and iconic aerial roots. Revered in many cultures, it offers shelter to countless birds and animals. It is a vital part of many ecosystems and thrives in tropical climates.";

// =============================================================================
// Frame
// =============================================================================

/// Everything the presentation layer needs to draw one screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub currency_symbol: &'static str,
    pub categories: CategoryPanel,
    pub grid: ProductGrid,
    pub is_loading: bool,
    pub is_empty: bool,
    pub cart: CartView,
    pub detail: Option<DetailView>,
    pub notice: Option<String>,
}

/// Category filter controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum CategoryPanel {
    Loading,
    Ready(Vec<CategoryButton>),
    Failed(String),
}

/// One category filter control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryButton {
    /// `None` for the "All" control.
    pub id: Option<CategoryId>,
    pub label: String,
    pub active: bool,
}

/// Product grid contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum ProductGrid {
    Loading,
    Cards(Vec<ProductCard>),
    Empty,
    Error(String),
}

/// One product card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductCard {
    pub id: ProductId,
    pub name: String,
    pub image_url: String,
    pub description: String,
    pub category: String,
    pub price: String,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            image_url: product.image_url.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            price: product.price.to_string(),
        }
    }
}

/// Cart panel contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total: String,
    pub item_count: u32,
}

/// One cart line as displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLineView {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: String,
    pub quantity: u32,
    pub line_total: String,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id.clone(),
            name: line.name.clone(),
            unit_price: line.unit_price.to_string(),
            quantity: line.quantity,
            line_total: line.line_total().to_string(),
        }
    }
}

impl From<&CartStore> for CartView {
    fn from(cart: &CartStore) -> Self {
        Self {
            lines: cart.lines().iter().map(CartLineView::from).collect(),
            total: cart.total().to_string(),
            item_count: cart.item_count(),
        }
    }
}

// =============================================================================
// Detail modal
// =============================================================================

/// Which description the detail view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailCopy {
    /// The fixed demonstrative text.
    #[default]
    Demonstrative,
    /// The product's own description.
    Product,
}

impl fmt::Display for DetailCopy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Demonstrative => "demonstrative",
            Self::Product => "product",
        })
    }
}

impl FromStr for DetailCopy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "demonstrative" => Ok(Self::Demonstrative),
            "product" => Ok(Self::Product),
            other => Err(format!(
                "unknown detail copy '{other}' (expected 'demonstrative' or 'product')"
            )),
        }
    }
}

/// Detail modal state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum DetailView {
    /// Placeholder shown the instant the modal opens.
    Loading,
    Ready(DetailContent),
}

/// Read-only detail of one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailContent {
    pub product_id: ProductId,
    pub name: String,
    pub image_url: String,
    pub category: String,
    pub price: String,
    pub description: String,
}

impl DetailContent {
    #[must_use]
    pub fn new(product: &Product, copy: DetailCopy) -> Self {
        let description = match copy {
            DetailCopy::Demonstrative => DEMONSTRATIVE_DESCRIPTION.to_string(),
            DetailCopy::Product => product.description.clone(),
        };
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            image_url: product.image_url.clone(),
            category: product.category.clone(),
            price: product.price.to_string(),
            description,
        }
    }
}

/// Transient UI state layered over the stores: the detail modal and the
/// last confirmation notice.
#[derive(Debug, Default)]
pub struct Overlay {
    detail: Option<DetailView>,
    notice: Option<String>,
    revision: u64,
}

impl Overlay {
    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn set_detail(&mut self, detail: Option<DetailView>) {
        self.detail = detail;
        self.bump();
    }

    pub fn set_notice(&mut self, notice: Option<String>) {
        if self.notice != notice {
            self.notice = notice;
            self.bump();
        }
    }

    #[must_use]
    pub const fn detail(&self) -> Option<&DetailView> {
        self.detail.as_ref()
    }

    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }
}

// =============================================================================
// Rendering
// =============================================================================

/// Derive a complete frame from the current state.
#[must_use]
pub fn render(
    cart: &CartStore,
    catalog: &CatalogViewModel,
    overlay: &Overlay,
    display: &DisplayConfig,
) -> Frame {
    Frame {
        currency_symbol: display.currency.symbol(),
        categories: render_categories(catalog),
        grid: render_grid(catalog),
        is_loading: catalog.is_loading(),
        is_empty: catalog.is_empty(),
        cart: CartView::from(cart),
        detail: overlay.detail().cloned(),
        notice: overlay.notice().map(str::to_string),
    }
}

fn render_categories(catalog: &CatalogViewModel) -> CategoryPanel {
    match catalog.categories() {
        CategoryList::Loading => CategoryPanel::Loading,
        CategoryList::Failed(message) => CategoryPanel::Failed(message.clone()),
        CategoryList::Ready(categories) => {
            let active = catalog.active_category();
            let all = CategoryButton {
                id: None,
                label: ALL_CATEGORIES_LABEL.to_string(),
                active: active.is_none(),
            };
            let buttons = categories.iter().map(|category| CategoryButton {
                id: Some(category.id.clone()),
                label: category.name.clone(),
                active: active == Some(&category.id),
            });
            CategoryPanel::Ready(std::iter::once(all).chain(buttons).collect())
        }
    }
}

fn render_grid(catalog: &CatalogViewModel) -> ProductGrid {
    if catalog.is_loading() {
        return ProductGrid::Loading;
    }
    if let Some(message) = catalog.error() {
        return ProductGrid::Error(message.to_string());
    }
    if catalog.is_empty() {
        return ProductGrid::Empty;
    }
    ProductGrid::Cards(catalog.products().iter().map(ProductCard::from).collect())
}

// =============================================================================
// Presenters
// =============================================================================

/// Receiver of rendered frames.
pub trait Presenter {
    fn present(&self, frame: &Frame);
}

/// Headless presenter that records every frame it receives.
///
/// Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct FrameLog {
    frames: Rc<RefCell<Vec<Frame>>>,
}

impl FrameLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All frames received so far.
    #[must_use]
    pub fn frames(&self) -> Vec<Frame> {
        self.frames.borrow().clone()
    }

    /// The most recent frame.
    #[must_use]
    pub fn last(&self) -> Option<Frame> {
        self.frames.borrow().last().cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.borrow().is_empty()
    }
}

impl Presenter for FrameLog {
    fn present(&self, frame: &Frame) {
        self.frames.borrow_mut().push(frame.clone());
    }
}

// =============================================================================
// Change tracking
// =============================================================================

/// Tracks which state the last pushed frame reflected.
#[derive(Debug)]
pub struct RenderSync {
    cart: watch::Receiver<u64>,
    catalog: watch::Receiver<u64>,
    overlay_seen: Option<u64>,
}

impl RenderSync {
    /// Subscribe to both stores.
    #[must_use]
    pub fn new(cart: &CartStore, catalog: &CatalogViewModel) -> Self {
        Self {
            cart: cart.subscribe(),
            catalog: catalog.subscribe(),
            overlay_seen: None,
        }
    }

    /// Whether anything changed since the last call, marking it all as seen.
    ///
    /// The first call always reports a change.
    pub fn take_changes(&mut self, overlay: &Overlay) -> bool {
        let cart = self.cart.has_changed().unwrap_or(true);
        let catalog = self.catalog.has_changed().unwrap_or(true);
        let overlay_changed = self.overlay_seen != Some(overlay.revision());

        self.cart.borrow_and_update();
        self.catalog.borrow_and_update();
        self.overlay_seen = Some(overlay.revision());

        cart || catalog || overlay_changed
    }
}
