//! In-memory cart store.
//!
//! The store is the only owner of cart lines. It holds at most one line per
//! product; adding a product that is already in the cart bumps that line's
//! quantity. Every mutation publishes a new revision on a `watch` channel so
//! the render layer knows to re-derive the cart view.
//!
//! Nothing here can fail. The cart lives exactly as long as the session and
//! is never persisted.

use greenroot_core::{CartLine, Price, Product, ProductId};
use tokio::sync::watch;

/// Authoritative list of cart line items, in insertion order.
#[derive(Debug)]
pub struct CartStore {
    lines: Vec<CartLine>,
    revision: watch::Sender<u64>,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CartStore {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            lines: Vec::new(),
            revision,
        }
    }

    /// Subscribe to change notifications.
    ///
    /// The received value is the store revision, bumped on every mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Current revision.
    #[must_use]
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    fn notify(&self) {
        self.revision.send_modify(|rev| *rev = rev.wrapping_add(1));
    }

    /// Add one unit of a product.
    ///
    /// Merges into the existing line for `product_id` if there is one,
    /// otherwise appends a new line with a quantity of one.
    pub fn add(&mut self, product_id: ProductId, name: impl Into<String>, unit_price: Price) {
        match self.lines.iter_mut().find(|line| line.product_id == product_id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self
                .lines
                .push(CartLine::new(product_id, name.into(), unit_price)),
        }
        self.notify();
    }

    /// Add one unit of a catalog product.
    pub fn add_product(&mut self, product: &Product) {
        self.add(product.id.clone(), product.name.clone(), product.price);
    }

    /// Remove the whole line for `product_id`.
    ///
    /// Returns whether a line was removed. Removing an absent product leaves
    /// the lines untouched.
    pub fn remove(&mut self, product_id: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.product_id.as_str() != product_id);
        let removed = self.lines.len() != before;
        self.notify();
        removed
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.notify();
    }

    /// Sum of `unit_price × quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |acc, line| acc.saturating_add(line.quantity))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The line for `product_id`, if present.
    #[must_use]
    pub fn line(&self, product_id: &str) -> Option<&CartLine> {
        self.lines
            .iter()
            .find(|line| line.product_id.as_str() == product_id)
    }
}
