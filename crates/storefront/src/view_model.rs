//! Catalog view model.
//!
//! Owns the active category, the category list, and the product set the grid
//! currently shows. Fetches are not performed here: the session driver calls
//! [`CatalogViewModel::begin_load`], runs the fetch, and feeds the result to
//! [`CatalogViewModel::finish_load`], which discards it if the user has moved
//! on in the meantime.

use greenroot_core::{Category, CategoryId, LoadPhase, Product};
use tokio::sync::watch;

use crate::catalog::FetchError;

/// Message shown in place of the category list when it fails to load.
pub const CATEGORIES_FAILED: &str = "Failed to load categories.";
/// Message shown in place of the grid when all products fail to load.
pub const ALL_PRODUCTS_FAILED: &str = "Failed to load plants.";
/// Message shown in place of the grid when a category fails to load.
pub const CATEGORY_PRODUCTS_FAILED: &str = "Failed to load trees.";

/// State of the category panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryList {
    #[default]
    Loading,
    Ready(Vec<Category>),
    Failed(String),
}

/// Proof that a product load was started for a particular selection.
///
/// Only the most recently issued ticket can apply its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    category: Option<CategoryId>,
    generation: u64,
}

impl LoadTicket {
    /// Category the load was started for; `None` means all products.
    #[must_use]
    pub const fn category(&self) -> Option<&CategoryId> {
        self.category.as_ref()
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

/// What happened to a finished load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The result was applied to the view.
    Applied,
    /// A newer selection superseded the load; the result was dropped.
    Stale,
}

/// Active category selection and displayed products.
#[derive(Debug)]
pub struct CatalogViewModel {
    active: Option<CategoryId>,
    categories: CategoryList,
    products: Vec<Product>,
    phase: LoadPhase,
    error: Option<String>,
    generation: u64,
    revision: watch::Sender<u64>,
}

impl Default for CatalogViewModel {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogViewModel {
    /// Create a view model with "All" selected and nothing loaded yet.
    #[must_use]
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            active: None,
            categories: CategoryList::Loading,
            products: Vec::new(),
            phase: LoadPhase::Loading,
            error: None,
            generation: 0,
            revision,
        }
    }

    /// Subscribe to change notifications.
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

    // =========================================================================
    // Categories
    // =========================================================================

    /// Mark the category list as loading.
    pub fn begin_categories(&mut self) {
        self.categories = CategoryList::Loading;
        self.notify();
    }

    /// Store the outcome of a category fetch.
    pub fn finish_categories(&mut self, result: Result<Vec<Category>, FetchError>) {
        self.categories = match result {
            Ok(categories) => CategoryList::Ready(categories),
            Err(_) => CategoryList::Failed(CATEGORIES_FAILED.to_string()),
        };
        self.notify();
    }

    #[must_use]
    pub const fn categories(&self) -> &CategoryList {
        &self.categories
    }

    // =========================================================================
    // Selection and products
    // =========================================================================

    /// Set the active category; `None` selects all products.
    ///
    /// Does not fetch anything.
    pub fn select_category(&mut self, category: Option<CategoryId>) {
        self.active = category;
        self.notify();
    }

    #[must_use]
    pub const fn active_category(&self) -> Option<&CategoryId> {
        self.active.as_ref()
    }

    /// Enter the loading phase for the active selection.
    ///
    /// Every ticket issued earlier becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation = self.generation.wrapping_add(1);
        self.phase = LoadPhase::Loading;
        self.notify();
        LoadTicket {
            category: self.active.clone(),
            generation: self.generation,
        }
    }

    /// Whether a ticket still belongs to the current selection.
    #[must_use]
    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.generation && ticket.category == self.active
    }

    /// Apply the result of a load, unless it is stale.
    ///
    /// A failed load empties the grid and records a visible error. Either way
    /// the phase returns to `Loaded`.
    pub fn finish_load(
        &mut self,
        ticket: &LoadTicket,
        result: Result<Vec<Product>, FetchError>,
    ) -> LoadOutcome {
        if !self.is_current(ticket) {
            return LoadOutcome::Stale;
        }

        match result {
            Ok(products) => {
                self.products = products;
                self.error = None;
            }
            Err(_) => {
                self.products = Vec::new();
                self.error = Some(
                    if ticket.category.is_some() {
                        CATEGORY_PRODUCTS_FAILED
                    } else {
                        ALL_PRODUCTS_FAILED
                    }
                    .to_string(),
                );
            }
        }
        self.phase = LoadPhase::Loaded;
        self.notify();
        LoadOutcome::Applied
    }

    /// Replace the displayed product set in one step.
    pub fn set_products(&mut self, products: Vec<Product>) {
        self.products = products;
        self.error = None;
        self.phase = LoadPhase::Loaded;
        self.notify();
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a displayed product by id.
    #[must_use]
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id.as_str() == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    #[must_use]
    pub const fn phase(&self) -> LoadPhase {
        self.phase
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.phase.is_loading()
    }

    /// Visible error from the last applied load, if it failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use greenroot_core::Price;

    use super::*;

    fn products(ids: &[&str]) -> Vec<Product> {
        ids.iter()
            .map(|id| Product::new(*id, format!("Tree {id}"), Price::from(10)))
            .collect()
    }

    fn status_error() -> FetchError {
        FetchError::Status {
            status: 500,
            endpoint: "plants".to_string(),
        }
    }

    #[test]
    fn test_starts_loading_with_all_selected() {
        let vm = CatalogViewModel::new();
        assert!(vm.is_loading());
        assert!(vm.active_category().is_none());
        assert!(vm.is_empty());
    }

    #[test]
    fn test_load_cycle() {
        let mut vm = CatalogViewModel::new();
        let ticket = vm.begin_load();
        assert!(vm.is_loading());

        let outcome = vm.finish_load(&ticket, Ok(products(&["a", "b"])));
        assert_eq!(outcome, LoadOutcome::Applied);
        assert_eq!(vm.phase(), LoadPhase::Loaded);
        assert_eq!(vm.products().len(), 2);
        assert!(vm.product("b").is_some());
    }

    #[test]
    fn test_empty_result_is_loaded_and_empty() {
        let mut vm = CatalogViewModel::new();
        vm.select_category(Some(CategoryId::new("5")));
        let ticket = vm.begin_load();
        vm.finish_load(&ticket, Ok(Vec::new()));

        assert!(vm.is_empty());
        assert!(!vm.is_loading());
        assert!(vm.error().is_none());
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut vm = CatalogViewModel::new();

        vm.select_category(Some(CategoryId::new("A")));
        let ticket_a = vm.begin_load();
        vm.select_category(Some(CategoryId::new("B")));
        let ticket_b = vm.begin_load();

        assert_eq!(
            vm.finish_load(&ticket_b, Ok(products(&["b1"]))),
            LoadOutcome::Applied
        );
        assert_eq!(
            vm.finish_load(&ticket_a, Ok(products(&["a1"]))),
            LoadOutcome::Stale
        );
        assert_eq!(vm.products()[0].id.as_str(), "b1");
    }

    #[test]
    fn test_stale_result_does_not_end_loading() {
        let mut vm = CatalogViewModel::new();
        vm.select_category(Some(CategoryId::new("A")));
        let ticket_a = vm.begin_load();
        vm.select_category(Some(CategoryId::new("B")));
        let _ticket_b = vm.begin_load();

        vm.finish_load(&ticket_a, Ok(products(&["a1"])));
        assert!(vm.is_loading());
        assert!(vm.is_empty());
    }

    #[test]
    fn test_reselecting_same_category_still_supersedes() {
        let mut vm = CatalogViewModel::new();
        vm.select_category(Some(CategoryId::new("A")));
        let first = vm.begin_load();
        vm.select_category(None);
        let _all = vm.begin_load();
        vm.select_category(Some(CategoryId::new("A")));
        let second = vm.begin_load();

        assert!(!vm.is_current(&first));
        assert!(vm.is_current(&second));
    }

    #[test]
    fn test_failed_load_shows_error() {
        let mut vm = CatalogViewModel::new();
        let ticket = vm.begin_load();
        vm.finish_load(&ticket, Ok(products(&["a"])));

        let ticket = vm.begin_load();
        vm.finish_load(&ticket, Err(status_error()));
        assert_eq!(vm.error(), Some(ALL_PRODUCTS_FAILED));
        assert!(vm.is_empty());
        assert!(!vm.is_loading());

        vm.select_category(Some(CategoryId::new("3")));
        let ticket = vm.begin_load();
        vm.finish_load(&ticket, Err(status_error()));
        assert_eq!(vm.error(), Some(CATEGORY_PRODUCTS_FAILED));
    }

    #[test]
    fn test_set_products_replaces_and_clears_error() {
        let mut vm = CatalogViewModel::new();
        let ticket = vm.begin_load();
        vm.finish_load(&ticket, Err(status_error()));

        vm.set_products(products(&["x", "y", "z"]));
        assert!(vm.error().is_none());
        assert_eq!(vm.products().len(), 3);
    }

    #[test]
    fn test_category_list_states() {
        let mut vm = CatalogViewModel::new();
        assert_eq!(vm.categories(), &CategoryList::Loading);

        vm.finish_categories(Ok(vec![Category::new("1", "Fruit Tree")]));
        assert!(matches!(vm.categories(), CategoryList::Ready(list) if list.len() == 1));

        vm.begin_categories();
        vm.finish_categories(Err(status_error()));
        assert_eq!(
            vm.categories(),
            &CategoryList::Failed(CATEGORIES_FAILED.to_string())
        );
    }

    #[test]
    fn test_mutations_bump_revision() {
        let mut vm = CatalogViewModel::new();
        let rx = vm.subscribe();
        vm.select_category(None);
        let ticket = vm.begin_load();
        vm.finish_load(&ticket, Ok(Vec::new()));
        assert_eq!(vm.revision(), 3);
        assert!(rx.has_changed().unwrap());
    }
}
