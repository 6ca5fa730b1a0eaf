//! Session driver.
//!
//! [`Storefront`] owns the cart store, the catalog view model, and the overlay
//! state for one browsing session. Intents are applied through
//! [`Storefront::dispatch`]; after every state change the session re-derives a
//! frame and hands it to the presenter if anything actually changed.
//!
//! # Concurrency
//!
//! The session is `!Send` and lives on one thread. Product fetches are spawned
//! with `tokio::task::spawn_local`, so `dispatch` must be called from inside a
//! `tokio::task::LocalSet`. State sits in a `RefCell` that is never borrowed
//! across an `.await`.

use std::cell::{RefCell, RefMut};
use std::rc::Rc;

use greenroot_core::{CategoryId, Price, Product};
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

use crate::cart::CartStore;
use crate::catalog::{CatalogSource, FetchError};
use crate::config::DisplayConfig;
use crate::error::add_breadcrumb;
use crate::intent::Intent;
use crate::render::{DetailContent, DetailView, Frame, Overlay, Presenter, RenderSync, render};
use crate::view_model::{CatalogViewModel, LoadOutcome, LoadTicket};

/// One browsing session.
///
/// Cheap to clone; clones share the same state.
pub struct Storefront<S, P> {
    inner: Rc<Inner<S, P>>,
}

impl<S, P> Clone for Storefront<S, P> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

struct Inner<S, P> {
    source: S,
    presenter: P,
    display: DisplayConfig,
    state: RefCell<SessionState>,
}

struct SessionState {
    cart: CartStore,
    catalog: CatalogViewModel,
    overlay: Overlay,
    sync: RenderSync,
}

impl<S, P> Storefront<S, P>
where
    S: CatalogSource + 'static,
    P: Presenter + 'static,
{
    /// Create a session with an empty cart and "All" selected.
    ///
    /// Nothing is fetched until [`Storefront::start`].
    #[must_use]
    pub fn new(source: S, presenter: P, display: DisplayConfig) -> Self {
        let cart = CartStore::new();
        let catalog = CatalogViewModel::new();
        let sync = RenderSync::new(&cart, &catalog);

        Self {
            inner: Rc::new(Inner {
                source,
                presenter,
                display,
                state: RefCell::new(SessionState {
                    cart,
                    catalog,
                    overlay: Overlay::default(),
                    sync,
                }),
            }),
        }
    }

    fn state(&self) -> RefMut<'_, SessionState> {
        self.inner.state.borrow_mut()
    }

    /// Load the category list and every product concurrently.
    #[instrument(skip(self))]
    pub async fn start(&self) {
        let ticket = self.begin_selection(None);
        tokio::join!(self.load_categories(), self.load_products(ticket));
    }

    /// Apply a user intent.
    ///
    /// Cart and overlay intents complete synchronously. `SelectCategory`
    /// renders the loading state right away and returns the handle of the
    /// spawned fetch.
    ///
    /// # Panics
    ///
    /// `SelectCategory` panics if called outside a `tokio::task::LocalSet`.
    pub fn dispatch(&self, intent: Intent) -> Option<JoinHandle<()>> {
        record_breadcrumb(&intent);
        debug!(intent = intent.name(), "Dispatching intent");

        // A notice only survives until the next intent.
        self.state().overlay.set_notice(None);

        let handle = match intent {
            Intent::SelectCategory(category) => {
                let ticket = self.begin_selection(category);
                let session = self.clone();
                Some(tokio::task::spawn_local(async move {
                    session.load_products(ticket).await;
                }))
            }
            Intent::AddToCart(product) => {
                let mut state = self.state();
                state.cart.add_product(&product);
                state
                    .overlay
                    .set_notice(Some(format!("{} has been added to your cart!", product.name)));
                None
            }
            Intent::RemoveFromCart(product_id) => {
                self.state().cart.remove(product_id.as_str());
                None
            }
            Intent::ClearCart => {
                self.state().cart.clear();
                None
            }
            Intent::OpenDetail(product) => {
                self.state().overlay.set_detail(Some(DetailView::Loading));
                self.sync();
                let content = DetailContent::new(&product, self.inner.display.detail_copy);
                self.state()
                    .overlay
                    .set_detail(Some(DetailView::Ready(content)));
                None
            }
            Intent::CloseDetail => {
                self.state().overlay.set_detail(None);
                None
            }
        };

        self.sync();
        handle
    }

    /// Push a frame to the presenter if anything changed since the last one.
    pub fn sync(&self) {
        self.present(false);
    }

    /// Push a frame to the presenter unconditionally.
    pub fn refresh(&self) {
        self.present(true);
    }

    /// Derive the current frame without presenting it.
    #[must_use]
    pub fn frame(&self) -> Frame {
        let state = self.inner.state.borrow();
        render(&state.cart, &state.catalog, &state.overlay, &self.inner.display)
    }

    /// Look up a displayed product by id.
    #[must_use]
    pub fn product(&self, id: &str) -> Option<Product> {
        self.inner.state.borrow().catalog.product(id).cloned()
    }

    /// Current cart total.
    #[must_use]
    pub fn cart_total(&self) -> Price {
        self.inner.state.borrow().cart.total()
    }

    /// Currently selected category; `None` means all products.
    #[must_use]
    pub fn active_category(&self) -> Option<CategoryId> {
        self.inner.state.borrow().catalog.active_category().cloned()
    }

    fn present(&self, force: bool) {
        let frame = {
            let mut guard = self.state();
            let state = &mut *guard;
            let changed = state.sync.take_changes(&state.overlay);
            if !changed && !force {
                return;
            }
            render(&state.cart, &state.catalog, &state.overlay, &self.inner.display)
        };
        self.inner.presenter.present(&frame);
    }

    /// Select a category and enter the loading phase.
    fn begin_selection(&self, category: Option<CategoryId>) -> LoadTicket {
        let ticket = {
            let mut state = self.state();
            state.catalog.select_category(category);
            state.catalog.begin_load()
        };
        self.sync();
        ticket
    }

    async fn load_categories(&self) {
        self.state().catalog.begin_categories();
        self.sync();

        let result = self.inner.source.fetch_categories().await;
        if let Err(err) = &result {
            report_fetch_error(err, "categories");
        }

        self.state().catalog.finish_categories(result);
        self.sync();
    }

    async fn load_products(&self, ticket: LoadTicket) {
        let result = self.inner.source.fetch_products(ticket.category()).await;
        if let Err(err) = &result {
            report_fetch_error(err, "products");
        }

        let outcome = self.state().catalog.finish_load(&ticket, result);
        if outcome == LoadOutcome::Stale {
            debug!(
                generation = ticket.generation(),
                "Discarding product result for superseded selection"
            );
            return;
        }
        self.sync();
    }
}

fn record_breadcrumb(intent: &Intent) {
    match intent {
        Intent::SelectCategory(Some(id)) => add_breadcrumb(
            "intent",
            intent.name(),
            Some(&[("category_id", id.as_str())]),
        ),
        Intent::AddToCart(product) | Intent::OpenDetail(product) => add_breadcrumb(
            "intent",
            intent.name(),
            Some(&[("product_id", product.id.as_str())]),
        ),
        Intent::RemoveFromCart(id) => {
            add_breadcrumb("intent", intent.name(), Some(&[("product_id", id.as_str())]));
        }
        Intent::SelectCategory(None) | Intent::ClearCart | Intent::CloseDetail => {
            add_breadcrumb("intent", intent.name(), None);
        }
    }
}

fn report_fetch_error(err: &FetchError, what: &str) {
    let event_id = sentry::capture_error(err);
    tracing::error!(
        error = %err,
        sentry_event_id = %event_id,
        "Failed to load {what}"
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use greenroot_core::{Category, ProductId};
    use tokio::sync::oneshot;
    use tokio::task::LocalSet;

    use super::*;
    use crate::render::{FrameLog, ProductGrid};

    type Reply = Result<Vec<Product>, FetchError>;

    const ALL: &str = "*";

    /// Catalog source whose product responses are released by the test.
    #[derive(Default)]
    struct ScriptedSource {
        categories: Vec<Category>,
        gates: RefCell<HashMap<String, oneshot::Receiver<Reply>>>,
        canned: HashMap<String, Vec<Product>>,
    }

    impl ScriptedSource {
        fn gate(&self, key: &str) -> oneshot::Sender<Reply> {
            let (tx, rx) = oneshot::channel();
            self.gates.borrow_mut().insert(key.to_string(), rx);
            tx
        }

        async fn reply(&self, key: &str) -> Reply {
            let gate = self.gates.borrow_mut().remove(key);
            match gate {
                Some(rx) => rx.await.unwrap_or_else(|_| Ok(Vec::new())),
                None => Ok(self.canned.get(key).cloned().unwrap_or_default()),
            }
        }
    }

    impl CatalogSource for ScriptedSource {
        async fn fetch_categories(&self) -> Result<Vec<Category>, FetchError> {
            Ok(self.categories.clone())
        }

        async fn fetch_all_products(&self) -> Result<Vec<Product>, FetchError> {
            self.reply(ALL).await
        }

        async fn fetch_products_by_category(
            &self,
            category_id: &CategoryId,
        ) -> Result<Vec<Product>, FetchError> {
            self.reply(category_id.as_str()).await
        }
    }

    fn tree(id: &str) -> Product {
        Product::new(id, format!("Tree {id}"), Price::from(10))
    }

    fn oak() -> Product {
        Product::new("t1", "Oak", Price::from(100))
    }

    fn grid_ids(frame: &Frame) -> Vec<String> {
        match &frame.grid {
            ProductGrid::Cards(cards) => cards.iter().map(|c| c.id.to_string()).collect(),
            _ => Vec::new(),
        }
    }

    fn session(source: ScriptedSource) -> (Storefront<ScriptedSource, FrameLog>, FrameLog) {
        let log = FrameLog::new();
        let store = Storefront::new(source, log.clone(), DisplayConfig::default());
        (store, log)
    }

    #[tokio::test]
    async fn test_start_loads_categories_and_all_products() {
        let source = ScriptedSource {
            categories: vec![Category::new("1", "Fruit Tree")],
            canned: HashMap::from([(ALL.to_string(), vec![tree("a"), tree("b")])]),
            ..Default::default()
        };
        let (store, log) = session(source);

        LocalSet::new().run_until(store.start()).await;

        let frame = log.last().unwrap();
        assert!(!frame.is_loading);
        assert_eq!(grid_ids(&frame), vec!["a", "b"]);
        assert!(store.active_category().is_none());
        assert!(log.frames().iter().any(|f| f.is_loading));
    }

    #[tokio::test]
    async fn test_later_selection_wins_when_earlier_resolves_last() {
        let source = ScriptedSource::default();
        let tx_a = source.gate("A");
        let tx_b = source.gate("B");
        let (store, log) = session(source);

        LocalSet::new()
            .run_until(async {
                let a = store
                    .dispatch(Intent::SelectCategory(Some(CategoryId::new("A"))))
                    .unwrap();
                let b = store
                    .dispatch(Intent::SelectCategory(Some(CategoryId::new("B"))))
                    .unwrap();

                tx_b.send(Ok(vec![tree("b1")])).unwrap();
                b.await.unwrap();
                tx_a.send(Ok(vec![tree("a1")])).unwrap();
                a.await.unwrap();
            })
            .await;

        let frame = log.last().unwrap();
        assert_eq!(grid_ids(&frame), vec!["b1"]);
        assert!(!frame.is_loading);
        assert_eq!(store.active_category(), Some(CategoryId::new("B")));
    }

    #[tokio::test]
    async fn test_later_selection_wins_when_earlier_resolves_first() {
        let source = ScriptedSource::default();
        let tx_a = source.gate("A");
        let tx_b = source.gate("B");
        let (store, log) = session(source);

        LocalSet::new()
            .run_until(async {
                let a = store
                    .dispatch(Intent::SelectCategory(Some(CategoryId::new("A"))))
                    .unwrap();
                let b = store
                    .dispatch(Intent::SelectCategory(Some(CategoryId::new("B"))))
                    .unwrap();

                tx_a.send(Ok(vec![tree("a1")])).unwrap();
                a.await.unwrap();

                // A's result is stale: still loading, nothing shown.
                let frame = store.frame();
                assert!(frame.is_loading);
                assert!(grid_ids(&frame).is_empty());

                tx_b.send(Ok(vec![tree("b1")])).unwrap();
                b.await.unwrap();
            })
            .await;

        let frames = log.frames();
        assert!(frames.iter().all(|f| !grid_ids(f).contains(&"a1".to_string())));
        assert_eq!(grid_ids(frames.last().unwrap()), vec!["b1"]);
    }

    #[tokio::test]
    async fn test_empty_category_shows_empty_state() {
        let (store, log) = session(ScriptedSource::default());

        LocalSet::new()
            .run_until(async {
                store
                    .dispatch(Intent::SelectCategory(Some(CategoryId::new("9"))))
                    .unwrap()
                    .await
                    .unwrap();
            })
            .await;

        let frame = log.last().unwrap();
        assert!(frame.is_empty);
        assert!(!frame.is_loading);
        assert_eq!(frame.grid, ProductGrid::Empty);
    }

    #[tokio::test]
    async fn test_fetch_failure_shows_inline_error() {
        let source = ScriptedSource::default();
        let tx = source.gate("3");
        let (store, log) = session(source);

        LocalSet::new()
            .run_until(async {
                let handle = store
                    .dispatch(Intent::SelectCategory(Some(CategoryId::new("3"))))
                    .unwrap();
                tx.send(Err(FetchError::Status {
                    status: 500,
                    endpoint: "category/3".to_string(),
                }))
                .unwrap();
                handle.await.unwrap();
            })
            .await;

        let frame = log.last().unwrap();
        assert_eq!(
            frame.grid,
            ProductGrid::Error("Failed to load trees.".to_string())
        );
        assert!(!frame.is_loading);
    }

    #[test]
    fn test_oak_scenario() {
        let (store, log) = session(ScriptedSource::default());

        assert!(store.dispatch(Intent::AddToCart(oak())).is_none());
        store.dispatch(Intent::AddToCart(oak()));

        let frame = log.last().unwrap();
        assert_eq!(frame.cart.lines.len(), 1);
        assert_eq!(frame.cart.lines[0].quantity, 2);
        assert_eq!(frame.cart.total, "200.00");
        assert_eq!(store.cart_total(), Price::from(200));

        store.dispatch(Intent::RemoveFromCart(ProductId::new("t1")));
        let frame = log.last().unwrap();
        assert!(frame.cart.lines.is_empty());
        assert_eq!(frame.cart.total, "0.00");
    }

    #[test]
    fn test_add_notice_is_cleared_by_next_intent() {
        let (store, log) = session(ScriptedSource::default());

        store.dispatch(Intent::AddToCart(oak()));
        assert_eq!(
            log.last().unwrap().notice.as_deref(),
            Some("Oak has been added to your cart!")
        );

        store.dispatch(Intent::ClearCart);
        let frame = log.last().unwrap();
        assert!(frame.notice.is_none());
        assert!(frame.cart.lines.is_empty());
    }

    #[test]
    fn test_open_detail_shows_placeholder_then_content() {
        let (store, log) = session(ScriptedSource::default());
        let before = log.len();

        store.dispatch(Intent::OpenDetail(oak()));
        let frames = log.frames();
        let details: Vec<_> = frames
            .iter()
            .skip(before)
            .map(|f| f.detail.clone())
            .collect();
        assert_eq!(details.len(), 2);
        assert_eq!(details[0], Some(DetailView::Loading));
        let Some(DetailView::Ready(content)) = &details[1] else {
            panic!("expected detail content");
        };
        assert_eq!(content.name, "Oak");
        assert_eq!(content.price, "100.00");

        store.dispatch(Intent::CloseDetail);
        assert!(log.last().unwrap().detail.is_none());
    }

    #[test]
    fn test_sync_skips_unchanged_state() {
        let (store, log) = session(ScriptedSource::default());
        store.sync();
        let count = log.len();
        assert_eq!(count, 1);

        store.sync();
        assert_eq!(log.len(), count);

        store.refresh();
        assert_eq!(log.len(), count + 1);
        assert_eq!(log.frames()[count - 1], log.frames()[count]);
    }

    #[tokio::test]
    async fn test_every_intent_records_breadcrumb() {
        let (store, _log) = session(ScriptedSource::default());
        let local = LocalSet::new();

        let events = sentry::test::with_captured_events(|| {
            let _entered = local.enter();
            store.dispatch(Intent::SelectCategory(Some(CategoryId::new("3"))));
            store.dispatch(Intent::AddToCart(oak()));
            store.dispatch(Intent::RemoveFromCart(ProductId::new("t1")));
            store.dispatch(Intent::ClearCart);
            sentry::capture_message("checkpoint", sentry::Level::Info);
        });

        assert_eq!(events.len(), 1);
        let crumbs = &events[0].breadcrumbs.values;
        let trail: Vec<(&str, &str)> = crumbs
            .iter()
            .map(|c| {
                (
                    c.category.as_deref().unwrap_or_default(),
                    c.message.as_deref().unwrap_or_default(),
                )
            })
            .collect();
        assert_eq!(
            trail,
            vec![
                ("intent", "select_category"),
                ("intent", "add_to_cart"),
                ("intent", "remove_from_cart"),
                ("intent", "clear_cart"),
            ]
        );
        assert_eq!(crumbs[0].data["category_id"], "3");
        assert_eq!(crumbs[1].data["product_id"], "t1");
        assert!(crumbs[3].data.is_empty());
    }

    #[tokio::test]
    #[should_panic(expected = "LocalSet")]
    async fn test_select_category_requires_local_set() {
        let (store, _log) = session(ScriptedSource::default());
        store.dispatch(Intent::SelectCategory(None));
    }
}
