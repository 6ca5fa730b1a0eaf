//! End-to-end session tests: the session driver over the real HTTP client.
//!
//! Run with: cargo test -p greenroot-integration-tests

use std::time::Duration;

use greenroot_core::CategoryId;
use greenroot_integration_tests::{Fixture, FixtureServer, Reply};
use greenroot_storefront::config::DisplayConfig;
use greenroot_storefront::render::{CategoryPanel, ProductGrid};
use greenroot_storefront::{CatalogClient, Frame, FrameLog, Intent, Storefront};
use tokio::task::LocalSet;

type Session = Storefront<CatalogClient, FrameLog>;

async fn session_for(fixture: Fixture) -> (FixtureServer, Session, FrameLog) {
    let server = FixtureServer::start(fixture).await;
    let client = CatalogClient::new(&server.catalog_config(Duration::from_secs(60)))
        .expect("Failed to build client");
    let log = FrameLog::new();
    let store = Storefront::new(client, log.clone(), DisplayConfig::default());
    (server, store, log)
}

fn card_names(frame: &Frame) -> Vec<String> {
    match &frame.grid {
        ProductGrid::Cards(cards) => cards.iter().map(|card| card.name.clone()).collect(),
        _ => Vec::new(),
    }
}

async fn select(store: &Session, category: Option<&str>) {
    let handle = store
        .dispatch(Intent::SelectCategory(category.map(CategoryId::new)))
        .expect("Selecting a category spawns a fetch");
    handle.await.expect("Fetch task panicked");
}

#[tokio::test]
async fn test_start_renders_catalog() {
    let (_server, store, log) = session_for(Fixture::canonical()).await;

    LocalSet::new().run_until(store.start()).await;

    let frame = log.last().expect("At least one frame");
    assert!(!frame.is_loading);
    assert_eq!(card_names(&frame), vec!["Mango Tree", "Banyan Tree", "Neem Tree"]);

    let CategoryPanel::Ready(buttons) = &frame.categories else {
        panic!("Categories did not load: {:?}", frame.categories);
    };
    assert_eq!(buttons.len(), 4);
    assert_eq!(buttons[0].label, "All Trees");
    assert!(buttons[0].active);
}

#[tokio::test]
async fn test_browse_and_fill_cart() {
    let (_server, store, log) = session_for(Fixture::canonical()).await;

    LocalSet::new()
        .run_until(async {
            store.start().await;

            let banyan = store.product("2").expect("Banyan is displayed");
            store.dispatch(Intent::AddToCart(banyan.clone()));
            store.dispatch(Intent::AddToCart(banyan));

            select(&store, Some("1")).await;
            let mango = store.product("1").expect("Mango is displayed");
            store.dispatch(Intent::AddToCart(mango));

            select(&store, Some("3")).await;
        })
        .await;

    let frame = log.last().expect("At least one frame");
    assert_eq!(frame.grid, ProductGrid::Empty);
    assert!(frame.is_empty);
    assert_eq!(frame.cart.lines.len(), 2);
    assert_eq!(frame.cart.item_count, 3);
    assert_eq!(frame.cart.total, "2901.00");

    let CategoryPanel::Ready(buttons) = &frame.categories else {
        panic!("Categories did not load");
    };
    let active: Vec<&str> = buttons
        .iter()
        .filter(|button| button.active)
        .map(|button| button.label.as_str())
        .collect();
    assert_eq!(active, vec!["Medicinal Tree"]);
}

#[tokio::test]
async fn test_rapid_switch_shows_last_selection() {
    let (_server, store, log) = session_for(Fixture::canonical()).await;

    LocalSet::new()
        .run_until(async {
            let first = store
                .dispatch(Intent::SelectCategory(Some(CategoryId::new("1"))))
                .expect("fetch spawned");
            let second = store
                .dispatch(Intent::SelectCategory(Some(CategoryId::new("2"))))
                .expect("fetch spawned");
            first.await.expect("first fetch");
            second.await.expect("second fetch");
        })
        .await;

    let frame = log.last().expect("At least one frame");
    assert_eq!(card_names(&frame), vec!["Banyan Tree"]);
    assert_eq!(store.active_category(), Some(CategoryId::new("2")));
}

#[tokio::test]
async fn test_failed_products_leave_categories_usable() {
    let mut fixture = Fixture::canonical();
    fixture.plants = Reply::Status(502);
    let (_server, store, log) = session_for(fixture).await;

    LocalSet::new()
        .run_until(async {
            store.start().await;
            let frame = log.last().expect("At least one frame");
            assert_eq!(
                frame.grid,
                ProductGrid::Error("Failed to load plants.".to_string())
            );
            assert!(matches!(frame.categories, CategoryPanel::Ready(_)));

            select(&store, Some("1")).await;
        })
        .await;

    let frame = log.last().expect("At least one frame");
    assert_eq!(card_names(&frame), vec!["Mango Tree"]);
}

#[tokio::test]
async fn test_failed_categories_show_inline_error() {
    let mut fixture = Fixture::canonical();
    fixture.categories = Reply::Raw("<html>maintenance</html>");
    let (_server, store, log) = session_for(fixture).await;

    LocalSet::new().run_until(store.start()).await;

    let frame = log.last().expect("At least one frame");
    assert_eq!(
        frame.categories,
        CategoryPanel::Failed("Failed to load categories.".to_string())
    );
    assert_eq!(card_names(&frame).len(), 3);
}

#[tokio::test]
async fn test_detail_for_fetched_product() {
    let (_server, store, log) = session_for(Fixture::canonical()).await;

    LocalSet::new().run_until(store.start()).await;
    let neem = store.product("3").expect("Neem is displayed");
    store.dispatch(Intent::OpenDetail(neem));

    let frame = log.last().expect("At least one frame");
    let detail = serde_json::to_value(&frame.detail).expect("Frame serializes");
    assert_eq!(detail["state"], "ready");
    assert_eq!(detail["data"]["name"], "Neem Tree");
    assert_eq!(detail["data"]["price"], "0.00");
}
