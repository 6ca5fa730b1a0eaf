//! Integration test support for Greenroot.
//!
//! Starts an in-process catalog API on an ephemeral port so the real
//! `CatalogClient` and session driver can be exercised over HTTP.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p greenroot-integration-tests
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! let server = FixtureServer::start(Fixture::canonical()).await;
//! let client = CatalogClient::new(&server.catalog_config(Duration::ZERO))?;
//! let products = client.fetch_all_products().await?;
//! assert_eq!(server.hits("/api/plants"), 1);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::{Path, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use greenroot_storefront::config::CatalogConfig;
use serde_json::{Value, json};
use url::Url;

/// What the fixture answers on one endpoint.
#[derive(Debug, Clone)]
pub enum Reply {
    /// 200 with a JSON body.
    Json(Value),
    /// Empty body with the given status.
    Status(u16),
    /// 200 with a raw, possibly malformed, body.
    Raw(&'static str),
}

impl Default for Reply {
    fn default() -> Self {
        Self::Json(json!({}))
    }
}

/// Scripted responses for the three catalog endpoints.
#[derive(Debug, Clone, Default)]
pub struct Fixture {
    pub categories: Reply,
    pub plants: Reply,
    /// Per-category replies; unknown ids get an empty product list.
    pub by_category: HashMap<String, Reply>,
}

impl Fixture {
    /// The documented response shapes.
    #[must_use]
    pub fn canonical() -> Self {
        Self {
            categories: Reply::Json(json!({
                "status": true,
                "categories": [
                    {"id": 1, "category_name": "Fruit Tree"},
                    {"id": 2, "category_name": "Shade Tree"},
                    {"id": 3, "category_name": "Medicinal Tree"}
                ]
            })),
            plants: Reply::Json(json!({
                "status": true,
                "plants": [
                    {
                        "id": 1,
                        "name": "Mango Tree",
                        "image": "https://img.example.com/mango.png",
                        "description": "Juicy summer fruit.",
                        "category": "Fruit Tree",
                        "price": 500
                    },
                    {
                        "id": 2,
                        "name": "Banyan Tree",
                        "image": "https://img.example.com/banyan.png",
                        "description": "Wide canopy.",
                        "category": "Shade Tree",
                        "price": "1200.5"
                    },
                    {
                        "id": 3,
                        "name": "Neem Tree",
                        "description": "Bitter leaves.",
                        "category": "Medicinal Tree",
                        "price": "n/a"
                    }
                ]
            })),
            by_category: HashMap::from([
                (
                    "1".to_string(),
                    Reply::Json(json!({
                        "status": true,
                        "data": [
                            {"id": 1, "name": "Mango Tree", "category": "Fruit Tree", "price": 500}
                        ]
                    })),
                ),
                (
                    "2".to_string(),
                    Reply::Json(json!({
                        "data": {
                            "plants": [
                                {"plant_id": 2, "plant_name": "Banyan Tree", "cost": 1200.5, "category_name": "Shade Tree"}
                            ]
                        }
                    })),
                ),
                ("3".to_string(), Reply::Json(json!({"status": true, "data": []}))),
            ]),
        }
    }

    /// Every endpoint answers with the given status.
    #[must_use]
    pub fn failing(status: u16) -> Self {
        Self {
            categories: Reply::Status(status),
            plants: Reply::Status(status),
            by_category: HashMap::new(),
        }
    }
}

struct FixtureState {
    fixture: Fixture,
    hits: Mutex<HashMap<String, usize>>,
}

impl FixtureState {
    fn record(&self, uri: &Uri) {
        if let Ok(mut hits) = self.hits.lock() {
            *hits.entry(uri.path().to_string()).or_default() += 1;
        }
    }
}

/// A running fixture catalog API.
pub struct FixtureServer {
    addr: SocketAddr,
    state: Arc<FixtureState>,
}

impl FixtureServer {
    /// Bind an ephemeral port and serve the fixture in the background.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start(fixture: Fixture) -> Self {
        let state = Arc::new(FixtureState {
            fixture,
            hits: Mutex::new(HashMap::new()),
        });

        let app = Router::new()
            .route("/api/categories", get(categories))
            .route("/api/plants", get(plants))
            .route("/api/category/{id}", get(category_plants))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fixture listener");
        let addr = listener
            .local_addr()
            .expect("Failed to read fixture address");

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, state }
    }

    /// Base URL of the fixture API, ending in `/api/`.
    ///
    /// # Panics
    ///
    /// Panics if the bound address does not form a valid URL.
    #[must_use]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}/api/", self.addr)).expect("Fixture URL is valid")
    }

    /// Client configuration pointing at this server.
    #[must_use]
    pub fn catalog_config(&self, cache_ttl: Duration) -> CatalogConfig {
        CatalogConfig {
            base_url: self.base_url(),
            timeout: Duration::from_secs(5),
            cache_ttl,
        }
    }

    /// Number of requests received for a path such as `/api/plants`.
    #[must_use]
    pub fn hits(&self, path: &str) -> usize {
        self.state
            .hits
            .lock()
            .map(|hits| hits.get(path).copied().unwrap_or_default())
            .unwrap_or_default()
    }
}

async fn categories(State(state): State<Arc<FixtureState>>, uri: Uri) -> Response {
    state.record(&uri);
    respond(&state.fixture.categories)
}

async fn plants(State(state): State<Arc<FixtureState>>, uri: Uri) -> Response {
    state.record(&uri);
    respond(&state.fixture.plants)
}

async fn category_plants(
    State(state): State<Arc<FixtureState>>,
    Path(id): Path<String>,
    uri: Uri,
) -> Response {
    state.record(&uri);
    match state.fixture.by_category.get(&id) {
        Some(reply) => respond(reply),
        None => respond(&Reply::Json(json!({"status": true, "plants": []}))),
    }
}

fn respond(reply: &Reply) -> Response {
    match reply {
        Reply::Json(body) => axum::Json(body.clone()).into_response(),
        Reply::Status(code) => StatusCode::from_u16(*code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
        Reply::Raw(body) => (StatusCode::OK, *body).into_response(),
    }
}
