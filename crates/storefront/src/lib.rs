//! Greenroot Storefront library.
//!
//! The client-side state synchronization engine for the tree storefront:
//! it fetches the catalog, keeps the cart, and re-derives what the
//! presentation layer shows every time either changes.
//!
//! # Architecture
//!
//! - [`catalog`] - Remote catalog client with response normalization and caching
//! - [`cart`] - Cart store with quantity-merge semantics
//! - [`view_model`] - Active category, displayed products and load state
//! - [`render`] - Pure frame derivation and the presenter seam
//! - [`intent`] - Typed user intents
//! - [`session`] - Session driver wiring intents, stores and rendering
//!
//! Everything runs on a single thread. Catalog fetches are spawned on a
//! `tokio::task::LocalSet`, and results that arrive after the user has moved
//! on are discarded.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod intent;
pub mod render;
pub mod session;
pub mod telemetry;
pub mod view_model;

pub use cart::CartStore;
pub use catalog::{CatalogClient, CatalogSource, FetchError};
pub use config::{ConfigError, StorefrontConfig};
pub use error::{Error, Result};
pub use intent::Intent;
pub use render::{Frame, FrameLog, Presenter};
pub use session::Storefront;
pub use view_model::CatalogViewModel;
