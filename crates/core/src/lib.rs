//! Greenroot Core - Shared types library.
//!
//! This crate provides the domain types used across all Greenroot components:
//! - `storefront` - Catalog client, cart store and view synchronization
//! - `cli` - Terminal front end for browsing the catalog
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no async
//! runtime. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, catalog records, cart lines and pledges

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
