//! Core types for Greenroot.
//!
//! This module provides type-safe wrappers for catalog and cart concepts.

pub mod cart;
pub mod catalog;
pub mod id;
pub mod pledge;
pub mod price;
pub mod status;

pub use cart::CartLine;
pub use catalog::*;
pub use id::{CategoryId, ProductId};
pub use pledge::{Pledge, PledgeError};
pub use price::{CurrencyCode, Price, UnknownCurrency, format_price};
pub use status::LoadPhase;
