//! Subcommand implementations.

pub mod browse;
pub mod catalog;
pub mod pledge;
