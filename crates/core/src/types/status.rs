//! Status enums for catalog loading.

use serde::{Deserialize, Serialize};

/// Loading phase of a catalog panel.
///
/// There is no terminal phase: a panel moves to `Loading` whenever a fetch
/// starts and back to `Loaded` once it resolves, successfully or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LoadPhase {
    #[default]
    Loading,
    Loaded,
}

impl LoadPhase {
    /// Whether a fetch is outstanding.
    #[must_use]
    pub const fn is_loading(self) -> bool {
        matches!(self, Self::Loading)
    }
}
