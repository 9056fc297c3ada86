//! Store configuration.

use crate::probe_table::DEFAULT_MAX_LOAD_FACTOR;
use serde::{Deserialize, Serialize};

/// Sizing knobs for a [`RecordManager`](crate::RecordManager).
///
/// Capacities are starting points only; the tables grow once the load
/// factor is exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Initial slot count of the actor table.
    pub actor_capacity: usize,

    /// Initial slot count of the election table.
    pub election_capacity: usize,

    /// `(live + tombstones) / capacity` ceiling; clamped to `[0.1, 0.95]`.
    pub max_load_factor: f64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            actor_capacity: 100,
            election_capacity: 100,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
        }
    }
}

impl StoreConfig {
    #[must_use]
    pub fn with_actor_capacity(mut self, capacity: usize) -> Self {
        self.actor_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_election_capacity(mut self, capacity: usize) -> Self {
        self.election_capacity = capacity;
        self
    }

    #[must_use]
    pub fn with_max_load_factor(mut self, factor: f64) -> Self {
        self.max_load_factor = factor;
        self
    }
}
