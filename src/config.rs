//! Engine configuration.

use serde::{Deserialize, Serialize};
use typex_types::env_utils::env_var_or;

/// Environment variable overriding [`EngineConfig::max_traversal_depth`].
pub const MAX_TRAVERSAL_DEPTH_ENV: &str = "TYPEX_MAX_TRAVERSAL_DEPTH";
/// Environment variable overriding [`EngineConfig::parallel_threshold`].
pub const PARALLEL_THRESHOLD_ENV: &str = "TYPEX_PARALLEL_THRESHOLD";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Upper bound on the embedding path length walked during member
    /// resolution. Exceeding it yields `TraversalLimit`.
    pub max_traversal_depth: usize,
    /// Batches at least this large are literalized on the rayon pool.
    pub parallel_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_traversal_depth: 256,
            parallel_threshold: 64,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `TYPEX_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_traversal_depth: env_var_or(MAX_TRAVERSAL_DEPTH_ENV, defaults.max_traversal_depth),
            parallel_threshold: env_var_or(PARALLEL_THRESHOLD_ENV, defaults.parallel_threshold),
        }
    }

    pub fn with_max_traversal_depth(mut self, depth: usize) -> Self {
        self.max_traversal_depth = depth;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }
}
