//! Environment variable parsing utilities.
//!
//! # Example
//!
//! ```
//! use typex_types::env_utils::{env_var, env_var_or};
//!
//! // Parse with default value
//! let depth: usize = env_var_or("TYPEX_MAX_TRAVERSAL_DEPTH", 256);
//!
//! // Parse returning Option
//! let custom: Option<usize> = env_var("TYPEX_PARALLEL_THRESHOLD");
//! ```

use std::str::FromStr;

/// Parse an environment variable into a type that implements `FromStr`.
///
/// Returns `None` if the variable is not set or cannot be parsed.
pub fn env_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Parse an environment variable with a default value.
///
/// Returns the default if the variable is not set or cannot be parsed.
pub fn env_var_or<T: FromStr>(key: &str, default: T) -> T {
    env_var(key).unwrap_or(default)
}
