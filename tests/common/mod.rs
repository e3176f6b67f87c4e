#![allow(unused_imports, dead_code)]
//! Shared test utilities for integration tests.
//!
//! # Modules
//!
//! - `fixtures`: the `structure` package (stringer suite, embedding cycles,
//!   generic declarations)
//! - `mirror`: runtime-model counterparts of static fixture types
//! - `assertions`: assertion helpers with readable failure messages

pub mod assertions;
pub mod fixtures;
pub mod mirror;

pub use assertions::{assert_error_contains, assert_ok, method_names};
pub use fixtures::{structure, Structure, PKG};
pub use mirror::Mirror;
