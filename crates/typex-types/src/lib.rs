//! Shared types for the typex workspace.
//!
//! This crate holds the leaf vocabulary every other crate speaks:
//! - [`Error`] / [`Result`] - the error taxonomy
//! - [`Basic`], [`ChanDir`], [`Kind`] - predeclared types and structural kinds
//! - [`ident`] - identifier and visibility predicates
//! - [`env_utils`] - environment variable parsing for configuration

pub mod basic;
pub mod env_utils;
pub mod error;
pub mod ident;

pub use basic::{Basic, ChanDir, Kind};
pub use error::{Error, Result};
pub use ident::{is_exported, is_identifier};
