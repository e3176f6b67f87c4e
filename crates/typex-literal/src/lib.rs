//! Canonical type-literal grammar.
//!
//! Both host type representations print types into the same textual grammar;
//! this crate parses that text into a [`TypeLit`] tree and renders it back.
//!
//! ## Modules
//!
//! - [`lit`] - the literal tree and its accessors
//! - [`parse`] - [`Parser`] and the interning [`LiteralCache`]
//! - [`print`] - canonical, wrapped and display renderings
//! - [`grammar`] - bracket matching, separator splitting, struct field entries
//! - [`quote`] - struct tag quoting
//!
//! # Example
//!
//! ```
//! use typex_literal::{parse, DefaultNamer, Style};
//!
//! let lit = parse("map[string]*encoding/json.Decoder").unwrap();
//! assert_eq!(lit.to_string(), "map[string]*encoding/json.Decoder");
//! assert_eq!(lit.render(Style::Display(&DefaultNamer)), "map[string]*json.Decoder");
//! ```

pub mod grammar;
pub mod lit;
pub mod parse;
pub mod print;
pub mod quote;

pub use lit::{FieldLit, FuncLit, LitRef, MethodLit, NamedLit, TypeLit};
pub use parse::{parse, LiteralCache, Parser};
pub use print::{default_package_name, DefaultNamer, Namer, Style};
