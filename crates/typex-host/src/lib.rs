//! Host type models.
//!
//! The host language exposes two unrelated representations of a type: what
//! runtime reflection reports ([`RuntimeType`]) and what static analysis
//! produces ([`StaticType`]). Both implement the sealed [`Reflect`] trait,
//! the one-level view the reconciliation engine walks.
//!
//! This crate also owns:
//! - [`Loader`] / [`MemoryLoader`] - package lookup by path
//! - [`instantiate`] / [`substitute`] - generic instantiation over static skeletons
//! - [`static_from_literal`] - rebuilding a static type from a canonical literal

pub mod convert;
pub mod instantiate;
pub mod loader;
pub mod runtime;
pub mod statics;
pub mod view;

pub use convert::{signature_from_literal, static_from_literal};
pub use instantiate::{instantiate, substitute, substitute_signature, underlying};
pub use loader::{lookup_named, Loader, MemoryLoader, Package};
pub use runtime::{RtBody, RtField, RtFunc, RtInterfaceMethod, RtMethod, RuntimeType};
pub use statics::{
    universe_error, DeclaredMethod, Named, NamedDecl, Signature, StaticField, StaticMethod,
    StaticType, TypeParam,
};
pub use view::{is_interface, FieldView, FuncView, MethodView, NamedView, Reflect, TypeArgs, View};
