//! Type-literal reconciliation.
//!
//! The host language describes a type in two unrelated ways: as a runtime
//! reflection type and as a static-analysis type. `typex` reduces both to one
//! canonical literal grammar so they can be compared, printed, cached and
//! resolved the same way:
//!
//! - **Literals**: parse and render canonical, wrapped and display ids
//!   ([`typex_literal`])
//! - **Identifier codec**: package paths as plain identifier tokens
//!   ([`typex_codec`])
//! - **Host models**: runtime and static types, package loading and generic
//!   instantiation ([`typex_host`])
//! - **Reconciliation**: [`TypeCache`] turns either host type into a literal
//!   and resolves promoted methods and fields
//!
//! # Example
//!
//! ```
//! use typex::{AnyType, TypeCache};
//! use typex::host::RuntimeType;
//! use typex::types::Basic;
//!
//! let cache = TypeCache::new();
//! let t: AnyType = RuntimeType::slice(RuntimeType::basic(Basic::Uint8)).into();
//! assert_eq!(cache.literalize(&t).unwrap(), cache.parse("[]byte").unwrap());
//! ```

pub mod any;
pub mod cache;
pub mod config;
mod field;
mod inspect;
pub mod members;
pub mod metrics;
mod walker;

pub use any::AnyType;
pub use cache::TypeCache;
pub use config::EngineConfig;
pub use members::{FieldInfo, MethodInfo};
pub use metrics::{CacheMetrics, MetricsSnapshot};

pub use typex_codec as codec;
pub use typex_host as host;
pub use typex_literal as literal;
pub use typex_types as types;

pub use typex_codec::IdentCodec;
pub use typex_host::{Loader, MemoryLoader, Package, Reflect, RuntimeType, StaticType};
pub use typex_literal::{LitRef, Namer, Style, TypeLit};
pub use typex_types::{Error, Result};
