//! Identity cache reconciling host types into literals.
//!
//! [`TypeCache`] owns every memoization table the engine uses: the
//! identifier codec, the parser's literal cache and the identity map from
//! host types to their literals. Nothing is process-global; tests and
//! embedders construct their own cache and call [`TypeCache::reset`] between
//! runs when they want a clean slate.

use std::collections::HashMap;

use parking_lot::RwLock;
use rayon::prelude::*;
use tracing::{debug, trace};
use typex_codec::IdentCodec;
use typex_host::{FuncView, TypeArgs, View};
use typex_literal::grammar::separate;
use typex_literal::{
    FieldLit, FuncLit, LitRef, LiteralCache, MethodLit, NamedLit, Namer, Parser, Style, TypeLit,
};
use typex_types::Result;

use crate::any::{AnyType, Host};
use crate::config::EngineConfig;
use crate::metrics::{CacheMetrics, MetricsSnapshot};

#[derive(Debug, Default)]
pub struct TypeCache {
    config: EngineConfig,
    codec: IdentCodec,
    literals: LiteralCache,
    identities: RwLock<HashMap<AnyType, LitRef>>,
    metrics: CacheMetrics,
}

impl TypeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// A cache configured from `TYPEX_*` environment variables.
    pub fn from_env() -> Self {
        Self::with_config(EngineConfig::from_env())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn codec(&self) -> &IdentCodec {
        &self.codec
    }

    /// A parser sharing this cache's literal table and codec.
    pub fn parser(&self) -> Parser<'_> {
        Parser::new().with_cache(&self.literals).with_codec(&self.codec)
    }

    /// Parse a canonical or wrapped type id.
    pub fn parse(&self, id: &str) -> Result<LitRef> {
        self.metrics.record_parse();
        self.parser().parse(id)
    }

    /// The literal for a host type, built from its views and memoized by
    /// identity.
    pub fn literalize(&self, t: &AnyType) -> Result<LitRef> {
        match t {
            AnyType::Runtime(t) => self.literal_of(t),
            AnyType::Static(t) => self.literal_of(t),
        }
    }

    /// Literalize a batch, on the rayon pool once it reaches
    /// [`EngineConfig::parallel_threshold`].
    pub fn literalize_all(&self, types: &[AnyType]) -> Result<Vec<LitRef>> {
        if types.len() >= self.config.parallel_threshold {
            debug!(count = types.len(), "literalizing batch in parallel");
            types.par_iter().map(|t| self.literalize(t)).collect()
        } else {
            types.iter().map(|t| self.literalize(t)).collect()
        }
    }

    /// The wrapped id of a host type: package paths replaced by identifier
    /// tokens that [`TypeCache::parse`] decodes again.
    pub fn wrap(&self, t: &AnyType) -> Result<String> {
        Ok(self.literalize(t)?.render(Style::Wrapped(&self.codec)))
    }

    /// The short display form of a host type, qualifying named types with
    /// whatever `namer` calls their package.
    pub fn display(&self, t: &AnyType, namer: &dyn Namer) -> Result<String> {
        Ok(self.literalize(t)?.render(Style::Display(namer)))
    }

    /// Drop every cached literal, codec token and identity, and zero the
    /// metrics.
    pub fn reset(&self) {
        self.identities.write().clear();
        self.literals.clear();
        self.codec.clear();
        self.metrics.reset();
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub(crate) fn record_resolution(&self) {
        self.metrics.record_resolution();
    }

    /// Number of host types with a memoized literal.
    pub fn identity_count(&self) -> usize {
        self.identities.read().len()
    }

    pub(crate) fn literal_of<T: Host>(&self, t: &T) -> Result<LitRef> {
        let key = t.to_any();
        if let Some(hit) = self.identities.read().get(&key) {
            self.metrics.record_identity_hit();
            return Ok(hit.clone());
        }
        self.metrics.record_identity_miss();
        trace!(ty = %t.describe(), "building literal");

        let lit = self.build(t.view()?)?;
        let shared = self.literals.intern_ref(lit);
        Ok(self
            .identities
            .write()
            .entry(key)
            .or_insert(shared)
            .clone())
    }

    fn build<T: Host>(&self, view: View<T>) -> Result<LitRef> {
        let lit = match view {
            View::Basic(b) => TypeLit::Basic(b),
            View::Array { len, elem } => TypeLit::Array {
                len,
                elem: self.literal_of(&elem)?,
            },
            View::Slice(elem) => TypeLit::Slice(self.literal_of(&elem)?),
            View::Map { key, elem } => TypeLit::Map {
                key: self.literal_of(&key)?,
                elem: self.literal_of(&elem)?,
            },
            View::Chan { dir, elem } => TypeLit::Chan {
                dir,
                elem: self.literal_of(&elem)?,
            },
            View::Func(func) => TypeLit::Func(self.func_lit(&func)?),
            View::Struct(fields) => TypeLit::Struct(
                fields
                    .into_iter()
                    .map(|f| {
                        Ok(FieldLit {
                            name: f.name,
                            ty: self.literal_of(&f.ty)?,
                            tag: f.tag,
                            embedded: f.embedded,
                        })
                    })
                    .collect::<Result<_>>()?,
            ),
            View::Interface(methods) => TypeLit::Interface(
                methods
                    .into_iter()
                    .map(|m| {
                        Ok(MethodLit {
                            func: self.func_lit(&m.signature)?,
                            name: m.name,
                        })
                    })
                    .collect::<Result<_>>()?,
            ),
            View::Pointer(elem) => TypeLit::Pointer(self.literal_of(&elem)?),
            // The underlying type is not part of a named type's literal.
            View::Named(named) => {
                let type_args = match named.type_args {
                    TypeArgs::Resolved(args) => args
                        .iter()
                        .map(|a| self.literal_of(a))
                        .collect::<Result<_>>()?,
                    TypeArgs::Printed(text) if text.is_empty() => Vec::new(),
                    TypeArgs::Printed(text) => separate(&text, ',')?
                        .into_iter()
                        .map(|a| self.parse(a))
                        .collect::<Result<_>>()?,
                };
                TypeLit::Named(NamedLit {
                    pkg_path: named.pkg_path,
                    name: named.name,
                    type_args,
                })
            }
        };
        Ok(LitRef::new(lit))
    }

    pub(crate) fn func_lit<T: Host>(&self, func: &FuncView<T>) -> Result<FuncLit> {
        Ok(FuncLit {
            ins: func
                .ins
                .iter()
                .map(|t| self.literal_of(t))
                .collect::<Result<_>>()?,
            outs: func
                .outs
                .iter()
                .map(|t| self.literal_of(t))
                .collect::<Result<_>>()?,
            variadic: func.variadic,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typex_host::{RtField, RuntimeType, StaticField, StaticType};
    use typex_types::Basic;

    fn point_runtime() -> RuntimeType {
        let point = RuntimeType::named("geo/plane", "Point");
        point
            .define(typex_host::RtBody::Struct(vec![
                RtField::new("X", RuntimeType::basic(Basic::Float64)),
                RtField::new("Y", RuntimeType::basic(Basic::Float64)),
            ]))
            .unwrap();
        point
    }

    #[test]
    fn test_literalize_named_and_composites() {
        let cache = TypeCache::new();
        let point = point_runtime();
        let t: AnyType = RuntimeType::map(
            RuntimeType::basic(Basic::String),
            RuntimeType::slice(RuntimeType::pointer(point)),
        )
        .into();

        let lit = cache.literalize(&t).unwrap();
        assert_eq!(lit.to_string(), "map[string][]*geo/plane.Point");
        assert_eq!(cache.wrap(&t).unwrap(), "map[string][]*xwrap_geo_s_plane.Point");
        assert_eq!(cache.display(&t, &typex_literal::DefaultNamer).unwrap(), "map[string][]*plane.Point");
        assert_eq!(cache.parse(&cache.wrap(&t).unwrap()).unwrap(), lit);
    }

    #[test]
    fn test_identity_hits_and_reset() {
        let cache = TypeCache::new();
        let t = AnyType::from_static(StaticType::slice(StaticType::basic(Basic::Int))).unwrap();

        let first = cache.literalize(&t).unwrap();
        let misses = cache.metrics().identity_misses;
        let second = cache.literalize(&t).unwrap();
        assert!(std::sync::Arc::ptr_eq(&first, &second));
        assert_eq!(cache.metrics().identity_misses, misses);
        assert_eq!(cache.metrics().identity_hits, 1);

        cache.reset();
        assert_eq!(cache.identity_count(), 0);
        assert_eq!(cache.metrics(), MetricsSnapshot::default());
    }

    #[test]
    fn test_struct_literal_from_static() {
        let cache = TypeCache::new();
        let t = AnyType::from_static(StaticType::structure(vec![
            StaticField::new("A", StaticType::basic(Basic::String)).with_tag(r#"json:"a""#),
            StaticField::new("B", StaticType::basic(Basic::Int)),
        ]))
        .unwrap();
        assert_eq!(
            cache.literalize(&t).unwrap().to_string(),
            r#"struct { A string "json:\"a\""; B int }"#
        );
    }

    #[test]
    fn test_literalize_all_parallel() {
        let cache = TypeCache::with_config(EngineConfig::default().with_parallel_threshold(2));
        let types: Vec<AnyType> = Basic::ALL
            .iter()
            .map(|b| RuntimeType::basic(*b).into())
            .collect();
        let lits = cache.literalize_all(&types).unwrap();
        assert_eq!(lits.len(), types.len());
        for (lit, b) in lits.iter().zip(Basic::ALL.iter()) {
            assert_eq!(lit.to_string(), b.name());
        }
    }
}
