//! Canonical type-id parser.
//!
//! ```text
//! Type      := Array | Slice | Chan | Func | Interface | Map | Pointer | Struct | Named | Ident
//! Array     := '[' Len ']' Type          Slice   := '[' ']' Type
//! Chan      := ('chan ' | 'chan<- ' | '<-chan ') Type
//! Map       := 'map[' Type ']' Type      Pointer := '*' Type
//! Func      := 'func(' Params ')' Results?
//! Struct    := 'struct {' Field (';' Field)* '}' | 'struct {}'
//! Interface := 'interface {' Method (';' Method)* '}' | 'interface {}'
//! Named     := Path '.' Ident ('[' Type (',' Type)* ']')?
//! Field     := (Ident ' ')? Type (' ' Tag)?
//! ```
//!
//! Every sub-literal goes through [`Parser::parse`], so with a
//! [`LiteralCache`] attached structurally identical sub-trees are shared.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;
use typex_codec::IdentCodec;
use typex_types::{is_identifier, Basic, ChanDir, Error, Result};

use crate::grammar::{bracketed, field_info, separate};
use crate::lit::{FieldLit, FuncLit, LitRef, MethodLit, NamedLit, TypeLit};

/// Interned literals keyed by the id they were parsed from and by their
/// canonical string.
///
/// Thread-safe via internal RwLock. The first literal stored for a canonical
/// string wins and is handed to every later caller.
#[derive(Debug, Default)]
pub struct LiteralCache {
    entries: RwLock<HashMap<String, LitRef>>,
}

impl LiteralCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<LitRef> {
        self.entries.read().get(id).cloned()
    }

    /// Store `lit` under `id` and its canonical string, returning the shared
    /// instance.
    pub fn intern(&self, id: &str, lit: TypeLit) -> LitRef {
        let canonical = lit.to_string();
        let mut entries = self.entries.write();
        let shared = entries
            .entry(canonical)
            .or_insert_with(|| Arc::new(lit))
            .clone();
        if !entries.contains_key(id) {
            entries.insert(id.to_string(), shared.clone());
        }
        shared
    }

    /// Intern an already shared literal.
    pub fn intern_ref(&self, lit: LitRef) -> LitRef {
        let canonical = lit.to_string();
        self.entries.write().entry(canonical).or_insert(lit).clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

/// Parse a canonical id without caching or path decoding.
pub fn parse(id: &str) -> Result<LitRef> {
    Parser::new().parse(id)
}

/// Type-id parser with optional interning and wrapped-path decoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser<'a> {
    cache: Option<&'a LiteralCache>,
    codec: Option<&'a IdentCodec>,
}

impl<'a> Parser<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache(mut self, cache: &'a LiteralCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Decode identifier-token package paths (`xwrap_...`) through `codec`.
    pub fn with_codec(mut self, codec: &'a IdentCodec) -> Self {
        self.codec = Some(codec);
        self
    }

    pub fn parse(&self, id: &str) -> Result<LitRef> {
        let id = id.trim();
        if id.is_empty() {
            return Err(Error::malformed(id, "empty type id"));
        }
        if let Some(hit) = self.cache.and_then(|c| c.get(id)) {
            return Ok(hit);
        }
        trace!(id, "parsing type literal");
        let lit = self.parse_uncached(id)?;
        Ok(match self.cache {
            Some(cache) => cache.intern(id, lit),
            None => Arc::new(lit),
        })
    }

    fn parse_uncached(&self, id: &str) -> Result<TypeLit> {
        if id.starts_with('[') {
            return self.parse_array_or_slice(id);
        }
        if let Some(rest) = id.strip_prefix("map") {
            if rest.starts_with('[') {
                return self.parse_map(id, rest);
            }
        }
        if let Some((dir, elem)) = ChanDir::strip_prefix(id) {
            return self.parse_chan(id, dir, elem);
        }
        if let Some(rest) = id.strip_prefix("func") {
            if rest.starts_with('(') {
                return Ok(TypeLit::Func(self.parse_signature(id, rest)?));
            }
        }
        if let Some(body) = block_body(id, "struct")? {
            return self.parse_struct(id, body);
        }
        if let Some(body) = block_body(id, "interface")? {
            return self.parse_interface(body);
        }
        if let Some(elem) = id.strip_prefix('*') {
            return Ok(TypeLit::Pointer(self.parse(elem)?));
        }
        self.parse_named(id)
    }

    fn parse_array_or_slice(&self, id: &str) -> Result<TypeLit> {
        let b = expect_bracketed(id, '[')?;
        let elem = &id[b.close + 1..];
        if elem.trim().is_empty() {
            return Err(Error::malformed(id, "missing element type"));
        }
        let elem = self.parse(elem)?;
        let len = b.inner.trim();
        if len.is_empty() {
            return Ok(TypeLit::Slice(elem));
        }
        let len = len
            .parse::<u64>()
            .map_err(|e| Error::malformed(id, format!("array length {:?}: {}", len, e)))?;
        Ok(TypeLit::Array { len, elem })
    }

    fn parse_map(&self, id: &str, rest: &str) -> Result<TypeLit> {
        let b = expect_bracketed(rest, '[')?;
        let elem = &rest[b.close + 1..];
        if b.inner.trim().is_empty() || elem.trim().is_empty() {
            return Err(Error::malformed(id, "map needs key and element types"));
        }
        Ok(TypeLit::Map {
            key: self.parse(b.inner)?,
            elem: self.parse(elem)?,
        })
    }

    fn parse_chan(&self, id: &str, dir: ChanDir, elem: &str) -> Result<TypeLit> {
        let mut elem = elem.trim();
        if elem.starts_with('(') {
            let b = expect_bracketed(elem, '(')?;
            if b.close != elem.len() - 1 {
                return Err(Error::malformed(id, "trailing text after channel element"));
            }
            elem = b.inner;
        }
        Ok(TypeLit::Chan {
            dir,
            elem: self.parse(elem)?,
        })
    }

    /// Parse `(params) results` following `func` or a method name.
    fn parse_signature(&self, id: &str, sig: &str) -> Result<FuncLit> {
        let params = expect_bracketed(sig, '(')?;
        if params.open != 0 {
            return Err(Error::malformed(id, "expected '(' to open parameters"));
        }
        let mut func = FuncLit::default();

        let inputs = separate(params.inner, ',')?;
        let last = inputs.len().saturating_sub(1);
        for (i, input) in inputs.iter().enumerate() {
            match input.strip_prefix("...") {
                Some(elem) if i == last => {
                    func.variadic = true;
                    let elem = self.parse(elem)?;
                    func.ins.push(self.share(TypeLit::Slice(elem)));
                }
                Some(_) => return Err(Error::malformed(id, "'...' on a non-final parameter")),
                None => func.ins.push(self.parse(input)?),
            }
        }

        let results = sig[params.close + 1..].trim();
        if results.starts_with('(') {
            let b = expect_bracketed(results, '(')?;
            if b.close != results.len() - 1 {
                return Err(Error::malformed(id, "trailing text after results"));
            }
            for output in separate(b.inner, ',')? {
                func.outs.push(self.parse(output)?);
            }
        } else if !results.is_empty() {
            func.outs.push(self.parse(results)?);
        }
        Ok(func)
    }

    fn parse_struct(&self, id: &str, body: &str) -> Result<TypeLit> {
        let mut fields = Vec::new();
        for entry in separate(body, ';')? {
            let parts = field_info(entry)?;
            let ty = self.parse(parts.ty)?;
            let name = match parts.name {
                Some(name) => name.to_string(),
                None => ty.embedded_name(),
            };
            if !is_identifier(&name) {
                return Err(Error::malformed(id, format!("invalid field name {:?}", name)));
            }
            fields.push(FieldLit {
                name,
                ty,
                tag: parts.tag,
                embedded: parts.embedded,
            });
        }
        Ok(TypeLit::Struct(fields))
    }

    fn parse_interface(&self, body: &str) -> Result<TypeLit> {
        let mut methods = Vec::new();
        for entry in separate(body, ';')? {
            // Embedded constraint elements and unions have no parameter list.
            let Some(open) = entry.find('(') else {
                return Err(Error::unsupported(format!("interface element {:?}", entry)));
            };
            let name = &entry[..open];
            if !is_identifier(name) {
                return Err(Error::unsupported(format!("interface element {:?}", entry)));
            }
            methods.push(MethodLit {
                name: name.to_string(),
                func: self.parse_signature(entry, &entry[open..])?,
            });
        }
        Ok(TypeLit::Interface(methods))
    }

    fn parse_named(&self, id: &str) -> Result<TypeLit> {
        let (base, args) = match bracketed(id, '[')? {
            Some(b) if b.close == id.len() - 1 => (&id[..b.open], Some(b.inner)),
            Some(_) => return Err(Error::malformed(id, "trailing text after type arguments")),
            None => (id, None),
        };

        let Some(dot) = base.rfind('.') else {
            return match args {
                Some(_) => Err(Error::malformed(id, "type arguments on an unqualified name")),
                None => ident_literal(id),
            };
        };
        let (path, name) = (&base[..dot], &base[dot + 1..]);
        if path.is_empty() || !is_identifier(name) {
            return Err(Error::malformed(id, "expected path.Name"));
        }
        let path = match self.codec {
            Some(codec) => codec.unwrap(path)?,
            None => path.to_string(),
        };
        if path == "unsafe" && name == "Pointer" && args.is_none() {
            return Ok(TypeLit::Basic(Basic::UnsafePointer));
        }

        let mut type_args = Vec::new();
        if let Some(args) = args {
            for arg in separate(args, ',')? {
                type_args.push(self.parse(arg)?);
            }
            if type_args.is_empty() {
                return Err(Error::malformed(id, "empty type argument list"));
            }
        }
        Ok(TypeLit::Named(NamedLit {
            pkg_path: path,
            name: name.to_string(),
            type_args,
        }))
    }

    fn share(&self, lit: TypeLit) -> LitRef {
        match self.cache {
            Some(cache) => cache.intern_ref(Arc::new(lit)),
            None => Arc::new(lit),
        }
    }
}

fn ident_literal(id: &str) -> Result<TypeLit> {
    if let Some(b) = Basic::from_name(id) {
        return Ok(TypeLit::Basic(b));
    }
    match id {
        "error" => Ok(TypeLit::Named(NamedLit {
            pkg_path: String::new(),
            name: "error".into(),
            type_args: Vec::new(),
        })),
        "any" => Ok(TypeLit::Interface(Vec::new())),
        "chan" | "map" | "func" | "struct" | "interface" => {
            Err(Error::malformed(id, "type keyword without a body"))
        }
        _ if is_identifier(id) => Err(Error::unsupported(format!(
            "unresolved type parameter {:?}",
            id
        ))),
        _ => Err(Error::malformed(id, "unexpected token")),
    }
}

fn expect_bracketed(id: &str, open: char) -> Result<crate::grammar::Bracketed<'_>> {
    bracketed(id, open)?.ok_or_else(|| Error::malformed(id, format!("expected {:?}", open)))
}

/// Body of a `keyword { ... }` block, or `None` if `id` is not one.
fn block_body<'i>(id: &'i str, keyword: &str) -> Result<Option<&'i str>> {
    let Some(rest) = id.strip_prefix(keyword) else {
        return Ok(None);
    };
    let rest = rest.trim_start();
    if !rest.starts_with('{') {
        return Ok(None);
    }
    let b = expect_bracketed(rest, '{')?;
    if b.close != rest.len() - 1 {
        return Err(Error::malformed(id, format!("trailing text after {} body", keyword)));
    }
    Ok(Some(b.inner))
}
