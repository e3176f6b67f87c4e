//! Generic instantiation.
//!
//! A generic declaration's underlying type is a skeleton in which every use
//! of a type parameter is a [`StaticType::Param`] addressed by position.
//! [`substitute`] rebuilds the skeleton with concrete arguments. Named
//! references inside the skeleton only have their arguments substituted, they
//! are never expanded, so recursive generic types terminate.

use std::sync::Arc;

use tracing::trace;
use typex_types::{Error, Result};

use crate::statics::{Named, NamedDecl, Signature, StaticField, StaticMethod, StaticType};

/// Instantiate `decl` with `args`, checking the argument count.
pub fn instantiate(decl: &Arc<NamedDecl>, args: Vec<StaticType>) -> Result<StaticType> {
    if args.len() != decl.arity() {
        return Err(Error::arity(decl.qualified_name(), decl.arity(), args.len()));
    }
    trace!(decl = %decl.qualified_name(), params = ?decl.type_params(), "instantiating");
    Ok(StaticType::generic(decl, args))
}

/// The underlying type of `t`, instantiated when `t` is a generic instance.
pub fn underlying(t: &StaticType) -> Result<StaticType> {
    match t {
        StaticType::Named(named) => {
            let decl = &named.decl;
            if named.args.len() != decl.arity() {
                return Err(Error::arity(decl.qualified_name(), decl.arity(), named.args.len()));
            }
            substitute(decl.underlying()?, &named.args)
        }
        other => Ok(other.clone()),
    }
}

/// Replace every placeholder in `skeleton` by the argument at its index.
pub fn substitute(skeleton: &StaticType, args: &[StaticType]) -> Result<StaticType> {
    if args.is_empty() {
        return Ok(skeleton.clone());
    }
    Ok(match skeleton {
        StaticType::Basic(_) => skeleton.clone(),
        StaticType::Array { len, elem } => StaticType::Array {
            len: *len,
            elem: Arc::new(substitute(elem, args)?),
        },
        StaticType::Slice(elem) => StaticType::Slice(Arc::new(substitute(elem, args)?)),
        StaticType::Pointer(elem) => StaticType::Pointer(Arc::new(substitute(elem, args)?)),
        StaticType::Chan { dir, elem } => StaticType::Chan {
            dir: *dir,
            elem: Arc::new(substitute(elem, args)?),
        },
        StaticType::Map { key, elem } => StaticType::Map {
            key: Arc::new(substitute(key, args)?),
            elem: Arc::new(substitute(elem, args)?),
        },
        StaticType::Signature(sig) => StaticType::Signature(Arc::new(substitute_signature(sig, args)?)),
        StaticType::Struct(fields) => StaticType::Struct(
            fields
                .iter()
                .map(|f| {
                    Ok(StaticField {
                        ty: substitute(&f.ty, args)?,
                        ..f.clone()
                    })
                })
                .collect::<Result<Vec<_>>>()?
                .into(),
        ),
        StaticType::Interface(methods) => StaticType::Interface(
            methods
                .iter()
                .map(|m| {
                    Ok(StaticMethod {
                        name: m.name.clone(),
                        signature: Arc::new(substitute_signature(&m.signature, args)?),
                    })
                })
                .collect::<Result<Vec<_>>>()?
                .into(),
        ),
        StaticType::Param(p) => args.get(p.index).cloned().ok_or_else(|| {
            Error::arity(format!("type parameter {}", p.name), p.index + 1, args.len())
        })?,
        StaticType::Named(named) => substitute_named(named, args)?,
        StaticType::Tuple(items) => StaticType::Tuple(substitute_all(items, args)?.into()),
        StaticType::Union(items) => StaticType::Union(substitute_all(items, args)?.into()),
    })
}

/// Substitute inside a named reference found in a skeleton.
///
/// - a non-generic declaration is left alone
/// - a generic with bound arguments gets each argument substituted (the
///   arguments may themselves mention outer placeholders)
/// - a generic with no bound arguments receives the outer arguments as-is
fn substitute_named(named: &Named, args: &[StaticType]) -> Result<StaticType> {
    let decl = &named.decl;
    if !decl.is_generic() {
        return Ok(StaticType::Named(named.clone()));
    }
    if !named.args.is_empty() {
        if named.args.len() != decl.arity() {
            return Err(Error::arity(decl.qualified_name(), decl.arity(), named.args.len()));
        }
        trace!(decl = %decl.qualified_name(), "substituting bound type arguments");
        let inner = substitute_all(&named.args, args)?;
        return Ok(StaticType::generic(decl, inner));
    }
    if args.len() != decl.arity() {
        return Err(Error::arity(decl.qualified_name(), decl.arity(), args.len()));
    }
    Ok(StaticType::generic(decl, args.to_vec()))
}

pub fn substitute_signature(sig: &Signature, args: &[StaticType]) -> Result<Signature> {
    Ok(Signature {
        params: substitute_all(&sig.params, args)?,
        results: substitute_all(&sig.results, args)?,
        variadic: sig.variadic,
    })
}

fn substitute_all(items: &[StaticType], args: &[StaticType]) -> Result<Vec<StaticType>> {
    items.iter().map(|t| substitute(t, args)).collect()
}
