//! Literal to static type conversion.

use typex_literal::{FuncLit, TypeLit};
use typex_types::{Error, Result};

use crate::instantiate::instantiate;
use crate::loader::{lookup_named, Loader};
use crate::statics::{Signature, StaticField, StaticMethod, StaticType};

/// Rebuild a static type from its literal, resolving every named type
/// through `loader` and checking instantiation arity.
pub fn static_from_literal(lit: &TypeLit, loader: &dyn Loader) -> Result<StaticType> {
    Ok(match lit {
        TypeLit::Basic(b) => StaticType::basic(*b),
        TypeLit::Array { len, elem } => StaticType::array(*len, static_from_literal(elem, loader)?),
        TypeLit::Slice(elem) => StaticType::slice(static_from_literal(elem, loader)?),
        TypeLit::Map { key, elem } => StaticType::map(
            static_from_literal(key, loader)?,
            static_from_literal(elem, loader)?,
        ),
        TypeLit::Chan { dir, elem } => StaticType::chan(*dir, static_from_literal(elem, loader)?),
        TypeLit::Pointer(elem) => StaticType::pointer(static_from_literal(elem, loader)?),
        TypeLit::Func(func) => StaticType::Signature(signature_from_literal(func, loader)?.into()),
        TypeLit::Struct(fields) => StaticType::structure(
            fields
                .iter()
                .map(|f| {
                    Ok(StaticField {
                        name: f.name.clone(),
                        ty: static_from_literal(&f.ty, loader)?,
                        tag: f.tag.clone(),
                        embedded: f.embedded,
                    })
                })
                .collect::<Result<_>>()?,
        ),
        TypeLit::Interface(methods) => StaticType::interface(
            methods
                .iter()
                .map(|m| Ok(StaticMethod::new(m.name.clone(), signature_from_literal(&m.func, loader)?)))
                .collect::<Result<_>>()?,
        ),
        TypeLit::Named(named) => {
            let decl = lookup_named(loader, &named.pkg_path, &named.name)?;
            let args = named
                .type_args
                .iter()
                .map(|a| static_from_literal(a, loader))
                .collect::<Result<Vec<_>>>()?;
            if decl.is_generic() {
                instantiate(&decl, args)?
            } else if !args.is_empty() {
                return Err(Error::arity(decl.qualified_name(), 0, args.len()));
            } else {
                StaticType::named(&decl)
            }
        }
    })
}

pub fn signature_from_literal(func: &FuncLit, loader: &dyn Loader) -> Result<Signature> {
    let convert = |items: &[typex_literal::LitRef]| {
        items
            .iter()
            .map(|t| static_from_literal(t, loader))
            .collect::<Result<Vec<_>>>()
    };
    Ok(Signature {
        params: convert(&func.ins)?,
        results: convert(&func.outs)?,
        variadic: func.variadic,
    })
}
