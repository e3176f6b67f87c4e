//! The type-literal tree.
//!
//! A [`TypeLit`] is the structural form of a fully resolved type id. Trees are
//! immutable and shared through [`LitRef`]; two literals are equal exactly
//! when their canonical strings are equal.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use typex_types::{Basic, ChanDir, Kind};

use crate::print::Style;

pub type LitRef = Arc<TypeLit>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeLit {
    Basic(Basic),
    Array { len: u64, elem: LitRef },
    Slice(LitRef),
    Map { key: LitRef, elem: LitRef },
    Chan { dir: ChanDir, elem: LitRef },
    Func(FuncLit),
    Struct(Vec<FieldLit>),
    Interface(Vec<MethodLit>),
    Pointer(LitRef),
    Named(NamedLit),
}

/// A function signature.
///
/// When `variadic` is set the last input is a [`TypeLit::Slice`] of the
/// ellipsis element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FuncLit {
    pub ins: Vec<LitRef>,
    pub outs: Vec<LitRef>,
    pub variadic: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodLit {
    pub name: String,
    pub func: FuncLit,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldLit {
    /// Declared name; for embedded fields the unqualified name of the
    /// embedded type.
    pub name: String,
    pub ty: LitRef,
    pub tag: String,
    pub embedded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedLit {
    /// Empty for predeclared names such as `error`.
    pub pkg_path: String,
    pub name: String,
    pub type_args: Vec<LitRef>,
}

impl FieldLit {
    /// An embedded field promoted under its type's unqualified name.
    pub fn embedded(ty: LitRef) -> Self {
        FieldLit {
            name: ty.embedded_name(),
            ty,
            tag: String::new(),
            embedded: true,
        }
    }

    pub fn named(name: impl Into<String>, ty: LitRef) -> Self {
        FieldLit {
            name: name.into(),
            ty,
            tag: String::new(),
            embedded: false,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }
}

impl TypeLit {
    pub fn basic(b: Basic) -> LitRef {
        Arc::new(TypeLit::Basic(b))
    }

    /// The predeclared `error` interface type.
    pub fn error() -> LitRef {
        Arc::new(TypeLit::Named(NamedLit {
            pkg_path: String::new(),
            name: "error".into(),
            type_args: Vec::new(),
        }))
    }

    /// `any`, the empty interface.
    pub fn any() -> LitRef {
        Arc::new(TypeLit::Interface(Vec::new()))
    }

    pub fn named(pkg_path: impl Into<String>, name: impl Into<String>, type_args: Vec<LitRef>) -> LitRef {
        Arc::new(TypeLit::Named(NamedLit {
            pkg_path: pkg_path.into(),
            name: name.into(),
            type_args,
        }))
    }

    pub fn pointer(elem: LitRef) -> LitRef {
        Arc::new(TypeLit::Pointer(elem))
    }

    pub fn slice(elem: LitRef) -> LitRef {
        Arc::new(TypeLit::Slice(elem))
    }

    pub fn kind(&self) -> Kind {
        match self {
            TypeLit::Basic(b) => Kind::Basic(*b),
            TypeLit::Array { .. } => Kind::Array,
            TypeLit::Slice(_) => Kind::Slice,
            TypeLit::Map { .. } => Kind::Map,
            TypeLit::Chan { .. } => Kind::Chan,
            TypeLit::Func(_) => Kind::Func,
            TypeLit::Struct(_) => Kind::Struct,
            TypeLit::Interface(_) => Kind::Interface,
            TypeLit::Pointer(_) => Kind::Pointer,
            TypeLit::Named(_) => Kind::Named,
        }
    }

    /// Owning package path; empty for unnamed and predeclared types.
    pub fn pkg_path(&self) -> &str {
        match self {
            TypeLit::Named(n) => &n.pkg_path,
            _ => "",
        }
    }

    /// Declared name. Instantiated generics include their arguments
    /// (`Pair[int,string]`); unnamed composite types have no name.
    pub fn name(&self) -> String {
        match self {
            TypeLit::Basic(b) => b.name().to_string(),
            TypeLit::Named(n) if n.type_args.is_empty() => n.name.clone(),
            TypeLit::Named(n) => {
                let args: Vec<String> = n.type_args.iter().map(|a| a.to_string()).collect();
                format!("{}[{}]", n.name, args.join(","))
            }
            _ => String::new(),
        }
    }

    /// The name a field embedding this type is promoted under.
    pub fn embedded_name(&self) -> String {
        match self.indirect() {
            TypeLit::Named(n) => n.name.clone(),
            TypeLit::Basic(Basic::UnsafePointer) => "Pointer".into(),
            other => {
                let s = other.to_string();
                match s.find('[') {
                    Some(idx) => s[..idx].to_string(),
                    None => s,
                }
            }
        }
    }

    /// The pointee of a pointer, or `self`.
    pub fn indirect(&self) -> &TypeLit {
        match self {
            TypeLit::Pointer(elem) => &**elem,
            other => other,
        }
    }

    pub fn elem(&self) -> Option<&LitRef> {
        match self {
            TypeLit::Array { elem, .. }
            | TypeLit::Slice(elem)
            | TypeLit::Map { elem, .. }
            | TypeLit::Chan { elem, .. }
            | TypeLit::Pointer(elem) => Some(elem),
            _ => None,
        }
    }

    pub fn key(&self) -> Option<&LitRef> {
        match self {
            TypeLit::Map { key, .. } => Some(key),
            _ => None,
        }
    }

    pub fn len(&self) -> Option<u64> {
        match self {
            TypeLit::Array { len, .. } => Some(*len),
            _ => None,
        }
    }

    pub fn chan_dir(&self) -> Option<ChanDir> {
        match self {
            TypeLit::Chan { dir, .. } => Some(*dir),
            _ => None,
        }
    }

    pub fn fields(&self) -> &[FieldLit] {
        match self {
            TypeLit::Struct(fields) => fields,
            _ => &[],
        }
    }

    pub fn methods(&self) -> &[MethodLit] {
        match self {
            TypeLit::Interface(methods) => methods,
            _ => &[],
        }
    }

    pub fn type_args(&self) -> &[LitRef] {
        match self {
            TypeLit::Named(n) => &n.type_args,
            _ => &[],
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, TypeLit::Named(n) if n.pkg_path.is_empty() && n.name == "error")
    }

    /// Render with the given printing style.
    pub fn render(&self, style: Style<'_>) -> String {
        let mut out = String::new();
        style.write(&mut out, self);
        out
    }
}

impl fmt::Display for TypeLit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(Style::Canonical))
    }
}

impl Serialize for TypeLit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TypeLit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = String::deserialize(deserializer)?;
        let lit = crate::parse::parse(&id).map_err(serde::de::Error::custom)?;
        Ok(Arc::unwrap_or_clone(lit))
    }
}
