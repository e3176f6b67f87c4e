//! Static (source-analysis) type model.
//!
//! Mirrors what a type checker produces: named types are declarations
//! ([`NamedDecl`]) shared by reference, generic declarations carry a skeleton
//! underlying type with [`StaticType::Param`] placeholders, and an
//! instantiation is a declaration plus resolved type arguments.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use typex_types::{Basic, ChanDir, Error, Result};

use crate::instantiate::{substitute, substitute_signature};
use crate::view::{FieldView, FuncView, MethodView, NamedView, Reflect, TypeArgs, View};

#[derive(Clone, PartialEq, Eq, Hash)]
pub enum StaticType {
    Basic(Basic),
    Array { len: u64, elem: Arc<StaticType> },
    Slice(Arc<StaticType>),
    Map { key: Arc<StaticType>, elem: Arc<StaticType> },
    Chan { dir: ChanDir, elem: Arc<StaticType> },
    Signature(Arc<Signature>),
    Struct(Arc<[StaticField]>),
    Interface(Arc<[StaticMethod]>),
    Pointer(Arc<StaticType>),
    Named(Named),
    /// Free type parameter of an enclosing generic declaration.
    Param(TypeParam),
    /// Multi-value result list.
    Tuple(Arc<[StaticType]>),
    /// Type-constraint union.
    Union(Arc<[StaticType]>),
}

/// A signature. When `variadic` is set the last param is a slice type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Signature {
    pub params: Vec<StaticType>,
    pub results: Vec<StaticType>,
    pub variadic: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StaticField {
    pub name: String,
    pub ty: StaticType,
    pub tag: String,
    pub embedded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StaticMethod {
    pub name: String,
    pub signature: Arc<Signature>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeParam {
    pub index: usize,
    pub name: String,
}

/// A reference to a declared type, instantiated when `args` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Named {
    pub decl: Arc<NamedDecl>,
    pub args: Arc<[StaticType]>,
}

#[derive(Debug, Clone)]
pub struct DeclaredMethod {
    pub name: String,
    pub signature: Arc<Signature>,
    pub pointer_receiver: bool,
}

/// A type declaration.
///
/// Declarations are created first and defined afterwards so that
/// self-referential and mutually recursive types can be expressed. Identity
/// is nominal: two declarations are the same type when package path and name
/// agree.
pub struct NamedDecl {
    pkg_path: String,
    name: String,
    type_params: Vec<String>,
    underlying: OnceLock<StaticType>,
    methods: RwLock<Vec<DeclaredMethod>>,
}

impl NamedDecl {
    pub fn new(
        pkg_path: impl Into<String>,
        name: impl Into<String>,
        type_params: Vec<String>,
    ) -> Arc<Self> {
        Arc::new(NamedDecl {
            pkg_path: pkg_path.into(),
            name: name.into(),
            type_params,
            underlying: OnceLock::new(),
            methods: RwLock::new(Vec::new()),
        })
    }

    pub fn pkg_path(&self) -> &str {
        &self.pkg_path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_params(&self) -> &[String] {
        &self.type_params
    }

    pub fn arity(&self) -> usize {
        self.type_params.len()
    }

    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }

    pub fn qualified_name(&self) -> String {
        if self.pkg_path.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.pkg_path, self.name)
        }
    }

    /// Set the underlying type. Generic declarations use
    /// [`StaticType::Param`] placeholders indexed by type parameter position.
    pub fn define(&self, underlying: StaticType) -> Result<()> {
        if matches!(underlying, StaticType::Named(_)) {
            return Err(Error::unsupported(format!(
                "{}: underlying type must not be a named type",
                self.qualified_name()
            )));
        }
        self.underlying
            .set(underlying)
            .map_err(|_| Error::Redefined(self.qualified_name()))
    }

    pub fn is_defined(&self) -> bool {
        self.underlying.get().is_some()
    }

    /// The uninstantiated underlying type.
    pub fn underlying(&self) -> Result<&StaticType> {
        self.underlying
            .get()
            .ok_or_else(|| Error::lookup(&self.pkg_path, &self.name, "declared but never defined"))
    }

    pub fn add_method(&self, name: impl Into<String>, signature: Signature, pointer_receiver: bool) {
        self.methods.write().push(DeclaredMethod {
            name: name.into(),
            signature: Arc::new(signature),
            pointer_receiver,
        });
    }

    pub fn methods(&self) -> Vec<DeclaredMethod> {
        self.methods.read().clone()
    }
}

impl PartialEq for NamedDecl {
    fn eq(&self, other: &Self) -> bool {
        self.pkg_path == other.pkg_path && self.name == other.name
    }
}

impl Eq for NamedDecl {}

impl Hash for NamedDecl {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pkg_path.hash(state);
        self.name.hash(state);
    }
}

impl fmt::Debug for NamedDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NamedDecl({})", self.qualified_name())?;
        if self.is_generic() {
            write!(f, "[{}]", self.type_params.join(", "))?;
        }
        Ok(())
    }
}

/// The predeclared `error` declaration.
pub fn universe_error() -> Arc<NamedDecl> {
    static ERROR: OnceLock<Arc<NamedDecl>> = OnceLock::new();
    ERROR
        .get_or_init(|| {
            let decl = NamedDecl::new("", "error", Vec::new());
            let method = StaticMethod {
                name: "Error".into(),
                signature: Arc::new(Signature {
                    params: Vec::new(),
                    results: vec![StaticType::Basic(Basic::String)],
                    variadic: false,
                }),
            };
            // A fresh declaration cannot already be defined.
            let _ = decl.define(StaticType::Interface(Arc::from(vec![method])));
            decl
        })
        .clone()
}

impl StaticType {
    pub fn basic(b: Basic) -> Self {
        StaticType::Basic(b)
    }

    pub fn array(len: u64, elem: StaticType) -> Self {
        StaticType::Array {
            len,
            elem: Arc::new(elem),
        }
    }

    pub fn slice(elem: StaticType) -> Self {
        StaticType::Slice(Arc::new(elem))
    }

    pub fn map(key: StaticType, elem: StaticType) -> Self {
        StaticType::Map {
            key: Arc::new(key),
            elem: Arc::new(elem),
        }
    }

    pub fn chan(dir: ChanDir, elem: StaticType) -> Self {
        StaticType::Chan {
            dir,
            elem: Arc::new(elem),
        }
    }

    pub fn pointer(elem: StaticType) -> Self {
        StaticType::Pointer(Arc::new(elem))
    }

    pub fn func(params: Vec<StaticType>, results: Vec<StaticType>, variadic: bool) -> Self {
        StaticType::Signature(Arc::new(Signature {
            params,
            results,
            variadic,
        }))
    }

    pub fn structure(fields: Vec<StaticField>) -> Self {
        StaticType::Struct(Arc::from(fields))
    }

    pub fn interface(methods: Vec<StaticMethod>) -> Self {
        StaticType::Interface(Arc::from(methods))
    }

    pub fn param(index: usize, name: impl Into<String>) -> Self {
        StaticType::Param(TypeParam {
            index,
            name: name.into(),
        })
    }

    /// A reference to `decl` without type arguments.
    ///
    /// Inside a generic skeleton this is the declaration's origin form; it
    /// receives the enclosing type arguments on instantiation.
    pub fn named(decl: &Arc<NamedDecl>) -> Self {
        StaticType::Named(Named {
            decl: decl.clone(),
            args: Arc::from(Vec::new()),
        })
    }

    pub fn error() -> Self {
        StaticType::named(&universe_error())
    }

    /// Generic reference with explicit arguments, unchecked. Use
    /// [`crate::instantiate`] for an arity-checked instantiation.
    pub fn generic(decl: &Arc<NamedDecl>, args: Vec<StaticType>) -> Self {
        StaticType::Named(Named {
            decl: decl.clone(),
            args: Arc::from(args),
        })
    }

    pub fn as_named(&self) -> Option<&Named> {
        match self {
            StaticType::Named(n) => Some(n),
            _ => None,
        }
    }

    /// Reject the categories that have no literal form.
    pub fn ensure_concrete(&self) -> Result<()> {
        match self {
            StaticType::Param(p) => Err(Error::unsupported(format!("type parameter {}", p.name))),
            StaticType::Tuple(_) => Err(Error::unsupported("result tuple")),
            StaticType::Union(_) => Err(Error::unsupported("constraint union")),
            StaticType::Named(n) if n.decl.is_generic() && n.args.is_empty() => Err(
                Error::unsupported(format!("uninstantiated generic {}", n.decl.qualified_name())),
            ),
            _ => Ok(()),
        }
    }
}

impl StaticField {
    pub fn new(name: impl Into<String>, ty: StaticType) -> Self {
        StaticField {
            name: name.into(),
            ty,
            tag: String::new(),
            embedded: false,
        }
    }

    /// An embedded field, named after the (pointed-to) declaration.
    pub fn embedded(ty: StaticType) -> Result<Self> {
        let target = match &ty {
            StaticType::Pointer(elem) => &**elem,
            other => other,
        };
        let name = match target {
            StaticType::Named(n) => n.decl.name().to_string(),
            StaticType::Basic(b) => b.name().to_string(),
            other => {
                return Err(Error::unsupported(format!(
                    "embedded field of type {:?}",
                    other
                )))
            }
        };
        Ok(StaticField {
            name,
            ty,
            tag: String::new(),
            embedded: true,
        })
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }
}

impl StaticMethod {
    pub fn new(name: impl Into<String>, signature: Signature) -> Self {
        StaticMethod {
            name: name.into(),
            signature: Arc::new(signature),
        }
    }
}

impl fmt::Debug for StaticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaticType::Basic(b) => write!(f, "{}", b),
            StaticType::Array { len, elem } => write!(f, "[{}]{:?}", len, elem),
            StaticType::Slice(elem) => write!(f, "[]{:?}", elem),
            StaticType::Map { key, elem } => write!(f, "map[{:?}]{:?}", key, elem),
            StaticType::Chan { dir, elem } => write!(f, "{}{:?}", dir.prefix(), elem),
            StaticType::Signature(sig) => write!(f, "func{:?}->{:?}", sig.params, sig.results),
            StaticType::Struct(fields) => {
                let names: Vec<&str> = fields.iter().map(|x| x.name.as_str()).collect();
                write!(f, "struct{{{}}}", names.join("; "))
            }
            StaticType::Interface(methods) => {
                let names: Vec<&str> = methods.iter().map(|m| m.name.as_str()).collect();
                write!(f, "interface{{{}}}", names.join("; "))
            }
            StaticType::Pointer(elem) => write!(f, "*{:?}", elem),
            StaticType::Named(n) if n.args.is_empty() => f.write_str(&n.decl.qualified_name()),
            StaticType::Named(n) => write!(f, "{}{:?}", n.decl.qualified_name(), n.args),
            StaticType::Param(p) => write!(f, "${}:{}", p.index, p.name),
            StaticType::Tuple(items) => write!(f, "tuple{:?}", items),
            StaticType::Union(items) => write!(f, "union{:?}", items),
        }
    }
}

fn func_view(sig: &Signature) -> FuncView<StaticType> {
    FuncView {
        ins: sig.params.clone(),
        outs: sig.results.clone(),
        variadic: sig.variadic,
    }
}

impl Reflect for StaticType {
    fn view(&self) -> Result<View<Self>> {
        Ok(match self {
            StaticType::Basic(b) => View::Basic(*b),
            StaticType::Array { len, elem } => View::Array {
                len: *len,
                elem: (**elem).clone(),
            },
            StaticType::Slice(elem) => View::Slice((**elem).clone()),
            StaticType::Map { key, elem } => View::Map {
                key: (**key).clone(),
                elem: (**elem).clone(),
            },
            StaticType::Chan { dir, elem } => View::Chan {
                dir: *dir,
                elem: (**elem).clone(),
            },
            StaticType::Signature(sig) => View::Func(func_view(sig)),
            StaticType::Struct(fields) => View::Struct(
                fields
                    .iter()
                    .map(|f| FieldView {
                        name: f.name.clone(),
                        ty: f.ty.clone(),
                        tag: f.tag.clone(),
                        embedded: f.embedded,
                    })
                    .collect(),
            ),
            StaticType::Interface(methods) => View::Interface(
                methods
                    .iter()
                    .map(|m| MethodView {
                        name: m.name.clone(),
                        signature: func_view(&m.signature),
                        pointer_receiver: false,
                    })
                    .collect(),
            ),
            StaticType::Pointer(elem) => View::Pointer((**elem).clone()),
            StaticType::Named(named) => View::Named(named_view(named)?),
            StaticType::Param(p) => {
                return Err(Error::unsupported(format!("type parameter {}", p.name)))
            }
            StaticType::Tuple(_) => return Err(Error::unsupported("result tuple")),
            StaticType::Union(_) => return Err(Error::unsupported("constraint union")),
        })
    }

    fn describe(&self) -> String {
        format!("{:?}", self)
    }
}

fn named_view(named: &Named) -> Result<NamedView<StaticType>> {
    let decl = &named.decl;
    if decl.is_generic() && named.args.is_empty() {
        return Err(Error::unsupported(format!(
            "uninstantiated generic {}",
            decl.qualified_name()
        )));
    }
    if named.args.len() != decl.arity() {
        return Err(Error::arity(decl.qualified_name(), decl.arity(), named.args.len()));
    }
    let underlying = substitute(decl.underlying()?, &named.args)?;
    let methods = decl
        .methods()
        .into_iter()
        .map(|m| {
            let sig = substitute_signature(&m.signature, &named.args)?;
            Ok(MethodView {
                name: m.name,
                signature: func_view(&sig),
                pointer_receiver: m.pointer_receiver,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(NamedView {
        pkg_path: decl.pkg_path().to_string(),
        name: decl.name().to_string(),
        type_args: TypeArgs::Resolved(named.args.to_vec()),
        underlying,
        methods,
    })
}
