//! Runtime (reflection) type model.
//!
//! Mirrors what inspecting live values yields: every type is a node, named
//! nodes carry a printed name and a method table, and an instantiated generic
//! type only records its type arguments as text inside its printed name
//! (`Box[int]`). The node body is set once, after creation, so that
//! self-referential types can be built.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use typex_types::{Basic, ChanDir, Error, Result};

use crate::view::{FieldView, FuncView, MethodView, NamedView, Reflect, TypeArgs, View};

#[derive(Clone)]
pub struct RuntimeType(Arc<Node>);

struct Node {
    name: Option<RtName>,
    body: OnceLock<RtBody>,
}

struct RtName {
    pkg_path: String,
    /// Printed name, including instantiation arguments.
    name: String,
    methods: RwLock<Vec<RtMethod>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RtBody {
    Basic(Basic),
    Array { len: u64, elem: RuntimeType },
    Slice(RuntimeType),
    Map { key: RuntimeType, elem: RuntimeType },
    Chan { dir: ChanDir, elem: RuntimeType },
    Func(RtFunc),
    Struct(Vec<RtField>),
    Interface(Vec<RtInterfaceMethod>),
    Pointer(RuntimeType),
}

/// A signature. When `variadic` is set the last input is a slice type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RtFunc {
    pub ins: Vec<RuntimeType>,
    pub outs: Vec<RuntimeType>,
    pub variadic: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RtField {
    pub name: String,
    pub ty: RuntimeType,
    pub tag: String,
    pub embedded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RtInterfaceMethod {
    pub name: String,
    pub func: RtFunc,
}

#[derive(Debug, Clone)]
pub struct RtMethod {
    pub name: String,
    pub func: RtFunc,
    pub pointer_receiver: bool,
}

impl RuntimeType {
    fn unnamed(body: RtBody) -> Self {
        RuntimeType(Arc::new(Node {
            name: None,
            body: OnceLock::from(body),
        }))
    }

    pub fn basic(b: Basic) -> Self {
        Self::unnamed(RtBody::Basic(b))
    }

    pub fn array(len: u64, elem: RuntimeType) -> Self {
        Self::unnamed(RtBody::Array { len, elem })
    }

    pub fn slice(elem: RuntimeType) -> Self {
        Self::unnamed(RtBody::Slice(elem))
    }

    pub fn map(key: RuntimeType, elem: RuntimeType) -> Self {
        Self::unnamed(RtBody::Map { key, elem })
    }

    pub fn chan(dir: ChanDir, elem: RuntimeType) -> Self {
        Self::unnamed(RtBody::Chan { dir, elem })
    }

    pub fn func(func: RtFunc) -> Self {
        Self::unnamed(RtBody::Func(func))
    }

    pub fn structure(fields: Vec<RtField>) -> Self {
        Self::unnamed(RtBody::Struct(fields))
    }

    pub fn interface(methods: Vec<RtInterfaceMethod>) -> Self {
        Self::unnamed(RtBody::Interface(methods))
    }

    pub fn pointer(elem: RuntimeType) -> Self {
        Self::unnamed(RtBody::Pointer(elem))
    }

    /// A named type whose body is supplied later through [`define`](Self::define).
    ///
    /// `name` is the printed name; an instantiated generic type spells its
    /// arguments canonically inside brackets (`Pair[int,string]`).
    pub fn named(pkg_path: impl Into<String>, name: impl Into<String>) -> Self {
        RuntimeType(Arc::new(Node {
            name: Some(RtName {
                pkg_path: pkg_path.into(),
                name: name.into(),
                methods: RwLock::new(Vec::new()),
            }),
            body: OnceLock::new(),
        }))
    }

    /// The predeclared `error` interface.
    pub fn error() -> Self {
        static ERROR: OnceLock<RuntimeType> = OnceLock::new();
        ERROR
            .get_or_init(|| {
                let err = RuntimeType::named("", "error");
                let method = RtInterfaceMethod {
                    name: "Error".into(),
                    func: RtFunc {
                        ins: Vec::new(),
                        outs: vec![RuntimeType::basic(Basic::String)],
                        variadic: false,
                    },
                };
                // A fresh node cannot already be defined.
                let _ = err.define(RtBody::Interface(vec![method]));
                err
            })
            .clone()
    }

    pub fn define(&self, body: RtBody) -> Result<()> {
        self.0
            .body
            .set(body)
            .map_err(|_| Error::Redefined(self.describe()))
    }

    /// Attach a method to a named type.
    pub fn add_method(&self, name: impl Into<String>, func: RtFunc, pointer_receiver: bool) -> Result<()> {
        let rt_name = self
            .0
            .name
            .as_ref()
            .ok_or_else(|| Error::unsupported(format!("method on unnamed type {}", self.describe())))?;
        rt_name.methods.write().push(RtMethod {
            name: name.into(),
            func,
            pointer_receiver,
        });
        Ok(())
    }

    pub fn pkg_path(&self) -> &str {
        self.0.name.as_ref().map_or("", |n| n.pkg_path.as_str())
    }

    /// Printed name; empty for unnamed types.
    pub fn name(&self) -> &str {
        self.0.name.as_ref().map_or("", |n| n.name.as_str())
    }

    pub fn body(&self) -> Result<&RtBody> {
        self.0
            .body
            .get()
            .ok_or_else(|| Error::lookup(self.pkg_path(), self.name(), "declared but never defined"))
    }
}

impl RtField {
    pub fn new(name: impl Into<String>, ty: RuntimeType) -> Self {
        RtField {
            name: name.into(),
            ty,
            tag: String::new(),
            embedded: false,
        }
    }

    /// An embedded field named after the unqualified name of `ty` (or of
    /// the type it points to), without type arguments.
    pub fn embedded(ty: RuntimeType) -> Self {
        let target = match (&ty.0.name, ty.0.body.get()) {
            (None, Some(RtBody::Pointer(elem))) => elem,
            _ => &ty,
        };
        let printed = target.name();
        let name = printed.split('[').next().unwrap_or(printed).to_string();
        RtField {
            name,
            ty,
            tag: String::new(),
            embedded: true,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }
}

impl PartialEq for RuntimeType {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.0, &other.0) {
            return true;
        }
        match (&self.0.name, &other.0.name) {
            (Some(a), Some(b)) => a.pkg_path == b.pkg_path && a.name == b.name,
            (None, None) => self.0.body.get() == other.0.body.get(),
            _ => false,
        }
    }
}

impl Eq for RuntimeType {}

impl Hash for RuntimeType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.0.name {
            Some(n) => {
                0u8.hash(state);
                n.pkg_path.hash(state);
                n.name.hash(state);
            }
            None => {
                1u8.hash(state);
                self.0.body.get().hash(state);
            }
        }
    }
}

impl fmt::Debug for RuntimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(n) = &self.0.name {
            if n.pkg_path.is_empty() {
                return f.write_str(&n.name);
            }
            return write!(f, "{}.{}", n.pkg_path, n.name);
        }
        match self.0.body.get() {
            Some(RtBody::Basic(b)) => write!(f, "{}", b),
            Some(RtBody::Array { len, elem }) => write!(f, "[{}]{:?}", len, elem),
            Some(RtBody::Slice(elem)) => write!(f, "[]{:?}", elem),
            Some(RtBody::Map { key, elem }) => write!(f, "map[{:?}]{:?}", key, elem),
            Some(RtBody::Chan { dir, elem }) => write!(f, "{}{:?}", dir.prefix(), elem),
            Some(RtBody::Func(func)) => write!(f, "func{:?}->{:?}", func.ins, func.outs),
            Some(RtBody::Struct(fields)) => {
                let names: Vec<&str> = fields.iter().map(|x| x.name.as_str()).collect();
                write!(f, "struct{{{}}}", names.join("; "))
            }
            Some(RtBody::Interface(methods)) => {
                let names: Vec<&str> = methods.iter().map(|m| m.name.as_str()).collect();
                write!(f, "interface{{{}}}", names.join("; "))
            }
            Some(RtBody::Pointer(elem)) => write!(f, "*{:?}", elem),
            None => f.write_str("<undefined>"),
        }
    }
}

fn func_view(func: &RtFunc) -> FuncView<RuntimeType> {
    FuncView {
        ins: func.ins.clone(),
        outs: func.outs.clone(),
        variadic: func.variadic,
    }
}

fn body_view(body: &RtBody) -> View<RuntimeType> {
    match body {
        RtBody::Basic(b) => View::Basic(*b),
        RtBody::Array { len, elem } => View::Array {
            len: *len,
            elem: elem.clone(),
        },
        RtBody::Slice(elem) => View::Slice(elem.clone()),
        RtBody::Map { key, elem } => View::Map {
            key: key.clone(),
            elem: elem.clone(),
        },
        RtBody::Chan { dir, elem } => View::Chan {
            dir: *dir,
            elem: elem.clone(),
        },
        RtBody::Func(func) => View::Func(func_view(func)),
        RtBody::Struct(fields) => View::Struct(
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
        RtBody::Interface(methods) => View::Interface(
            methods
                .iter()
                .map(|m| MethodView {
                    name: m.name.clone(),
                    signature: func_view(&m.func),
                    pointer_receiver: false,
                })
                .collect(),
        ),
        RtBody::Pointer(elem) => View::Pointer(elem.clone()),
    }
}

impl Reflect for RuntimeType {
    fn view(&self) -> Result<View<Self>> {
        let body = self.body()?;
        let Some(rt_name) = &self.0.name else {
            return Ok(body_view(body));
        };

        let (name, type_args) = match rt_name.name.find('[') {
            Some(open) => {
                let args = rt_name.name[open + 1..].strip_suffix(']').ok_or_else(|| {
                    Error::malformed(&rt_name.name, "unterminated type argument list")
                })?;
                (&rt_name.name[..open], TypeArgs::Printed(args.to_string()))
            }
            None => (rt_name.name.as_str(), TypeArgs::Resolved(Vec::new())),
        };
        let methods = rt_name
            .methods
            .read()
            .iter()
            .map(|m| MethodView {
                name: m.name.clone(),
                signature: func_view(&m.func),
                pointer_receiver: m.pointer_receiver,
            })
            .collect();

        Ok(View::Named(NamedView {
            pkg_path: rt_name.pkg_path.clone(),
            name: name.to_string(),
            type_args,
            underlying: RuntimeType::unnamed(body.clone()),
            methods,
        }))
    }

    fn describe(&self) -> String {
        format!("{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let a = RuntimeType::slice(RuntimeType::basic(Basic::Int));
        let b = RuntimeType::slice(RuntimeType::basic(Basic::Int));
        assert_eq!(a, b);
        assert_ne!(a, RuntimeType::slice(RuntimeType::basic(Basic::Uint)));

        let t1 = RuntimeType::named("x/y", "T");
        let t2 = RuntimeType::named("x/y", "T");
        assert_eq!(t1, t2);
        assert_ne!(t1, RuntimeType::named("x/z", "T"));

        let mut set = std::collections::HashSet::new();
        set.insert(RuntimeType::pointer(t1.clone()));
        assert!(set.contains(&RuntimeType::pointer(t2)));
    }

    #[test]
    fn test_self_referential_node() {
        let node = RuntimeType::named("x/y", "Node");
        node.define(RtBody::Struct(vec![RtField::new("Next", RuntimeType::pointer(node.clone()))]))
        .unwrap();
        assert!(node.define(RtBody::Basic(Basic::Int)).is_err());

        let View::Named(view) = node.view().unwrap() else {
            panic!("expected named view");
        };
        let View::Struct(fields) = view.underlying.view().unwrap() else {
            panic!("expected struct");
        };
        assert_eq!(fields[0].ty, RuntimeType::pointer(node));
    }

    #[test]
    fn test_printed_type_args() {
        let t = RuntimeType::named("x/y", "Pair[int,x/y.Box[string]]");
        t.define(RtBody::Basic(Basic::Int)).unwrap();
        let View::Named(view) = t.view().unwrap() else {
            panic!("expected named view");
        };
        assert_eq!(view.name, "Pair");
        assert!(matches!(view.type_args, TypeArgs::Printed(ref s) if s == "int,x/y.Box[string]"));
    }

    #[test]
    fn test_embedded_field_name() {
        let boxed = RuntimeType::named("x/y", "Box[int]");
        assert_eq!(RtField::embedded(boxed.clone()).name, "Box");
        assert_eq!(RtField::embedded(RuntimeType::pointer(boxed)).name, "Box");
        assert!(RtField::embedded(RuntimeType::named("", "error")).embedded);
    }

    #[test]
    fn test_methods_only_on_named() {
        let t = RuntimeType::named("x/y", "T");
        assert!(t.view().is_err());
        t.add_method("M", RtFunc::default(), true).unwrap();
        assert!(RuntimeType::basic(Basic::Int)
            .add_method("M", RtFunc::default(), false)
            .is_err());
    }
}
