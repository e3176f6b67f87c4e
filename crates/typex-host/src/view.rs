//! One-level structural views shared by both host models.
//!
//! [`Reflect`] is the only capability the reconciliation engine needs from a
//! type representation: look at one node, get its children as the same
//! representation. The trait is sealed; [`RuntimeType`](crate::RuntimeType)
//! and [`StaticType`](crate::StaticType) are the only implementors.

use std::fmt;
use std::hash::Hash;

use typex_types::{Basic, ChanDir, Result};

mod sealed {
    pub trait Sealed {}

    impl Sealed for crate::runtime::RuntimeType {}
    impl Sealed for crate::statics::StaticType {}
}

pub trait Reflect: sealed::Sealed + Clone + Eq + Hash + fmt::Debug + Send + Sync {
    /// Describe this node and its immediate children.
    ///
    /// Named types report their instantiated underlying type and declared
    /// methods; their underlying type is not expanded further.
    fn view(&self) -> Result<View<Self>>;

    /// Short human-readable form for logs and error messages.
    fn describe(&self) -> String;
}

#[derive(Debug, Clone)]
pub enum View<T> {
    Basic(Basic),
    Array { len: u64, elem: T },
    Slice(T),
    Map { key: T, elem: T },
    Chan { dir: ChanDir, elem: T },
    Func(FuncView<T>),
    Struct(Vec<FieldView<T>>),
    Interface(Vec<MethodView<T>>),
    Pointer(T),
    Named(NamedView<T>),
}

/// A signature. When `variadic` is set the last input is a slice type.
#[derive(Debug, Clone)]
pub struct FuncView<T> {
    pub ins: Vec<T>,
    pub outs: Vec<T>,
    pub variadic: bool,
}

#[derive(Debug, Clone)]
pub struct FieldView<T> {
    pub name: String,
    pub ty: T,
    pub tag: String,
    pub embedded: bool,
}

#[derive(Debug, Clone)]
pub struct MethodView<T> {
    pub name: String,
    pub signature: FuncView<T>,
    /// Declared on `*N` rather than `N`. Always false for interface methods.
    pub pointer_receiver: bool,
}

#[derive(Debug, Clone)]
pub struct NamedView<T> {
    pub pkg_path: String,
    /// Bare declared name, without type arguments.
    pub name: String,
    pub type_args: TypeArgs<T>,
    pub underlying: T,
    pub methods: Vec<MethodView<T>>,
}

/// How a named type carries its instantiation.
#[derive(Debug, Clone)]
pub enum TypeArgs<T> {
    /// Argument types are available as the same representation.
    Resolved(Vec<T>),
    /// Only the printed argument list is available (text between the
    /// brackets of `Name[...]`), as runtime reflection reports it.
    Printed(String),
}

impl<T> TypeArgs<T> {
    pub fn is_empty(&self) -> bool {
        match self {
            TypeArgs::Resolved(args) => args.is_empty(),
            TypeArgs::Printed(text) => text.is_empty(),
        }
    }
}

impl<T> View<T> {
    pub fn is_pointer(&self) -> bool {
        matches!(self, View::Pointer(_))
    }

    pub fn is_named(&self) -> bool {
        matches!(self, View::Named(_))
    }
}

/// Whether `t`'s underlying type is an interface.
pub fn is_interface<T: Reflect>(t: &T) -> Result<bool> {
    Ok(match t.view()? {
        View::Interface(_) => true,
        View::Named(named) => matches!(named.underlying.view()?, View::Interface(_)),
        _ => false,
    })
}
