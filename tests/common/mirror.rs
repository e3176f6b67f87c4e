//! Runtime counterparts of static fixture types.
//!
//! Rebuilds a static type as the runtime model would report it: named
//! nodes print their instantiation arguments into their names and carry
//! the instantiated method table.

use std::collections::HashMap;

use typex::host::{
    FuncView, Reflect, RtBody, RtField, RtFunc, RtInterfaceMethod, RuntimeType, StaticType,
    TypeArgs, View,
};
use typex::{AnyType, TypeCache};

#[derive(Default)]
pub struct Mirror {
    cache: TypeCache,
    named: HashMap<StaticType, RuntimeType>,
}

impl Mirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn runtime(&mut self, t: &StaticType) -> RuntimeType {
        if let Some(rt) = self.named.get(t) {
            return rt.clone();
        }
        match t.view().expect("static fixture view") {
            View::Named(named) if named.pkg_path.is_empty() && named.name == "error" => {
                RuntimeType::error()
            }
            View::Named(named) => {
                let printed = match &named.type_args {
                    TypeArgs::Resolved(args) if !args.is_empty() => {
                        let args: Vec<String> = args.iter().map(|a| self.canonical(a)).collect();
                        format!("{}[{}]", named.name, args.join(","))
                    }
                    _ => named.name.clone(),
                };
                let rt = RuntimeType::named(named.pkg_path.clone(), printed);
                self.named.insert(t.clone(), rt.clone());
                let body = self.body(named.underlying.view().expect("underlying view"));
                rt.define(body).expect("fresh runtime node");
                for m in &named.methods {
                    let func = self.func(&m.signature);
                    rt.add_method(m.name.clone(), func, m.pointer_receiver)
                        .expect("named runtime node");
                }
                rt
            }
            view => unnamed(self.body(view)),
        }
    }

    pub fn any(&mut self, t: &StaticType) -> AnyType {
        self.runtime(t).into()
    }

    fn canonical(&self, t: &StaticType) -> String {
        self.cache
            .literalize(&AnyType::Static(t.clone()))
            .expect("argument literal")
            .to_string()
    }

    fn func(&mut self, func: &FuncView<StaticType>) -> RtFunc {
        RtFunc {
            ins: func.ins.iter().map(|t| self.runtime(t)).collect(),
            outs: func.outs.iter().map(|t| self.runtime(t)).collect(),
            variadic: func.variadic,
        }
    }

    fn body(&mut self, view: View<StaticType>) -> RtBody {
        match view {
            View::Basic(b) => RtBody::Basic(b),
            View::Array { len, elem } => RtBody::Array {
                len,
                elem: self.runtime(&elem),
            },
            View::Slice(elem) => RtBody::Slice(self.runtime(&elem)),
            View::Map { key, elem } => RtBody::Map {
                key: self.runtime(&key),
                elem: self.runtime(&elem),
            },
            View::Chan { dir, elem } => RtBody::Chan {
                dir,
                elem: self.runtime(&elem),
            },
            View::Func(func) => RtBody::Func(self.func(&func)),
            View::Struct(fields) => RtBody::Struct(
                fields
                    .into_iter()
                    .map(|f| RtField {
                        ty: self.runtime(&f.ty),
                        name: f.name,
                        tag: f.tag,
                        embedded: f.embedded,
                    })
                    .collect(),
            ),
            View::Interface(methods) => RtBody::Interface(
                methods
                    .into_iter()
                    .map(|m| RtInterfaceMethod {
                        func: self.func(&m.signature),
                        name: m.name,
                    })
                    .collect(),
            ),
            View::Pointer(elem) => RtBody::Pointer(self.runtime(&elem)),
            View::Named(named) => panic!("named underlying type {}", named.name),
        }
    }
}

fn unnamed(body: RtBody) -> RuntimeType {
    match body {
        RtBody::Basic(b) => RuntimeType::basic(b),
        RtBody::Array { len, elem } => RuntimeType::array(len, elem),
        RtBody::Slice(elem) => RuntimeType::slice(elem),
        RtBody::Map { key, elem } => RuntimeType::map(key, elem),
        RtBody::Chan { dir, elem } => RuntimeType::chan(dir, elem),
        RtBody::Func(func) => RuntimeType::func(func),
        RtBody::Struct(fields) => RuntimeType::structure(fields),
        RtBody::Interface(methods) => RuntimeType::interface(methods),
        RtBody::Pointer(elem) => RuntimeType::pointer(elem),
    }
}
