//! Promoted members reported as literals.
//!
//! Method signatures and field types come back as [`LitRef`]s, so results
//! computed from a runtime type and from the matching static type compare
//! equal.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;
use typex_literal::{LitRef, TypeLit};
use typex_types::Result;

use crate::any::{AnyType, Host};
use crate::cache::TypeCache;
use crate::field::find_field;
use crate::inspect::resolve_methods;

/// A method in a type's promoted method set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodInfo {
    pub name: String,
    /// `func(...)` literal without the receiver.
    pub signature: LitRef,
    pub pointer_receiver: bool,
    /// Named types crossed between the queried type and the declaring type;
    /// 0 for methods declared on the queried type itself.
    pub depth: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldInfo {
    pub name: String,
    pub ty: LitRef,
    pub tag: String,
    pub embedded: bool,
}

impl TypeCache {
    /// Exported methods callable on `t`, sorted by name.
    ///
    /// Ambiguous names and names shadowed by a field are left out, as are
    /// pointer-receiver methods not reachable through a pointer.
    pub fn methods(&self, t: &AnyType) -> Result<Vec<MethodInfo>> {
        self.record_resolution();
        match t {
            AnyType::Runtime(t) => self.methods_of(t),
            AnyType::Static(t) => self.methods_of(t),
        }
    }

    pub fn method_by_name(&self, t: &AnyType, name: &str) -> Result<Option<MethodInfo>> {
        Ok(self.methods(t)?.into_iter().find(|m| m.name == name))
    }

    pub fn field_by_name(&self, t: &AnyType, name: &str) -> Result<Option<FieldInfo>> {
        self.field_by_name_func(t, |candidate| candidate == name)
    }

    /// The unique field of `t` whose name satisfies `matcher`, searching
    /// embedded structs when there is no direct match.
    ///
    /// `matcher` should accept at most one field name per struct; a struct
    /// with two direct matches yields `None`.
    pub fn field_by_name_func<F>(&self, t: &AnyType, matcher: F) -> Result<Option<FieldInfo>>
    where
        F: Fn(&str) -> bool,
    {
        self.record_resolution();
        match t {
            AnyType::Runtime(t) => self.field_of(t, &matcher),
            AnyType::Static(t) => self.field_of(t, &matcher),
        }
    }

    fn methods_of<T: Host>(&self, t: &T) -> Result<Vec<MethodInfo>> {
        let promoted = resolve_methods(t, self.config().max_traversal_depth)?;
        debug!(ty = %t.describe(), count = promoted.len(), "resolved method set");
        promoted
            .into_iter()
            .map(|p| {
                let func = self.func_lit(&p.method.signature)?;
                Ok(MethodInfo {
                    name: p.method.name,
                    signature: Arc::new(TypeLit::Func(func)),
                    pointer_receiver: p.method.pointer_receiver,
                    depth: p.depth,
                })
            })
            .collect()
    }

    fn field_of<T: Host>(&self, t: &T, matcher: &dyn Fn(&str) -> bool) -> Result<Option<FieldInfo>> {
        let Some(field) = find_field(t, matcher, self.config().max_traversal_depth)? else {
            return Ok(None);
        };
        Ok(Some(FieldInfo {
            ty: self.literal_of(&field.ty)?,
            name: field.name,
            tag: field.tag,
            embedded: field.embedded,
        }))
    }
}
