//! A type from either host representation.

use std::fmt;

use typex_host::{Reflect, RuntimeType, StaticType};
use typex_types::{Error, Result};

/// Closed union over the two host representations.
///
/// Equality and hashing follow the wrapped representation's identity rules;
/// a runtime type never equals a static type, even when both print the same.
/// Use [`TypeCache::literalize`](crate::TypeCache::literalize) to compare
/// across representations.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum AnyType {
    Runtime(RuntimeType),
    Static(StaticType),
}

impl AnyType {
    /// Wrap a static type, rejecting type parameters, result tuples,
    /// constraint unions and uninstantiated generics.
    pub fn from_static(t: StaticType) -> Result<Self> {
        t.ensure_concrete()?;
        Ok(AnyType::Static(t))
    }

    pub fn describe(&self) -> String {
        match self {
            AnyType::Runtime(t) => t.describe(),
            AnyType::Static(t) => t.describe(),
        }
    }
}

impl From<RuntimeType> for AnyType {
    fn from(t: RuntimeType) -> Self {
        AnyType::Runtime(t)
    }
}

impl TryFrom<StaticType> for AnyType {
    type Error = Error;

    fn try_from(t: StaticType) -> Result<Self> {
        AnyType::from_static(t)
    }
}

impl fmt::Debug for AnyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnyType::Runtime(t) => write!(f, "Runtime({:?})", t),
            AnyType::Static(t) => write!(f, "Static({:?})", t),
        }
    }
}

/// A host type the engine can key its identity cache with.
pub(crate) trait Host: Reflect {
    fn to_any(&self) -> AnyType;
}

impl Host for RuntimeType {
    fn to_any(&self) -> AnyType {
        AnyType::Runtime(self.clone())
    }
}

impl Host for StaticType {
    fn to_any(&self) -> AnyType {
        AnyType::Static(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use typex_host::NamedDecl;
    use typex_types::Basic;

    #[test]
    fn test_from_static_validates() {
        assert!(AnyType::from_static(StaticType::basic(Basic::Int)).is_ok());
        assert!(AnyType::from_static(StaticType::param(0, "T")).is_err());
        assert!(AnyType::from_static(StaticType::Tuple(Arc::from(vec![]))).is_err());

        let generic = NamedDecl::new("x/y", "Box", vec!["T".into()]);
        assert!(matches!(
            AnyType::try_from(StaticType::named(&generic)),
            Err(Error::UnsupportedTypeCategory(_))
        ));
    }

    #[test]
    fn test_representations_never_equal() {
        let rt: AnyType = RuntimeType::basic(Basic::Int).into();
        let st = AnyType::from_static(StaticType::basic(Basic::Int)).unwrap();
        assert_ne!(rt, st);
    }
}
