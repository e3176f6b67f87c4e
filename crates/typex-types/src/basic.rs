//! Predeclared basic types, channel directions and structural kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The host language's predeclared basic types.
///
/// `byte` and `rune` are accepted by [`Basic::from_name`] but canonicalize
/// to [`Basic::Uint8`] and [`Basic::Int32`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Basic {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    UnsafePointer,
}

impl Basic {
    pub const ALL: [Basic; 18] = [
        Basic::Bool,
        Basic::Int,
        Basic::Int8,
        Basic::Int16,
        Basic::Int32,
        Basic::Int64,
        Basic::Uint,
        Basic::Uint8,
        Basic::Uint16,
        Basic::Uint32,
        Basic::Uint64,
        Basic::Uintptr,
        Basic::Float32,
        Basic::Float64,
        Basic::Complex64,
        Basic::Complex128,
        Basic::String,
        Basic::UnsafePointer,
    ];

    /// Canonical spelling as printed in type literals.
    pub fn name(self) -> &'static str {
        match self {
            Basic::Bool => "bool",
            Basic::Int => "int",
            Basic::Int8 => "int8",
            Basic::Int16 => "int16",
            Basic::Int32 => "int32",
            Basic::Int64 => "int64",
            Basic::Uint => "uint",
            Basic::Uint8 => "uint8",
            Basic::Uint16 => "uint16",
            Basic::Uint32 => "uint32",
            Basic::Uint64 => "uint64",
            Basic::Uintptr => "uintptr",
            Basic::Float32 => "float32",
            Basic::Float64 => "float64",
            Basic::Complex64 => "complex64",
            Basic::Complex128 => "complex128",
            Basic::String => "string",
            Basic::UnsafePointer => "unsafe.Pointer",
        }
    }

    pub fn from_name(name: &str) -> Option<Basic> {
        match name {
            "byte" => Some(Basic::Uint8),
            "rune" => Some(Basic::Int32),
            _ => Basic::ALL.iter().copied().find(|b| b.name() == name),
        }
    }
}

impl fmt::Display for Basic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Channel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChanDir {
    /// `chan<- T`
    Send,
    /// `<-chan T`
    Recv,
    /// `chan T`
    Both,
}

impl ChanDir {
    /// Printed prefix including the trailing space.
    pub fn prefix(self) -> &'static str {
        match self {
            ChanDir::Send => "chan<- ",
            ChanDir::Recv => "<-chan ",
            ChanDir::Both => "chan ",
        }
    }

    /// Match a channel prefix at the start of `id`, returning the direction
    /// and the remaining element text.
    ///
    /// `chan<- ` is tried before `chan ` since the latter is not a prefix of
    /// the former but shares its head.
    pub fn strip_prefix(id: &str) -> Option<(ChanDir, &str)> {
        [ChanDir::Send, ChanDir::Recv, ChanDir::Both]
            .into_iter()
            .find_map(|dir| id.strip_prefix(dir.prefix()).map(|rest| (dir, rest)))
    }
}

/// Structural category of a type.
///
/// A named type's kind is `Named` at the literal level; its structural kind
/// is that of its underlying type, which only a declaration can supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Basic(Basic),
    Array,
    Slice,
    Map,
    Chan,
    Func,
    Struct,
    Interface,
    Pointer,
    Named,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Basic(b) => write!(f, "{}", b),
            Kind::Array => f.write_str("array"),
            Kind::Slice => f.write_str("slice"),
            Kind::Map => f.write_str("map"),
            Kind::Chan => f.write_str("chan"),
            Kind::Func => f.write_str("func"),
            Kind::Struct => f.write_str("struct"),
            Kind::Interface => f.write_str("interface"),
            Kind::Pointer => f.write_str("ptr"),
            Kind::Named => f.write_str("named"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_names_round_trip() {
        for b in Basic::ALL {
            assert_eq!(Basic::from_name(b.name()), Some(b));
        }
    }

    #[test]
    fn test_basic_aliases() {
        assert_eq!(Basic::from_name("byte"), Some(Basic::Uint8));
        assert_eq!(Basic::from_name("rune"), Some(Basic::Int32));
        assert_eq!(Basic::from_name("T"), None);
        assert_eq!(Basic::from_name("error"), None);
    }

    #[test]
    fn test_chan_prefix() {
        assert_eq!(
            ChanDir::strip_prefix("chan<- int"),
            Some((ChanDir::Send, "int"))
        );
        assert_eq!(
            ChanDir::strip_prefix("<-chan int"),
            Some((ChanDir::Recv, "int"))
        );
        assert_eq!(
            ChanDir::strip_prefix("chan (<-chan int)"),
            Some((ChanDir::Both, "(<-chan int)"))
        );
        assert_eq!(ChanDir::strip_prefix("channel"), None);
    }

    #[test]
    fn test_kind_serde() {
        let json = serde_json::to_string(&Kind::Basic(Basic::Uint8)).unwrap();
        assert_eq!(json, r#"{"basic":"uint8"}"#);
        let kind: Kind = serde_json::from_str(r#""slice""#).unwrap();
        assert_eq!(kind, Kind::Slice);
    }
}
