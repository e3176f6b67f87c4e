//! Literal printers.
//!
//! Three renderings share one walker and differ only in how a named type's
//! package path is spelled:
//!
//! - [`Style::Canonical`] - the full path (`encoding/json.Decoder`); exact
//!   left inverse of the parser
//! - [`Style::Wrapped`] - the path's identifier token
//!   (`xwrap_encoding_s_json.Decoder`)
//! - [`Style::Display`] - a caller-chosen short package name (`json.Decoder`)

use std::fmt;

use typex_codec::IdentCodec;
use typex_types::{is_identifier, ChanDir};

use crate::lit::{FuncLit, NamedLit, TypeLit};
use crate::quote::quote;

/// Maps a package path to the short name used in display output.
pub trait Namer {
    fn package(&self, path: &str) -> String;
}

impl<F> Namer for F
where
    F: Fn(&str) -> String,
{
    fn package(&self, path: &str) -> String {
        self(path)
    }
}

/// Names a package after its last path element.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNamer;

impl Namer for DefaultNamer {
    fn package(&self, path: &str) -> String {
        default_package_name(path)
    }
}

/// Last path element, skipping a trailing major-version element (`v2`).
/// Characters that cannot appear in an identifier become `_`.
pub fn default_package_name(path: &str) -> String {
    let mut segments = path.rsplit('/').filter(|s| !s.is_empty());
    let last = segments.next().unwrap_or(path);
    let name = if is_major_version(last) {
        segments.next().unwrap_or(last)
    } else {
        last
    };
    let name: String = name
        .chars()
        .map(|c| if c == '_' || c.is_alphanumeric() { c } else { '_' })
        .collect();
    if is_identifier(&name) {
        name
    } else {
        format!("_{}", name)
    }
}

fn is_major_version(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

#[derive(Clone, Copy)]
pub enum Style<'a> {
    Canonical,
    Wrapped(&'a IdentCodec),
    Display(&'a dyn Namer),
}

impl fmt::Debug for Style<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Style::Canonical => f.write_str("Canonical"),
            Style::Wrapped(_) => f.write_str("Wrapped"),
            Style::Display(_) => f.write_str("Display"),
        }
    }
}

impl Style<'_> {
    pub(crate) fn write(self, out: &mut String, lit: &TypeLit) {
        match lit {
            TypeLit::Basic(b) => out.push_str(b.name()),
            TypeLit::Array { len, elem } => {
                out.push('[');
                out.push_str(&len.to_string());
                out.push(']');
                self.write(out, elem);
            }
            TypeLit::Slice(elem) => {
                out.push_str("[]");
                self.write(out, elem);
            }
            TypeLit::Map { key, elem } => {
                out.push_str("map[");
                self.write(out, key);
                out.push(']');
                self.write(out, elem);
            }
            TypeLit::Chan { dir, elem } => {
                out.push_str(dir.prefix());
                // `chan <-chan T` would read as `chan<- chan T`
                let paren = *dir == ChanDir::Both && elem.chan_dir() == Some(ChanDir::Recv);
                if paren {
                    out.push('(');
                }
                self.write(out, elem);
                if paren {
                    out.push(')');
                }
            }
            TypeLit::Func(func) => {
                out.push_str("func");
                self.write_signature(out, func);
            }
            TypeLit::Struct(fields) if fields.is_empty() => out.push_str("struct {}"),
            TypeLit::Struct(fields) => {
                out.push_str("struct { ");
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        out.push_str("; ");
                    }
                    if !field.embedded {
                        out.push_str(&field.name);
                        out.push(' ');
                    }
                    self.write(out, &field.ty);
                    if !field.tag.is_empty() {
                        out.push(' ');
                        out.push_str(&quote(&field.tag));
                    }
                }
                out.push_str(" }");
            }
            TypeLit::Interface(methods) if methods.is_empty() => out.push_str("interface {}"),
            TypeLit::Interface(methods) => {
                out.push_str("interface { ");
                for (i, method) in methods.iter().enumerate() {
                    if i > 0 {
                        out.push_str("; ");
                    }
                    out.push_str(&method.name);
                    self.write_signature(out, &method.func);
                }
                out.push_str(" }");
            }
            TypeLit::Pointer(elem) => {
                out.push('*');
                self.write(out, elem);
            }
            TypeLit::Named(named) => self.write_named(out, named),
        }
    }

    fn write_signature(self, out: &mut String, func: &FuncLit) {
        out.push('(');
        let last = func.ins.len().saturating_sub(1);
        for (i, input) in func.ins.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            match (func.variadic && i == last, &**input) {
                (true, TypeLit::Slice(elem)) => {
                    out.push_str("...");
                    self.write(out, elem);
                }
                _ => self.write(out, input),
            }
        }
        out.push(')');
        match func.outs.as_slice() {
            [] => {}
            [single] => {
                out.push(' ');
                self.write(out, single);
            }
            outs => {
                out.push_str(" (");
                for (i, output) in outs.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write(out, output);
                }
                out.push(')');
            }
        }
    }

    fn write_named(self, out: &mut String, named: &NamedLit) {
        if !named.pkg_path.is_empty() {
            match self {
                Style::Canonical => out.push_str(&named.pkg_path),
                Style::Wrapped(codec) => out.push_str(&codec.wrap(&named.pkg_path)),
                Style::Display(namer) => out.push_str(&namer.package(&named.pkg_path)),
            }
            out.push('.');
        }
        out.push_str(&named.name);
        if !named.type_args.is_empty() {
            out.push('[');
            for (i, arg) in named.type_args.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                self.write(out, arg);
            }
            out.push(']');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lit::{FieldLit, MethodLit};
    use typex_types::Basic;

    #[test]
    fn test_default_package_name() {
        assert_eq!(default_package_name("encoding/json"), "json");
        assert_eq!(default_package_name("github.com/a/b/v2"), "b");
        assert_eq!(default_package_name("fmt"), "fmt");
        assert_eq!(default_package_name("gopkg.in/yaml.v3"), "yaml_v3");
        assert_eq!(default_package_name("example.com/go-kit"), "go_kit");
        assert_eq!(default_package_name("v2"), "v2");
    }

    #[test]
    fn test_render_styles() {
        let decoder = TypeLit::named("encoding/json", "Decoder", vec![]);
        let lit = TypeLit::Map {
            key: TypeLit::basic(Basic::String),
            elem: TypeLit::pointer(decoder),
        };
        assert_eq!(lit.render(Style::Canonical), "map[string]*encoding/json.Decoder");

        let codec = IdentCodec::new();
        assert_eq!(
            lit.render(Style::Wrapped(&codec)),
            "map[string]*xwrap_encoding_s_json.Decoder"
        );
        assert_eq!(lit.render(Style::Display(&DefaultNamer)), "map[string]*json.Decoder");

        let upper = |path: &str| path.to_uppercase().replace('/', "_");
        assert_eq!(
            lit.render(Style::Display(&upper)),
            "map[string]*ENCODING_JSON.Decoder"
        );
    }

    #[test]
    fn test_render_composites() {
        let int = TypeLit::basic(Basic::Int);
        let string = TypeLit::basic(Basic::String);

        let s = TypeLit::Struct(vec![
            FieldLit::named("A", string.clone()).with_tag(r#"json:"a""#),
            FieldLit::embedded(TypeLit::pointer(TypeLit::named("x/y", "Base", vec![]))),
        ]);
        assert_eq!(s.to_string(), r#"struct { A string "json:\"a\""; *x/y.Base }"#);

        let f = TypeLit::Func(FuncLit {
            ins: vec![int.clone(), TypeLit::slice(string.clone())],
            outs: vec![int.clone(), TypeLit::error()],
            variadic: true,
        });
        assert_eq!(f.to_string(), "func(int, ...string) (int, error)");

        let i = TypeLit::Interface(vec![MethodLit {
            name: "String".into(),
            func: FuncLit {
                outs: vec![string],
                ..FuncLit::default()
            },
        }]);
        assert_eq!(i.to_string(), "interface { String() string }");

        let c = TypeLit::Chan {
            dir: ChanDir::Both,
            elem: std::sync::Arc::new(TypeLit::Chan {
                dir: ChanDir::Recv,
                elem: int,
            }),
        };
        assert_eq!(c.to_string(), "chan (<-chan int)");
    }
}
