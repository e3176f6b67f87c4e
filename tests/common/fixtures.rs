//! The `structure` test package.
//!
//! Non-generic declarations are defined from canonical literals through the
//! loader; generic skeletons are built with explicit type parameters.

use std::sync::Arc;

use typex::host::{
    signature_from_literal, static_from_literal, MemoryLoader, NamedDecl, Package, Signature,
    StaticField, StaticType,
};
use typex::literal::{parse, TypeLit};
use typex::types::Basic;
use typex::AnyType;

/// Import path of the fixture package.
pub const PKG: &str = "github.com/typex/testdata/structure";

/// Declarations defined from literals; `$P` stands for [`PKG`].
const DECLS: &[(&str, &str)] = &[
    ("StringerL1", "string"),
    ("StringerL2", "struct { fmt.Stringer }"),
    ("StringerL2WrapL1", "struct { *$P.StringerL1 }"),
    ("StringerL3", "struct { $P.StringerL2 }"),
    ("StringerL3WrapL2", "struct { $P.StringerL2WrapL1 }"),
    ("StringField", "struct { String string }"),
    ("AmbiguousL1x2", "struct { $P.StringerL1; fmt.Stringer }"),
    ("AmbiguousL1AndField", "struct { $P.StringerL1; String string }"),
    ("AmbiguousL2x2", "struct { $P.StringerL2; *$P.StringerL2WrapL1 }"),
    (
        "UnambiguousL1AndL2x2",
        "struct { *$P.StringerL2; $P.StringerL2WrapL1; *$P.StringerL1 }",
    ),
    (
        "AmbiguousL1x2AndL2",
        "struct { $P.StringerL1; fmt.Stringer; $P.StringerL2 }",
    ),
    (
        "UnambiguousL2AndL3x2",
        "struct { $P.StringerL2; $P.StringerL3; $P.StringerL3WrapL2 }",
    ),
    (
        "AmbiguousL2AndL3x2AndField",
        "struct { $P.StringerL2; $P.StringerL3; $P.StringerL3WrapL2; $P.StringField }",
    ),
    ("CircleEmbedsA", "struct { $P.CircleEmbedsB }"),
    ("CircleEmbedsB", "struct { *$P.CircleEmbedsC }"),
    ("CircleEmbedsC", "struct { $P.CircleEmbedsA; *$P.CircleEmbedsB }"),
    ("PtrA", "struct { *$P.PtrB }"),
    ("PtrB", "struct { $P.PtrC }"),
    ("PtrC", "struct {}"),
    ("HasUnexportedMethod", "struct { Count int }"),
    ("Outer", "struct { $P.Inner; *$P.Extra; Own string }"),
    ("Inner", r#"struct { Deep int "json:\"deep\""; Shared bool }"#),
    ("Extra", "struct { Shared bool; Only []byte }"),
    (
        "Kitchen",
        "struct { Ch chan<- []string; Fn func(string, ...int) (bool, error); M map[[2]int]interface { Close() error }; Any interface {} }",
    ),
];

/// (type, method, signature, pointer receiver)
const METHODS: &[(&str, &str, &str, bool)] = &[
    ("StringerL1", "String", "func() string", true),
    ("PtrC", "M", "func()", true),
    ("HasUnexportedMethod", "str", "func() string", false),
    ("HasUnexportedMethod", "Len", "func() int", false),
];

pub struct Structure {
    pub loader: MemoryLoader,
    pub pkg: Arc<Package>,
}

impl Structure {
    pub fn decl(&self, name: &str) -> Arc<NamedDecl> {
        self.pkg
            .lookup(name)
            .unwrap_or_else(|| panic!("fixture declares {}", name))
    }

    /// A non-generic declared type.
    pub fn ty(&self, name: &str) -> StaticType {
        StaticType::named(&self.decl(name))
    }

    /// An instance of a generic declaration.
    pub fn instance(&self, name: &str, args: Vec<StaticType>) -> StaticType {
        typex::host::instantiate(&self.decl(name), args).expect("instantiate fixture")
    }

    pub fn any(&self, name: &str) -> AnyType {
        AnyType::from_static(self.ty(name)).expect("concrete fixture type")
    }

    pub fn any_ptr(&self, name: &str) -> AnyType {
        AnyType::from_static(StaticType::pointer(self.ty(name))).expect("concrete fixture type")
    }

    /// Static type for a literal mentioning fixture declarations.
    pub fn from_literal(&self, id: &str) -> StaticType {
        let lit = parse(&id.replace("$P", PKG)).expect("fixture literal parses");
        static_from_literal(&lit, &self.loader).expect("fixture literal resolves")
    }

    pub fn signature(&self, id: &str) -> Signature {
        match &*parse(id).expect("signature parses") {
            TypeLit::Func(func) => signature_from_literal(func, &self.loader).expect("signature resolves"),
            other => panic!("not a signature: {}", other),
        }
    }
}

/// Build the fixture package and its `fmt` dependency.
pub fn structure() -> Structure {
    let loader = MemoryLoader::new();
    let fmt = loader.package("fmt");
    let stringer = fmt.declare("Stringer", vec![]).expect("declare fmt.Stringer");
    let pkg = loader.package(PKG);
    for (name, _) in DECLS {
        pkg.declare(name, vec![]).expect("declare fixture");
    }
    let fixture = Structure { loader, pkg };

    stringer
        .define(fixture.from_literal("interface { String() string }"))
        .expect("define fmt.Stringer");
    for (name, body) in DECLS {
        fixture
            .decl(name)
            .define(fixture.from_literal(body))
            .unwrap_or_else(|e| panic!("define {}: {}", name, e));
    }
    for (name, method, sig, pointer) in METHODS {
        fixture
            .decl(name)
            .add_method(*method, fixture.signature(sig), *pointer);
    }
    declare_generics(&fixture);
    fixture
}

fn param(index: usize, name: &str) -> StaticType {
    StaticType::param(index, name)
}

fn declare_generics(fixture: &Structure) {
    let pkg = &fixture.pkg;
    let declare = |name: &str, params: &[&str]| {
        pkg.declare(name, params.iter().map(|p| p.to_string()).collect())
            .expect("declare generic")
    };

    // BTreeNode[T] { v T; r, l, p *BTreeNode[T] }
    let btree = declare("BTreeNode", &["T"]);
    let node_ptr = StaticType::pointer(StaticType::generic(&btree, vec![param(0, "T")]));
    btree
        .define(StaticType::structure(vec![
            StaticField::new("v", param(0, "T")),
            StaticField::new("r", node_ptr.clone()),
            StaticField::new("l", node_ptr.clone()),
            StaticField::new("p", node_ptr.clone()),
        ]))
        .expect("define BTreeNode");
    for name in ["InsertL", "InsertR"] {
        btree.add_method(
            name,
            Signature {
                params: vec![param(0, "T")],
                results: vec![node_ptr.clone()],
                variadic: false,
            },
            true,
        );
    }

    // PassTypeParam[T1, T2] { v1 T1; v2 T2; *BTreeNode[T2] }
    let pass = declare("PassTypeParam", &["T1", "T2"]);
    pass.define(StaticType::structure(vec![
        StaticField::new("v1", param(0, "T1")),
        StaticField::new("v2", param(1, "T2")),
        StaticField::embedded(StaticType::pointer(StaticType::generic(
            &btree,
            vec![param(1, "T2")],
        )))
        .expect("embedded BTreeNode"),
    ]))
    .expect("define PassTypeParam");
    pass.add_method(
        "Deal",
        Signature {
            params: vec![param(0, "T1")],
            results: vec![param(1, "T2")],
            variadic: false,
        },
        true,
    );

    // Serialized[T] { data T }
    let serialized = declare("Serialized", &["T"]);
    serialized
        .define(StaticType::structure(vec![StaticField::new("data", param(0, "T"))]))
        .expect("define Serialized");
    let bytes = StaticType::slice(StaticType::basic(Basic::Uint8));
    let value_methods = [
        ("String", vec![], vec![StaticType::basic(Basic::String)]),
        ("Bytes", vec![], vec![bytes]),
        ("Data", vec![], vec![param(0, "T")]),
    ];
    for (name, params, results) in value_methods {
        serialized.add_method(
            name,
            Signature {
                params,
                results,
                variadic: false,
            },
            false,
        );
    }
    serialized.add_method(
        "SetData",
        Signature {
            params: vec![param(0, "T")],
            results: vec![],
            variadic: false,
        },
        true,
    );

    // Box[T] { V T }
    let boxed = declare("Box", &["T"]);
    boxed
        .define(StaticType::structure(vec![StaticField::new("V", param(0, "T"))]))
        .expect("define Box");

    // Pair[K, V] { Key K; Val V }
    let pair = declare("Pair", &["K", "V"]);
    pair.define(StaticType::structure(vec![
        StaticField::new("Key", param(0, "K")),
        StaticField::new("Val", param(1, "V")),
    ]))
    .expect("define Pair");

    // Wrap[T] { Inner Box[T]; Items []Pair[T, string] }
    let wrap = declare("Wrap", &["T"]);
    wrap.define(StaticType::structure(vec![
        StaticField::new("Inner", StaticType::generic(&boxed, vec![param(0, "T")])),
        StaticField::new(
            "Items",
            StaticType::slice(StaticType::generic(
                &pair,
                vec![param(0, "T"), StaticType::basic(Basic::String)],
            )),
        ),
    ]))
    .expect("define Wrap");

    // Nest[T] { W Wrap[T]; P *Pair[string, T]; F func(T) Box[Box[T]] }
    let nest = declare("Nest", &["T"]);
    nest.define(StaticType::structure(vec![
        StaticField::new("W", StaticType::generic(&wrap, vec![param(0, "T")])),
        StaticField::new(
            "P",
            StaticType::pointer(StaticType::generic(
                &pair,
                vec![StaticType::basic(Basic::String), param(0, "T")],
            )),
        ),
        StaticField::new(
            "F",
            StaticType::func(
                vec![param(0, "T")],
                vec![StaticType::generic(
                    &boxed,
                    vec![StaticType::generic(&boxed, vec![param(0, "T")])],
                )],
                false,
            ),
        ),
    ]))
    .expect("define Nest");

    // Mirror[T] { B Box } where the inner Box is in origin form and receives
    // Mirror's own arguments.
    let mirror = declare("Mirror", &["T"]);
    mirror
        .define(StaticType::structure(vec![
            StaticField::new("B", StaticType::named(&boxed)),
            StaticField::new("N", StaticType::pointer(StaticType::named(&mirror))),
        ]))
        .expect("define Mirror");
}
