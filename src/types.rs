//! Input contract: the type-declaration graph supplied by the source-file
//! front end.
//!
//! The front end parses a file tree and hands over a [`Universe`] of declared
//! types in dependency order. Each [`TypeDef`] carries its fully-qualified
//! name, a closed [`TypeKind`] variant describing its shape, and the raw
//! comment lines attached to the declaration. Struct members reference other
//! types by fully-qualified name; references are resolved through the
//! universe during schema derivation. No source-language semantics beyond
//! declared shape are represented here.

use std::collections::BTreeMap;

/// Fully-qualified type identity: package path plus local name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TypeName {
    /// Package path, e.g. `example.com/pkg/apis/ship/v1beta1`. Empty for
    /// built-in primitives.
    pub package: String,
    /// Local declared name, e.g. `Frigate` or `int32`.
    pub name: String,
}

impl TypeName {
    pub fn new(package: &str, name: &str) -> Self {
        Self {
            package: package.to_string(),
            name: name.to_string(),
        }
    }

    /// A builtin name with no package qualifier.
    pub fn builtin(name: &str) -> Self {
        Self::new("", name)
    }

    /// The fully-qualified `package.Name` string (or the bare name for
    /// builtins), used as the universe key and in recursion guards.
    pub fn full(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }
}

/// One declared struct member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Declared member name, used as the schema field name when the
    /// serialization tag carries no explicit name.
    pub name: String,
    /// Fully-qualified name of the member's type.
    pub type_name: String,
    /// Raw serialization tag string, e.g. `json:"replicas,omitempty"`.
    /// Members without a json tag are skipped by the member walker.
    pub tag: String,
    /// Comment lines attached to the member; validation constraint
    /// directives for the member's schema node live here.
    pub comment_lines: Vec<String>,
}

/// The shape of a declared type. Each variant carries exactly the references
/// that kind needs; matching is exhaustive, so a malformed graph cannot
/// reach the deriver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    /// Built-in or named scalar type.
    Primitive,
    /// Struct with an ordered member list.
    Struct { members: Vec<Member> },
    /// Map from string keys to the named value type.
    Map { value: String },
    /// Slice of the named element type.
    Slice { elem: String },
    /// Fixed-size array of the named element type.
    Array { elem: String },
    /// Pointer to the named pointee; transparent for schema purposes.
    Pointer { pointee: String },
    /// Alias of the named underlying type; transparent for schema purposes.
    Alias { underlying: String },
}

/// One declared type with its attached comment lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDef {
    pub name: TypeName,
    pub kind: TypeKind,
    /// Raw comment lines attached to the type declaration, in source order.
    pub comment_lines: Vec<String>,
}

impl TypeDef {
    pub fn new(name: TypeName, kind: TypeKind) -> Self {
        Self {
            name,
            kind,
            comment_lines: Vec::new(),
        }
    }

    pub fn with_comments(mut self, lines: &[&str]) -> Self {
        self.comment_lines = lines.iter().map(|l| l.to_string()).collect();
        self
    }
}

/// The set of declared types, iterable in insertion (dependency) order and
/// addressable by fully-qualified name.
#[derive(Debug, Default)]
pub struct Universe {
    order: Vec<String>,
    types: BTreeMap<String, TypeDef>,
}

impl Universe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a type. Re-inserting a name replaces the definition but keeps
    /// its original position in the iteration order.
    pub fn insert(&mut self, def: TypeDef) {
        let key = def.name.full();
        if !self.types.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.types.insert(key, def);
    }

    pub fn get(&self, full_name: &str) -> Option<&TypeDef> {
        self.types.get(full_name)
    }

    /// Declared types in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeDef> {
        self.order.iter().filter_map(|name| self.types.get(name))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
