//! Key-casing transform between the backend's snake_case and the client's
//! camelCase object graphs.
//!
//! # Design
//! Payloads are modelled as an explicit `Tree` rather than a bare
//! `serde_json::Value` so that "a record whose keys may be rewritten" and
//! "an opaque value that must travel untouched" are distinct variants.
//! `shape` exposes that classification directly. Only `Tree::Map` ever has
//! its keys renamed; sequences are mapped element-wise and everything else
//! is cloned as-is.
//!
//! Both directions special-case the document identifier: `_id` on the wire
//! is `id` at the call site and vice versa.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::{Number, Value};

/// A JSON-compatible payload tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Tree {
    /// An absent value. Dropped from mappings when serialized, `null`
    /// everywhere else.
    Undefined,
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Seq(Vec<Tree>),
    Map(Mapping),
    /// A value that must never have its keys rewritten.
    Opaque(Value),
}

/// How the converter treats a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Scalar,
    Sequence,
    Mapping,
    Opaque,
}

/// Classify a node. Only `Shape::Mapping` nodes are convertible records.
pub fn shape(tree: &Tree) -> Shape {
    match tree {
        Tree::Seq(_) => Shape::Sequence,
        Tree::Map(_) => Shape::Mapping,
        Tree::Opaque(_) => Shape::Opaque,
        Tree::Undefined | Tree::Null | Tree::Bool(_) | Tree::Number(_) | Tree::String(_) => {
            Shape::Scalar
        }
    }
}

/// Insertion-ordered mapping with unique keys.
///
/// Inserting a key that is already present replaces its value in place, so
/// the key keeps its original position. Equality is order-sensitive.
#[derive(Debug, Clone, Default)]
pub struct Mapping {
    entries: IndexMap<String, Tree>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Tree) -> Option<Tree> {
        self.entries.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&Tree> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tree)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl FromIterator<(String, Tree)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (String, Tree)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Tree {
    /// Build a tree from anything serializable.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Tree, serde_json::Error> {
        serde_json::to_value(value).map(Tree::from)
    }

    /// Lower the tree back into a `serde_json::Value`.
    ///
    /// `Undefined` entries are dropped from mappings and become `null`
    /// anywhere else, matching how the tree serializes.
    pub fn into_value(self) -> Value {
        match self {
            Tree::Undefined | Tree::Null => Value::Null,
            Tree::Bool(b) => Value::Bool(b),
            Tree::Number(n) => Value::Number(n),
            Tree::String(s) => Value::String(s),
            Tree::Seq(items) => Value::Array(items.into_iter().map(Tree::into_value).collect()),
            Tree::Map(mapping) => Value::Object(
                mapping
                    .entries
                    .into_iter()
                    .filter(|(_, value)| !matches!(value, Tree::Undefined))
                    .map(|(key, value)| (key, value.into_value()))
                    .collect(),
            ),
            Tree::Opaque(value) => value,
        }
    }
}

impl From<Value> for Tree {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Tree::Null,
            Value::Bool(b) => Tree::Bool(b),
            Value::Number(n) => Tree::Number(n),
            Value::String(s) => Tree::String(s),
            Value::Array(items) => Tree::Seq(items.into_iter().map(Tree::from).collect()),
            Value::Object(object) => Tree::Map(
                object
                    .into_iter()
                    .map(|(key, value)| (key, Tree::from(value)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for Tree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Tree::Undefined | Tree::Null => serializer.serialize_unit(),
            Tree::Bool(b) => serializer.serialize_bool(*b),
            Tree::Number(n) => n.serialize(serializer),
            Tree::String(s) => serializer.serialize_str(s),
            Tree::Seq(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Tree::Map(mapping) => {
                let mut map = serializer.serialize_map(None)?;
                for (key, value) in mapping.iter() {
                    if !matches!(value, Tree::Undefined) {
                        map.serialize_entry(key, value)?;
                    }
                }
                map.end()
            }
            Tree::Opaque(value) => value.serialize(serializer),
        }
    }
}

/// Convert every record key in `tree` from snake_case to camelCase.
pub fn to_camel(tree: &Tree) -> Tree {
    convert(tree, camel_key)
}

/// Convert every record key in `tree` from camelCase to snake_case.
pub fn to_snake(tree: &Tree) -> Tree {
    convert(tree, snake_key)
}

fn convert(tree: &Tree, rename: fn(&str) -> String) -> Tree {
    match (shape(tree), tree) {
        (Shape::Sequence, Tree::Seq(items)) => {
            Tree::Seq(items.iter().map(|item| convert(item, rename)).collect())
        }
        (Shape::Mapping, Tree::Map(mapping)) => Tree::Map(
            mapping
                .iter()
                .map(|(key, value)| (rename(key), convert(value, rename)))
                .collect(),
        ),
        _ => tree.clone(),
    }
}

/// `_id` becomes `id`; otherwise every `_x` (x an ASCII lowercase letter)
/// becomes `X`.
pub fn camel_key(key: &str) -> String {
    if key == "_id" {
        return "id".to_string();
    }

    let mut out = String::with_capacity(key.len());
    let mut chars = key.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '_' {
            if let Some(next) = chars.peek().copied().filter(char::is_ascii_lowercase) {
                out.push(next.to_ascii_uppercase());
                chars.next();
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// `id` becomes `_id`; otherwise every ASCII uppercase letter becomes `_x`,
/// except a leading one which is only lowercased.
pub fn snake_key(key: &str) -> String {
    if key == "id" {
        return "_id".to_string();
    }

    let mut out = String::with_capacity(key.len() + 4);
    for (index, c) in key.char_indices() {
        if c.is_ascii_uppercase() {
            if index > 0 {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
