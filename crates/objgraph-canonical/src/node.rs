//! Visitable node model.
//!
//! Every input the walker accepts is first adapted into a [`Node`]: a closed
//! union of scalar, sequence, record and map. Adapters exist for common Rust
//! types through `From` and for any `serde::Serialize` type through
//! [`to_node`]; callers may also build nodes by hand.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use crate::timestamp::Timestamp;
use crate::value::Scalar;

pub use crate::ser::to_node;

/// Classified input value.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Leaf; becomes one VALUE event.
    Scalar(Scalar),
    /// Ordered, index-addressed composite.
    Sequence(Vec<Node>),
    /// Composite with a fixed set of named fields.
    Record(Record),
    /// Composite keyed by text at runtime.
    Map(Vec<(String, Node)>),
}

impl Node {
    /// The null scalar.
    pub fn null() -> Self {
        Node::Scalar(Scalar::Null)
    }

    /// Builds a map node from `(key, value)` pairs in any order.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Node>,
        I: IntoIterator<Item = (K, V)>,
    {
        Node::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Whether a record field may be read outside its declaring scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Readable by the walker.
    Public,
    /// Not readable; walking the record is a configuration error.
    Private,
}

/// Named field of a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Declared name.
    pub name: String,
    /// Explicit external name, replacing `name` as the key when present.
    pub rename: Option<String>,
    /// Accessibility of the field.
    pub visibility: Visibility,
    /// Field value.
    pub value: Node,
}

impl Field {
    /// Key under which the field is emitted.
    pub fn key(&self) -> &str {
        self.rename.as_deref().unwrap_or(&self.name)
    }
}

/// Fixed-named-field composite, such as a struct.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Declared type name, used in diagnostics.
    pub type_name: String,
    /// Fields in declaration order.
    pub fields: Vec<Field>,
}

impl Record {
    /// Record with no fields yet.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Adds a public field.
    pub fn field(self, name: impl Into<String>, value: impl Into<Node>) -> Self {
        self.push(name.into(), None, Visibility::Public, value.into())
    }

    /// Adds a public field emitted under `rename`.
    pub fn renamed_field(
        self,
        name: impl Into<String>,
        rename: impl Into<String>,
        value: impl Into<Node>,
    ) -> Self {
        self.push(
            name.into(),
            Some(rename.into()),
            Visibility::Public,
            value.into(),
        )
    }

    /// Adds a field that is not accessible to the walker.
    pub fn private_field(self, name: impl Into<String>, value: impl Into<Node>) -> Self {
        self.push(name.into(), None, Visibility::Private, value.into())
    }

    fn push(mut self, name: String, rename: Option<String>, visibility: Visibility, value: Node) -> Self {
        self.fields.push(Field {
            name,
            rename,
            visibility,
            value,
        });
        self
    }
}

impl From<Record> for Node {
    fn from(value: Record) -> Self {
        Node::Record(value)
    }
}

impl From<Scalar> for Node {
    fn from(value: Scalar) -> Self {
        Node::Scalar(value)
    }
}

macro_rules! scalar_from {
    ($variant:ident as $target:ty: $($source:ty),+) => {
        $(
            impl From<$source> for Node {
                fn from(value: $source) -> Self {
                    Node::Scalar(Scalar::$variant(<$target>::from(value)))
                }
            }
        )+
    };
}

scalar_from!(Bool as bool: bool);
scalar_from!(Int as i64: i8, i16, i32, i64);
scalar_from!(UInt as u64: u8, u16, u32, u64);
scalar_from!(Float as f64: f32, f64);
scalar_from!(Str as String: String, &str);
scalar_from!(Timestamp as Timestamp: Timestamp, DateTime<Utc>);

impl From<char> for Node {
    fn from(value: char) -> Self {
        Node::Scalar(Scalar::Str(value.to_string()))
    }
}

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_else(Node::null)
    }
}

impl<T: Into<Node>> From<Vec<T>> for Node {
    fn from(value: Vec<T>) -> Self {
        Node::Sequence(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Node>> From<BTreeMap<String, T>> for Node {
    fn from(value: BTreeMap<String, T>) -> Self {
        Node::map(value)
    }
}

impl<T: Into<Node>, S> From<HashMap<String, T, S>> for Node {
    fn from(value: HashMap<String, T, S>) -> Self {
        Node::map(value)
    }
}
