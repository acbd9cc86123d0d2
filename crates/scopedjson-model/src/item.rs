//! In-memory document tree shared by the JSON and UBJSON readers/writers.
//!
//! An [`Item`] is one of three variants: an insertion-ordered object, an
//! ordered array, or a scalar value carrying its originating lexeme plus the
//! token kind it was read from. Keys are owned strings so that views into
//! them stay valid independent of the source buffer's lifetime.

use indexmap::IndexMap;

/// Which format a scalar [`Item::Value`] was read from, for callers that
/// need to recover the exact wire representation (e.g. re-emitting a UBJSON
/// `Char` rather than a single-character `String`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueOrigin {
    Json,
    Ubjson,
}

/// A document tree node: object, array, or scalar.
///
/// Object re-insertion of an existing key overwrites the value but keeps the
/// key's original position, matching [`IndexMap`]'s `insert` semantics.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Object(IndexMap<String, Item>),
    Array(Vec<Item>),
    Value {
        lexeme: String,
        origin: ValueOrigin,
        /// Whether the source token was a quoted string rather than a bare
        /// literal (number, `true`/`false`/`null`, or unquoted identifier).
        /// A writer needs this to re-emit the value with the right quoting
        /// — `lexeme` alone can't tell a string `"123"` from the number
        /// `123`.
        is_string: bool,
    },
}

impl Item {
    pub fn object() -> Self {
        Item::Object(IndexMap::new())
    }

    pub fn array() -> Self {
        Item::Array(Vec::new())
    }

    /// A bare literal: number, `true`/`false`/`null`, or unquoted identifier.
    pub fn value(lexeme: impl Into<String>, origin: ValueOrigin) -> Self {
        Item::Value {
            lexeme: lexeme.into(),
            origin,
            is_string: false,
        }
    }

    /// A string value, quoted on write regardless of what `lexeme` looks like.
    pub fn string(lexeme: impl Into<String>, origin: ValueOrigin) -> Self {
        Item::Value {
            lexeme: lexeme.into(),
            origin,
            is_string: true,
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Item::Object(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Item::Array(_))
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, Item>> {
        match self {
            Item::Object(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Item]> {
        match self {
            Item::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_lexeme(&self) -> Option<&str> {
        match self {
            Item::Value { lexeme, .. } => Some(lexeme),
            _ => None,
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Item::Value { is_string: true, .. })
    }

    /// Inserts `key` into an object, overwriting any existing value while
    /// preserving the key's original insertion position.
    pub fn insert(&mut self, key: impl Into<String>, value: Item) {
        match self {
            Item::Object(m) => {
                m.insert(key.into(), value);
            }
            _ => panic!("Item::insert called on a non-object item"),
        }
    }

    pub fn push(&mut self, value: Item) {
        match self {
            Item::Array(a) => a.push(value),
            _ => panic!("Item::push called on a non-array item"),
        }
    }
}
