//! The three scope-reader state machines (spec.md §4.5): document, array,
//! object. Structurally parallel to `scopedjson_json::scope`, but each
//! frame additionally carries the declared element type/count of an
//! optimized container, when one is in play.

pub mod array;
pub mod document;
pub mod object;

use crate::token::UbjsonValueType;

/// Which kind of container a [`crate::reader::UbjsonReader`] frame belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Document,
    Array,
    Object,
}

/// A reader's per-frame state (spec.md §3.3, shared with the JSON side).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    InitialState,
    AtStart,
    AtKey,
    AtValue,
    AfterValue,
    AtEnd,
    AtEndOfFile,
}

/// Declared element type and remaining count for an optimized container
/// (spec.md §4.5): `nextValue`/`nextKey` decrement `remaining` and
/// transition to `AtEnd` once it reaches zero, without looking for an
/// explicit terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Optimized {
    pub content_type: UbjsonValueType,
    pub remaining: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct Frame {
    pub kind: ScopeKind,
    pub state: ReaderState,
    /// `Some` only for array/object frames entered from a
    /// `StartOptimizedArray`/`StartOptimizedObject` token.
    pub optimized: Option<Optimized>,
}
