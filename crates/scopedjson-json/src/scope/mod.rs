//! The three scope-reader state machines (§4.2): document, array, object.
//! Each submodule implements the common contract
//! `{next_key, next_value, next_document}` for its container kind, driving
//! the shared [`crate::reader::JsonReader`] stack.

pub mod array;
pub mod document;
pub mod object;

/// Which kind of container a [`crate::reader::Frame`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Document,
    Array,
    Object,
}

/// A reader's per-frame state (spec.md §3.3).
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

#[derive(Debug, Clone, Copy)]
pub struct Frame {
    pub kind: ScopeKind,
    pub state: ReaderState,
}
