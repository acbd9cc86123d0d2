//! Document-scope reader logic (spec.md §4.2): a document holds exactly
//! one top-level value, with `nextDocument` re-arming the reader for a
//! concatenated stream of values (JSON Lines style).

use scopedjson_model::{ScopedJsonError, ScopedJsonResult};

use crate::reader::JsonReader;
use crate::scope::ReaderState;
use crate::token::JsonTokenKind;

pub(crate) fn next_value(r: &mut JsonReader) -> ScopedJsonResult<bool> {
    let state = r.stack.last().unwrap().state;
    match state {
        ReaderState::AtEndOfFile => Ok(false),
        ReaderState::InitialState => {
            let tok = r.advance_raw()?;
            if tok.kind == JsonTokenKind::EndOfFile {
                r.set_top_state(ReaderState::AtEndOfFile);
                r.current = tok;
                return Ok(false);
            }
            if !tok.kind.is_value_start() {
                return Err(ScopedJsonError::structural(
                    "expected a value at document start",
                    r.location(),
                    "json::scope::document::next_value",
                ));
            }
            r.current = tok;
            r.set_top_state(ReaderState::AtValue);
            Ok(true)
        }
        ReaderState::AtValue => {
            // Already positioned; a second call without consuming the
            // value first skips to end.
            r.skip_current_value()?;
            r.set_top_state(ReaderState::AfterValue);
            next_value(r)
        }
        ReaderState::AfterValue | ReaderState::AtEnd => {
            r.set_top_state(ReaderState::AtEndOfFile);
            Ok(false)
        }
        ReaderState::AtStart | ReaderState::AtKey => Err(ScopedJsonError::structural(
            "nextValue is not valid in this reader state",
            r.location(),
            "json::scope::document::next_value",
        )),
    }
}

pub(crate) fn next_key(r: &mut JsonReader) -> ScopedJsonResult<bool> {
    Err(ScopedJsonError::structural(
        "nextKey is only valid inside an object",
        r.location(),
        "json::scope::document::next_key",
    ))
}

pub(crate) fn next_document(r: &mut JsonReader) -> ScopedJsonResult<bool> {
    let state = r.stack.last().unwrap().state;
    if state == ReaderState::AtValue {
        r.skip_current_value()?;
    }
    let tok = r.advance_raw()?;
    if tok.kind == JsonTokenKind::EndOfFile {
        r.set_top_state(ReaderState::AtEndOfFile);
        r.current = tok;
        return Ok(false);
    }
    if !tok.kind.is_value_start() {
        return Err(ScopedJsonError::structural(
            "expected a value at document start",
            r.location(),
            "json::scope::document::next_document",
        ));
    }
    r.current = tok;
    r.set_top_state(ReaderState::AtValue);
    Ok(true)
}
