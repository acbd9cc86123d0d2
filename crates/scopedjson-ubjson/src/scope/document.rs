//! Document-scope reader logic: a document holds exactly one top-level
//! value; `nextDocument` re-arms the reader for a concatenated stream of
//! UBJSON values (spec.md §4.2, shared contract with the JSON side).

use scopedjson_model::{ScopedJsonError, ScopedJsonResult};

use crate::reader::UbjsonReader;
use crate::scope::ReaderState;
use crate::token::UbjsonTokenKind;

pub(crate) fn next_value(r: &mut UbjsonReader) -> ScopedJsonResult<bool> {
    let state = r.top_state();
    match state {
        ReaderState::AtEndOfFile => Ok(false),
        ReaderState::InitialState => {
            let tok = r.advance_raw()?;
            if tok.kind == UbjsonTokenKind::EndOfFile {
                r.current = tok;
                r.set_top_state(ReaderState::AtEndOfFile);
                return Ok(false);
            }
            if !tok.kind.is_value_start() {
                return Err(ScopedJsonError::structural(
                    "expected a value at document start",
                    r.location(),
                    "ubjson::scope::document::next_value",
                ));
            }
            r.current = tok;
            r.set_top_state(ReaderState::AtValue);
            Ok(true)
        }
        ReaderState::AtValue => {
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
            "ubjson::scope::document::next_value",
        )),
    }
}

pub(crate) fn next_key(r: &mut UbjsonReader) -> ScopedJsonResult<bool> {
    Err(ScopedJsonError::structural(
        "nextKey is only valid inside an object",
        r.location(),
        "ubjson::scope::document::next_key",
    ))
}

pub(crate) fn next_document(r: &mut UbjsonReader) -> ScopedJsonResult<bool> {
    if r.top_state() == ReaderState::AtValue {
        r.skip_current_value()?;
    }
    let tok = r.advance_raw()?;
    if tok.kind == UbjsonTokenKind::EndOfFile {
        r.current = tok;
        r.set_top_state(ReaderState::AtEndOfFile);
        return Ok(false);
    }
    if !tok.kind.is_value_start() {
        return Err(ScopedJsonError::structural(
            "expected a value at document start",
            r.location(),
            "ubjson::scope::document::next_document",
        ));
    }
    r.current = tok;
    r.set_top_state(ReaderState::AtValue);
    Ok(true)
}
