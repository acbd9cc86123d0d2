//! Array-scope reader logic (spec.md §4.2): comma-separated values between
//! `[` and `]`, trailing commas tolerated on read.

use scopedjson_model::{ScopedJsonError, ScopedJsonResult};

use crate::reader::JsonReader;
use crate::scope::ReaderState;
use crate::token::JsonTokenKind;

pub(crate) fn next_value(r: &mut JsonReader) -> ScopedJsonResult<bool> {
    let state = r.stack.last().unwrap().state;
    match state {
        ReaderState::AtEnd | ReaderState::AtEndOfFile => Ok(false),
        ReaderState::AtStart => advance_to_value_or_end(r, false),
        ReaderState::AtValue => {
            r.skip_current_value()?;
            r.set_top_state(ReaderState::AfterValue);
            next_value(r)
        }
        ReaderState::AfterValue => advance_to_value_or_end(r, true),
        ReaderState::AtKey | ReaderState::InitialState => Err(ScopedJsonError::structural(
            "nextValue called in an invalid array reader state",
            r.location(),
            "json::scope::array::next_value",
        )),
    }
}

/// Advances past an expected comma (if `expect_comma`, tolerating its
/// absence only directly before `]`, i.e. a trailing comma) and positions
/// on the next value, or reports `AtEnd` on `]`.
fn advance_to_value_or_end(r: &mut JsonReader, expect_comma: bool) -> ScopedJsonResult<bool> {
    let mut tok = r.advance_raw()?;
    if expect_comma {
        match tok.kind {
            JsonTokenKind::EndArray => {
                r.current = tok;
                r.set_top_state(ReaderState::AtEnd);
                return Ok(false);
            }
            JsonTokenKind::Comma => tok = r.advance_raw()?,
            _ => {
                return Err(ScopedJsonError::structural(
                    "expected ',' or ']' in array",
                    r.location(),
                    "json::scope::array::advance_to_value_or_end",
                ));
            }
        }
    }
    if tok.kind == JsonTokenKind::EndArray {
        r.current = tok;
        r.set_top_state(ReaderState::AtEnd);
        return Ok(false);
    }
    if !tok.kind.is_value_start() {
        return Err(ScopedJsonError::structural(
            "expected a value or ']' in array",
            r.location(),
            "json::scope::array::advance_to_value_or_end",
        ));
    }
    r.current = tok;
    r.set_top_state(ReaderState::AtValue);
    Ok(true)
}

pub(crate) fn next_key(r: &mut JsonReader) -> ScopedJsonResult<bool> {
    Err(ScopedJsonError::structural(
        "nextKey is only valid inside an object",
        r.location(),
        "json::scope::array::next_key",
    ))
}

pub(crate) fn next_document(r: &mut JsonReader) -> ScopedJsonResult<bool> {
    Err(ScopedJsonError::structural(
        "nextDocument is only valid at document scope",
        r.location(),
        "json::scope::array::next_document",
    ))
}
