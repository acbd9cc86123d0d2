//! Object-scope reader logic (spec.md §4.2): `nextKey` advances to the next
//! member's key (consuming the separating comma and the `:` ahead of the
//! value), `nextValue` then reads the value for that key.

use scopedjson_model::{ScopedJsonError, ScopedJsonResult};

use crate::reader::JsonReader;
use crate::scope::ReaderState;
use crate::token::JsonTokenKind;

/// Reads one `key :` pair starting at `tok` (already consumed as the key
/// candidate). Consumes and discards the colon.
fn finish_key(r: &mut JsonReader, key_tok_kind: JsonTokenKind) -> ScopedJsonResult<()> {
    if key_tok_kind != JsonTokenKind::String && key_tok_kind != JsonTokenKind::Value {
        return Err(ScopedJsonError::structural(
            "expected an object key",
            r.location(),
            "json::scope::object::finish_key",
        ));
    }
    let colon = r.advance_raw()?;
    if colon.kind != JsonTokenKind::Colon {
        return Err(ScopedJsonError::structural(
            "expected ':' after object key",
            r.location(),
            "json::scope::object::finish_key",
        ));
    }
    Ok(())
}

pub(crate) fn next_key(r: &mut JsonReader) -> ScopedJsonResult<bool> {
    let state = r.stack.last().unwrap().state;
    match state {
        ReaderState::AtEnd | ReaderState::AtEndOfFile => Ok(false),
        ReaderState::AtKey | ReaderState::AtValue => {
            // A value was never (or only partially) consumed for the
            // current key: skip it before moving to the next member.
            r.skip_current_value()?;
            r.set_top_state(ReaderState::AfterValue);
            next_key(r)
        }
        ReaderState::AtStart => advance_to_key_or_end(r, false),
        ReaderState::AfterValue => advance_to_key_or_end(r, true),
        ReaderState::InitialState => Err(ScopedJsonError::structural(
            "nextKey called in an invalid object reader state",
            r.location(),
            "json::scope::object::next_key",
        )),
    }
}

/// Advances to the next member's key, or to `AtEnd` on `}`.
///
/// When `expect_comma` is set, a `,` must separate this member from the
/// previous one; a trailing comma directly before `}` is tolerated on read.
fn advance_to_key_or_end(r: &mut JsonReader, expect_comma: bool) -> ScopedJsonResult<bool> {
    let mut tok = r.advance_raw()?;
    if expect_comma {
        match tok.kind {
            JsonTokenKind::EndObject => {
                r.current = tok;
                r.set_top_state(ReaderState::AtEnd);
                r.pending_key = None;
                return Ok(false);
            }
            JsonTokenKind::Comma => tok = r.advance_raw()?,
            _ => {
                return Err(ScopedJsonError::structural(
                    "expected ',' or '}' in object",
                    r.location(),
                    "json::scope::object::advance_to_key_or_end",
                ));
            }
        }
    }
    if tok.kind == JsonTokenKind::EndObject {
        r.current = tok;
        r.set_top_state(ReaderState::AtEnd);
        r.pending_key = None;
        return Ok(false);
    }
    finish_key(r, tok.kind)?;
    r.pending_key = Some(tok.text.clone());
    r.current = tok;
    r.set_top_state(ReaderState::AtKey);
    Ok(true)
}

pub(crate) fn next_value(r: &mut JsonReader) -> ScopedJsonResult<bool> {
    let state = r.stack.last().unwrap().state;
    match state {
        ReaderState::AtKey => {
            let tok = r.advance_raw()?;
            if !tok.kind.is_value_start() {
                return Err(ScopedJsonError::structural(
                    "expected a value after ':'",
                    r.location(),
                    "json::scope::object::next_value",
                ));
            }
            r.current = tok;
            r.set_top_state(ReaderState::AtValue);
            Ok(true)
        }
        ReaderState::AtValue => {
            r.skip_current_value()?;
            r.set_top_state(ReaderState::AfterValue);
            Ok(false)
        }
        ReaderState::AtEnd | ReaderState::AtEndOfFile => Ok(false),
        // Calling nextValue directly (skipping nextKey) is legal: read the
        // key silently, then fall through to the AtKey case above for the
        // colon and value (spec.md §4.2).
        ReaderState::AtStart | ReaderState::AfterValue => {
            if !next_key(r)? {
                return Ok(false);
            }
            next_value(r)
        }
        ReaderState::InitialState => Err(ScopedJsonError::structural(
            "nextValue called in an invalid object reader state",
            r.location(),
            "json::scope::object::next_value",
        )),
    }
}

pub(crate) fn next_document(r: &mut JsonReader) -> ScopedJsonResult<bool> {
    Err(ScopedJsonError::structural(
        "nextDocument is only valid at document scope",
        r.location(),
        "json::scope::object::next_document",
    ))
}
