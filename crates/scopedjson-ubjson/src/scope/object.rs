//! Object-scope reader logic (spec.md §4.5): keys come from the
//! tokenizer's key-position mode (a bare length-prefixed string, or the
//! closing `}`); values follow, read at the container's declared optimized
//! element type when one is in play.

use scopedjson_model::{ScopedJsonError, ScopedJsonResult};

use crate::reader::{text_payload, UbjsonReader};
use crate::scope::ReaderState;
use crate::token::UbjsonTokenKind;

pub(crate) fn next_key(r: &mut UbjsonReader) -> ScopedJsonResult<bool> {
    let frame = r.top();
    match frame.state {
        ReaderState::AtEnd | ReaderState::AtEndOfFile => Ok(false),
        ReaderState::AtKey | ReaderState::AtValue => {
            r.skip_current_value()?;
            r.set_top_state(ReaderState::AfterValue);
            next_key(r)
        }
        ReaderState::AtStart | ReaderState::AfterValue => {
            if let Some(opt) = frame.optimized {
                if opt.remaining == 0 {
                    r.set_top_state(ReaderState::AtEnd);
                    r.pending_key = None;
                    return Ok(false);
                }
            }
            let tok = r.advance_key()?;
            if tok.kind == UbjsonTokenKind::EndObject {
                r.current = tok;
                r.set_top_state(ReaderState::AtEnd);
                r.pending_key = None;
                return Ok(false);
            }
            if tok.kind != UbjsonTokenKind::String {
                return Err(ScopedJsonError::structural(
                    "expected an object key",
                    r.location(),
                    "ubjson::scope::object::next_key",
                ));
            }
            r.pending_key = text_payload(&tok);
            r.current = tok;
            if frame.optimized.is_some() {
                r.decrement_optimized();
            }
            r.set_top_state(ReaderState::AtKey);
            Ok(true)
        }
        ReaderState::InitialState => Err(ScopedJsonError::structural(
            "nextKey called in an invalid object reader state",
            r.location(),
            "ubjson::scope::object::next_key",
        )),
    }
}

pub(crate) fn next_value(r: &mut UbjsonReader) -> ScopedJsonResult<bool> {
    let frame = r.top();
    match frame.state {
        ReaderState::AtKey => {
            let tok = match frame.optimized {
                Some(opt) => r.advance_typed(opt.content_type)?,
                None => r.advance_raw()?,
            };
            if !tok.kind.is_value_start() {
                return Err(ScopedJsonError::structural(
                    "expected a value after an object key",
                    r.location(),
                    "ubjson::scope::object::next_value",
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
        // value (spec.md §4.2, generalized to UBJSON by spec.md §4.5).
        ReaderState::AtStart | ReaderState::AfterValue => {
            if !next_key(r)? {
                return Ok(false);
            }
            next_value(r)
        }
        ReaderState::InitialState => Err(ScopedJsonError::structural(
            "nextValue called in an invalid object reader state",
            r.location(),
            "ubjson::scope::object::next_value",
        )),
    }
}

pub(crate) fn next_document(r: &mut UbjsonReader) -> ScopedJsonResult<bool> {
    Err(ScopedJsonError::structural(
        "nextDocument is only valid at document scope",
        r.location(),
        "ubjson::scope::object::next_document",
    ))
}
