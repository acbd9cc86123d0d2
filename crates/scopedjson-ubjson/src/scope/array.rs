//! Array-scope reader logic (spec.md §4.5): a plain array reads values
//! until `]`; an optimized array instead counts down its declared length
//! and never looks for an explicit terminator.

use scopedjson_model::{ScopedJsonError, ScopedJsonResult};

use crate::reader::UbjsonReader;
use crate::scope::ReaderState;
use crate::token::UbjsonTokenKind;

pub(crate) fn next_value(r: &mut UbjsonReader) -> ScopedJsonResult<bool> {
    let frame = r.top();
    match frame.state {
        ReaderState::AtEnd | ReaderState::AtEndOfFile => Ok(false),
        ReaderState::AtValue => {
            r.skip_current_value()?;
            r.set_top_state(ReaderState::AfterValue);
            next_value(r)
        }
        ReaderState::AtStart | ReaderState::AfterValue => {
            if let Some(opt) = frame.optimized {
                if opt.remaining == 0 {
                    r.set_top_state(ReaderState::AtEnd);
                    return Ok(false);
                }
                let tok = r.advance_typed(opt.content_type)?;
                r.current = tok;
                r.decrement_optimized();
                r.set_top_state(ReaderState::AtValue);
                return Ok(true);
            }
            let tok = r.advance_raw()?;
            if tok.kind == UbjsonTokenKind::EndArray {
                r.current = tok;
                r.set_top_state(ReaderState::AtEnd);
                return Ok(false);
            }
            if !tok.kind.is_value_start() {
                return Err(ScopedJsonError::structural(
                    "expected a value or ']' in array",
                    r.location(),
                    "ubjson::scope::array::next_value",
                ));
            }
            r.current = tok;
            r.set_top_state(ReaderState::AtValue);
            Ok(true)
        }
        ReaderState::AtKey | ReaderState::InitialState => Err(ScopedJsonError::structural(
            "nextValue called in an invalid array reader state",
            r.location(),
            "ubjson::scope::array::next_value",
        )),
    }
}

pub(crate) fn next_key(r: &mut UbjsonReader) -> ScopedJsonResult<bool> {
    Err(ScopedJsonError::structural(
        "nextKey is only valid inside an object",
        r.location(),
        "ubjson::scope::array::next_key",
    ))
}

pub(crate) fn next_document(r: &mut UbjsonReader) -> ScopedJsonResult<bool> {
    Err(ScopedJsonError::structural(
        "nextDocument is only valid at document scope",
        r.location(),
        "ubjson::scope::array::next_document",
    ))
}
