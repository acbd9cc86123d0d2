//! UBJSON reader façade: the common reader contract (spec.md §4.3) over the
//! [`crate::tokenizer::UbjsonTokenizer`] and the [`crate::scope`] state
//! machines, parallel to `scopedjson_json::reader::JsonReader` but driven by
//! optimized-container counts rather than explicit terminators (spec.md §4.5).

use scopedjson_base64::from_base64_bin;
use scopedjson_model::{
    classify_lexeme, parse_float, parse_high_precision, parse_integer, DetailedValueType, Item, Location,
    ScopedJsonError, ScopedJsonResult, ValueOrigin, ValueType,
};

use crate::scope::{Frame, Optimized, ReaderState, ScopeKind};
use crate::token::{Token, TokenPayload, UbjsonTokenKind, UbjsonValueType};
use crate::tokenizer::UbjsonTokenizer;

/// Extracts the decoded text carried by a `Char`/`String`/`HighPrecision`
/// token, or `None` for any other kind.
pub(crate) fn text_payload(tok: &Token) -> Option<String> {
    match &tok.payload {
        TokenPayload::Text(s) => Some(s.clone()),
        _ => None,
    }
}

/// Renders a scalar token's decoded payload back into the same textual
/// lexeme convention `scopedjson_model::classify_lexeme` expects, so that
/// [`Item::Value`] stays format-agnostic (spec.md §3.5) regardless of
/// whether it was read from JSON or UBJSON.
fn token_to_lexeme(tok: &Token) -> Option<String> {
    match (&tok.kind, &tok.payload) {
        (UbjsonTokenKind::Null, _) => Some("null".to_string()),
        (UbjsonTokenKind::True, _) => Some("true".to_string()),
        (UbjsonTokenKind::False, _) => Some("false".to_string()),
        (_, TokenPayload::Int(v)) => Some(v.to_string()),
        (_, TokenPayload::UInt(v)) => Some(v.to_string()),
        (_, TokenPayload::Float32(v)) => Some(format!("{v}")),
        (_, TokenPayload::Float64(v)) => Some(format!("{v}")),
        (UbjsonTokenKind::HighPrecision, TokenPayload::Text(s)) => Some(s.clone()),
        _ => None,
    }
}

/// The common reader façade, structurally parallel to
/// `scopedjson_json::reader::JsonReader`: a stack of scope frames (bottom
/// always a document frame) dispatched to the scope-reader strategy
/// matching the stack top's kind.
pub struct UbjsonReader {
    pub(crate) tokenizer: UbjsonTokenizer,
    pub(crate) current: Token,
    pub(crate) stack: Vec<Frame>,
    pub(crate) pending_key: Option<String>,
}

impl UbjsonReader {
    /// Builds a reader over a complete, already-available byte buffer.
    pub fn new(input: &[u8]) -> Self {
        let mut tokenizer = UbjsonTokenizer::new();
        tokenizer.feed(input);
        tokenizer.end_of_input();
        Self {
            tokenizer,
            current: Token::simple(UbjsonTokenKind::EndOfFile, 0),
            stack: vec![Frame {
                kind: ScopeKind::Document,
                state: ReaderState::InitialState,
                optimized: None,
            }],
            pending_key: None,
        }
    }

    fn location_of(&self, tok: &Token) -> Location {
        Location::at_byte(tok.position)
    }

    pub fn location(&self) -> Location {
        self.location_of(&self.current)
    }

    pub(crate) fn top(&self) -> Frame {
        *self.stack.last().expect("reader stack is never empty")
    }

    pub(crate) fn top_state(&self) -> ReaderState {
        self.top().state
    }

    pub(crate) fn set_top_state(&mut self, state: ReaderState) {
        self.stack.last_mut().expect("reader stack is never empty").state = state;
    }

    pub(crate) fn decrement_optimized(&mut self) {
        if let Some(opt) = self.stack.last_mut().expect("reader stack is never empty").optimized.as_mut() {
            opt.remaining = opt.remaining.saturating_sub(1);
        }
    }

    fn classify_raw(&self, kind: UbjsonTokenKind, tok: &Token) -> ScopedJsonResult<Token> {
        match kind {
            UbjsonTokenKind::InvalidToken => Err(ScopedJsonError::format(
                "invalid UBJSON token",
                self.location_of(tok),
                "ubjson::reader::advance",
            )),
            UbjsonTokenKind::EndOfBuffer => Err(ScopedJsonError::structural(
                "unexpected end of buffer: reader requires fully-fed input",
                self.location_of(tok),
                "ubjson::reader::advance",
            )),
            _ => Ok(tok.clone()),
        }
    }

    pub(crate) fn advance_raw(&mut self) -> ScopedJsonResult<Token> {
        let tok = self.tokenizer.next_value_token();
        self.classify_raw(tok.kind, &tok)
    }

    pub(crate) fn advance_typed(&mut self, value_type: UbjsonValueType) -> ScopedJsonResult<Token> {
        let tok = self.tokenizer.next_typed_value(value_type);
        self.classify_raw(tok.kind, &tok)
    }

    pub(crate) fn advance_key(&mut self) -> ScopedJsonResult<Token> {
        let tok = self.tokenizer.next_key_token();
        self.classify_raw(tok.kind, &tok)
    }

    /// Drains the remaining siblings of a frame described by `kind`/
    /// `optimized`: for a plain container, reads until the matching closer;
    /// for an optimized one, counts down `optimized.remaining`. Every
    /// element/member read this way is itself fully skipped if it turns out
    /// to be a nested container (spec.md §4.2's skip-value algorithm,
    /// generalized to optimized containers per spec.md §4.5).
    fn drain_remaining(&mut self, kind: ScopeKind, mut optimized: Option<Optimized>) -> ScopedJsonResult<()> {
        loop {
            if let Some(opt) = optimized {
                if opt.remaining == 0 {
                    return Ok(());
                }
            }
            match kind {
                ScopeKind::Array => {
                    let tok = match optimized {
                        Some(opt) => self.advance_typed(opt.content_type)?,
                        None => self.advance_raw()?,
                    };
                    if optimized.is_none() && tok.kind == UbjsonTokenKind::EndArray {
                        return Ok(());
                    }
                    self.current = tok;
                    self.skip_current_value()?;
                    if let Some(opt) = optimized.as_mut() {
                        opt.remaining -= 1;
                    }
                }
                ScopeKind::Object => {
                    let key_tok = self.advance_key()?;
                    if optimized.is_none() && key_tok.kind == UbjsonTokenKind::EndObject {
                        return Ok(());
                    }
                    if key_tok.kind != UbjsonTokenKind::String {
                        return Err(ScopedJsonError::structural(
                            "expected an object key while skipping",
                            self.location_of(&key_tok),
                            "ubjson::reader::drain_remaining",
                        ));
                    }
                    let val_tok = match optimized {
                        Some(opt) => self.advance_typed(opt.content_type)?,
                        None => self.advance_raw()?,
                    };
                    self.current = val_tok;
                    self.skip_current_value()?;
                    if let Some(opt) = optimized.as_mut() {
                        opt.remaining -= 1;
                    }
                }
                ScopeKind::Document => unreachable!("drain_remaining is never called for a document frame"),
            }
        }
    }

    /// Skips over the value at `self.current`, consuming a full nested
    /// tree if it is a container start.
    pub(crate) fn skip_current_value(&mut self) -> ScopedJsonResult<()> {
        match (self.current.kind, self.current.payload.clone()) {
            (UbjsonTokenKind::StartArray, _) => self.drain_remaining(ScopeKind::Array, None),
            (UbjsonTokenKind::StartObject, _) => self.drain_remaining(ScopeKind::Object, None),
            (UbjsonTokenKind::StartOptimizedArray, TokenPayload::Container { content_type, count }) => {
                self.drain_remaining(ScopeKind::Array, Some(Optimized { content_type, remaining: count }))
            }
            (UbjsonTokenKind::StartOptimizedObject, TokenPayload::Container { content_type, count }) => {
                self.drain_remaining(ScopeKind::Object, Some(Optimized { content_type, remaining: count }))
            }
            _ => Ok(()),
        }
    }

    // ---- the common contract ----

    pub fn next_value(&mut self) -> ScopedJsonResult<bool> {
        match self.top().kind {
            ScopeKind::Document => crate::scope::document::next_value(self),
            ScopeKind::Array => crate::scope::array::next_value(self),
            ScopeKind::Object => crate::scope::object::next_value(self),
        }
    }

    pub fn next_key(&mut self) -> ScopedJsonResult<bool> {
        match self.top().kind {
            ScopeKind::Document => crate::scope::document::next_key(self),
            ScopeKind::Array => crate::scope::array::next_key(self),
            ScopeKind::Object => crate::scope::object::next_key(self),
        }
    }

    pub fn next_document(&mut self) -> ScopedJsonResult<bool> {
        match self.top().kind {
            ScopeKind::Document => crate::scope::document::next_document(self),
            ScopeKind::Array => crate::scope::array::next_document(self),
            ScopeKind::Object => crate::scope::object::next_document(self),
        }
    }

    pub fn current_key(&self) -> Option<&str> {
        self.pending_key.as_deref()
    }

    /// Enters the container at the current value. Requires the current
    /// state be `AtValue` with the current token a container start.
    pub fn enter(&mut self) -> ScopedJsonResult<()> {
        if self.top_state() != ReaderState::AtValue || !self.current.kind.is_container_start() {
            return Err(ScopedJsonError::structural(
                "enter() requires the current value to be a container",
                self.location(),
                "ubjson::reader::enter",
            ));
        }
        let (kind, optimized) = match (self.current.kind, self.current.payload.clone()) {
            (UbjsonTokenKind::StartArray, _) => (ScopeKind::Array, None),
            (UbjsonTokenKind::StartObject, _) => (ScopeKind::Object, None),
            (UbjsonTokenKind::StartOptimizedArray, TokenPayload::Container { content_type, count }) => {
                (ScopeKind::Array, Some(Optimized { content_type, remaining: count }))
            }
            (UbjsonTokenKind::StartOptimizedObject, TokenPayload::Container { content_type, count }) => {
                (ScopeKind::Object, Some(Optimized { content_type, remaining: count }))
            }
            _ => unreachable!("is_container_start() guarantees one of the above"),
        };
        self.stack.push(Frame {
            kind,
            state: ReaderState::AtStart,
            optimized,
        });
        self.pending_key = None;
        Ok(())
    }

    /// Leaves the current container, silently consuming any unfinished
    /// content (spec.md §3.3). The frame's `optimized.remaining` (already
    /// decremented by the scope readers as elements/members are read)
    /// tells us exactly how much is left over once the in-flight key/value
    /// pending at `AtKey`/`AtValue` is itself finished off.
    pub fn leave(&mut self) -> ScopedJsonResult<()> {
        if self.stack.len() <= 1 {
            return Err(ScopedJsonError::structural(
                "leave() called at document root",
                self.location(),
                "ubjson::reader::leave",
            ));
        }
        let frame = self.stack.pop().expect("checked len above");
        if frame.state != ReaderState::AtEnd {
            match frame.state {
                ReaderState::AtValue => self.skip_current_value()?,
                ReaderState::AtKey => {
                    let val_tok = match frame.optimized {
                        Some(opt) => self.advance_typed(opt.content_type)?,
                        None => self.advance_raw()?,
                    };
                    self.current = val_tok;
                    self.skip_current_value()?;
                }
                _ => {}
            }
            self.drain_remaining(frame.kind, frame.optimized)?;
        }
        self.pending_key = None;
        self.set_top_state(ReaderState::AfterValue);
        Ok(())
    }

    pub fn is_at_end(&self) -> bool {
        matches!(self.top_state(), ReaderState::AtEnd | ReaderState::AtEndOfFile)
    }

    pub fn scope_depth(&self) -> usize {
        self.stack.len()
    }

    /// Whether the current container (the frame just entered, i.e. the
    /// stack top) was opened from an optimized header.
    pub fn is_optimized_array(&self) -> bool {
        matches!(self.top().kind, ScopeKind::Array) && self.top().optimized.is_some()
    }

    pub fn optimized_count(&self) -> Option<usize> {
        self.top().optimized.map(|o| o.remaining)
    }

    pub fn optimized_content_type(&self) -> Option<UbjsonValueType> {
        self.top().optimized.map(|o| o.content_type)
    }

    // ---- value inspection & coercion ----

    pub fn value_type(&self) -> ValueType {
        match self.current.kind {
            UbjsonTokenKind::Null => ValueType::Null,
            UbjsonTokenKind::True | UbjsonTokenKind::False => ValueType::Boolean,
            UbjsonTokenKind::Int8
            | UbjsonTokenKind::UInt8
            | UbjsonTokenKind::Int16
            | UbjsonTokenKind::Int32
            | UbjsonTokenKind::Int64 => ValueType::Integer,
            UbjsonTokenKind::Float32 | UbjsonTokenKind::Float64 => ValueType::Float,
            UbjsonTokenKind::HighPrecision => match token_to_lexeme(&self.current).map(|l| classify_lexeme(&l)) {
                Some(DetailedValueType::Invalid) | None => ValueType::Invalid,
                _ => ValueType::Float,
            },
            UbjsonTokenKind::Char | UbjsonTokenKind::String => ValueType::String,
            _ => ValueType::Invalid,
        }
    }

    pub fn detailed_value_type(&self) -> DetailedValueType {
        match self.current.kind {
            UbjsonTokenKind::Null => DetailedValueType::NullValue,
            UbjsonTokenKind::True | UbjsonTokenKind::False => DetailedValueType::Boolean,
            UbjsonTokenKind::Int8 => DetailedValueType::SInt8,
            UbjsonTokenKind::UInt8 => DetailedValueType::UInt8,
            UbjsonTokenKind::Int16 => DetailedValueType::SInt16,
            UbjsonTokenKind::Int32 => DetailedValueType::SInt32,
            UbjsonTokenKind::Int64 => DetailedValueType::SInt64,
            UbjsonTokenKind::Float32 => DetailedValueType::Float32,
            UbjsonTokenKind::Float64 => DetailedValueType::Float64,
            UbjsonTokenKind::HighPrecision => DetailedValueType::BigFloat,
            UbjsonTokenKind::Char | UbjsonTokenKind::String => DetailedValueType::String,
            UbjsonTokenKind::StartObject | UbjsonTokenKind::StartOptimizedObject => DetailedValueType::Object,
            UbjsonTokenKind::StartArray | UbjsonTokenKind::StartOptimizedArray => DetailedValueType::Array,
            _ => DetailedValueType::Invalid,
        }
    }

    pub fn read_null(&self) -> bool {
        self.current.kind == UbjsonTokenKind::Null
    }

    /// Accepts `true`/`false`, `null` (→ `false`), and the integers `0`/`1`
    /// (spec.md §4.3 — shared coercion rule with the JSON side).
    pub fn read_bool(&self) -> Option<bool> {
        match self.current.kind {
            UbjsonTokenKind::True => Some(true),
            UbjsonTokenKind::False | UbjsonTokenKind::Null => Some(self.current.kind == UbjsonTokenKind::True),
            _ => match self.read_i64() {
                Some(0) => Some(false),
                Some(1) => Some(true),
                _ => None,
            },
        }
    }

    pub fn read_i64(&self) -> Option<i64> {
        match &self.current.payload {
            TokenPayload::Int(v) => Some(*v),
            TokenPayload::UInt(v) => i64::try_from(*v).ok(),
            TokenPayload::Text(s) if self.current.kind == UbjsonTokenKind::HighPrecision => {
                parse_integer(s).and_then(|v| i64::try_from(v).ok())
            }
            _ => None,
        }
    }

    pub fn read_u64(&self) -> Option<u64> {
        match &self.current.payload {
            TokenPayload::Int(v) => u64::try_from(*v).ok(),
            TokenPayload::UInt(v) => Some(*v),
            TokenPayload::Text(s) if self.current.kind == UbjsonTokenKind::HighPrecision => {
                parse_integer(s).and_then(|v| u64::try_from(v).ok())
            }
            _ => None,
        }
    }

    /// `null` reads as positive infinity on the UBJSON side — a deliberate
    /// permissive coercion (spec.md §4.3, §9(b)), unlike the JSON reader
    /// where `null` is never a legal float.
    pub fn read_f64(&self) -> Option<f64> {
        match self.current.kind {
            UbjsonTokenKind::Null => Some(f64::INFINITY),
            UbjsonTokenKind::Float32 => match self.current.payload {
                TokenPayload::Float32(v) => Some(v as f64),
                _ => None,
            },
            UbjsonTokenKind::Float64 => match self.current.payload {
                TokenPayload::Float64(v) => Some(v),
                _ => None,
            },
            UbjsonTokenKind::HighPrecision => match &self.current.payload {
                TokenPayload::Text(s) => parse_high_precision(s),
                _ => None,
            },
            UbjsonTokenKind::Int8 | UbjsonTokenKind::UInt8 | UbjsonTokenKind::Int16 | UbjsonTokenKind::Int32 | UbjsonTokenKind::Int64 => {
                self.read_i64().map(|v| v as f64)
            }
            _ => {
                let _ = parse_float;
                None
            }
        }
    }

    pub fn read_string(&self) -> Option<String> {
        match self.current.kind {
            UbjsonTokenKind::Char | UbjsonTokenKind::String | UbjsonTokenKind::HighPrecision => text_payload(&self.current),
            _ => None,
        }
    }

    pub fn read_base64(&self) -> ScopedJsonResult<Vec<u8>> {
        if self.current.kind != UbjsonTokenKind::String {
            return Err(ScopedJsonError::coercion(
                "readBase64 called on a non-string value",
                self.location(),
                "ubjson::reader::read_base64",
            ));
        }
        let text = text_payload(&self.current).expect("String token always carries text payload");
        let bytes = text.as_bytes();
        from_base64_bin(bytes, 0, bytes.len()).map_err(|e| {
            ScopedJsonError::coercion(format!("invalid base64: {e}"), self.location(), "ubjson::reader::read_base64")
        })
    }

    /// Reads a UInt8-typed optimized array as raw bytes in one bulk pass
    /// (spec.md §4.5's `readOptimizedArray<T>`, the inverse of the writer's
    /// `binary()`). Falls back to base64-decoding a string value when the
    /// current value isn't such an array.
    pub fn read_binary(&mut self) -> ScopedJsonResult<Vec<u8>> {
        let is_u8_array = matches!(
            (self.current.kind, &self.current.payload),
            (UbjsonTokenKind::StartOptimizedArray, TokenPayload::Container { content_type: UbjsonValueType::UInt8, .. })
        );
        if !is_u8_array {
            return self.read_base64();
        }
        self.enter()?;
        let mut bytes = Vec::new();
        while self.next_value()? {
            match self.read_u64() {
                Some(v) => bytes.push(v as u8),
                None => {
                    return Err(ScopedJsonError::coercion(
                        "non-integer element in a UInt8 optimized array",
                        self.location(),
                        "ubjson::reader::read_binary",
                    ))
                }
            }
        }
        self.leave()?;
        Ok(bytes)
    }

    /// Bulk-reads every element of the current UInt8-typed optimized array
    /// into a `Vec<u8>` without base64 fallback. The inverse is
    /// `UbjsonWriter::write_binary`.
    pub fn read_optimized_array_u8(&mut self) -> ScopedJsonResult<Vec<u8>> {
        self.read_binary()
    }

    /// Bulk-reads every element of the current integer-typed optimized
    /// array into one `Vec<i64>` (spec.md §4.5). Errors if the current
    /// value isn't an optimized array with a declared integer element type.
    pub fn read_optimized_array_i64(&mut self) -> ScopedJsonResult<Vec<i64>> {
        let content_type = match (self.current.kind, &self.current.payload) {
            (UbjsonTokenKind::StartOptimizedArray, TokenPayload::Container { content_type, .. }) => *content_type,
            _ => {
                return Err(ScopedJsonError::coercion(
                    "readOptimizedArray called on a non-optimized-array value",
                    self.location(),
                    "ubjson::reader::read_optimized_array_i64",
                ))
            }
        };
        if !matches!(
            content_type,
            UbjsonValueType::Int8 | UbjsonValueType::UInt8 | UbjsonValueType::Int16 | UbjsonValueType::Int32 | UbjsonValueType::Int64
        ) {
            return Err(ScopedJsonError::coercion(
                "readOptimizedArray<i64> called on a non-integer-typed optimized array",
                self.location(),
                "ubjson::reader::read_optimized_array_i64",
            ));
        }
        self.enter()?;
        let mut out = Vec::new();
        while self.next_value()? {
            out.push(self.read_i64().ok_or_else(|| {
                ScopedJsonError::coercion(
                    "non-integer element in a typed optimized array",
                    self.location(),
                    "ubjson::reader::read_optimized_array_i64",
                )
            })?);
        }
        self.leave()?;
        Ok(out)
    }

    /// Builds the full in-memory tree rooted at the current value. Reader
    /// state afterwards is `AtValue` on the container's boundary, same
    /// contract as `JsonReader::read_item` (spec.md §4.3).
    pub fn read_item(&mut self) -> ScopedJsonResult<Item> {
        match self.current.kind {
            UbjsonTokenKind::StartObject | UbjsonTokenKind::StartOptimizedObject => {
                self.enter()?;
                let mut obj = Item::object();
                while self.next_key()? {
                    let key = self.current_key().expect("next_key sets pending_key").to_string();
                    self.next_value()?;
                    let value = self.read_item()?;
                    obj.insert(key, value);
                }
                self.leave()?;
                Ok(obj)
            }
            UbjsonTokenKind::StartArray | UbjsonTokenKind::StartOptimizedArray => {
                self.enter()?;
                let mut arr = Item::array();
                while self.next_value()? {
                    arr.push(self.read_item()?);
                }
                self.leave()?;
                Ok(arr)
            }
            UbjsonTokenKind::Char | UbjsonTokenKind::String => {
                Ok(Item::string(text_payload(&self.current).unwrap_or_default(), ValueOrigin::Ubjson))
            }
            _ => match token_to_lexeme(&self.current) {
                Some(lexeme) => Ok(Item::value(lexeme, ValueOrigin::Ubjson)),
                None => Err(ScopedJsonError::coercion(
                    "readItem called with no value at the cursor",
                    self.location(),
                    "ubjson::reader::read_item",
                )),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_flat_object() {
        let mut bytes = vec![b'{'];
        bytes.push(b'U');
        bytes.push(1);
        bytes.extend_from_slice(b"a");
        bytes.push(b'U');
        bytes.push(1);
        bytes.push(b'}');
        let mut r = UbjsonReader::new(&bytes);
        r.next_value().unwrap();
        let item = r.read_item().unwrap();
        assert_eq!(item.as_object().unwrap()["a"].as_lexeme(), Some("1"));
    }

    #[test]
    fn reads_optimized_int16_array_in_bulk() {
        let bytes = [b'[', b'$', b'I', b'#', b'U', 3, 0x00, 0x02, 0x00, 0xC8, 0x4E, 0x20];
        let mut r = UbjsonReader::new(&bytes);
        r.next_value().unwrap();
        let vals = r.read_optimized_array_i64().unwrap();
        assert_eq!(vals, vec![2, 200, 20000]);
    }

    #[test]
    fn leave_skips_unfinished_optimized_array() {
        let bytes = [b'[', b'$', b'U', b'#', b'U', 3, 10, 20, 30];
        let mut r = UbjsonReader::new(&bytes);
        r.next_value().unwrap();
        r.enter().unwrap();
        r.next_value().unwrap();
        assert_eq!(r.read_u64(), Some(10));
        r.leave().unwrap();
        assert_eq!(r.next_value().unwrap(), false);
    }

    #[test]
    fn null_reads_as_positive_infinity_float() {
        let mut r = UbjsonReader::new(b"Z");
        r.next_value().unwrap();
        assert_eq!(r.read_f64(), Some(f64::INFINITY));
    }

    #[test]
    fn next_value_without_next_key_reads_the_key_silently() {
        // spec.md §4.2/§4.5: calling nextValue directly at AtStart
        // (skipping nextKey) is legal on the UBJSON side too.
        let mut bytes = vec![b'{'];
        bytes.push(b'U');
        bytes.push(1);
        bytes.extend_from_slice(b"a");
        bytes.push(b'U');
        bytes.push(1);
        bytes.push(b'}');
        let mut r = UbjsonReader::new(&bytes);
        r.next_value().unwrap();
        r.enter().unwrap();
        assert!(r.next_value().unwrap());
        assert_eq!(r.current_key(), Some("a"));
        assert_eq!(r.read_u64(), Some(1));
        assert!(!r.next_value().unwrap());
        r.leave().unwrap();
    }
}
