//! JSON reader façade: the single entry point exposing the common
//! reader contract over the [`crate::tokenizer::JsonTokenizer`] and the
//! [`crate::scope`] state machines (spec.md §4.3).

use scopedjson_base64::from_base64_bin;
use scopedjson_model::{
    classify_lexeme, classify_value_type, parse_float, parse_integer, unescape, DetailedValueType,
    Item, Location, ScopedJsonError, ScopedJsonResult, ValueOrigin, ValueType,
};

use crate::scope::{Frame, ReaderState, ScopeKind};
use crate::token::{JsonTokenKind, Token};
use crate::tokenizer::JsonTokenizer;

/// The common reader façade. Owns a stack of scope frames (bottom always a
/// document frame, per spec.md §3.3's invariant) and dispatches each call
/// to the scope-reader strategy matching the stack top's kind.
pub struct JsonReader {
    pub(crate) tokenizer: JsonTokenizer,
    pub(crate) current: Token,
    pub(crate) stack: Vec<Frame>,
    /// The most recently read object key, set by `next_key` and consumed
    /// by the following `next_value`.
    pub(crate) pending_key: Option<String>,
}

impl JsonReader {
    /// Builds a reader over a complete, already-available byte buffer.
    pub fn new(input: &[u8]) -> Self {
        let mut tokenizer = JsonTokenizer::new();
        tokenizer.feed(input);
        tokenizer.end_of_input();
        let current = Token::new(JsonTokenKind::EndOfFile, 0, 0, String::new(), 1, 1);
        Self {
            tokenizer,
            current,
            stack: vec![Frame {
                kind: ScopeKind::Document,
                state: ReaderState::InitialState,
            }],
            pending_key: None,
        }
    }

    /// Pulls the next semantically-meaningful token, skipping whitespace,
    /// newlines, and comments, and raising a format error on an invalid
    /// token or a premature end-of-buffer (streaming resumption is the
    /// tokenizer's concern; the façade always operates over fully-fed
    /// input).
    pub(crate) fn advance_raw(&mut self) -> ScopedJsonResult<Token> {
        loop {
            let tok = self.tokenizer.next_token();
            match tok.kind {
                JsonTokenKind::Whitespace | JsonTokenKind::Newline | JsonTokenKind::Comment | JsonTokenKind::BlockComment => {
                    continue;
                }
                JsonTokenKind::InvalidToken => {
                    return Err(ScopedJsonError::format(
                        format!("invalid token near {:?}", tok.text),
                        self.location_of(&tok),
                        "json::reader::advance_raw",
                    ));
                }
                JsonTokenKind::EndOfBuffer => {
                    return Err(ScopedJsonError::structural(
                        "unexpected end of buffer: reader requires fully-fed input",
                        self.location_of(&tok),
                        "json::reader::advance_raw",
                    ));
                }
                _ => return Ok(tok),
            }
        }
    }

    fn location_of(&self, tok: &Token) -> Location {
        Location::new(tok.start, tok.line, tok.column)
    }

    pub fn location(&self) -> Location {
        self.location_of(&self.current)
    }

    fn top(&self) -> Frame {
        *self.stack.last().expect("reader stack is never empty")
    }

    pub(crate) fn set_top_state(&mut self, state: ReaderState) {
        self.stack.last_mut().expect("reader stack is never empty").state = state;
    }

    /// Drains tokens until the given container's closing marker is
    /// reached, accounting for nested containers (spec.md §4.2's
    /// skip-value algorithm, generalized to also cover `leave`).
    pub(crate) fn drain_to_closer(&mut self, closer: JsonTokenKind) -> ScopedJsonResult<()> {
        let mut expect = vec![closer];
        if self.current.kind.is_container_start() {
            expect.push(if self.current.kind == JsonTokenKind::StartObject {
                JsonTokenKind::EndObject
            } else {
                JsonTokenKind::EndArray
            });
        }
        while let Some(top) = expect.last().copied() {
            let tok = self.advance_raw()?;
            match tok.kind {
                JsonTokenKind::StartObject => expect.push(JsonTokenKind::EndObject),
                JsonTokenKind::StartArray => expect.push(JsonTokenKind::EndArray),
                JsonTokenKind::EndObject | JsonTokenKind::EndArray => {
                    if tok.kind != top {
                        return Err(ScopedJsonError::structural(
                            "mismatched container end while skipping",
                            self.location_of(&tok),
                            "json::reader::drain_to_closer",
                        ));
                    }
                    expect.pop();
                }
                JsonTokenKind::EndOfFile => {
                    return Err(ScopedJsonError::structural(
                        "unexpected end of document while skipping value",
                        self.location_of(&tok),
                        "json::reader::drain_to_closer",
                    ));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Skips over the value at `self.current`, consuming a full nested
    /// tree if it is a container start.
    pub(crate) fn skip_current_value(&mut self) -> ScopedJsonResult<()> {
        if !self.current.kind.is_container_start() {
            return Ok(());
        }
        let closer = if self.current.kind == JsonTokenKind::StartObject {
            JsonTokenKind::EndObject
        } else {
            JsonTokenKind::EndArray
        };
        let mut expect = vec![closer];
        while let Some(top) = expect.last().copied() {
            let tok = self.advance_raw()?;
            match tok.kind {
                JsonTokenKind::StartObject => expect.push(JsonTokenKind::EndObject),
                JsonTokenKind::StartArray => expect.push(JsonTokenKind::EndArray),
                JsonTokenKind::EndObject | JsonTokenKind::EndArray => {
                    if tok.kind != top {
                        return Err(ScopedJsonError::structural(
                            "mismatched container end while skipping",
                            self.location_of(&tok),
                            "json::reader::skip_current_value",
                        ));
                    }
                    expect.pop();
                }
                JsonTokenKind::EndOfFile => {
                    return Err(ScopedJsonError::structural(
                        "unexpected end of document while skipping value",
                        self.location_of(&tok),
                        "json::reader::skip_current_value",
                    ));
                }
                _ => {}
            }
        }
        Ok(())
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
            _ => Err(ScopedJsonError::structural(
                "nextDocument is only valid at document scope",
                self.location(),
                "json::reader::next_document",
            )),
        }
    }

    /// The most recently read object key, if any.
    pub fn current_key(&self) -> Option<&str> {
        self.pending_key.as_deref()
    }

    /// Enters the container at the current value. Requires the current
    /// state be `AtValue` with the current token a container start.
    pub fn enter(&mut self) -> ScopedJsonResult<()> {
        if self.top().state != ReaderState::AtValue || !self.current.kind.is_container_start() {
            return Err(ScopedJsonError::structural(
                "enter() requires the current value to be a container",
                self.location(),
                "json::reader::enter",
            ));
        }
        let kind = if self.current.kind == JsonTokenKind::StartObject {
            ScopeKind::Object
        } else {
            ScopeKind::Array
        };
        self.stack.push(Frame {
            kind,
            state: ReaderState::AtStart,
        });
        self.pending_key = None;
        Ok(())
    }

    /// Leaves the current container, silently consuming any unfinished
    /// content (spec.md §3.3).
    pub fn leave(&mut self) -> ScopedJsonResult<()> {
        if self.stack.len() <= 1 {
            return Err(ScopedJsonError::structural(
                "leave() called at document root",
                self.location(),
                "json::reader::leave",
            ));
        }
        let frame = self.stack.pop().expect("checked len above");
        if frame.state != ReaderState::AtEnd {
            let closer = if frame.kind == ScopeKind::Object {
                JsonTokenKind::EndObject
            } else {
                JsonTokenKind::EndArray
            };
            self.drain_to_closer(closer)?;
        }
        self.pending_key = None;
        self.set_top_state(ReaderState::AfterValue);
        Ok(())
    }

    pub fn is_at_end(&self) -> bool {
        matches!(self.top().state, ReaderState::AtEnd | ReaderState::AtEndOfFile)
    }

    pub fn scope_depth(&self) -> usize {
        self.stack.len()
    }

    // ---- value inspection & coercion ----

    pub fn value_type(&self) -> ValueType {
        match self.current.kind {
            JsonTokenKind::StartObject | JsonTokenKind::StartArray => ValueType::Invalid,
            JsonTokenKind::String => ValueType::String,
            JsonTokenKind::Value => classify_value_type(&self.current.text),
            _ => ValueType::Invalid,
        }
    }

    pub fn detailed_value_type(&self) -> DetailedValueType {
        match self.current.kind {
            JsonTokenKind::StartObject => DetailedValueType::Object,
            JsonTokenKind::StartArray => DetailedValueType::Array,
            JsonTokenKind::String => DetailedValueType::String,
            JsonTokenKind::Value => classify_lexeme(&self.current.text),
            _ => DetailedValueType::Invalid,
        }
    }

    /// `true` only if the current token's text is exactly `null`.
    pub fn read_null(&self) -> bool {
        self.current.kind == JsonTokenKind::Value && self.current.text == "null"
    }

    /// Accepts `true`, `false`, `null` (→ `false`), and the integers `0`/`1`.
    pub fn read_bool(&self) -> Option<bool> {
        if self.current.kind != JsonTokenKind::Value {
            return None;
        }
        match self.current.text.as_str() {
            "true" | "1" => Some(true),
            "false" | "0" | "null" => Some(false),
            _ => None,
        }
    }

    pub fn read_i64(&self) -> Option<i64> {
        if self.current.kind != JsonTokenKind::Value {
            return None;
        }
        let v = parse_integer(&self.current.text)?;
        i64::try_from(v).ok()
    }

    pub fn read_u64(&self) -> Option<u64> {
        if self.current.kind != JsonTokenKind::Value {
            return None;
        }
        let v = parse_integer(&self.current.text)?;
        u64::try_from(v).ok()
    }

    /// `null` is not a legal float on the JSON side (unlike UBJSON).
    pub fn read_f64(&self) -> Option<f64> {
        if self.current.kind != JsonTokenKind::Value || self.current.text == "null" {
            return None;
        }
        parse_float(&self.current.text)
    }

    /// Returns the current string value, unescaping it if it carries a
    /// `String` token kind (already unescaped by the tokenizer) or, for a
    /// bare `Value` token (e.g. an unquoted identifier), as-is.
    pub fn read_string(&self) -> Option<String> {
        match self.current.kind {
            JsonTokenKind::String => Some(self.current.text.clone()),
            JsonTokenKind::Value => Some(self.current.text.clone()),
            _ => None,
        }
    }

    pub fn read_base64(&self) -> ScopedJsonResult<Vec<u8>> {
        if self.current.kind != JsonTokenKind::String {
            return Err(ScopedJsonError::coercion(
                "readBase64 called on a non-string value",
                self.location(),
                "json::reader::read_base64",
            ));
        }
        let bytes = self.current.text.as_bytes();
        from_base64_bin(bytes, 0, bytes.len()).map_err(|e| {
            ScopedJsonError::coercion(format!("invalid base64: {e}"), self.location(), "json::reader::read_base64")
        })
    }

    pub fn read_binary(&self) -> ScopedJsonResult<Vec<u8>> {
        self.read_base64()
    }

    /// Builds the full in-memory tree rooted at the current value. Reader
    /// state afterwards is `AtValue` on the container's boundary — the
    /// caller must still advance or leave (spec.md §4.3).
    pub fn read_item(&mut self) -> ScopedJsonResult<Item> {
        match self.current.kind {
            JsonTokenKind::StartObject => {
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
            JsonTokenKind::StartArray => {
                self.enter()?;
                let mut arr = Item::array();
                while self.next_value()? {
                    arr.push(self.read_item()?);
                }
                self.leave()?;
                Ok(arr)
            }
            JsonTokenKind::String => Ok(Item::string(self.current.text.clone(), ValueOrigin::Json)),
            JsonTokenKind::Value => Ok(Item::value(self.current.text.clone(), ValueOrigin::Json)),
            _ => Err(ScopedJsonError::coercion(
                "readItem called with no value at the cursor",
                self.location(),
                "json::reader::read_item",
            )),
        }
    }
}

/// Unescapes a raw string lexeme. Exposed for callers that read a
/// `String` token's raw span themselves (e.g. via [`Token::text`] before
/// the tokenizer's own unescaping — kept for symmetry with the writer).
pub fn unescape_lexeme(raw: &str) -> ScopedJsonResult<String> {
    unescape(raw).map_err(|e| ScopedJsonError::format(e, Location::default(), "json::reader::unescape_lexeme"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_value_without_next_key_reads_the_key_silently() {
        // spec.md §4.2: calling nextValue directly at AtStart (skipping
        // nextKey) is legal — it reads the key silently, then the value.
        let mut r = JsonReader::new(br#"{"a":1,"b":2}"#);
        r.next_value().unwrap();
        r.enter().unwrap();

        assert!(r.next_value().unwrap());
        assert_eq!(r.current_key(), Some("a"));
        assert_eq!(r.read_i64(), Some(1));

        assert!(r.next_value().unwrap());
        assert_eq!(r.current_key(), Some("b"));
        assert_eq!(r.read_i64(), Some(2));

        assert!(!r.next_value().unwrap());
        r.leave().unwrap();
    }

    #[test]
    fn array_missing_comma_between_elements_is_an_error() {
        // spec.md §6.3 lists trailing commas as a permissive read
        // extension; a missing separator between two elements is not among
        // them, so `[1 2]` must fail rather than silently read two values.
        let mut r = JsonReader::new(br#"[1 2]"#);
        r.next_value().unwrap();
        r.enter().unwrap();
        assert!(r.next_value().unwrap());
        assert_eq!(r.read_i64(), Some(1));
        assert!(r.next_value().is_err());
    }
}
