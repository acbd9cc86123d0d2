//! Resumable binary UBJSON tokenizer (spec.md §4.4).
//!
//! One call to [`UbjsonTokenizer::next_value_token`] (or, inside an object,
//! [`UbjsonTokenizer::next_key_token`]) consumes exactly one wire token,
//! returning `EndOfBuffer` when the currently fed bytes end mid-token so the
//! caller can `feed` more and retry — the same resumption contract as
//! `scopedjson_json::tokenizer::JsonTokenizer`. `NoOp` markers are filtered
//! out transparently by `next_value_token`; `next_key_token` instead treats
//! one as a format error, since an object key can never be `NoOp`.

use scopedjson_buffers::endian::swap_units;

use crate::token::{
    marker_to_value_type, Token, TokenPayload, UbjsonTokenKind, UbjsonValueType, MARKER_COUNT, MARKER_END_ARRAY,
    MARKER_END_OBJECT, MARKER_NOOP, MARKER_START_ARRAY, MARKER_START_OBJECT, MARKER_TYPE,
};

/// Decodes a length/count payload (always read via one of the signed/unsigned
/// integer markers) back into an `i64`. `bytes` has already been endian-
/// normalized to host order by `swap_units`.
fn decode_len(bytes: &[u8], width: usize, signed: bool) -> i64 {
    match (width, signed) {
        (1, true) => bytes[0] as i8 as i64,
        (1, false) => bytes[0] as i64,
        (2, true) => i16::from_ne_bytes([bytes[0], bytes[1]]) as i64,
        (4, true) => i32::from_ne_bytes(bytes.try_into().unwrap()) as i64,
        (8, true) => i64::from_ne_bytes(bytes.try_into().unwrap()),
        _ => unreachable!("decode_len only called with a width/signed pair produced by length_marker_width"),
    }
}

/// Maps a length-prefix marker byte to its `(width, signed)` pair, or `None`
/// if the byte isn't a valid integer marker.
fn length_marker_width(marker: u8) -> Option<(usize, bool)> {
    match marker {
        b'i' => Some((1, true)),
        b'U' => Some((1, false)),
        b'I' => Some((2, true)),
        b'l' => Some((4, true)),
        b'L' => Some((8, true)),
        _ => None,
    }
}

pub struct UbjsonTokenizer {
    buf: Vec<u8>,
    base_offset: usize,
    eof: bool,
}

impl Default for UbjsonTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl UbjsonTokenizer {
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            base_offset: 0,
            eof: false,
        }
    }

    /// Appends more wire bytes. Safe to call after a previous call returned
    /// `EndOfBuffer`.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Marks that no more bytes will ever be fed; any still-incomplete token
    /// is now reported as `InvalidToken` rather than `EndOfBuffer`.
    pub fn end_of_input(&mut self) {
        self.eof = true;
    }

    pub fn position(&self) -> usize {
        self.base_offset
    }

    fn consume(&mut self, n: usize) {
        self.buf.drain(0..n);
        self.base_offset += n;
    }

    /// Reads and endian-normalizes `width` bytes starting at `header` bytes
    /// into the buffer (e.g. `header = 1` to skip a leading type marker
    /// already accounted for by the caller). `None` means "not enough bytes
    /// fed yet".
    fn read_at(&self, header: usize, width: usize) -> Option<Vec<u8>> {
        if self.buf.len() < header + width {
            return None;
        }
        let mut v = self.buf[header..header + width].to_vec();
        swap_units(&mut v, width);
        Some(v)
    }

    fn invalid(&mut self, pos: usize, consumed: usize) -> Token {
        self.consume(consumed.min(self.buf.len()));
        Token::simple(UbjsonTokenKind::InvalidToken, pos)
    }

    /// Scans a fixed-width integer marker. `header` is 1 when a leading
    /// marker byte precedes the payload (ordinary value position), 0 when
    /// the payload is read bare (a typed optimized-array element).
    fn fixed_int_at(&mut self, header: usize, pos: usize, width: usize, signed: bool) -> Option<Token> {
        let bytes = self.read_at(header, width)?;
        self.consume(header + width);
        let kind = match width {
            1 if signed => UbjsonTokenKind::Int8,
            1 => UbjsonTokenKind::UInt8,
            2 => UbjsonTokenKind::Int16,
            4 => UbjsonTokenKind::Int32,
            8 => UbjsonTokenKind::Int64,
            _ => unreachable!(),
        };
        let payload = match (width, signed) {
            (1, true) => TokenPayload::Int(bytes[0] as i8 as i64),
            (1, false) => TokenPayload::UInt(bytes[0] as u64),
            (2, true) => TokenPayload::Int(i16::from_ne_bytes([bytes[0], bytes[1]]) as i64),
            (4, true) => TokenPayload::Int(i32::from_ne_bytes(bytes.try_into().unwrap()) as i64),
            (8, true) => TokenPayload::Int(i64::from_ne_bytes(bytes.try_into().unwrap())),
            _ => unreachable!(),
        };
        Some(Token::new(kind, pos, payload))
    }

    fn fixed_float_at(&mut self, header: usize, pos: usize, width: usize) -> Option<Token> {
        let bytes = self.read_at(header, width)?;
        self.consume(header + width);
        match width {
            4 => Some(Token::new(
                UbjsonTokenKind::Float32,
                pos,
                TokenPayload::Float32(f32::from_ne_bytes(bytes.try_into().unwrap())),
            )),
            8 => Some(Token::new(
                UbjsonTokenKind::Float64,
                pos,
                TokenPayload::Float64(f64::from_ne_bytes(bytes.try_into().unwrap())),
            )),
            _ => unreachable!(),
        }
    }

    /// Scans a length-prefixed UTF-8 string. `header` bytes precede the
    /// length marker: 1 for `S`/`H` (the type marker itself), 0 for an
    /// object key (which has no leading type marker at all).
    fn sized_text_at(&mut self, header: usize, pos: usize, kind: UbjsonTokenKind) -> Option<Token> {
        if self.buf.len() < header + 1 {
            return None;
        }
        let len_marker = self.buf[header];
        let Some((width, signed)) = length_marker_width(len_marker) else {
            return Some(self.invalid(pos, header + 1));
        };
        let len_bytes = self.read_at(header + 1, width)?;
        let length = decode_len(&len_bytes, width, signed);
        if length < 0 {
            return Some(self.invalid(pos, header + 1 + width));
        }
        let length = length as usize;
        let total = header + 1 + width + length;
        if self.buf.len() < total {
            return None;
        }
        let text = match std::str::from_utf8(&self.buf[header + 1 + width..total]) {
            Ok(s) => s.to_string(),
            Err(_) => return Some(self.invalid(pos, total)),
        };
        self.consume(total);
        Some(Token::new(kind, pos, TokenPayload::Text(text)))
    }

    /// Scans past `[`/`{` (already known present at `buf[0]`), handling the
    /// optional `$<type>#<count>` / `#<count>` optimized-container header.
    fn container_start(&mut self, pos: usize, is_object: bool) -> Option<Token> {
        if self.buf.len() < 2 {
            return None;
        }
        let lookahead = self.buf[1];
        if lookahead == MARKER_TYPE {
            if self.buf.len() < 3 {
                return None;
            }
            let Some(content_type) = marker_to_value_type(self.buf[2]) else {
                return Some(self.invalid(pos, 3));
            };
            if self.buf.len() < 4 {
                return None;
            }
            if self.buf[3] != MARKER_COUNT {
                return Some(self.invalid(pos, 3));
            }
            if self.buf.len() < 5 {
                return None;
            }
            let Some((width, signed)) = length_marker_width(self.buf[4]) else {
                return Some(self.invalid(pos, 4));
            };
            let len_bytes = self.read_at(5, width)?;
            let count = decode_len(&len_bytes, width, signed);
            if count < 0 {
                return Some(self.invalid(pos, 5 + width));
            }
            self.consume(5 + width);
            let kind = if is_object {
                UbjsonTokenKind::StartOptimizedObject
            } else {
                UbjsonTokenKind::StartOptimizedArray
            };
            Some(Token::new(kind, pos, TokenPayload::Container { content_type, count: count as usize }))
        } else if lookahead == MARKER_COUNT {
            if self.buf.len() < 3 {
                return None;
            }
            let Some((width, signed)) = length_marker_width(self.buf[2]) else {
                return Some(self.invalid(pos, 2));
            };
            let len_bytes = self.read_at(3, width)?;
            let count = decode_len(&len_bytes, width, signed);
            if count < 0 {
                return Some(self.invalid(pos, 3 + width));
            }
            self.consume(3 + width);
            let kind = if is_object {
                UbjsonTokenKind::StartOptimizedObject
            } else {
                UbjsonTokenKind::StartOptimizedArray
            };
            Some(Token::new(
                kind,
                pos,
                TokenPayload::Container { content_type: UbjsonValueType::Unknown, count: count as usize },
            ))
        } else {
            self.consume(1);
            let kind = if is_object { UbjsonTokenKind::StartObject } else { UbjsonTokenKind::StartArray };
            Some(Token::new(kind, pos, TokenPayload::None))
        }
    }

    fn try_next_value_token(&mut self) -> Option<Token> {
        loop {
            if self.buf.is_empty() {
                return None;
            }
            if self.buf[0] == MARKER_NOOP {
                self.consume(1);
                continue;
            }
            break;
        }
        let marker = self.buf[0];
        let pos = self.base_offset;
        match marker {
            b'Z' => {
                self.consume(1);
                Some(Token::simple(UbjsonTokenKind::Null, pos))
            }
            b'T' => {
                self.consume(1);
                Some(Token::simple(UbjsonTokenKind::True, pos))
            }
            b'F' => {
                self.consume(1);
                Some(Token::simple(UbjsonTokenKind::False, pos))
            }
            b'i' => self.fixed_int_at(1, pos, 1, true),
            b'U' => self.fixed_int_at(1, pos, 1, false),
            b'I' => self.fixed_int_at(1, pos, 2, true),
            b'l' => self.fixed_int_at(1, pos, 4, true),
            b'L' => self.fixed_int_at(1, pos, 8, true),
            b'd' => self.fixed_float_at(1, pos, 4),
            b'D' => self.fixed_float_at(1, pos, 8),
            b'C' => {
                if self.buf.len() < 2 {
                    return None;
                }
                let c = self.buf[1];
                self.consume(2);
                Some(Token::new(UbjsonTokenKind::Char, pos, TokenPayload::Text((c as char).to_string())))
            }
            b'S' => self.sized_text_at(1, pos, UbjsonTokenKind::String),
            b'H' => self.sized_text_at(1, pos, UbjsonTokenKind::HighPrecision),
            MARKER_START_ARRAY => self.container_start(pos, false),
            MARKER_START_OBJECT => self.container_start(pos, true),
            MARKER_END_ARRAY => {
                self.consume(1);
                Some(Token::simple(UbjsonTokenKind::EndArray, pos))
            }
            MARKER_END_OBJECT => {
                self.consume(1);
                Some(Token::simple(UbjsonTokenKind::EndObject, pos))
            }
            _ => Some(self.invalid(pos, 1)),
        }
    }

    /// Consumes one value token, skipping any `NoOp` markers in front of it.
    pub fn next_value_token(&mut self) -> Token {
        match self.try_next_value_token() {
            Some(tok) => tok,
            None => self.end_of_data(),
        }
    }

    /// Reads one element inside a typed optimized array/object: if
    /// `value_type` is `Unknown` (a count-only container), elements keep
    /// their ordinary per-element marker and this just delegates to
    /// [`Self::next_value_token`]; otherwise the element is read bare, with
    /// no leading type marker, at the declared type's fixed width.
    pub fn next_typed_value(&mut self, value_type: UbjsonValueType) -> Token {
        let pos = self.base_offset;
        let result = match value_type {
            UbjsonValueType::Unknown | UbjsonValueType::Array | UbjsonValueType::Object => {
                return self.next_value_token();
            }
            UbjsonValueType::Null => Some(Token::simple(UbjsonTokenKind::Null, pos)),
            UbjsonValueType::True => Some(Token::simple(UbjsonTokenKind::True, pos)),
            UbjsonValueType::False => Some(Token::simple(UbjsonTokenKind::False, pos)),
            UbjsonValueType::NoOp => Some(self.invalid(pos, 0)),
            UbjsonValueType::Int8 => self.fixed_int_at(0, pos, 1, true),
            UbjsonValueType::UInt8 => self.fixed_int_at(0, pos, 1, false),
            UbjsonValueType::Int16 => self.fixed_int_at(0, pos, 2, true),
            UbjsonValueType::Int32 => self.fixed_int_at(0, pos, 4, true),
            UbjsonValueType::Int64 => self.fixed_int_at(0, pos, 8, true),
            UbjsonValueType::Float32 => self.fixed_float_at(0, pos, 4),
            UbjsonValueType::Float64 => self.fixed_float_at(0, pos, 8),
            UbjsonValueType::Char => {
                if self.buf.is_empty() {
                    None
                } else {
                    let c = self.buf[0];
                    self.consume(1);
                    Some(Token::new(UbjsonTokenKind::Char, pos, TokenPayload::Text((c as char).to_string())))
                }
            }
            UbjsonValueType::String => self.sized_text_at(0, pos, UbjsonTokenKind::String),
            UbjsonValueType::HighPrecision => self.sized_text_at(0, pos, UbjsonTokenKind::HighPrecision),
        };
        match result {
            Some(tok) => tok,
            None => self.end_of_data(),
        }
    }

    /// Reads a token in object-key position: either the closing `}` or a
    /// bare length-prefixed string (no leading `S` marker). A `NoOp` marker
    /// here is a format error rather than being silently skipped.
    pub fn next_key_token(&mut self) -> Token {
        if self.buf.is_empty() {
            return self.end_of_data();
        }
        let pos = self.base_offset;
        if self.buf[0] == MARKER_NOOP {
            return self.invalid(pos, 1);
        }
        if self.buf[0] == MARKER_END_OBJECT {
            self.consume(1);
            return Token::simple(UbjsonTokenKind::EndObject, pos);
        }
        match self.sized_text_at(0, pos, UbjsonTokenKind::String) {
            Some(tok) => tok,
            None => self.end_of_data(),
        }
    }

    fn end_of_data(&mut self) -> Token {
        let pos = self.base_offset;
        if self.eof {
            if self.buf.is_empty() {
                Token::simple(UbjsonTokenKind::EndOfFile, pos)
            } else {
                self.buf.clear();
                Token::simple(UbjsonTokenKind::InvalidToken, pos)
            }
        } else {
            Token::simple(UbjsonTokenKind::EndOfBuffer, pos)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize_all(bytes: &[u8]) -> Vec<Token> {
        let mut t = UbjsonTokenizer::new();
        t.feed(bytes);
        t.end_of_input();
        let mut out = Vec::new();
        loop {
            let tok = t.next_value_token();
            let done = tok.kind == UbjsonTokenKind::EndOfFile;
            out.push(tok);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn scans_null_true_false() {
        let toks = tokenize_all(b"ZTF");
        assert_eq!(toks[0].kind, UbjsonTokenKind::Null);
        assert_eq!(toks[1].kind, UbjsonTokenKind::True);
        assert_eq!(toks[2].kind, UbjsonTokenKind::False);
    }

    #[test]
    fn scans_signed_and_unsigned_integers() {
        let toks = tokenize_all(&[b'U', 0x7F, b'i', 0xFF, b'I', 0x00, 0x02]);
        assert_eq!(toks[0].payload, TokenPayload::UInt(127));
        assert_eq!(toks[1].payload, TokenPayload::Int(-1));
        assert_eq!(toks[2].payload, TokenPayload::Int(2));
    }

    #[test]
    fn scans_sized_string() {
        let mut bytes = vec![b'S', b'U', 3];
        bytes.extend_from_slice(b"abc");
        let toks = tokenize_all(&bytes);
        assert_eq!(toks[0].kind, UbjsonTokenKind::String);
        assert_eq!(toks[0].payload, TokenPayload::Text("abc".to_string()));
    }

    #[test]
    fn filters_noop_between_values() {
        let toks = tokenize_all(b"NZNNT");
        assert_eq!(toks[0].kind, UbjsonTokenKind::Null);
        assert_eq!(toks[1].kind, UbjsonTokenKind::True);
        assert_eq!(toks[2].kind, UbjsonTokenKind::EndOfFile);
    }

    #[test]
    fn optimized_array_header_with_declared_type() {
        // [ $ I # U 03  00 02  00 C8  4E 20   -- three Int16 elements: 2, 200, 20000
        let bytes = [b'[', b'$', b'I', b'#', b'U', 3, 0x00, 0x02, 0x00, 0xC8, 0x4E, 0x20];
        let mut t = UbjsonTokenizer::new();
        t.feed(&bytes);
        t.end_of_input();
        let start = t.next_value_token();
        match (&start.kind, &start.payload) {
            (UbjsonTokenKind::StartOptimizedArray, TokenPayload::Container { content_type, count }) => {
                assert_eq!(*content_type, UbjsonValueType::Int16);
                assert_eq!(*count, 3);
            }
            other => panic!("unexpected token: {other:?}"),
        }
        let elems: Vec<i64> = (0..3)
            .map(|_| match t.next_typed_value(UbjsonValueType::Int16).payload {
                TokenPayload::Int(v) => v,
                other => panic!("unexpected payload: {other:?}"),
            })
            .collect();
        assert_eq!(elems, vec![2, 200, 20000]);
    }

    #[test]
    fn count_only_optimized_container_keeps_per_element_markers() {
        // [ # U 02  Z  T
        let bytes = [b'[', b'#', b'U', 2, b'Z', b'T'];
        let mut t = UbjsonTokenizer::new();
        t.feed(&bytes);
        t.end_of_input();
        let start = t.next_value_token();
        match &start.payload {
            TokenPayload::Container { content_type, count } => {
                assert_eq!(*content_type, UbjsonValueType::Unknown);
                assert_eq!(*count, 2);
            }
            other => panic!("unexpected payload: {other:?}"),
        }
        assert_eq!(t.next_typed_value(UbjsonValueType::Unknown).kind, UbjsonTokenKind::Null);
        assert_eq!(t.next_typed_value(UbjsonValueType::Unknown).kind, UbjsonTokenKind::True);
    }

    #[test]
    fn key_position_rejects_noop() {
        let mut t = UbjsonTokenizer::new();
        t.feed(b"N");
        t.end_of_input();
        assert_eq!(t.next_key_token().kind, UbjsonTokenKind::InvalidToken);
    }

    #[test]
    fn key_position_reads_bare_length_prefixed_string() {
        let mut bytes = vec![b'U', 2];
        bytes.extend_from_slice(b"ok");
        let mut t = UbjsonTokenizer::new();
        t.feed(&bytes);
        t.end_of_input();
        let tok = t.next_key_token();
        assert_eq!(tok.kind, UbjsonTokenKind::String);
        assert_eq!(tok.payload, TokenPayload::Text("ok".to_string()));
    }

    #[test]
    fn resumes_across_a_chunk_split_mid_token() {
        let mut t = UbjsonTokenizer::new();
        t.feed(&[b'I', 0x01]);
        assert_eq!(t.next_value_token().kind, UbjsonTokenKind::EndOfBuffer);
        t.feed(&[0x02]);
        let tok = t.next_value_token();
        assert_eq!(tok.kind, UbjsonTokenKind::Int16);
        assert_eq!(tok.payload, TokenPayload::Int(0x0102));
    }
}
