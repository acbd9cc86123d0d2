//! Resumable JSON tokenizer.
//!
//! Bytes are fed in via [`JsonTokenizer::feed`] (and [`JsonTokenizer::end_of_input`]
//! once the source is exhausted); [`JsonTokenizer::next_token`] pulls the
//! next token, returning [`JsonTokenKind::EndOfBuffer`] when the current
//! buffer ends mid-token so the caller can feed more bytes and retry. This
//! mirrors the upstream tokenizer's resumption contract (spec.md §4.1):
//! "end of current buffer, may continue" is distinct from "end of input".
//!
//! Consumed bytes are dropped from the front of the buffer after each
//! completed token, so memory use tracks the longest in-flight token rather
//! than the whole stream.

use scopedjson_model::unescape;

use crate::token::{JsonTokenKind, Token};

fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b' ' | b'\t' | b'\n' | b'\r' | b',' | b':' | b'{' | b'}' | b'[' | b']' | b'"' | b'\''
    )
}

/// A resumable scanner producing [`Token`]s from a byte stream that may
/// arrive in arbitrary chunks.
pub struct JsonTokenizer {
    buf: Vec<u8>,
    /// Byte offset of `buf[0]` within the overall stream.
    base_offset: usize,
    eof: bool,
    line: usize,
    column: usize,
}

impl Default for JsonTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonTokenizer {
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            base_offset: 0,
            eof: false,
            line: 1,
            column: 1,
        }
    }

    /// Appends more bytes to the internal buffer.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Marks the stream as exhausted: no more bytes will ever be fed.
    pub fn end_of_input(&mut self) {
        self.eof = true;
    }

    pub fn position(&self) -> usize {
        self.base_offset
    }

    fn advance_position(&mut self, text: &str, is_newline: bool) {
        if is_newline {
            self.line += 1;
            self.column = 1;
        } else {
            for c in text.chars() {
                if c == '\t' || !c.is_control() {
                    self.column += 1;
                }
            }
        }
    }

    /// Drops the consumed prefix `[0, n)` from the buffer.
    fn consume(&mut self, n: usize) {
        self.buf.drain(0..n);
        self.base_offset += n;
    }

    fn emit(&mut self, kind: JsonTokenKind, len: usize, text: String) -> Token {
        let start = self.base_offset;
        let end = start + len;
        let line = self.line;
        let column = self.column;
        let is_newline = kind == JsonTokenKind::Newline;
        self.advance_position(&text, is_newline);
        self.consume(len);
        Token::new(kind, start, end, text, line, column)
    }

    /// Produces the next token, or `EndOfBuffer`/`EndOfFile` if the stream
    /// is exhausted (distinguished by whether `end_of_input` was called).
    pub fn next_token(&mut self) -> Token {
        if self.buf.is_empty() {
            return if self.eof {
                Token::new(JsonTokenKind::EndOfFile, self.base_offset, self.base_offset, String::new(), self.line, self.column)
            } else {
                Token::new(JsonTokenKind::EndOfBuffer, self.base_offset, self.base_offset, String::new(), self.line, self.column)
            };
        }

        let b0 = self.buf[0];
        match b0 {
            b' ' | b'\t' => self.scan_whitespace(),
            b'\n' => self.emit(JsonTokenKind::Newline, 1, "\n".to_string()),
            b'\r' => {
                if self.buf.len() >= 2 {
                    if self.buf[1] == b'\n' {
                        self.emit(JsonTokenKind::Newline, 2, "\r\n".to_string())
                    } else {
                        self.emit(JsonTokenKind::Newline, 1, "\r".to_string())
                    }
                } else if self.eof {
                    self.emit(JsonTokenKind::Newline, 1, "\r".to_string())
                } else {
                    self.need_more()
                }
            }
            b',' => self.emit(JsonTokenKind::Comma, 1, ",".to_string()),
            b':' => self.emit(JsonTokenKind::Colon, 1, ":".to_string()),
            b'{' => self.emit(JsonTokenKind::StartObject, 1, "{".to_string()),
            b'}' => self.emit(JsonTokenKind::EndObject, 1, "}".to_string()),
            b'[' => self.emit(JsonTokenKind::StartArray, 1, "[".to_string()),
            b']' => self.emit(JsonTokenKind::EndArray, 1, "]".to_string()),
            b'"' => self.scan_string_or_block(b'"'),
            b'\'' => self.scan_string_or_block(b'\''),
            b'/' => self.scan_slash(),
            _ => self.scan_value(),
        }
    }

    fn need_more(&mut self) -> Token {
        Token::new(JsonTokenKind::EndOfBuffer, self.base_offset, self.base_offset, String::new(), self.line, self.column)
    }

    fn scan_whitespace(&mut self) -> Token {
        let mut n = 0;
        while n < self.buf.len() && (self.buf[n] == b' ' || self.buf[n] == b'\t') {
            n += 1;
        }
        if n == self.buf.len() && !self.eof {
            return self.need_more();
        }
        let text = String::from_utf8_lossy(&self.buf[..n]).into_owned();
        self.emit(JsonTokenKind::Whitespace, n, text)
    }

    fn scan_slash(&mut self) -> Token {
        if self.buf.len() < 2 {
            if self.eof {
                return self.emit(JsonTokenKind::InvalidToken, self.buf.len(), String::from_utf8_lossy(&self.buf).into_owned());
            }
            return self.need_more();
        }
        match self.buf[1] {
            b'/' => self.scan_line_comment(),
            b'*' => self.scan_block_comment(),
            _ => self.scan_value(),
        }
    }

    fn scan_line_comment(&mut self) -> Token {
        let mut n = 2;
        while n < self.buf.len() && self.buf[n] != b'\n' && self.buf[n] != b'\r' {
            n += 1;
        }
        if n == self.buf.len() && !self.eof {
            return self.need_more();
        }
        let text = String::from_utf8_lossy(&self.buf[2..n]).into_owned();
        self.emit(JsonTokenKind::Comment, n, text)
    }

    fn scan_block_comment(&mut self) -> Token {
        let mut n = 2;
        loop {
            if n + 1 >= self.buf.len() {
                if self.eof {
                    return self.emit(JsonTokenKind::InvalidToken, self.buf.len(), String::from_utf8_lossy(&self.buf).into_owned());
                }
                return self.need_more();
            }
            if self.buf[n] == b'*' && self.buf[n + 1] == b'/' {
                let text = String::from_utf8_lossy(&self.buf[2..n]).into_owned();
                return self.emit(JsonTokenKind::BlockComment, n + 2, text);
            }
            n += 1;
        }
    }

    /// Scans a quoted string, or a triple-quoted block string when the
    /// quote character is `"` and three consecutive quotes open it.
    fn scan_string_or_block(&mut self, quote: u8) -> Token {
        if quote == b'"' && self.buf.len() >= 3 && self.buf[1] == b'"' && self.buf[2] == b'"' {
            return self.scan_block_string();
        }
        self.scan_quoted_string(quote)
    }

    fn scan_block_string(&mut self) -> Token {
        let mut n = 3;
        loop {
            if n + 2 >= self.buf.len() {
                if self.eof {
                    return self.emit(JsonTokenKind::InvalidToken, self.buf.len(), String::from_utf8_lossy(&self.buf).into_owned());
                }
                return self.need_more();
            }
            if self.buf[n] == b'"' && self.buf[n + 1] == b'"' && self.buf[n + 2] == b'"' {
                let body = String::from_utf8_lossy(&self.buf[3..n]).into_owned();
                return self.emit(JsonTokenKind::String, n + 3, body);
            }
            n += 1;
        }
    }

    fn scan_quoted_string(&mut self, quote: u8) -> Token {
        let mut n = 1;
        loop {
            if n >= self.buf.len() {
                if self.eof {
                    return self.emit(JsonTokenKind::InvalidToken, self.buf.len(), String::from_utf8_lossy(&self.buf).into_owned());
                }
                return self.need_more();
            }
            let c = self.buf[n];
            if c == b'\\' {
                if n + 1 >= self.buf.len() {
                    if self.eof {
                        return self.emit(JsonTokenKind::InvalidToken, self.buf.len(), String::from_utf8_lossy(&self.buf).into_owned());
                    }
                    return self.need_more();
                }
                n += 2;
                continue;
            }
            if c == quote {
                let body_bytes = &self.buf[1..n];
                let raw = String::from_utf8_lossy(body_bytes).into_owned();
                let text = unescape(&raw).unwrap_or(raw);
                return self.emit(JsonTokenKind::String, n + 1, text);
            }
            // An un-escaped newline is never legal inside a quoted string
            // (spec.md §4.1: only `\`-escaped line continuations are), so
            // this is immediately invalid regardless of whether more bytes
            // could still arrive — matching on `self.eof` here would make
            // tokenization depend on chunk boundaries.
            if c == b'\n' || c == b'\r' {
                return self.emit(JsonTokenKind::InvalidToken, n, String::from_utf8_lossy(&self.buf[..n]).into_owned());
            }
            n += 1;
        }
    }

    fn scan_value(&mut self) -> Token {
        let mut n = 0;
        while n < self.buf.len() && !is_delimiter(self.buf[n]) {
            // `/` only delimits when it opens a comment; a bare `/` inside
            // an (unquoted) value lexeme is otherwise just another byte.
            n += 1;
        }
        if n == self.buf.len() && !self.eof {
            return self.need_more();
        }
        if n == 0 {
            // Shouldn't happen: the byte at 0 wasn't handled by any other
            // branch and isn't a delimiter either. Treat as invalid so we
            // always make forward progress.
            return self.emit(JsonTokenKind::InvalidToken, 1, String::from_utf8_lossy(&self.buf[..1]).into_owned());
        }
        let text = String::from_utf8_lossy(&self.buf[..n]).into_owned();
        self.emit(JsonTokenKind::Value, n, text)
    }
}
