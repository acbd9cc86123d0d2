//! JSON token kinds and the [`Token`] value the tokenizer emits.

/// Typed tokens produced by [`crate::tokenizer::JsonTokenizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonTokenKind {
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    Colon,
    Comma,
    String,
    /// An unquoted literal: number, `true`, `false`, `null`, or an
    /// unquoted-key identifier.
    Value,
    Comment,
    BlockComment,
    Whitespace,
    Newline,
    /// The current buffer ends mid-token; feed more bytes and retry.
    EndOfBuffer,
    EndOfFile,
    InvalidToken,
}

impl JsonTokenKind {
    pub fn is_container_start(self) -> bool {
        matches!(self, JsonTokenKind::StartObject | JsonTokenKind::StartArray)
    }

    pub fn is_container_end(self) -> bool {
        matches!(self, JsonTokenKind::EndObject | JsonTokenKind::EndArray)
    }

    /// Whether this token kind can stand in for a scalar or container value.
    pub fn is_value_start(self) -> bool {
        matches!(
            self,
            JsonTokenKind::StartObject
                | JsonTokenKind::StartArray
                | JsonTokenKind::String
                | JsonTokenKind::Value
        )
    }
}

/// A single lexical token: its kind, raw byte span, and (for `String`) the
/// unescaped semantic text. For `Value` tokens `text` is the raw lexeme.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: JsonTokenKind,
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: JsonTokenKind, start: usize, end: usize, text: String, line: usize, column: usize) -> Self {
        Self {
            kind,
            start,
            end,
            text,
            line,
            column,
        }
    }
}
