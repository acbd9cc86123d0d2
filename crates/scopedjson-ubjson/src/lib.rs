//! Binary UBJSON tokenizer, scope-aware reader, and stateful writer.

pub mod reader;
pub mod scope;
pub mod token;
pub mod tokenizer;
pub mod writer;

pub use reader::UbjsonReader;
pub use scope::{Frame, ReaderState, ScopeKind};
pub use token::{is_value_marker, Token, UbjsonTokenKind, UbjsonValueType};
pub use tokenizer::UbjsonTokenizer;
pub use writer::{OptimizedParams, UbjsonContainerParams, UbjsonWriter, UbjsonWriterOptions};
