//! Resumable JSON tokenizer, scope-aware reader, and stateful writer for
//! the permissive JSON dialect.

pub mod reader;
pub mod scope;
pub mod token;
pub mod tokenizer;
pub mod writer;

pub use reader::JsonReader;
pub use scope::{Frame, ReaderState, ScopeKind};
pub use token::{JsonTokenKind, Token};
pub use tokenizer::JsonTokenizer;
pub use writer::{ContainerParams, Formatting, JsonWriter, JsonWriterOptions};
