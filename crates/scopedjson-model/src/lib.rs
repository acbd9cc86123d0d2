//! Shared document tree, value classification, number/escape parsing, and
//! error taxonomy for the JSON and UBJSON codecs.

pub mod classify;
pub mod error;
pub mod escape;
pub mod item;
pub mod number;

pub use classify::{classify_lexeme, classify_value_type, DetailedValueType, ValueType};
pub use error::{Location, ScopedJsonError, ScopedJsonResult};
pub use escape::{escape, escape_units, is_identifier_like, unescape, EscapeOptions};
pub use item::{Item, ValueOrigin};
pub use number::{parse_float, parse_high_precision, parse_integer};
