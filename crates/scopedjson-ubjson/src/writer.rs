//! Stateful UBJSON writer (spec.md §4.7): binary output with
//! container-nesting context, minimal-integer selection, and optimized
//! (counted, optionally typed) container support. Parallel in structure to
//! `scopedjson_json::writer::JsonWriter` but with no formatting concept —
//! UBJSON is binary, so there is no whitespace/comma discipline to track.

use scopedjson_base64::to_base64;
use scopedjson_buffers::Writer;
use scopedjson_model::{classify_lexeme, parse_float, parse_integer, DetailedValueType, Item, ScopedJsonError, ScopedJsonResult};

use crate::token::{value_type_to_marker, UbjsonValueType};

/// The element type declared by an optimized container's `$<type>` header,
/// if any, plus the remaining undeclared element slots (spec.md §6.2's
/// `UBJsonParameters`). `value_type: None` with `optimized: true` models a
/// count-only `#<count>` header, whose elements keep their own per-element
/// markers.
#[derive(Debug, Clone, Copy)]
pub struct OptimizedParams {
    pub count: usize,
    pub value_type: Option<UbjsonValueType>,
}

/// Parameters for a container-start call.
#[derive(Debug, Clone, Copy, Default)]
pub struct UbjsonContainerParams {
    pub optimized: Option<OptimizedParams>,
}

/// Options controlling integer-width selection, independent of container
/// structure.
#[derive(Debug, Clone, Copy)]
pub struct UbjsonWriterOptions {
    /// When `true`, `write_i64`/`write_u64` always use the full-width
    /// marker for their Rust argument type rather than the smallest marker
    /// that fits the value (spec.md §4.7's "strict integer sizes" toggle).
    /// Has no effect inside a typed optimized container, where the
    /// declared element type always wins.
    pub strict_integer_sizes: bool,
}

impl Default for UbjsonWriterOptions {
    fn default() -> Self {
        Self {
            strict_integer_sizes: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContextKind {
    Document,
    Array,
    Object,
}

/// Bookkeeping for an optimized container's declared type/remaining count.
#[derive(Debug, Clone, Copy)]
struct Declared {
    value_type: Option<UbjsonValueType>,
    remaining: usize,
}

struct Context {
    kind: ContextKind,
    declared: Option<Declared>,
    wrote_value: bool,
}

/// A stateful UBJSON writer accumulating output in a growable byte buffer.
pub struct UbjsonWriter {
    writer: Writer,
    stack: Vec<Context>,
    options: UbjsonWriterOptions,
}

impl Default for UbjsonWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl UbjsonWriter {
    pub fn new() -> Self {
        Self::with_options(UbjsonWriterOptions::default())
    }

    pub fn with_options(options: UbjsonWriterOptions) -> Self {
        Self {
            writer: Writer::new(),
            stack: vec![Context {
                kind: ContextKind::Document,
                declared: None,
                wrote_value: false,
            }],
            options,
        }
    }

    /// Consumes the writer, returning its buffered output.
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.writer.flush()
    }

    // ---- shared bookkeeping ----

    /// The common `beginValue` step (spec.md §4.7): checks the current
    /// container has room for one more value and returns the declared
    /// element type to coerce into, if any.
    fn before_value(&mut self) -> ScopedJsonResult<Option<UbjsonValueType>> {
        let top = self.stack.last_mut().expect("writer stack is never empty");
        match top.kind {
            ContextKind::Document => {
                if top.wrote_value {
                    return Err(ScopedJsonError::structural(
                        "a document may only hold one top-level value",
                        Default::default(),
                        "ubjson::writer::before_value",
                    ));
                }
                top.wrote_value = true;
                Ok(None)
            }
            ContextKind::Array => {
                if let Some(d) = top.declared.as_ref() {
                    if d.remaining == 0 {
                        return Err(ScopedJsonError::configuration(
                            "wrote more elements than the declared optimized-array count",
                            "ubjson::writer::before_value",
                        ));
                    }
                }
                Ok(top.declared.and_then(|d| d.value_type))
            }
            ContextKind::Object => Ok(top.declared.and_then(|d| d.value_type)),
        }
    }

    /// Decrements the array's declared remaining count after a value is
    /// written. Object remaining is decremented at `write_key` time instead
    /// (mirroring the reader's decrement timing).
    fn after_value(&mut self) {
        let top = self.stack.last_mut().expect("writer stack is never empty");
        if top.kind == ContextKind::Array {
            if let Some(d) = top.declared.as_mut() {
                d.remaining = d.remaining.saturating_sub(1);
            }
        }
    }

    /// Writes the key for the next object member: a bare length-prefixed
    /// UTF-8 string, no leading type marker regardless of the container's
    /// declared value type (only values are affected by optimization).
    pub fn write_key(&mut self, key: &str) -> ScopedJsonResult<()> {
        let top = self.stack.last_mut().expect("writer stack is never empty");
        if top.kind != ContextKind::Object {
            return Err(ScopedJsonError::structural(
                "writeKey called outside an object",
                Default::default(),
                "ubjson::writer::write_key",
            ));
        }
        if let Some(d) = top.declared.as_ref() {
            if d.remaining == 0 {
                return Err(ScopedJsonError::configuration(
                    "wrote more members than the declared optimized-object count",
                    "ubjson::writer::write_key",
                ));
            }
        }
        self.write_length_prefixed_text(key);
        let top = self.stack.last_mut().expect("writer stack is never empty");
        if let Some(d) = top.declared.as_mut() {
            d.remaining = d.remaining.saturating_sub(1);
        }
        Ok(())
    }

    fn write_length_prefixed_text(&mut self, s: &str) {
        let bytes = s.as_bytes();
        self.emit_minimal_int(bytes.len() as i64);
        self.writer.buf(bytes);
    }

    /// Picks the smallest UBJSON integer marker that fits `v` and writes
    /// marker + payload, per spec.md §4.7's minimal-integer rule. Ported
    /// from the teacher's `write_integer`.
    fn emit_minimal_int(&mut self, v: i64) {
        if (0..=0xff).contains(&v) {
            self.writer.u8(b'U');
            self.writer.u8(v as u8);
        } else if (-128..=127).contains(&v) {
            self.writer.u8(b'i');
            self.writer.i8(v as i8);
        } else if (-32768..=32767).contains(&v) {
            self.writer.u8(b'I');
            self.writer.i16(v as i16);
        } else if (i32::MIN as i64..=i32::MAX as i64).contains(&v) {
            self.writer.u8(b'l');
            self.writer.i32(v as i32);
        } else {
            self.writer.u8(b'L');
            self.writer.i64(v);
        }
    }

    fn emit_int_with_marker(&mut self, value_type: UbjsonValueType, v: i64) {
        let marker = value_type_to_marker(value_type).expect("integer value_type always has a marker");
        self.writer.u8(marker);
        match value_type {
            UbjsonValueType::UInt8 => self.writer.u8(v as u8),
            UbjsonValueType::Int8 => self.writer.i8(v as i8),
            UbjsonValueType::Int16 => self.writer.i16(v as i16),
            UbjsonValueType::Int32 => self.writer.i32(v as i32),
            UbjsonValueType::Int64 => self.writer.i64(v),
            _ => unreachable!("only called with integer value types"),
        }
    }

    /// Writes `v` raw (no leading marker), coerced to the exact width of
    /// `value_type` — the typed-optimized-container path. Errors if `v`
    /// doesn't fit.
    fn emit_raw_int(&mut self, value_type: UbjsonValueType, v: i64) -> ScopedJsonResult<()> {
        match value_type {
            UbjsonValueType::UInt8 => {
                let x = u8::try_from(v).map_err(|_| range_error(v, "UInt8"))?;
                self.writer.u8(x);
            }
            UbjsonValueType::Int8 => {
                let x = i8::try_from(v).map_err(|_| range_error(v, "Int8"))?;
                self.writer.i8(x);
            }
            UbjsonValueType::Int16 => {
                let x = i16::try_from(v).map_err(|_| range_error(v, "Int16"))?;
                self.writer.i16(x);
            }
            UbjsonValueType::Int32 => {
                let x = i32::try_from(v).map_err(|_| range_error(v, "Int32"))?;
                self.writer.i32(x);
            }
            UbjsonValueType::Int64 => self.writer.i64(v),
            _ => {
                return Err(ScopedJsonError::coercion(
                    format!("cannot write an integer into a {value_type:?}-typed optimized container"),
                    Default::default(),
                    "ubjson::writer::emit_raw_int",
                ))
            }
        }
        Ok(())
    }

    // ---- scalar writers ----

    pub fn write_null(&mut self) -> ScopedJsonResult<()> {
        let declared = self.before_value()?;
        match declared {
            None => self.writer.u8(b'Z'),
            Some(UbjsonValueType::Null) => {}
            Some(other) => {
                return Err(ScopedJsonError::coercion(
                    format!("cannot write null into a {other:?}-typed optimized container"),
                    Default::default(),
                    "ubjson::writer::write_null",
                ))
            }
        }
        self.after_value();
        Ok(())
    }

    pub fn write_bool(&mut self, value: bool) -> ScopedJsonResult<()> {
        let declared = self.before_value()?;
        match declared {
            None => self.writer.u8(if value { b'T' } else { b'F' }),
            Some(UbjsonValueType::True) if value => {}
            Some(UbjsonValueType::False) if !value => {}
            Some(other) => {
                return Err(ScopedJsonError::coercion(
                    format!("{value} does not match the declared {other:?} element type"),
                    Default::default(),
                    "ubjson::writer::write_bool",
                ))
            }
        }
        self.after_value();
        Ok(())
    }

    /// Default signed-integer entry point. Minimizes the marker unless
    /// `strict_integer_sizes` is set, in which case it always writes as
    /// `Int64` (the full width of the Rust argument type) — unless the
    /// enclosing container declares its own element type, which always
    /// wins.
    pub fn write_i64(&mut self, value: i64) -> ScopedJsonResult<()> {
        let declared = self.before_value()?;
        match declared {
            Some(t) => self.emit_raw_int(t, value)?,
            None if self.options.strict_integer_sizes => self.emit_int_with_marker(UbjsonValueType::Int64, value),
            None => self.emit_minimal_int(value),
        }
        self.after_value();
        Ok(())
    }

    /// Default unsigned-integer entry point. UBJSON has no native unsigned
    /// 64-bit marker; values that don't fit `i64` are a configuration error.
    pub fn write_u64(&mut self, value: u64) -> ScopedJsonResult<()> {
        let declared = self.before_value()?;
        match declared {
            Some(t) => {
                let v = i64::try_from(value).map_err(|_| {
                    ScopedJsonError::coercion(
                        format!("{value} does not fit in the declared {t:?} element type"),
                        Default::default(),
                        "ubjson::writer::write_u64",
                    )
                })?;
                self.emit_raw_int(t, v)?;
            }
            None if self.options.strict_integer_sizes => {
                if value <= 0xff {
                    self.emit_int_with_marker(UbjsonValueType::UInt8, value as i64);
                } else {
                    let v = i64::try_from(value).map_err(|_| {
                        ScopedJsonError::configuration(
                            "u64 value exceeds the representable UBJSON integer range",
                            "ubjson::writer::write_u64",
                        )
                    })?;
                    self.emit_int_with_marker(UbjsonValueType::Int64, v);
                }
            }
            None => {
                if value <= 0xff {
                    self.writer.u8(b'U');
                    self.writer.u8(value as u8);
                } else {
                    let v = i64::try_from(value).map_err(|_| {
                        ScopedJsonError::configuration(
                            "u64 value exceeds the representable UBJSON integer range",
                            "ubjson::writer::write_u64",
                        )
                    })?;
                    self.emit_minimal_int(v);
                }
            }
        }
        self.after_value();
        Ok(())
    }

    pub fn write_i8(&mut self, value: i8) -> ScopedJsonResult<()> {
        let declared = self.before_value()?;
        match declared {
            Some(t) => self.emit_raw_int(t, value as i64)?,
            None => self.emit_int_with_marker(UbjsonValueType::Int8, value as i64),
        }
        self.after_value();
        Ok(())
    }

    pub fn write_u8(&mut self, value: u8) -> ScopedJsonResult<()> {
        let declared = self.before_value()?;
        match declared {
            Some(t) => self.emit_raw_int(t, value as i64)?,
            None => self.emit_int_with_marker(UbjsonValueType::UInt8, value as i64),
        }
        self.after_value();
        Ok(())
    }

    pub fn write_i16(&mut self, value: i16) -> ScopedJsonResult<()> {
        let declared = self.before_value()?;
        match declared {
            Some(t) => self.emit_raw_int(t, value as i64)?,
            None => self.emit_int_with_marker(UbjsonValueType::Int16, value as i64),
        }
        self.after_value();
        Ok(())
    }

    pub fn write_i32(&mut self, value: i32) -> ScopedJsonResult<()> {
        let declared = self.before_value()?;
        match declared {
            Some(t) => self.emit_raw_int(t, value as i64)?,
            None => self.emit_int_with_marker(UbjsonValueType::Int32, value as i64),
        }
        self.after_value();
        Ok(())
    }

    /// Writes an `f32`. In a typed optimized container the value is
    /// coerced to the declared float width (narrowing `Float64`→source is
    /// not needed here since the source already is `f32`; widening to
    /// `Float64` is lossless).
    pub fn write_f32(&mut self, value: f32) -> ScopedJsonResult<()> {
        let declared = self.before_value()?;
        match declared {
            None => {
                self.writer.u8(b'd');
                self.writer.f32(value);
            }
            Some(UbjsonValueType::Float32) => self.writer.f32(value),
            Some(UbjsonValueType::Float64) => self.writer.f64(value as f64),
            Some(other) => {
                return Err(ScopedJsonError::coercion(
                    format!("cannot write a float into a {other:?}-typed optimized container"),
                    Default::default(),
                    "ubjson::writer::write_f32",
                ))
            }
        }
        self.after_value();
        Ok(())
    }

    /// Writes an `f64`. In a `Float32`-typed optimized container, narrows
    /// unless the magnitude exceeds `f32`'s finite range — NaN/±∞ are
    /// always preserved (spec.md §4.7's float rule).
    pub fn write_f64(&mut self, value: f64) -> ScopedJsonResult<()> {
        let declared = self.before_value()?;
        match declared {
            None => {
                self.writer.u8(b'D');
                self.writer.f64(value);
            }
            Some(UbjsonValueType::Float64) => self.writer.f64(value),
            Some(UbjsonValueType::Float32) => {
                let narrowed = value as f32;
                if narrowed.is_finite() || !value.is_finite() {
                    self.writer.f32(narrowed);
                } else {
                    return Err(ScopedJsonError::coercion(
                        "float64 magnitude exceeds float32's finite range",
                        Default::default(),
                        "ubjson::writer::write_f64",
                    ));
                }
            }
            Some(other) => {
                return Err(ScopedJsonError::coercion(
                    format!("cannot write a float into a {other:?}-typed optimized container"),
                    Default::default(),
                    "ubjson::writer::write_f64",
                ))
            }
        }
        self.after_value();
        Ok(())
    }

    /// Writes a single-byte ASCII `Char` value.
    pub fn write_char(&mut self, value: char) -> ScopedJsonResult<()> {
        if !value.is_ascii() {
            return Err(ScopedJsonError::coercion(
                "UBJSON Char values must be ASCII",
                Default::default(),
                "ubjson::writer::write_char",
            ));
        }
        let declared = self.before_value()?;
        match declared {
            None => {
                self.writer.u8(b'C');
                self.writer.u8(value as u8);
            }
            Some(UbjsonValueType::Char) => self.writer.u8(value as u8),
            Some(other) => {
                return Err(ScopedJsonError::coercion(
                    format!("cannot write a char into a {other:?}-typed optimized container"),
                    Default::default(),
                    "ubjson::writer::write_char",
                ))
            }
        }
        self.after_value();
        Ok(())
    }

    pub fn write_string(&mut self, value: &str) -> ScopedJsonResult<()> {
        let declared = self.before_value()?;
        match declared {
            None => {
                self.writer.u8(b'S');
                self.write_length_prefixed_text(value);
            }
            Some(UbjsonValueType::String) => self.write_length_prefixed_text(value),
            Some(other) => {
                return Err(ScopedJsonError::coercion(
                    format!("cannot write a string into a {other:?}-typed optimized container"),
                    Default::default(),
                    "ubjson::writer::write_string",
                ))
            }
        }
        self.after_value();
        Ok(())
    }

    /// The "high-precision" arbitrary-precision number, passed through as
    /// a decimal-string payload (spec.md §9(c): no arbitrary-precision
    /// arithmetic on this side either).
    pub fn write_high_precision(&mut self, decimal: &str) -> ScopedJsonResult<()> {
        let declared = self.before_value()?;
        match declared {
            None => {
                self.writer.u8(b'H');
                self.write_length_prefixed_text(decimal);
            }
            Some(UbjsonValueType::HighPrecision) => self.write_length_prefixed_text(decimal),
            Some(other) => {
                return Err(ScopedJsonError::coercion(
                    format!("cannot write a high-precision number into a {other:?}-typed optimized container"),
                    Default::default(),
                    "ubjson::writer::write_high_precision",
                ))
            }
        }
        self.after_value();
        Ok(())
    }

    /// Encodes `bytes` as a base64 string value (spec.md §4.7).
    pub fn write_base64(&mut self, bytes: &[u8]) -> ScopedJsonResult<()> {
        self.write_string(&to_base64(bytes))
    }

    /// Writes `bytes` as the `[$U#<count>` typed-optimized-array shorthand
    /// followed by the raw bytes — no per-element markers, no closing `]`
    /// (spec.md §4.7 "Binary blobs"). Ported from the teacher's `write_bin`.
    pub fn write_binary(&mut self, bytes: &[u8]) -> ScopedJsonResult<()> {
        self.before_value()?;
        self.writer.u8(b'[');
        self.writer.u8(b'$');
        self.writer.u8(b'U');
        self.writer.u8(b'#');
        self.emit_minimal_int(bytes.len() as i64);
        self.writer.buf(bytes);
        self.after_value();
        Ok(())
    }

    // ---- containers ----

    fn write_header(&mut self, params: UbjsonContainerParams) -> Option<Declared> {
        match params.optimized {
            None => None,
            Some(opt) => {
                if let Some(vt) = opt.value_type {
                    self.writer.u8(b'$');
                    let marker = value_type_to_marker(vt).expect("declared element type always has a marker");
                    self.writer.u8(marker);
                }
                self.writer.u8(b'#');
                self.emit_minimal_int(opt.count as i64);
                Some(Declared {
                    value_type: opt.value_type,
                    remaining: opt.count,
                })
            }
        }
    }

    pub fn begin_array(&mut self, params: UbjsonContainerParams) -> ScopedJsonResult<()> {
        self.before_value()?;
        self.writer.u8(b'[');
        let declared = self.write_header(params);
        self.stack.push(Context {
            kind: ContextKind::Array,
            declared,
            wrote_value: false,
        });
        Ok(())
    }

    pub fn end_array(&mut self) -> ScopedJsonResult<()> {
        self.close(ContextKind::Array, b']')?;
        self.after_value();
        Ok(())
    }

    pub fn begin_object(&mut self, params: UbjsonContainerParams) -> ScopedJsonResult<()> {
        self.before_value()?;
        self.writer.u8(b'{');
        let declared = self.write_header(params);
        self.stack.push(Context {
            kind: ContextKind::Object,
            declared,
            wrote_value: false,
        });
        Ok(())
    }

    pub fn end_object(&mut self) -> ScopedJsonResult<()> {
        self.close(ContextKind::Object, b'}')
    }

    /// Pops the current container. A plain container writes its closing
    /// marker; an optimized one never does (the declared count is the only
    /// terminator on the wire). Closing early is only legal when the
    /// remaining slots are of a type with no payload (`Null`/`True`/
    /// `False`), which may stay implicit (spec.md §4.7).
    fn close(&mut self, expected: ContextKind, marker: u8) -> ScopedJsonResult<()> {
        if self.stack.len() <= 1 {
            return Err(ScopedJsonError::structural(
                "unbalanced container close at document root",
                Default::default(),
                "ubjson::writer::close",
            ));
        }
        let top = self.stack.last().expect("checked len above");
        if top.kind != expected {
            return Err(ScopedJsonError::structural(
                "container close does not match the open container kind",
                Default::default(),
                "ubjson::writer::close",
            ));
        }
        if let Some(d) = &top.declared {
            let implicit_ok = matches!(d.value_type, Some(UbjsonValueType::Null) | Some(UbjsonValueType::True) | Some(UbjsonValueType::False));
            if d.remaining > 0 && !implicit_ok {
                return Err(ScopedJsonError::configuration(
                    "closed an optimized container before its declared element count was reached",
                    "ubjson::writer::close",
                ));
            }
        } else {
            self.writer.u8(marker);
        }
        self.stack.pop();
        Ok(())
    }

    /// Serializes a full in-memory tree as the current value, always as a
    /// plain (unoptimized) container — `Item` carries no optimized-header
    /// hints, only the shared structural shape (spec.md §3.5).
    pub fn write_item(&mut self, item: &Item) -> ScopedJsonResult<()> {
        match item {
            Item::Object(map) => {
                self.begin_object(UbjsonContainerParams::default())?;
                for (k, v) in map {
                    self.write_key(k)?;
                    self.write_item(v)?;
                }
                self.end_object()
            }
            Item::Array(items) => {
                self.begin_array(UbjsonContainerParams::default())?;
                for v in items {
                    self.write_item(v)?;
                }
                self.end_array()
            }
            Item::Value { lexeme, is_string, .. } => {
                if *is_string {
                    self.write_string(lexeme)
                } else {
                    self.write_lexeme_scalar(lexeme)
                }
            }
        }
    }

    /// Writes a bare (unquoted) lexeme from a document tree as the
    /// matching scalar type: `null`/`true`/`false`, otherwise an integer
    /// or float per `classify_lexeme`, clamping out-of-`i64`-range
    /// integers the way the teacher's `write_big_int` does.
    fn write_lexeme_scalar(&mut self, lexeme: &str) -> ScopedJsonResult<()> {
        match lexeme {
            "null" => return self.write_null(),
            "true" => return self.write_bool(true),
            "false" => return self.write_bool(false),
            _ => {}
        }
        match classify_lexeme(lexeme) {
            DetailedValueType::Float32 | DetailedValueType::Float64 | DetailedValueType::BigFloat => {
                let v = parse_float(lexeme).ok_or_else(|| {
                    ScopedJsonError::format(
                        format!("invalid float lexeme: {lexeme}"),
                        Default::default(),
                        "ubjson::writer::write_lexeme_scalar",
                    )
                })?;
                self.write_f64(v)
            }
            DetailedValueType::Invalid => Err(ScopedJsonError::format(
                format!("invalid lexeme: {lexeme}"),
                Default::default(),
                "ubjson::writer::write_lexeme_scalar",
            )),
            _ => {
                let v = parse_integer(lexeme).ok_or_else(|| {
                    ScopedJsonError::format(
                        format!("invalid integer lexeme: {lexeme}"),
                        Default::default(),
                        "ubjson::writer::write_lexeme_scalar",
                    )
                })?;
                let clamped = v.clamp(i64::MIN as i128, i64::MAX as i128) as i64;
                self.write_i64(clamped)
            }
        }
    }
}

fn range_error(v: i64, width: &str) -> ScopedJsonError {
    ScopedJsonError::coercion(
        format!("{v} does not fit in the declared {width} element type"),
        Default::default(),
        "ubjson::writer::emit_raw_int",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use scopedjson_model::ValueOrigin;

    #[test]
    fn writes_flat_object_with_minimal_integers() {
        let mut w = UbjsonWriter::new();
        w.begin_object(UbjsonContainerParams::default()).unwrap();
        w.write_key("a").unwrap();
        w.write_i64(1).unwrap();
        w.write_key("big").unwrap();
        w.write_i64(70000).unwrap();
        w.end_object().unwrap();
        let bytes = w.into_bytes();
        let mut expected = vec![b'{', b'U', 1, b'a', b'U', 1, b'U', 3, b'b', b'i', b'g', b'l'];
        expected.extend_from_slice(&70000i32.to_be_bytes());
        expected.push(b'}');
        assert_eq!(bytes, expected);
    }

    #[test]
    fn writes_typed_optimized_int16_array() {
        let mut w = UbjsonWriter::new();
        w.begin_array(UbjsonContainerParams {
            optimized: Some(OptimizedParams {
                count: 3,
                value_type: Some(UbjsonValueType::Int16),
            }),
        })
        .unwrap();
        w.write_i64(2).unwrap();
        w.write_i64(200).unwrap();
        w.write_i64(20000).unwrap();
        w.end_array().unwrap();
        let bytes = w.into_bytes();
        let expected = [b'[', b'$', b'I', b'#', b'U', 3, 0x00, 0x02, 0x00, 0xC8, 0x4E, 0x20];
        assert_eq!(bytes, expected);
    }

    #[test]
    fn write_binary_uses_typed_array_shorthand() {
        let mut w = UbjsonWriter::new();
        w.write_binary(&[10, 20, 30]).unwrap();
        let bytes = w.into_bytes();
        assert_eq!(bytes, [b'[', b'$', b'U', b'#', b'U', 3, 10, 20, 30]);
    }

    #[test]
    fn rejects_out_of_range_value_in_typed_container() {
        let mut w = UbjsonWriter::new();
        w.begin_array(UbjsonContainerParams {
            optimized: Some(OptimizedParams { count: 1, value_type: Some(UbjsonValueType::UInt8) }),
        })
        .unwrap();
        assert!(w.write_i64(1000).is_err());
    }

    #[test]
    fn write_item_round_trips_object_order() {
        let mut obj = Item::object();
        obj.insert("z", Item::value("1", ValueOrigin::Ubjson));
        obj.insert("a", Item::string("hi", ValueOrigin::Ubjson));
        let mut w = UbjsonWriter::new();
        w.write_item(&obj).unwrap();
        let bytes = w.into_bytes();
        assert_eq!(bytes[0], b'{');
        assert_eq!(*bytes.last().unwrap(), b'}');
    }

    #[test]
    fn closing_early_is_allowed_for_null_typed_container() {
        let mut w = UbjsonWriter::new();
        w.begin_array(UbjsonContainerParams {
            optimized: Some(OptimizedParams { count: 5, value_type: Some(UbjsonValueType::Null) }),
        })
        .unwrap();
        assert!(w.end_array().is_ok());
    }
}
