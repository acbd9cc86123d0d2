//! Stateful JSON writer (spec.md §4.6): container-nesting context,
//! per-container formatting discipline, and the value-emitting calls that
//! make up the common writer contract.

use scopedjson_base64::to_base64;
use scopedjson_model::{escape_units, is_identifier_like, EscapeOptions, Item, ScopedJsonError, ScopedJsonResult};

/// Formatting mode requested for a container at `beginObject`/`beginArray`
/// time (spec.md §6.2's `JsonParameters`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formatting {
    /// Inherit the parent container's mode (document root defaults to `None`).
    Default,
    None,
    Flat,
    Format,
}

impl Default for Formatting {
    fn default() -> Self {
        Formatting::Default
    }
}

/// Parameters for a container-start call. A single type so the same call
/// reads naturally whether the resulting container is written as JSON or
/// UBJSON (spec.md §6.2's `StructureParameters`).
#[derive(Debug, Clone, Copy)]
pub struct ContainerParams {
    pub formatting: Formatting,
    pub values_per_line: usize,
}

impl Default for ContainerParams {
    fn default() -> Self {
        Self {
            formatting: Formatting::Default,
            values_per_line: 1,
        }
    }
}

/// The formatting mode actually in effect for a pushed container, after
/// resolving `Default` against the parent and clamping so a child can
/// never format "louder" than its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Resolved {
    None,
    Flat,
    Format,
}

fn resolve_formatting(parent: Resolved, requested: Formatting) -> Resolved {
    match requested {
        Formatting::Default => parent,
        Formatting::None => Resolved::None,
        Formatting::Flat => parent.min(Resolved::Flat),
        Formatting::Format => parent.min(Resolved::Format),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContextKind {
    Document,
    Array,
    Object,
}

struct Context {
    kind: ContextKind,
    formatting: Resolved,
    values_per_line: usize,
    count: usize,
}

/// Options controlling number/string formatting, independent of the
/// per-container structural formatting mode.
#[derive(Debug, Clone, Copy)]
pub struct JsonWriterOptions {
    pub escape_non_ascii: bool,
    pub unquoted_keys: bool,
    pub float_precision: usize,
    pub allow_non_finite: bool,
    pub quote_non_finite: bool,
    /// Maximum string-literal line width before folding with `\<newline>`.
    /// `None` disables folding.
    pub fold_width: Option<usize>,
    pub root_formatting: Formatting,
}

impl Default for JsonWriterOptions {
    fn default() -> Self {
        Self {
            escape_non_ascii: false,
            unquoted_keys: false,
            float_precision: 9,
            allow_non_finite: false,
            quote_non_finite: true,
            fold_width: None,
            root_formatting: Formatting::None,
        }
    }
}

/// A stateful JSON writer accumulating output in an owned string buffer.
pub struct JsonWriter {
    out: String,
    stack: Vec<Context>,
    options: JsonWriterOptions,
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonWriter {
    pub fn new() -> Self {
        Self::with_options(JsonWriterOptions::default())
    }

    pub fn with_options(options: JsonWriterOptions) -> Self {
        let root_formatting = match options.root_formatting {
            Formatting::Default | Formatting::None => Resolved::None,
            Formatting::Flat => Resolved::Flat,
            Formatting::Format => Resolved::Format,
        };
        Self {
            out: String::new(),
            stack: vec![Context {
                kind: ContextKind::Document,
                formatting: root_formatting,
                values_per_line: 1,
                count: 0,
            }],
            options,
        }
    }

    /// Consumes the writer, returning its buffered output.
    pub fn into_string(self) -> String {
        self.out
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    fn newline_indent(&mut self, depth: usize) {
        self.out.push('\n');
        for _ in 0..depth {
            self.out.push_str("  ");
        }
    }

    /// Emits the comma/space/newline/indentation preceding the next entry
    /// in the current (pre-push) top context, and bumps its count. Shared
    /// by scalar values, container opens, and object keys — the common
    /// `beginValue` step of spec.md §4.6, generalized to also serve as the
    /// pre-key separator.
    fn begin_entry(&mut self) {
        let depth = self.depth();
        let top = self.stack.last_mut().expect("writer stack is never empty");
        let count = top.count;
        match top.formatting {
            Resolved::None => {
                if count > 0 {
                    self.out.push(',');
                }
            }
            Resolved::Flat => {
                if count > 0 {
                    self.out.push_str(", ");
                }
            }
            Resolved::Format => {
                let vpl = top.values_per_line.max(1);
                if count == 0 {
                    self.newline_indent(depth);
                } else if vpl > 1 && count % vpl != 0 {
                    self.out.push_str(", ");
                } else {
                    self.out.push(',');
                    self.newline_indent(depth);
                }
            }
        }
        self.stack.last_mut().unwrap().count += 1;
    }

    /// Pre-value hook called by every scalar/container-open write. Only
    /// array contexts need a separator here — an object's separator (and
    /// key) was already emitted by `write_key`, and the document root
    /// holds exactly one value.
    fn before_value(&mut self) -> ScopedJsonResult<()> {
        match self.stack.last().unwrap().kind {
            ContextKind::Array => {
                self.begin_entry();
                Ok(())
            }
            ContextKind::Object => Ok(()),
            ContextKind::Document => {
                if self.stack.last().unwrap().count > 0 {
                    return Err(ScopedJsonError::structural(
                        "a document may only hold one top-level value",
                        scopedjson_model::Location::default(),
                        "json::writer::before_value",
                    ));
                }
                self.stack.last_mut().unwrap().count += 1;
                Ok(())
            }
        }
    }

    /// Writes the key for the next object member. Must be called while the
    /// current container is an object.
    pub fn write_key(&mut self, key: &str) -> ScopedJsonResult<()> {
        if self.stack.last().unwrap().kind != ContextKind::Object {
            return Err(ScopedJsonError::structural(
                "writeKey called outside an object",
                scopedjson_model::Location::default(),
                "json::writer::write_key",
            ));
        }
        self.begin_entry();
        if self.options.unquoted_keys && is_identifier_like(key) {
            self.out.push_str(key);
        } else {
            self.out.push_str(&self.format_string(key));
        }
        let sep = match self.stack.last().unwrap().formatting {
            Resolved::None => ":",
            Resolved::Flat | Resolved::Format => ": ",
        };
        self.out.push_str(sep);
        Ok(())
    }

    fn format_string(&self, s: &str) -> String {
        let opts = EscapeOptions {
            escape_non_ascii: self.options.escape_non_ascii,
        };
        let units = escape_units(s, opts);
        let mut out = String::with_capacity(s.len() + 2);
        out.push('"');
        match self.options.fold_width {
            None => out.push_str(&units.concat()),
            Some(width) => {
                let mut line_len = 1;
                for unit in &units {
                    let unit_len = unit.chars().count();
                    if line_len + unit_len > width && line_len > 1 {
                        out.push_str("\\\n");
                        line_len = 0;
                    }
                    out.push_str(unit);
                    line_len += unit_len;
                }
            }
        }
        out.push('"');
        out
    }

    fn place_scalar(&mut self, text: &str) -> ScopedJsonResult<()> {
        self.before_value()?;
        self.out.push_str(text);
        Ok(())
    }

    pub fn write_null(&mut self) -> ScopedJsonResult<()> {
        self.place_scalar("null")
    }

    pub fn write_bool(&mut self, value: bool) -> ScopedJsonResult<()> {
        self.place_scalar(if value { "true" } else { "false" })
    }

    pub fn write_i64(&mut self, value: i64) -> ScopedJsonResult<()> {
        self.place_scalar(&value.to_string())
    }

    pub fn write_u64(&mut self, value: u64) -> ScopedJsonResult<()> {
        self.place_scalar(&value.to_string())
    }

    /// Non-finite values are rejected unless `allow_non_finite` is set, in
    /// which case they're written as the bare or quoted literal per
    /// `quote_non_finite` (spec.md §4.6).
    pub fn write_f64(&mut self, value: f64) -> ScopedJsonResult<()> {
        if !value.is_finite() {
            if !self.options.allow_non_finite {
                return Err(ScopedJsonError::configuration(
                    "non-finite float written with allow_non_finite disabled",
                    "json::writer::write_f64",
                ));
            }
            let literal = if value.is_nan() {
                "NaN"
            } else if value.is_sign_positive() {
                "Infinity"
            } else {
                "-Infinity"
            };
            let text = if self.options.quote_non_finite {
                format!("\"{literal}\"")
            } else {
                literal.to_string()
            };
            return self.place_scalar(&text);
        }
        let text = format!("{:.*}", self.options.float_precision.min(17), value);
        let text = trim_float(&text);
        self.place_scalar(&text)
    }

    pub fn write_string(&mut self, value: &str) -> ScopedJsonResult<()> {
        let text = self.format_string(value);
        self.place_scalar(&text)
    }

    /// Encodes `bytes` as a base64 string value (spec.md §4.7: `base64` on
    /// both writers encodes to a text string value).
    pub fn write_base64(&mut self, bytes: &[u8]) -> ScopedJsonResult<()> {
        self.write_string(&to_base64(bytes))
    }

    pub fn write_binary(&mut self, bytes: &[u8]) -> ScopedJsonResult<()> {
        self.write_base64(bytes)
    }

    pub fn begin_object(&mut self, params: ContainerParams) -> ScopedJsonResult<()> {
        self.before_value()?;
        let parent_formatting = self.stack.last().unwrap().formatting;
        self.out.push('{');
        self.stack.push(Context {
            kind: ContextKind::Object,
            formatting: resolve_formatting(parent_formatting, params.formatting),
            values_per_line: params.values_per_line,
            count: 0,
        });
        Ok(())
    }

    pub fn end_object(&mut self) -> ScopedJsonResult<()> {
        self.close(ContextKind::Object, '}')
    }

    pub fn begin_array(&mut self, params: ContainerParams) -> ScopedJsonResult<()> {
        self.before_value()?;
        let parent_formatting = self.stack.last().unwrap().formatting;
        self.out.push('[');
        self.stack.push(Context {
            kind: ContextKind::Array,
            formatting: resolve_formatting(parent_formatting, params.formatting),
            values_per_line: params.values_per_line,
            count: 0,
        });
        Ok(())
    }

    pub fn end_array(&mut self) -> ScopedJsonResult<()> {
        self.close(ContextKind::Array, ']')
    }

    fn close(&mut self, expected: ContextKind, marker: char) -> ScopedJsonResult<()> {
        if self.stack.len() <= 1 {
            return Err(ScopedJsonError::structural(
                "unbalanced container close at document root",
                scopedjson_model::Location::default(),
                "json::writer::close",
            ));
        }
        let top = self.stack.last().unwrap();
        if top.kind != expected {
            return Err(ScopedJsonError::structural(
                "container close does not match the open container kind",
                scopedjson_model::Location::default(),
                "json::writer::close",
            ));
        }
        let formatting = top.formatting;
        let count = top.count;
        self.stack.pop();
        if formatting == Resolved::Format && count > 0 {
            self.newline_indent(self.depth());
        }
        self.out.push(marker);
        Ok(())
    }

    /// Serializes a full in-memory tree as the current value.
    pub fn write_item(&mut self, item: &Item) -> ScopedJsonResult<()> {
        match item {
            Item::Object(map) => {
                self.begin_object(ContainerParams::default())?;
                for (k, v) in map {
                    self.write_key(k)?;
                    self.write_item(v)?;
                }
                self.end_object()
            }
            Item::Array(items) => {
                self.begin_array(ContainerParams::default())?;
                for v in items {
                    self.write_item(v)?;
                }
                self.end_array()
            }
            Item::Value { lexeme, is_string, .. } => {
                if *is_string {
                    self.write_string(lexeme)
                } else {
                    self.place_scalar(lexeme)
                }
            }
        }
    }
}

/// Trims trailing zeros (and a trailing `.`) from a fixed-precision float
/// rendering, e.g. `"3.140000000"` -> `"3.14"`, `"4.000000000"` -> `"4"`.
fn trim_float(s: &str) -> String {
    if !s.contains('.') {
        return s.to_string();
    }
    let trimmed = s.trim_end_matches('0');
    trimmed.trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scopedjson_model::ValueOrigin;

    #[test]
    fn writes_flat_object() {
        let mut w = JsonWriter::new();
        w.begin_object(ContainerParams::default()).unwrap();
        w.write_key("a").unwrap();
        w.write_i64(1).unwrap();
        w.write_key("b").unwrap();
        w.write_bool(true).unwrap();
        w.end_object().unwrap();
        assert_eq!(w.into_string(), r#"{"a":1,"b":true}"#);
    }

    #[test]
    fn writes_formatted_array_with_indentation() {
        let mut w = JsonWriter::with_options(JsonWriterOptions {
            root_formatting: Formatting::Format,
            ..JsonWriterOptions::default()
        });
        w.begin_array(ContainerParams {
            formatting: Formatting::Default,
            values_per_line: 1,
        })
        .unwrap();
        w.write_i64(1).unwrap();
        w.write_i64(2).unwrap();
        w.end_array().unwrap();
        assert_eq!(w.into_string(), "[\n  1,\n  2\n]");
    }

    #[test]
    fn child_formatting_cannot_exceed_parent() {
        let mut w = JsonWriter::new();
        w.begin_array(ContainerParams::default()).unwrap();
        w.begin_object(ContainerParams {
            formatting: Formatting::Format,
            values_per_line: 1,
        })
        .unwrap();
        w.write_key("x").unwrap();
        w.write_i64(1).unwrap();
        w.end_object().unwrap();
        w.end_array().unwrap();
        assert_eq!(w.into_string(), r#"[{"x":1}]"#);
    }

    #[test]
    fn escapes_and_quotes_strings() {
        let mut w = JsonWriter::new();
        w.write_string("a\"b\\c").unwrap();
        assert_eq!(w.into_string(), r#""a\"b\\c""#);
    }

    #[test]
    fn rejects_non_finite_float_by_default() {
        let mut w = JsonWriter::new();
        assert!(w.write_f64(f64::NAN).is_err());
    }

    #[test]
    fn emits_non_finite_literal_when_enabled() {
        let mut w = JsonWriter::with_options(JsonWriterOptions {
            allow_non_finite: true,
            quote_non_finite: false,
            ..JsonWriterOptions::default()
        });
        w.write_f64(f64::INFINITY).unwrap();
        assert_eq!(w.into_string(), "Infinity");
    }

    #[test]
    fn trims_trailing_zeros() {
        let mut w = JsonWriter::new();
        w.write_f64(4.0).unwrap();
        assert_eq!(w.into_string(), "4");
    }

    #[test]
    fn write_item_round_trips_object_order() {
        let mut obj = Item::object();
        obj.insert("z", Item::value("1", ValueOrigin::Json));
        obj.insert("a", Item::string("hi", ValueOrigin::Json));
        let mut w = JsonWriter::new();
        w.write_item(&obj).unwrap();
        assert_eq!(w.into_string(), r#"{"z":1,"a":"hi"}"#);
    }
}
