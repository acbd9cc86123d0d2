use scopedjson_json::reader::JsonReader;
use scopedjson_json::writer::{ContainerParams, Formatting, JsonWriter, JsonWriterOptions};

#[test]
fn quoted_key_round_trip() {
    let src = r#"{"a":1,"b":[true,null,-3]}"#;
    let mut reader = JsonReader::new(src.as_bytes());
    reader.next_value().unwrap();
    let item = reader.read_item().unwrap();

    let mut writer = JsonWriter::new();
    writer.write_item(&item).unwrap();
    assert_eq!(writer.into_string(), src);
}

#[test]
fn permissive_dialect_reads_into_object() {
    let src = br#"{ key: 0x1F, /* c */ 'v': "x\ny", }"#;
    let mut reader = JsonReader::new(src);
    reader.next_value().unwrap();
    let item = reader.read_item().unwrap();
    let obj = item.as_object().unwrap();
    assert_eq!(obj["key"].as_lexeme(), Some("0x1F"));
    assert_eq!(obj["v"].as_lexeme(), Some("x\ny"));
    assert!(obj["v"].is_string());
}

#[test]
fn block_string_reads_literally() {
    let src = b"\"\"\"line1\nline2\"\"\"";
    let mut reader = JsonReader::new(src);
    reader.next_value().unwrap();
    assert_eq!(reader.read_string(), Some("line1\nline2".to_string()));
}

#[test]
fn writer_formats_nested_empty_object() {
    let mut writer = JsonWriter::with_options(JsonWriterOptions {
        root_formatting: Formatting::Format,
        ..JsonWriterOptions::default()
    });
    writer.begin_object(ContainerParams::default()).unwrap();
    writer.write_key("name").unwrap();
    writer.begin_object(ContainerParams::default()).unwrap();
    writer.end_object().unwrap();
    writer.end_object().unwrap();
    assert_eq!(writer.into_string(), "{\n  \"name\": {}\n}");
}

#[test]
fn non_finite_float_policy() {
    let mut quoted = JsonWriter::with_options(JsonWriterOptions {
        allow_non_finite: true,
        quote_non_finite: true,
        ..JsonWriterOptions::default()
    });
    quoted.write_f64(f64::NEG_INFINITY).unwrap();
    assert_eq!(quoted.into_string(), "\"-Infinity\"");

    let mut bare = JsonWriter::with_options(JsonWriterOptions {
        allow_non_finite: true,
        quote_non_finite: false,
        ..JsonWriterOptions::default()
    });
    bare.write_f64(f64::NEG_INFINITY).unwrap();
    assert_eq!(bare.into_string(), "-Infinity");

    let mut rejecting = JsonWriter::new();
    assert!(rejecting.write_f64(f64::NEG_INFINITY).is_err());
}

#[test]
fn array_traversal_without_read_item() {
    let src = "[1, 2, 3]";
    let mut reader = JsonReader::new(src.as_bytes());
    reader.next_value().unwrap();
    reader.enter().unwrap();
    let mut sum = 0i64;
    while reader.next_value().unwrap() {
        sum += reader.read_i64().unwrap();
    }
    reader.leave().unwrap();
    assert_eq!(sum, 6);
}

#[test]
fn leave_mid_object_skips_remaining_members() {
    let src = r#"{"a":1,"b":{"nested":true},"c":3}"#;
    let mut reader = JsonReader::new(src.as_bytes());
    reader.next_value().unwrap();
    reader.enter().unwrap();
    assert!(reader.next_key().unwrap());
    assert_eq!(reader.current_key(), Some("a"));
    // Leave immediately, without reading any value at all.
    reader.leave().unwrap();
    assert_eq!(reader.scope_depth(), 1);
    assert!(!reader.next_value().unwrap());
    assert!(reader.is_at_end());
}
