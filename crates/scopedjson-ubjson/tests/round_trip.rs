use scopedjson_ubjson::reader::UbjsonReader;
use scopedjson_ubjson::writer::{OptimizedParams, UbjsonContainerParams, UbjsonWriter};
use scopedjson_ubjson::UbjsonValueType;

#[test]
fn optimized_int16_array_round_trips_byte_for_byte() {
    // spec.md §8 scenario 4: `[ $ I # U 03 00 02 00 C8 4E 20`.
    let src = [b'[', b'$', b'I', b'#', b'U', 3, 0x00, 0x02, 0x00, 0xC8, 0x4E, 0x20];
    let mut reader = UbjsonReader::new(&src);
    reader.next_value().unwrap();
    assert!(reader.is_optimized_array());
    assert_eq!(reader.optimized_count(), Some(3));
    let item = reader.read_item().unwrap();
    let arr = item.as_array().unwrap();
    let values: Vec<&str> = arr.iter().map(|v| v.as_lexeme().unwrap()).collect();
    assert_eq!(values, vec!["2", "200", "20000"]);

    let mut writer = UbjsonWriter::new();
    writer
        .begin_array(UbjsonContainerParams {
            optimized: Some(OptimizedParams {
                count: 3,
                value_type: Some(UbjsonValueType::Int16),
            }),
        })
        .unwrap();
    writer.write_i64(2).unwrap();
    writer.write_i64(200).unwrap();
    writer.write_i64(20000).unwrap();
    writer.end_array().unwrap();
    assert_eq!(writer.into_bytes(), src);
}

#[test]
fn flat_object_key_round_trip() {
    let mut writer = UbjsonWriter::new();
    writer.begin_object(UbjsonContainerParams::default()).unwrap();
    writer.write_key("a").unwrap();
    writer.write_i64(1).unwrap();
    writer.write_key("b").unwrap();
    writer.write_bool(true).unwrap();
    writer.end_object().unwrap();
    let bytes = writer.into_bytes();

    let mut reader = UbjsonReader::new(&bytes);
    reader.next_value().unwrap();
    let item = reader.read_item().unwrap();
    let obj = item.as_object().unwrap();
    assert_eq!(obj["a"].as_lexeme(), Some("1"));
    assert_eq!(obj["b"].as_lexeme(), Some("true"));
}

#[test]
fn minimal_integer_marker_boundaries() {
    // spec.md §8 "Boundary properties": each DetailedValueType boundary
    // must pick the expected minimal marker on write.
    let cases: &[(i64, u8)] = &[
        (0, b'U'),
        (255, b'U'),
        (256, b'I'),
        (-1, b'i'),
        (-128, b'i'),
        (-129, b'I'),
        (32767, b'I'),
        (32768, b'l'),
        (-32768, b'I'),
        (-32769, b'l'),
        (i32::MAX as i64, b'l'),
        (i32::MAX as i64 + 1, b'L'),
        (i32::MIN as i64, b'l'),
        (i32::MIN as i64 - 1, b'L'),
    ];
    for &(value, marker) in cases {
        let mut writer = UbjsonWriter::new();
        writer.write_i64(value).unwrap();
        let bytes = writer.into_bytes();
        assert_eq!(bytes[0], marker, "value {value} expected marker {}", marker as char);
    }
}

#[test]
fn no_op_markers_are_dropped_on_read() {
    let mut bytes = vec![b'['];
    bytes.push(b'N');
    bytes.push(b'U');
    bytes.push(1);
    bytes.push(b'N');
    bytes.push(b'U');
    bytes.push(2);
    bytes.push(b']');

    let mut reader = UbjsonReader::new(&bytes);
    reader.next_value().unwrap();
    let item = reader.read_item().unwrap();
    let arr = item.as_array().unwrap();
    let values: Vec<&str> = arr.iter().map(|v| v.as_lexeme().unwrap()).collect();
    assert_eq!(values, vec!["1", "2"]);
}

#[test]
fn no_op_as_object_key_is_a_format_error() {
    let mut bytes = vec![b'{'];
    bytes.push(b'N');
    bytes.push(b'}');
    let mut reader = UbjsonReader::new(&bytes);
    reader.next_value().unwrap();
    assert!(reader.next_key().is_err());
}

#[test]
fn leaving_mid_optimized_array_skips_remaining_elements() {
    let bytes = [b'[', b'$', b'U', b'#', b'U', 3, 10, 20, 30];
    let mut reader = UbjsonReader::new(&bytes);
    reader.next_value().unwrap();
    reader.enter().unwrap();
    reader.next_value().unwrap();
    assert_eq!(reader.read_u64(), Some(10));
    reader.leave().unwrap();
    assert!(!reader.next_value().unwrap());
    assert!(reader.is_at_end());
}

#[test]
fn null_reads_as_positive_infinity_on_float_coercion() {
    let mut reader = UbjsonReader::new(b"Z");
    reader.next_value().unwrap();
    assert_eq!(reader.read_f64(), Some(f64::INFINITY));
}

#[test]
fn binary_blob_round_trips_through_optimized_uint8_array() {
    let payload = b"hello ubjson";
    let mut writer = UbjsonWriter::new();
    writer.write_binary(payload).unwrap();
    let bytes = writer.into_bytes();

    let mut reader = UbjsonReader::new(&bytes);
    reader.next_value().unwrap();
    assert_eq!(reader.read_binary().unwrap(), payload);
}
