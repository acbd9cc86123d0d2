//! Seeded property test: for random `i64` values, the UBJSON writer's
//! minimal-integer marker choice must round-trip through the reader to the
//! exact original value (spec.md §8's integer boundary property, exercised
//! across random magnitudes rather than just the boundary constants).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use scopedjson_ubjson::reader::UbjsonReader;
use scopedjson_ubjson::writer::UbjsonWriter;

#[test]
fn minimal_integer_writer_round_trips_random_values() {
    let mut rng = StdRng::seed_from_u64(12345);
    for _ in 0..500 {
        let value: i64 = match rng.gen_range(0..6) {
            0 => rng.gen_range(-127i64..=127),
            1 => rng.gen_range(-32768i64..=32767),
            2 => rng.gen_range(i32::MIN as i64..=i32::MAX as i64),
            3 => rng.gen_range(i64::MIN..=i64::MAX),
            4 => 0,
            _ => rng.gen_range(0i64..=255),
        };

        let mut writer = UbjsonWriter::new();
        writer.write_i64(value).unwrap();
        let bytes = writer.into_bytes();

        let mut reader = UbjsonReader::new(&bytes);
        reader.next_value().unwrap();
        assert_eq!(reader.read_i64(), Some(value), "value {value} bytes {bytes:?}");
    }
}
