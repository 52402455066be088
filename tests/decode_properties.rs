//! Properties of decoding over arbitrary input

use battag::{decode, encode, generate, RecordBytes};
use proptest::prelude::*;

#[test]
fn test_documented_example() {
    let record = decode("102712345678901234010100AABBCCDD");
    assert_eq!(record.total_capacity_mah, 0x10 + 0x27 * 256);
    assert_eq!(record.production_timestamp, 0xddccbbaa);
}

#[test]
fn test_generated_records_use_known_ids() {
    for seed in 0..200 {
        let record = decode(&generate(Some(seed)));
        assert!(record.manufacturer.is_known(), "seed {seed}");
        assert!(record.model.is_known(), "seed {seed}");
    }
}

proptest! {
    #[test]
    fn prop_only_first_32_chars_matter(hex in "[0-9a-fA-F]{32}", tail in ".{0,16}") {
        let long = format!("{hex}{tail}");
        prop_assert_eq!(decode(&long), decode(&hex));
    }

    #[test]
    fn prop_short_input_is_zero_padded(hex in "[0-9a-fA-F]{0,31}") {
        let padded = format!("{hex:0<32}");
        prop_assert_eq!(decode(&hex), decode(&padded));
    }

    #[test]
    fn prop_decode_never_panics(input in ".*") {
        let record = decode(&input);
        prop_assert_eq!(record.to_bytes(), RecordBytes::from_hex(&input));
    }

    #[test]
    fn prop_encode_then_decode_is_identity(bytes in proptest::array::uniform16(any::<u8>())) {
        let record = decode(&bytes);
        let encoded = encode(&record);
        prop_assert_eq!(decode(&encoded.to_hex()), record);
        prop_assert_eq!(encoded.as_bytes(), &bytes);
    }
}
