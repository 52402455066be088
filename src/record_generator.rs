use std::ops::Range;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::record_decoder::RecordBytes;

/// Produces synthetic records with plausible values, for exercising the decoder without a tag.
pub struct RecordGenerator {
    rng: StdRng,
}

impl RecordGenerator {
    // Value range for each byte of the record
    const BYTE_RANGES: [Range<u16>; RecordBytes::LEN] = [
        0..256, // capacity
        0..256,
        0..256, // overcharge voltage
        0..256,
        0..256, // overdischarge voltage
        0..256,
        0..100, // charge temp hundredths
        30..60, // charge temp whole
        0..100, // discharge temp hundredths
        30..60, // discharge temp whole
        0..3,   // manufacturer
        0..3,   // model
        0..256, // timestamp
        0..256,
        0..256,
        0..256,
    ];

    /// A generator seeded from the OS, or deterministically from `seed`.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    pub fn next_bytes(&mut self) -> RecordBytes {
        let mut bytes = [0u8; RecordBytes::LEN];
        for (byte, range) in bytes.iter_mut().zip(Self::BYTE_RANGES) {
            *byte = self.rng.gen_range(range) as u8;
        }
        RecordBytes::new(bytes)
    }

    /// The next record as 32 lowercase hex characters
    pub fn next_hex(&mut self) -> String {
        self.next_bytes().to_hex()
    }
}

/// Generate a single synthetic record as hex.
pub fn generate(seed: Option<u64>) -> String {
    RecordGenerator::new(seed).next_hex()
}

#[test]
fn test_generate_is_valid_hex() {
    let hex = generate(None);
    assert_eq!(hex.len(), RecordBytes::HEX_LEN);
    assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[test]
fn test_generate_is_deterministic_with_seed() {
    assert_eq!(generate(Some(7)), generate(Some(7)));

    let mut generator = RecordGenerator::new(Some(7));
    assert_eq!(generator.next_hex(), generate(Some(7)));
}

#[test]
fn test_generated_fields_stay_in_range() {
    let mut generator = RecordGenerator::new(Some(42));
    for _ in 0..500 {
        let record = crate::decode(generator.next_bytes());
        assert!((30..60).contains(&record.charge_max_temp.whole));
        assert!((30..60).contains(&record.discharge_max_temp.whole));
        assert!(record.charge_max_temp.hundredths < 100);
        assert!(record.discharge_max_temp.hundredths < 100);
        assert!(record.manufacturer.id() < 3);
        assert!(record.model.id() < 3);
        assert!(record.manufacturer.is_known());
        assert!(record.model.is_known());
    }
}
