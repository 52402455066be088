//! Turn hex strings and byte sequences into [`BatteryRecord`]s.
//!
//! Decoding is total: input of any length and content yields a record. Short input is padded with
//! zeros, long input is truncated, and a hex pair that does not parse becomes a zero byte.

use crate::battery_record::BatteryRecord;

/// The raw 16 byte record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RecordBytes([u8; RecordBytes::LEN]);

impl RecordBytes {
    /// Length of the record in bytes
    pub const LEN: usize = 16;
    /// Length of the record in hex characters
    pub const HEX_LEN: usize = Self::LEN * 2;

    pub fn new(bytes: [u8; Self::LEN]) -> Self {
        Self(bytes)
    }

    /// Read a hex string, case-insensitive.
    ///
    /// Only the first 32 characters are used. Shorter input is right-padded with `'0'` and each
    /// character pair that is not two hex digits is read as 0.
    pub fn from_hex(input: &str) -> Self {
        let chars: Vec<char> = input
            .chars()
            .chain(std::iter::repeat('0'))
            .take(Self::HEX_LEN)
            .collect();

        let mut bytes = [0u8; Self::LEN];
        for (byte, pair) in bytes.iter_mut().zip(chars.chunks(2)) {
            *byte = Self::parse_pair(pair[0], pair[1]);
        }
        Self(bytes)
    }

    /// Take up to 16 bytes, zero padding on the right.
    pub fn from_slice(data: &[u8]) -> Self {
        let mut bytes = [0u8; Self::LEN];
        let n = data.len().min(Self::LEN);
        bytes[..n].copy_from_slice(&data[..n]);
        Self(bytes)
    }

    /// Take up to 16 integer values, clamping each into 0..=255.
    pub fn from_clamped<I>(values: I) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        let mut bytes = [0u8; Self::LEN];
        for (byte, value) in bytes.iter_mut().zip(values) {
            *byte = value.clamp(0, i64::from(u8::MAX)) as u8;
        }
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }

    /// Lowercase hex, always 32 characters
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    fn parse_pair(hi: char, lo: char) -> u8 {
        match (hi.to_digit(16), lo.to_digit(16)) {
            (Some(hi), Some(lo)) => ((hi << 4) | lo) as u8,
            _ => 0,
        }
    }
}

impl std::fmt::Display for RecordBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Anything a record can be decoded from
pub trait IntoRecordBytes {
    fn into_record_bytes(self) -> RecordBytes;
}

impl IntoRecordBytes for RecordBytes {
    fn into_record_bytes(self) -> RecordBytes {
        self
    }
}

impl IntoRecordBytes for &str {
    fn into_record_bytes(self) -> RecordBytes {
        RecordBytes::from_hex(self)
    }
}

impl IntoRecordBytes for &String {
    fn into_record_bytes(self) -> RecordBytes {
        RecordBytes::from_hex(self)
    }
}

impl IntoRecordBytes for &[u8] {
    fn into_record_bytes(self) -> RecordBytes {
        RecordBytes::from_slice(self)
    }
}

impl<const N: usize> IntoRecordBytes for &[u8; N] {
    fn into_record_bytes(self) -> RecordBytes {
        RecordBytes::from_slice(self)
    }
}

impl IntoRecordBytes for &Vec<u8> {
    fn into_record_bytes(self) -> RecordBytes {
        RecordBytes::from_slice(self)
    }
}

/// Decode a record from a hex string or a byte sequence. Never fails.
pub fn decode(input: impl IntoRecordBytes) -> BatteryRecord {
    BatteryRecord::from_bytes(&input.into_record_bytes())
}

/// Encode a record back into its raw bytes
pub fn encode(record: &BatteryRecord) -> RecordBytes {
    record.to_bytes()
}

#[test]
fn test_decode_example() {
    let record = decode("102712345678901234010100AABBCCDD");
    assert_eq!(record.total_capacity_mah, 10000);
    assert_eq!(record.overcharge_voltage_mv, 0x3412);
    assert_eq!(record.overdischarge_voltage_mv, 0x7856);
    assert_eq!(record.charge_max_temp.whole, 0x12);
    assert_eq!(record.charge_max_temp.hundredths, 0x90);
    assert_eq!(record.discharge_max_temp.whole, 0x01);
    assert_eq!(record.discharge_max_temp.hundredths, 0x34);
    assert_eq!(record.manufacturer.name(), "B公司");
    assert_eq!(record.model.name(), "ABC");
    assert_eq!(record.production_timestamp, 0xddccbbaa);
}

#[test]
fn test_decode_is_case_insensitive() {
    assert_eq!(
        decode("102712345678901234010100AABBCCDD"),
        decode("102712345678901234010100aabbccdd")
    );
}

#[test]
fn test_decode_pads_short_input() {
    assert_eq!(decode("1027"), decode("10270000000000000000000000000000"));
    assert_eq!(decode("1").total_capacity_mah, 0x10);
    assert_eq!(decode(""), decode(&[0u8; 16]));
}

#[test]
fn test_decode_truncates_long_input() {
    let long = "102712345678901234010100AABBCCDDEEFF";
    assert_eq!(decode(long), decode(&long[..32]));
}

#[test]
fn test_malformed_pairs_read_as_zero() {
    let bytes = RecordBytes::from_hex("zz10g1+1ff");
    assert_eq!(&bytes.as_bytes()[..5], &[0x00, 0x10, 0x00, 0x00, 0xff]);
}

#[test]
fn test_non_ascii_input() {
    let bytes = RecordBytes::from_hex("電池10");
    assert_eq!(&bytes.as_bytes()[..2], &[0x00, 0x10]);
}

#[test]
fn test_all_zero_record() {
    let record = decode(&[0u8; 16]);
    assert_eq!(record.total_capacity_mah, 0);
    assert_eq!(record.overcharge_voltage_mv, 0);
    assert_eq!(record.overdischarge_voltage_mv, 0);
    assert_eq!(format!("{:.2}", record.charge_max_temp.celsius()), "0.00");
    assert_eq!(format!("{:.2}", record.discharge_max_temp.celsius()), "0.00");
    assert_eq!(record.manufacturer.name(), "A公司");
    assert_eq!(record.model.name(), "ABC");
    assert_eq!(record.production_timestamp, 0);
    assert_eq!(record.production_date().timestamp(), 0);
}

#[test]
fn test_manufacturer_ff_is_unknown() {
    let record = decode("00000000000000000000FFFF00000000");
    assert!(!record.manufacturer.is_known());
    assert!(!record.model.is_known());
    assert_eq!(record.manufacturer.name(), "未知公司");
}

#[test]
fn test_byte_slices_pad_and_truncate() {
    let short: &[u8] = &[0x10, 0x27];
    assert_eq!(decode(short).total_capacity_mah, 10000);
    assert_eq!(decode(short).production_timestamp, 0);

    let long = vec![0xffu8; 20];
    assert_eq!(decode(&long).to_bytes().as_bytes(), &[0xff; 16]);
}

#[test]
fn test_from_clamped() {
    let bytes = RecordBytes::from_clamped([-5, 300, 0x10, 255]);
    assert_eq!(&bytes.as_bytes()[..5], &[0x00, 0xff, 0x10, 0xff, 0x00]);
}

#[test]
fn test_encode_round_trip() {
    let record = decode("102712345678901234010100AABBCCDD");
    let hex = encode(&record).to_hex();
    assert_eq!(hex, "102712345678901234010100aabbccdd");
    assert_eq!(decode(&hex), record);
}
