use chrono::{DateTime, Utc};

use crate::manufacturer::{BatteryModel, Manufacturer};
use crate::record_decoder::RecordBytes;

/// A temperature limit as stored on the tag: a whole degrees byte and a hundredths byte.
///
/// The hundredths byte is not range checked on the tag, so values up to 2.55 are added on top of
/// the whole part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Temperature {
    pub whole: u8,
    pub hundredths: u8,
}

impl Temperature {
    pub fn celsius(&self) -> f64 {
        f64::from(self.whole) + f64::from(self.hundredths) / 100.0
    }
}

/// The battery specification decoded from a 16 byte record
///
/// Byte layout (all multi-byte values little endian):
///
/// Start Byte | End Byte | Meaning
/// 0          | 1        | Total capacity in mAh
/// 2          | 3        | Overcharge protection voltage in mV
/// 4          | 5        | Overdischarge protection voltage in mV
/// 6          | 7        | Charge max temperature, hundredths then whole °C
/// 8          | 9        | Discharge max temperature, hundredths then whole °C
/// 10         | 10       | Manufacturer id
/// 11         | 11       | Model id
/// 12         | 15       | Production time in unix seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BatteryRecord {
    /// The total capacity of the battery in mAh
    pub total_capacity_mah: u16,
    /// The overcharge protection voltage in mV
    pub overcharge_voltage_mv: u16,
    /// The overdischarge protection voltage in mV
    pub overdischarge_voltage_mv: u16,
    pub charge_max_temp: Temperature,
    pub discharge_max_temp: Temperature,
    pub manufacturer: Manufacturer,
    pub model: BatteryModel,
    /// Production time in seconds since the unix epoch
    pub production_timestamp: u32,
}

impl BatteryRecord {
    /// The record shown before any data has been read
    pub const DEFAULT_BYTES: [u8; RecordBytes::LEN] = [
        0x10, 0x27, 0x12, 0x34, 0x56, 0x78, 0x90, 0x12, 0x34, 0x56, 0x00, 0x01, 0xaa, 0xbb, 0xcc,
        0xdd,
    ];

    // Reference figures for the charge estimate
    const NOMINAL_CAPACITY_MAH: f64 = 15000.0;
    const NOMINAL_VOLTAGE_MV: f64 = 5000.0;

    /// Interpret the raw record using the fixed offset table. Total, every byte pattern is a record.
    pub fn from_bytes(bytes: &RecordBytes) -> Self {
        let b = bytes.as_bytes();
        Self {
            total_capacity_mah: u16::from_le_bytes([b[0], b[1]]),
            overcharge_voltage_mv: u16::from_le_bytes([b[2], b[3]]),
            overdischarge_voltage_mv: u16::from_le_bytes([b[4], b[5]]),
            charge_max_temp: Temperature { whole: b[7], hundredths: b[6] },
            discharge_max_temp: Temperature { whole: b[9], hundredths: b[8] },
            manufacturer: Manufacturer::from_id(b[10]),
            model: BatteryModel::from_id(b[11]),
            production_timestamp: u32::from_le_bytes([b[12], b[13], b[14], b[15]]),
        }
    }

    /// Encode the record back into its 16 byte form
    pub fn to_bytes(&self) -> RecordBytes {
        let mut b = [0u8; RecordBytes::LEN];
        b[0..2].copy_from_slice(&self.total_capacity_mah.to_le_bytes());
        b[2..4].copy_from_slice(&self.overcharge_voltage_mv.to_le_bytes());
        b[4..6].copy_from_slice(&self.overdischarge_voltage_mv.to_le_bytes());
        b[6] = self.charge_max_temp.hundredths;
        b[7] = self.charge_max_temp.whole;
        b[8] = self.discharge_max_temp.hundredths;
        b[9] = self.discharge_max_temp.whole;
        b[10] = self.manufacturer.id();
        b[11] = self.model.id();
        b[12..16].copy_from_slice(&self.production_timestamp.to_le_bytes());
        RecordBytes::new(b)
    }

    pub fn to_hex(&self) -> String {
        self.to_bytes().to_hex()
    }

    pub fn production_date(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(i64::from(self.production_timestamp), 0).unwrap_or_default()
    }

    /// A rough state of charge figure for the battery gauge, in %.
    ///
    /// The tag carries no live measurement, so this mixes capacity and the overcharge limit. It is a
    /// placeholder for display only and should not be relied upon.
    pub fn estimated_charge_pct(&self) -> u8 {
        let capacity_part =
            f64::from(self.total_capacity_mah) / Self::NOMINAL_CAPACITY_MAH * 100.0 * 0.8;
        let voltage_part = f64::from(self.overcharge_voltage_mv) / Self::NOMINAL_VOLTAGE_MV * 20.0;
        (capacity_part + voltage_part).floor().clamp(0.0, 100.0) as u8
    }
}

impl Default for BatteryRecord {
    fn default() -> Self {
        Self::from_bytes(&RecordBytes::new(Self::DEFAULT_BYTES))
    }
}

#[test]
fn test_default_record() {
    let record = BatteryRecord::default();
    assert_eq!(record.total_capacity_mah, 10000);
    assert_eq!(record.overcharge_voltage_mv, 0x3412);
    assert_eq!(record.overdischarge_voltage_mv, 0x7856);
    assert_eq!(record.charge_max_temp, Temperature { whole: 0x12, hundredths: 0x90 });
    assert!((record.charge_max_temp.celsius() - 19.44).abs() < 1e-9);
    assert!((record.discharge_max_temp.celsius() - 86.52).abs() < 1e-9);
    assert_eq!(record.manufacturer, Manufacturer::CompanyA);
    assert_eq!(record.model, BatteryModel::M123);
    assert_eq!(record.production_timestamp, 0xddccbbaa);
}

#[test]
fn test_to_bytes_restores_layout() {
    let record = BatteryRecord::default();
    assert_eq!(record.to_bytes().as_bytes(), &BatteryRecord::DEFAULT_BYTES);
    assert_eq!(record.to_hex(), "102712345678901234560001aabbccdd");
}

#[test]
fn test_unknown_ids_round_trip() {
    let mut bytes = BatteryRecord::DEFAULT_BYTES;
    bytes[10] = 0xff;
    bytes[11] = 0x7f;
    let record = BatteryRecord::from_bytes(&RecordBytes::new(bytes));
    assert_eq!(record.manufacturer, Manufacturer::Unknown(0xff));
    assert_eq!(record.to_bytes().as_bytes(), &bytes);
}

#[test]
fn test_production_date() {
    let mut bytes = [0u8; RecordBytes::LEN];
    // 2024-01-01T00:00:00Z
    bytes[12..16].copy_from_slice(&1_704_067_200u32.to_le_bytes());
    let record = BatteryRecord::from_bytes(&RecordBytes::new(bytes));
    assert_eq!(record.production_date().format("%Y-%m-%d").to_string(), "2024-01-01");
}

#[test]
fn test_estimated_charge_pct() {
    assert_eq!(BatteryRecord::default().estimated_charge_pct(), 100);

    let zero = BatteryRecord::from_bytes(&RecordBytes::default());
    assert_eq!(zero.estimated_charge_pct(), 0);

    let mut bytes = [0u8; RecordBytes::LEN];
    // 7500 mAh, 0 mV -> 40%
    bytes[0..2].copy_from_slice(&7500u16.to_le_bytes());
    let record = BatteryRecord::from_bytes(&RecordBytes::new(bytes));
    assert_eq!(record.estimated_charge_pct(), 40);
}
