//! What the dashboard shows for a record: a charge gauge and one status card per field, each
//! listing the raw bytes it was derived from.

use std::fmt;
use std::ops::Range;

use crate::battery_record::BatteryRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    None,
    TemperatureNormal,
    TemperatureHigh,
    /// Accent class of the manufacturer, e.g. `manufacturer-A`
    Accent(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusCard {
    pub title: &'static str,
    pub value: String,
    pub unit: &'static str,
    /// Offsets of the record bytes the value was derived from
    pub offsets: Range<usize>,
    /// The contributing bytes, e.g. `BYTE1: 0x10, BYTE2: 0x27`
    pub byte_info: String,
    pub highlight: Highlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeLevel {
    Sufficient,
    Moderate,
    Low,
}

impl ChargeLevel {
    pub fn from_pct(pct: u8) -> Self {
        match pct {
            71..=u8::MAX => Self::Sufficient,
            31..=70 => Self::Moderate,
            _ => Self::Low,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Sufficient => "sufficient",
            Self::Moderate => "moderate",
            Self::Low => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub record: BatteryRecord,
    pub charge_pct: u8,
    pub charge_level: ChargeLevel,
    pub cards: Vec<StatusCard>,
}

impl Dashboard {
    const CHARGE_TEMP_HIGH_C: f64 = 45.0;
    const DISCHARGE_TEMP_HIGH_C: f64 = 60.0;
    const DATE_FORMAT: &'static str = "%Y/%-m/%-d";

    pub fn new(record: &BatteryRecord) -> Self {
        let bytes = record.to_bytes();
        let bytes = bytes.as_bytes();
        let card = |title, value, unit, offsets: Range<usize>, highlight| StatusCard {
            title,
            value,
            unit,
            byte_info: byte_info(bytes, offsets.clone()),
            offsets,
            highlight,
        };

        let charge_temp = record.charge_max_temp.celsius();
        let discharge_temp = record.discharge_max_temp.celsius();

        let cards = vec![
            card(
                "Total capacity",
                record.total_capacity_mah.to_string(),
                "mAh",
                0..2,
                Highlight::None,
            ),
            card(
                "Overcharge protection voltage",
                format!("{:.2}", f64::from(record.overcharge_voltage_mv) / 1000.0),
                "V",
                2..4,
                Highlight::None,
            ),
            card(
                "Overdischarge protection voltage",
                format!("{:.2}", f64::from(record.overdischarge_voltage_mv) / 1000.0),
                "V",
                4..6,
                Highlight::None,
            ),
            card(
                "Charge max temperature",
                format!("{charge_temp:.2}"),
                "°C",
                6..8,
                temperature_highlight(charge_temp, Self::CHARGE_TEMP_HIGH_C),
            ),
            card(
                "Discharge max temperature",
                format!("{discharge_temp:.2}"),
                "°C",
                8..10,
                temperature_highlight(discharge_temp, Self::DISCHARGE_TEMP_HIGH_C),
            ),
            card(
                "Manufacturer",
                record.manufacturer.name().to_string(),
                "",
                10..11,
                record.manufacturer.accent().map_or(Highlight::None, Highlight::Accent),
            ),
            card("Model", record.model.name().to_string(), "", 11..12, Highlight::None),
            card(
                "Production date",
                record.production_date().format(Self::DATE_FORMAT).to_string(),
                "",
                12..16,
                Highlight::None,
            ),
        ];

        let charge_pct = record.estimated_charge_pct();
        Self { record: *record, charge_pct, charge_level: ChargeLevel::from_pct(charge_pct), cards }
    }

    pub fn card(&self, title: &str) -> Option<&StatusCard> {
        self.cards.iter().find(|c| c.title == title)
    }
}

impl fmt::Display for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Battery {}% ({}), {} mAh",
            self.charge_pct,
            self.charge_level.label(),
            self.record.total_capacity_mah
        )?;
        for card in &self.cards {
            let value = if card.unit.is_empty() {
                card.value.clone()
            } else {
                format!("{} {}", card.value, card.unit)
            };
            let marker = match card.highlight {
                Highlight::TemperatureHigh => " (!)",
                _ => "",
            };
            writeln!(f, "{:<34}{:<16}{}{marker}", card.title, value, card.byte_info)?;
        }
        Ok(())
    }
}

fn temperature_highlight(celsius: f64, high: f64) -> Highlight {
    if celsius > high {
        Highlight::TemperatureHigh
    } else {
        Highlight::TemperatureNormal
    }
}

fn byte_info(bytes: &[u8], offsets: Range<usize>) -> String {
    offsets
        .map(|i| format!("BYTE{}: 0x{:02x}", i + 1, bytes[i]))
        .collect::<Vec<_>>()
        .join(", ")
}

#[test]
fn test_default_dashboard() {
    let dashboard = Dashboard::new(&BatteryRecord::default());
    assert_eq!(dashboard.charge_pct, 100);
    assert_eq!(dashboard.charge_level, ChargeLevel::Sufficient);
    assert_eq!(dashboard.cards.len(), 8);

    let capacity = dashboard.card("Total capacity").unwrap();
    assert_eq!(capacity.value, "10000");
    assert_eq!(capacity.unit, "mAh");
    assert_eq!(capacity.byte_info, "BYTE1: 0x10, BYTE2: 0x27");

    // 0x3412 mV
    assert_eq!(dashboard.card("Overcharge protection voltage").unwrap().value, "13.33");

    let charge = dashboard.card("Charge max temperature").unwrap();
    assert_eq!(charge.value, "19.44");
    assert_eq!(charge.highlight, Highlight::TemperatureNormal);

    let discharge = dashboard.card("Discharge max temperature").unwrap();
    assert_eq!(discharge.value, "86.52");
    assert_eq!(discharge.highlight, Highlight::TemperatureHigh);

    let manufacturer = dashboard.card("Manufacturer").unwrap();
    assert_eq!(manufacturer.value, "A公司");
    assert_eq!(manufacturer.highlight, Highlight::Accent("manufacturer-A"));
    assert_eq!(manufacturer.byte_info, "BYTE11: 0x00");

    let date = dashboard.card("Production date").unwrap();
    assert_eq!(date.offsets, 12..16);
    assert_eq!(date.byte_info, "BYTE13: 0xaa, BYTE14: 0xbb, BYTE15: 0xcc, BYTE16: 0xdd");
}

#[test]
fn test_unknown_manufacturer_card() {
    let record = crate::decode("00000000000000000000ff0000000000");
    let dashboard = Dashboard::new(&record);
    let manufacturer = dashboard.card("Manufacturer").unwrap();
    assert_eq!(manufacturer.value, "未知公司");
    assert_eq!(manufacturer.highlight, Highlight::None);
    assert_eq!(dashboard.card("Production date").unwrap().value, "1970/1/1");
    assert_eq!(dashboard.charge_level, ChargeLevel::Low);
}

#[test]
fn test_charge_levels() {
    assert_eq!(ChargeLevel::from_pct(100), ChargeLevel::Sufficient);
    assert_eq!(ChargeLevel::from_pct(71), ChargeLevel::Sufficient);
    assert_eq!(ChargeLevel::from_pct(70), ChargeLevel::Moderate);
    assert_eq!(ChargeLevel::from_pct(31), ChargeLevel::Moderate);
    assert_eq!(ChargeLevel::from_pct(30), ChargeLevel::Low);
}

#[test]
fn test_display() {
    let text = Dashboard::new(&BatteryRecord::default()).to_string();
    assert!(text.starts_with("Battery 100% (sufficient), 10000 mAh\n"));
    assert!(text.contains("Model"));
    assert!(text.contains("86.52 °C"));
    assert_eq!(text.lines().count(), 9);
}
