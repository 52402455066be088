/// Battery manufacturer, as stored in byte 10 of the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Manufacturer {
    CompanyA,
    CompanyB,
    CompanyC,
    CompanyD,
    CompanyE,
    /// An id with no entry in the table. The raw id is kept so the record re-encodes losslessly.
    Unknown(u8),
}

impl Manufacturer {
    const UNKNOWN_NAME: &'static str = "未知公司";

    /// Resolve a manufacturer id. Never fails, unmapped ids give [`Manufacturer::Unknown`].
    pub fn from_id(id: u8) -> Self {
        match id {
            0x00 => Self::CompanyA,
            0x01 => Self::CompanyB,
            0x02 => Self::CompanyC,
            0x03 => Self::CompanyD,
            0x04 => Self::CompanyE,
            other => Self::Unknown(other),
        }
    }

    pub fn id(&self) -> u8 {
        match self {
            Self::CompanyA => 0x00,
            Self::CompanyB => 0x01,
            Self::CompanyC => 0x02,
            Self::CompanyD => 0x03,
            Self::CompanyE => 0x04,
            Self::Unknown(id) => *id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::CompanyA => "A公司",
            Self::CompanyB => "B公司",
            Self::CompanyC => "C公司",
            Self::CompanyD => "D公司",
            Self::CompanyE => "E公司",
            Self::Unknown(_) => Self::UNKNOWN_NAME,
        }
    }

    /// Dashboard accent class for the manufacturer card. D and E share C's accent.
    pub fn accent(&self) -> Option<&'static str> {
        match self {
            Self::CompanyA => Some("manufacturer-A"),
            Self::CompanyB => Some("manufacturer-B"),
            Self::CompanyC | Self::CompanyD | Self::CompanyE => Some("manufacturer-C"),
            Self::Unknown(_) => None,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl std::fmt::Display for Manufacturer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Battery model, as stored in byte 11 of the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatteryModel {
    Abc,
    M123,
    A123,
    B456,
    C789,
    Unknown(u8),
}

impl BatteryModel {
    const UNKNOWN_NAME: &'static str = "未知型号";

    pub fn from_id(id: u8) -> Self {
        match id {
            0x00 => Self::Abc,
            0x01 => Self::M123,
            0x02 => Self::A123,
            0x03 => Self::B456,
            0x04 => Self::C789,
            other => Self::Unknown(other),
        }
    }

    pub fn id(&self) -> u8 {
        match self {
            Self::Abc => 0x00,
            Self::M123 => 0x01,
            Self::A123 => 0x02,
            Self::B456 => 0x03,
            Self::C789 => 0x04,
            Self::Unknown(id) => *id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Abc => "ABC",
            Self::M123 => "123",
            Self::A123 => "A-123",
            Self::B456 => "B-456",
            Self::C789 => "C-789",
            Self::Unknown(_) => Self::UNKNOWN_NAME,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl std::fmt::Display for BatteryModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[test]
fn test_manufacturer_lookup() {
    assert_eq!(Manufacturer::from_id(0x00).name(), "A公司");
    assert_eq!(Manufacturer::from_id(0x04), Manufacturer::CompanyE);
    assert_eq!(Manufacturer::from_id(0x03).accent(), Some("manufacturer-C"));
}

#[test]
fn test_unknown_ids_resolve_to_sentinel() {
    let manufacturer = Manufacturer::from_id(0xff);
    assert_eq!(manufacturer, Manufacturer::Unknown(0xff));
    assert_eq!(manufacturer.name(), "未知公司");
    assert_eq!(manufacturer.accent(), None);
    assert!(!manufacturer.is_known());

    let model = BatteryModel::from_id(0x05);
    assert_eq!(model.name(), "未知型号");
    assert_eq!(model.id(), 0x05);
}

#[test]
fn test_ids_survive_lookup() {
    for id in 0..=u8::MAX {
        assert_eq!(Manufacturer::from_id(id).id(), id);
        assert_eq!(BatteryModel::from_id(id).id(), id);
    }
}
