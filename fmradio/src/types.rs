//! Typed views of the codes exchanged with FM backends.
//!
//! The dispatcher passes raw codes through untouched. These types exist for
//! callers that want to interpret a result or build an argument.

/// Lower edge of the broadcast band, in MHz.
pub const BAND_LOW_MHZ: f32 = 87.5;

/// Upper edge of the broadcast band, in MHz.
pub const BAND_HIGH_MHZ: f32 = 108.0;

/// Channel spacing used by scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Spacing {
    /// 50 kHz steps: station code is MHz x 100 (87.55 -> 8755).
    Khz50,
    /// 100 kHz steps: station code is MHz x 10 (87.5 -> 875).
    #[default]
    Khz100,
}

impl Spacing {
    fn scale(self) -> f32 {
        match self {
            Spacing::Khz50 => 100.0,
            Spacing::Khz100 => 10.0,
        }
    }
}

/// Convert a station code from a scan result to MHz.
pub fn station_to_mhz(station: i16, spacing: Spacing) -> f32 {
    station as f32 / spacing.scale()
}

/// Convert a frequency in MHz to a station code.
pub fn mhz_to_station(mhz: f32, spacing: Spacing) -> i16 {
    (mhz * spacing.scale()).round() as i16
}

/// Whether a frequency lies inside the broadcast band.
pub fn in_band(mhz: f32) -> bool {
    (BAND_LOW_MHZ..=BAND_HIGH_MHZ).contains(&mhz)
}

/// Device kind passed to power down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum DeviceType {
    Radio = 0,
    Transmitter = 1,
}

impl From<DeviceType> for i32 {
    fn from(value: DeviceType) -> Self {
        value as i32
    }
}

/// Antenna selector passed to switch antenna.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Antenna {
    /// Wired headset antenna.
    Long = 0,
    /// Built-in antenna.
    Short = 1,
}

impl From<Antenna> for i32 {
    fn from(value: Antenna) -> Self {
        value as i32
    }
}

/// Result of the RDS support query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdsSupport {
    Supported,
    NotSupported,
    Error,
}

impl From<i32> for RdsSupport {
    fn from(value: i32) -> Self {
        match value {
            1 => RdsSupport::Supported,
            0 => RdsSupport::NotSupported,
            _ => RdsSupport::Error,
        }
    }
}

/// Result of an antenna switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AntennaSwitch {
    Success,
    Failed,
    NotSupported,
    /// A code the driver is not documented to return.
    Unknown(i32),
}

impl From<i32> for AntennaSwitch {
    fn from(value: i32) -> Self {
        match value {
            0 => AntennaSwitch::Success,
            1 => AntennaSwitch::Failed,
            2 => AntennaSwitch::NotSupported,
            other => AntennaSwitch::Unknown(other),
        }
    }
}

/// Event word returned by read RDS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RdsEvents(pub u16);

impl RdsEvents {
    pub const FLAG_CHANGE: u16 = 0x0001;
    pub const PI_CODE: u16 = 0x0002;
    pub const AF_LIST: u16 = 0x0004;
    pub const PROGRAM_NAME: u16 = 0x0008;
    pub const UTC_DATETIME: u16 = 0x0010;
    pub const LOCAL_DATETIME: u16 = 0x0020;
    pub const LAST_RADIO_TEXT: u16 = 0x0040;
    pub const AF: u16 = 0x0080;

    pub fn contains(self, flag: u16) -> bool {
        self.0 & flag == flag
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when a new program service name is ready.
    pub fn has_program_name(self) -> bool {
        self.contains(Self::PROGRAM_NAME)
    }

    /// True when a new radio text is ready.
    pub fn has_radio_text(self) -> bool {
        self.contains(Self::LAST_RADIO_TEXT)
    }

    /// True when the driver asks for an alternative-frequency switch.
    pub fn has_af(self) -> bool {
        self.contains(Self::AF)
    }
}

impl From<i16> for RdsEvents {
    fn from(value: i16) -> Self {
        RdsEvents(value as u16)
    }
}

/// Decode an RDS byte buffer (PS or radio text) for display.
///
/// RDS text is padded with spaces and sometimes NUL-terminated; both are
/// trimmed. Invalid UTF-8 is replaced.
pub fn rds_text(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).trim_end().to_string()
}
