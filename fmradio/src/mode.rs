//! Hardware mode selection.
//!
//! The mode is read once from the `ro.fm.hardware.type` property and decides
//! which backend serves every FM operation for the rest of the process.

use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::error::FmError;
use crate::properties::{Properties, HARDWARE_TYPE_PROP};

/// Vendor backend family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(i32)]
pub enum HardwareMode {
    /// Generic driver reached through the native FM library.
    Jni = 0,
    /// HiSilicon FM chipsets.
    Hisi = 1,
}

impl HardwareMode {
    /// Every known mode, in code order.
    pub const ALL: [HardwareMode; 2] = [HardwareMode::Jni, HardwareMode::Hisi];

    /// Mode used when the property is absent.
    pub const DEFAULT: HardwareMode = HardwareMode::Jni;

    /// The integer code stored in the property.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Lower-case name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            HardwareMode::Jni => "jni",
            HardwareMode::Hisi => "hisi",
        }
    }

    /// Read and validate the mode from a property set.
    ///
    /// A missing or empty property yields [`HardwareMode::DEFAULT`]. The value
    /// may be a code or a name, as for [`FromStr`]. An integer outside the
    /// known set is `UnsupportedMode`, an unknown name is `InvalidProperty`.
    pub fn from_properties(props: &Properties) -> Result<Self, FmError> {
        let mode = match props.get(HARDWARE_TYPE_PROP).map(str::trim) {
            None | Some("") => Self::DEFAULT,
            Some(value) => value.parse()?,
        };
        debug!("Hardware mode from {}: {} ({})", HARDWARE_TYPE_PROP, mode, mode.code());
        Ok(mode)
    }
}

impl TryFrom<i32> for HardwareMode {
    type Error = FmError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(HardwareMode::Jni),
            1 => Ok(HardwareMode::Hisi),
            other => Err(FmError::UnsupportedMode(other)),
        }
    }
}

impl From<HardwareMode> for i32 {
    fn from(value: HardwareMode) -> Self {
        value.code()
    }
}

impl fmt::Display for HardwareMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HardwareMode {
    type Err = FmError;

    /// Accepts a mode name (`jni`, `hisi`, case-insensitive) or its code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(code) = s.parse::<i32>() {
            return Self::try_from(code);
        }
        Self::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| FmError::InvalidProperty {
                key: HARDWARE_TYPE_PROP.to_string(),
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for mode in HardwareMode::ALL {
            assert_eq!(HardwareMode::try_from(mode.code()).unwrap(), mode);
        }
    }

    #[test]
    fn test_unknown_code_is_unsupported() {
        assert!(matches!(
            HardwareMode::try_from(2),
            Err(FmError::UnsupportedMode(2))
        ));
        assert!(matches!(
            HardwareMode::try_from(-1),
            Err(FmError::UnsupportedMode(-1))
        ));
    }

    #[test]
    fn test_from_str() {
        assert_eq!("jni".parse::<HardwareMode>().unwrap(), HardwareMode::Jni);
        assert_eq!("HISI".parse::<HardwareMode>().unwrap(), HardwareMode::Hisi);
        assert_eq!(" 1 ".parse::<HardwareMode>().unwrap(), HardwareMode::Hisi);
        assert!(matches!(
            "5".parse::<HardwareMode>(),
            Err(FmError::UnsupportedMode(5))
        ));
        assert!(matches!(
            "qualcomm".parse::<HardwareMode>(),
            Err(FmError::InvalidProperty { .. })
        ));
    }

    #[test]
    fn test_from_properties() {
        let props = Properties::new();
        assert_eq!(
            HardwareMode::from_properties(&props).unwrap(),
            HardwareMode::Jni
        );

        let mut props = Properties::new();
        props.set(HARDWARE_TYPE_PROP, "1");
        assert_eq!(
            HardwareMode::from_properties(&props).unwrap(),
            HardwareMode::Hisi
        );

        props.set(HARDWARE_TYPE_PROP, "9");
        assert!(matches!(
            HardwareMode::from_properties(&props),
            Err(FmError::UnsupportedMode(9))
        ));

        props.set(HARDWARE_TYPE_PROP, "");
        assert_eq!(
            HardwareMode::from_properties(&props).unwrap(),
            HardwareMode::Jni
        );
    }

    #[test]
    fn test_from_properties_by_name() {
        let mut props = Properties::new();
        props.set(HARDWARE_TYPE_PROP, "hisi");
        assert_eq!(
            HardwareMode::from_properties(&props).unwrap(),
            HardwareMode::Hisi
        );

        props.set(HARDWARE_TYPE_PROP, "JNI");
        assert_eq!(
            HardwareMode::from_properties(&props).unwrap(),
            HardwareMode::Jni
        );

        props.set(HARDWARE_TYPE_PROP, "qualcomm");
        match HardwareMode::from_properties(&props) {
            Err(FmError::InvalidProperty { key, value }) => {
                assert_eq!(key, HARDWARE_TYPE_PROP);
                assert_eq!(value, "qualcomm");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
