//! Configuration file and property resolution for fmctl.
//!
//! Settings come from three places, highest precedence first:
//! 1. command-line options
//! 2. the TOML configuration file (`fmctl.toml` by default)
//! 3. system properties (property file and environment)
//!
//! Whatever wins is written back into the property set, so the dispatcher
//! still reads the hardware mode exactly once from properties.

use std::path::{Path, PathBuf};

use fmradio::{FmError, HardwareMode, Properties, HARDWARE_TYPE_PROP, NATIVE_LIBRARY_PROP};
use log::debug;
use serde::Deserialize;

/// Configuration file looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "fmctl.toml";

/// Configuration file format.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub radio: RadioSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Deserialize, Default)]
pub struct RadioSection {
    /// Mode code (`0`) or name (`"jni"`).
    pub hardware_type: Option<ModeValue>,
    pub native_library: Option<String>,
    pub properties: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
pub struct LoggingSection {
    pub log_dir: Option<PathBuf>,
    pub retention_days: Option<u64>,
    pub level: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ModeValue {
    Code(i32),
    Name(String),
}

impl ModeValue {
    pub fn to_mode(&self) -> Result<HardwareMode, FmError> {
        match self {
            ModeValue::Code(code) => HardwareMode::try_from(*code),
            ModeValue::Name(name) => name.parse(),
        }
    }
}

/// Command-line values that override the file and properties.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub properties: Option<PathBuf>,
    pub mode: Option<HardwareMode>,
    pub library: Option<String>,
}

pub fn load_config(path: &Path) -> Result<ConfigFile, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)?;
    let config: ConfigFile = toml::from_str(&contents)?;
    Ok(config)
}

/// Explicit path, or `fmctl.toml` in the current directory if present.
pub fn find_config(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
    if default_path.exists() {
        Some(default_path)
    } else {
        None
    }
}

/// Build the property set the dispatcher will read.
pub fn resolve_properties(
    overrides: &Overrides,
    file: &ConfigFile,
) -> Result<Properties, FmError> {
    let properties_path = overrides
        .properties
        .as_ref()
        .or(file.radio.properties.as_ref());

    let mut props = match properties_path {
        Some(path) => {
            debug!("Using property file {:?}", path);
            let mut props = Properties::load(path)?;
            props.overlay_env();
            props
        }
        None => Properties::load_system()?,
    };

    apply_overrides(&mut props, overrides, file)?;
    Ok(props)
}

fn apply_overrides(
    props: &mut Properties,
    overrides: &Overrides,
    file: &ConfigFile,
) -> Result<(), FmError> {
    let mode = match overrides.mode {
        Some(mode) => Some(mode),
        None => file
            .radio
            .hardware_type
            .as_ref()
            .map(ModeValue::to_mode)
            .transpose()?,
    };
    if let Some(mode) = mode {
        props.set(HARDWARE_TYPE_PROP, &mode.code().to_string());
    }

    if let Some(library) = overrides
        .library
        .as_ref()
        .or(file.radio.native_library.as_ref())
    {
        props.set(NATIVE_LIBRARY_PROP, library);
    }

    Ok(())
}
