//! System property loading.
//!
//! Properties are read from a `key=value` property file and may be overridden
//! by environment variables. The environment variable for a property is its
//! key upper-cased with dots replaced by underscores, so
//! `ro.fm.hardware.type` becomes `RO_FM_HARDWARE_TYPE`.
//!
//! Lookup order:
//! 1. the file named by `FM_PROPERTIES`, or `fmradio.prop` in the current directory
//! 2. environment variables
//! 3. defaults supplied by the caller

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::error::FmError;

/// Property holding the hardware mode code.
pub const HARDWARE_TYPE_PROP: &str = "ro.fm.hardware.type";

/// Property holding the path of the native FM driver library.
pub const NATIVE_LIBRARY_PROP: &str = "ro.fm.native.library";

/// Environment variable naming an explicit property file.
pub const PROPERTIES_FILE_ENV: &str = "FM_PROPERTIES";

const DEFAULT_PROPERTIES_FILE: &str = "fmradio.prop";

const WELL_KNOWN_KEYS: &[&str] = &[HARDWARE_TYPE_PROP, NATIVE_LIBRARY_PROP];

/// A flat set of string properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    values: HashMap<String, String>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the process properties: file, then environment overrides.
    pub fn load_system() -> Result<Self, FmError> {
        let mut props = match find_properties_file() {
            Some(path) => {
                info!("Loading properties from {:?}", path);
                Self::load(&path)?
            }
            None => {
                debug!("No property file found, using environment and defaults");
                Self::new()
            }
        };
        props.overlay_env();
        Ok(props)
    }

    /// Load properties from a file.
    pub fn load(path: &Path) -> Result<Self, FmError> {
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Parse `key=value` lines. `#` and `;` start comment lines.
    pub fn parse(content: &str) -> Self {
        let mut values = HashMap::new();

        for (lineno, line) in content.lines().enumerate() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            match line.split_once('=') {
                Some((key, value)) => {
                    let key = key.trim();
                    if key.is_empty() {
                        warn!("Ignoring property line {} with empty key", lineno + 1);
                        continue;
                    }
                    values.insert(key.to_string(), value.trim().to_string());
                }
                None => {
                    warn!("Ignoring malformed property line {}: {:?}", lineno + 1, line);
                }
            }
        }

        Self { values }
    }

    /// Override well-known and already-present keys from the environment.
    pub fn overlay_env(&mut self) {
        self.overlay_with(|name| std::env::var(name).ok());
    }

    /// Override well-known and already-present keys using `lookup`, which
    /// receives the environment variable name of each key.
    pub fn overlay_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut keys: Vec<String> = WELL_KNOWN_KEYS.iter().map(|k| k.to_string()).collect();
        for key in self.values.keys() {
            if !keys.contains(key) {
                keys.push(key.clone());
            }
        }

        for key in keys {
            let name = env_name(&key);
            if let Some(value) = lookup(&name) {
                debug!("Property {} overridden by ${}", key, name);
                self.values.insert(key, value.trim().to_string());
            }
        }
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Environment variable name for a property key.
pub fn env_name(key: &str) -> String {
    key.chars()
        .map(|c| match c {
            '.' | '-' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}

fn find_properties_file() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(PROPERTIES_FILE_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
        warn!("{} points to missing file {:?}", PROPERTIES_FILE_ENV, path);
    }

    let path = std::env::current_dir().ok()?.join(DEFAULT_PROPERTIES_FILE);
    if path.exists() {
        return Some(path);
    }

    None
}
