//! Error types for the FM hardware dispatch layer.
//!
//! Backend results (booleans, status codes, tri-states) are never mapped into
//! these errors; they are returned to the caller exactly as the backend
//! produced them. `FmError` only covers failures of the layer itself.

use std::io;

use thiserror::Error;

use crate::mode::HardwareMode;

/// Errors raised while selecting or constructing a backend.
#[derive(Error, Debug)]
pub enum FmError {
    /// The configured hardware mode is outside the known set.
    #[error("Unsupported hardware mode: {0}")]
    UnsupportedMode(i32),

    /// The hardware mode is known but no backend is registered for it.
    #[error("No backend available for hardware mode {0}")]
    BackendUnavailable(HardwareMode),

    /// A property is present but its value cannot be interpreted.
    #[error("Invalid value for property {key}: {value:?}")]
    InvalidProperty { key: String, value: String },

    /// The native driver library or one of its symbols could not be loaded.
    #[error("Native library error: {0}")]
    Library(String),

    /// Reading a property or configuration file failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The process-wide dispatcher has already been installed.
    #[error("FM dispatcher already initialized")]
    AlreadyInitialized,

    /// The process-wide dispatcher has not been installed yet.
    #[error("FM dispatcher not initialized")]
    NotInitialized,
}

impl FmError {
    /// Returns true if the error comes from an unknown or unbacked mode.
    pub fn is_mode_error(&self) -> bool {
        matches!(
            self,
            FmError::UnsupportedMode(_) | FmError::BackendUnavailable(_)
        )
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FmError>;
