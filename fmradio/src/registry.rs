//! Backend factories keyed by hardware mode.
//!
//! Adding a vendor means registering one factory here; the dispatcher and
//! the operation set stay untouched.

use std::collections::BTreeMap;
use std::fmt;

use log::{debug, info};

use crate::backend::{FmBackend, NativeBackend, NativeConfig};
use crate::error::FmError;
use crate::mode::HardwareMode;

/// Builds a backend for one hardware mode.
pub type BackendFactory =
    Box<dyn Fn() -> Result<Box<dyn FmBackend>, FmError> + Send + Sync>;

/// Mapping from hardware mode to backend factory.
#[derive(Default)]
pub struct BackendRegistry {
    factories: BTreeMap<HardwareMode, BackendFactory>,
}

impl BackendRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in backends: the native library for
    /// [`HardwareMode::Jni`]. [`HardwareMode::Hisi`] has no built-in backend.
    pub fn with_defaults(native: NativeConfig) -> Self {
        let mut registry = Self::new();
        registry.register(HardwareMode::Jni, move || {
            NativeBackend::load(&native).map(|b| Box::new(b) as Box<dyn FmBackend>)
        });
        registry
    }

    /// Register `factory` for `mode`, replacing any previous entry.
    pub fn register<F>(&mut self, mode: HardwareMode, factory: F) -> &mut Self
    where
        F: Fn() -> Result<Box<dyn FmBackend>, FmError> + Send + Sync + 'static,
    {
        if self.factories.insert(mode, Box::new(factory)).is_some() {
            debug!("Replaced backend factory for mode {}", mode);
        } else {
            debug!("Registered backend factory for mode {}", mode);
        }
        self
    }

    /// Whether a factory exists for `mode`.
    pub fn contains(&self, mode: HardwareMode) -> bool {
        self.factories.contains_key(&mode)
    }

    /// Modes with a registered factory, in code order.
    pub fn modes(&self) -> Vec<HardwareMode> {
        self.factories.keys().copied().collect()
    }

    /// Build the backend for `mode`.
    pub fn create(&self, mode: HardwareMode) -> Result<Box<dyn FmBackend>, FmError> {
        let factory = self
            .factories
            .get(&mode)
            .ok_or(FmError::BackendUnavailable(mode))?;
        let backend = factory()?;
        info!("Created {} backend for mode {}", backend.name(), mode);
        Ok(backend)
    }
}

impl fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("modes", &self.modes())
            .finish()
    }
}
