//! fmradio - FM radio hardware abstraction.
//!
//! This library exposes a fixed FM operation set (power, tune, seek, scan,
//! RDS, mute, antenna switch) and forwards each call to a vendor backend
//! selected once per process by the `ro.fm.hardware.type` property.
//!
//! # Example
//!
//! ```no_run
//! use fmradio::{BackendRegistry, FmDispatcher, NativeConfig, Properties};
//!
//! let props = Properties::load_system()?;
//! let registry = BackendRegistry::with_defaults(NativeConfig::from_properties(&props));
//! let fm = FmDispatcher::from_properties(&props, &registry)?;
//!
//! if fm.open_dev() && fm.power_up(87.5) {
//!     let next = fm.seek(87.5, true);
//!     println!("found station at {:.1} MHz", next);
//! }
//! # Ok::<(), fmradio::FmError>(())
//! ```
//!
//! # Adding a backend
//!
//! Implement [`FmBackend`] and register a factory for its mode:
//!
//! ```no_run
//! # use fmradio::{BackendRegistry, FmBackend, HardwareMode};
//! # fn build_hisi_backend() -> Result<Box<dyn FmBackend>, fmradio::FmError> { unimplemented!() }
//! let mut registry = BackendRegistry::new();
//! registry.register(HardwareMode::Hisi, build_hisi_backend);
//! ```

pub mod backend;
pub mod dispatch;
pub mod error;
pub mod global;
pub mod mode;
pub mod properties;
pub mod registry;
pub mod types;

#[cfg(test)]
mod testing;

pub use backend::{FmBackend, NativeBackend, NativeConfig};
pub use dispatch::FmDispatcher;
pub use error::{FmError, Result};
pub use mode::HardwareMode;
pub use properties::{Properties, HARDWARE_TYPE_PROP, NATIVE_LIBRARY_PROP};
pub use registry::{BackendFactory, BackendRegistry};
pub use types::{Antenna, AntennaSwitch, DeviceType, RdsEvents, RdsSupport, Spacing};
