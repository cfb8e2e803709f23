//! Backend interface for FM radio drivers.
//!
//! Every vendor driver exposes the same operation set with the same argument
//! and result shapes. The dispatcher forwards calls to exactly one
//! implementation of [`FmBackend`], chosen by hardware mode.

mod native;

pub use native::{NativeBackend, NativeConfig, DEFAULT_NATIVE_LIBRARY};

/// FM radio operation set implemented by each vendor backend.
///
/// Results are the driver's own: `bool` for success/failure, integer status
/// or tri-state codes as documented per method, `None` where the driver
/// returns no buffer at all.
pub trait FmBackend: Send + Sync {
    /// Short name used in log output.
    fn name(&self) -> &str;

    /// Open the FM device. Call before power up.
    fn open_dev(&self) -> bool;

    /// Close the FM device. Call after power down.
    fn close_dev(&self) -> bool;

    /// Power up on `frequency` (MHz, e.g. 87.5 or 87.55 with 50 kHz spacing).
    fn power_up(&self, frequency: f32) -> bool;

    /// Power down. `device_type`: 0 radio, 1 transmitter.
    fn power_down(&self, device_type: i32) -> bool;

    /// Tune to `frequency` (MHz).
    fn tune(&self, frequency: f32) -> bool;

    /// Seek from `frequency` to the next (`is_up`) or previous station.
    /// Returns the frequency found.
    fn seek(&self, frequency: f32, is_up: bool) -> f32;

    /// Scan the whole band. Returns station codes.
    fn auto_scan(&self) -> Option<Vec<i16>>;

    /// Stop a running scan or seek. Returns whether it could be stopped.
    fn stop_scan(&self) -> bool;

    /// Enable or disable RDS. Returns the driver status code.
    fn set_rds(&self, rds_on: bool) -> i32;

    /// Read pending RDS events as an event word.
    fn read_rds(&self) -> i16;

    /// Program service name.
    fn get_ps(&self) -> Option<Vec<u8>>;

    /// Last radio text.
    fn get_lr_text(&self) -> Option<Vec<u8>>;

    /// Activate alternative frequency. Returns the new station code.
    fn active_af(&self) -> i16;

    /// Mute or unmute audio. Returns the driver status code.
    fn set_mute(&self, mute: bool) -> i32;

    /// Whether the driver supports RDS: 1 yes, 0 no, -1 error.
    fn is_rds_support(&self) -> i32;

    /// Switch antenna (0 long, 1 short): 0 success, 1 failed, 2 not supported.
    fn switch_antenna(&self, antenna: i32) -> i32;
}
