//! Process-wide dispatcher.
//!
//! The hardware mode is fixed for the lifetime of the process, so the
//! dispatcher is installed at most once and shared by reference afterwards.

use log::{info, warn};
use once_cell::sync::OnceCell;

use crate::dispatch::FmDispatcher;
use crate::error::FmError;

static DISPATCHER: OnceCell<FmDispatcher> = OnceCell::new();

/// Install the process dispatcher. Fails if one is already installed.
pub fn install(dispatcher: FmDispatcher) -> Result<&'static FmDispatcher, FmError> {
    let mode = dispatcher.mode();
    DISPATCHER.set(dispatcher).map_err(|_| {
        warn!("FM dispatcher already installed, ignoring mode {}", mode);
        FmError::AlreadyInitialized
    })?;
    info!("FM dispatcher installed (mode {})", mode);
    get()
}

/// The installed dispatcher.
pub fn get() -> Result<&'static FmDispatcher, FmError> {
    DISPATCHER.get().ok_or(FmError::NotInitialized)
}

/// The installed dispatcher, building it with `init` on first use.
///
/// `init` runs at most once per process even under concurrent callers. If it
/// fails nothing is installed and a later call tries again.
pub fn get_or_init<F>(init: F) -> Result<&'static FmDispatcher, FmError>
where
    F: FnOnce() -> Result<FmDispatcher, FmError>,
{
    DISPATCHER.get_or_try_init(init)
}

/// Whether a dispatcher has been installed.
pub fn is_initialized() -> bool {
    DISPATCHER.get().is_some()
}
