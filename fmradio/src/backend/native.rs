//! Native FM driver backend.
//!
//! Binds a vendor driver shared library through a fixed C ABI. Booleans
//! cross the boundary as `int` (non-zero is true). Buffer calls take a
//! destination pointer and an in/out length: the caller passes the capacity,
//! the driver writes the number of elements filled and returns non-zero on
//! success.
//!
//! ```text
//! int   fm_open_dev(void);
//! int   fm_close_dev(void);
//! int   fm_power_up(float freq);
//! int   fm_power_down(int type);
//! int   fm_tune(float freq);
//! float fm_seek(float freq, int is_up);
//! int   fm_auto_scan(short *stations, int *len);
//! int   fm_stop_scan(void);
//! int   fm_set_rds(int on);
//! short fm_read_rds(void);
//! int   fm_get_ps(unsigned char *buf, int *len);
//! int   fm_get_lr_text(unsigned char *buf, int *len);
//! short fm_active_af(void);
//! int   fm_set_mute(int mute);
//! int   fm_is_rds_support(void);
//! int   fm_switch_antenna(int antenna);
//! ```

use std::os::raw::{c_float, c_int, c_short, c_uchar};
use std::path::{Path, PathBuf};

use libloading::Library;
use log::{debug, error, info, warn};

use crate::backend::FmBackend;
use crate::error::FmError;
use crate::properties::{Properties, NATIVE_LIBRARY_PROP};

/// Base name of the driver library; the platform prefix/suffix is added.
pub const DEFAULT_NATIVE_LIBRARY: &str = "fmjni";

/// Enough for every 50 kHz channel between 87.5 and 108.0 MHz.
const DEFAULT_SCAN_CAPACITY: usize = 512;

/// RDS radio text is at most 64 characters; leave room for drivers that
/// pad or append.
const DEFAULT_TEXT_CAPACITY: usize = 256;

type BoolFn = unsafe extern "C" fn() -> c_int;
// Tri-state: 1, 0 or a negative error code.
type StatusFn = unsafe extern "C" fn() -> c_int;
type FreqFn = unsafe extern "C" fn(c_float) -> c_int;
type IntFn = unsafe extern "C" fn(c_int) -> c_int;
type SeekFn = unsafe extern "C" fn(c_float, c_int) -> c_float;
type ShortFn = unsafe extern "C" fn() -> c_short;
type ScanFn = unsafe extern "C" fn(*mut c_short, *mut c_int) -> c_int;
type BytesFn = unsafe extern "C" fn(*mut c_uchar, *mut c_int) -> c_int;

/// Native backend settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeConfig {
    /// Library path, or a bare file name resolved by the system loader.
    pub library: PathBuf,
    /// Capacity of the auto-scan result buffer.
    pub scan_capacity: usize,
    /// Capacity of the PS and radio text buffers.
    pub text_capacity: usize,
}

impl Default for NativeConfig {
    fn default() -> Self {
        Self {
            library: PathBuf::from(libloading::library_filename(DEFAULT_NATIVE_LIBRARY)),
            scan_capacity: DEFAULT_SCAN_CAPACITY,
            text_capacity: DEFAULT_TEXT_CAPACITY,
        }
    }
}

impl NativeConfig {
    /// Settings from `ro.fm.native.library`, defaults otherwise.
    pub fn from_properties(props: &Properties) -> Self {
        let mut config = Self::default();
        if let Some(path) = props.get(NATIVE_LIBRARY_PROP).filter(|p| !p.is_empty()) {
            config.library = PathBuf::from(path);
        }
        config
    }

    pub fn with_library(mut self, library: impl Into<PathBuf>) -> Self {
        self.library = library.into();
        self
    }
}

/// Resolved driver entry points.
struct Symbols {
    open_dev: BoolFn,
    close_dev: BoolFn,
    power_up: FreqFn,
    power_down: IntFn,
    tune: FreqFn,
    seek: SeekFn,
    auto_scan: ScanFn,
    stop_scan: BoolFn,
    set_rds: IntFn,
    read_rds: ShortFn,
    get_ps: BytesFn,
    get_lr_text: BytesFn,
    active_af: ShortFn,
    set_mute: IntFn,
    is_rds_support: StatusFn,
    switch_antenna: IntFn,
}

impl Symbols {
    /// # Safety
    /// The library must export every symbol with the signature listed in the
    /// module documentation.
    unsafe fn resolve(lib: &Library) -> Result<Self, FmError> {
        Ok(Self {
            open_dev: symbol(lib, "fm_open_dev")?,
            close_dev: symbol(lib, "fm_close_dev")?,
            power_up: symbol(lib, "fm_power_up")?,
            power_down: symbol(lib, "fm_power_down")?,
            tune: symbol(lib, "fm_tune")?,
            seek: symbol(lib, "fm_seek")?,
            auto_scan: symbol(lib, "fm_auto_scan")?,
            stop_scan: symbol(lib, "fm_stop_scan")?,
            set_rds: symbol(lib, "fm_set_rds")?,
            read_rds: symbol(lib, "fm_read_rds")?,
            get_ps: symbol(lib, "fm_get_ps")?,
            get_lr_text: symbol(lib, "fm_get_lr_text")?,
            active_af: symbol(lib, "fm_active_af")?,
            set_mute: symbol(lib, "fm_set_mute")?,
            is_rds_support: symbol(lib, "fm_is_rds_support")?,
            switch_antenna: symbol(lib, "fm_switch_antenna")?,
        })
    }
}

unsafe fn symbol<T: Copy>(lib: &Library, name: &str) -> Result<T, FmError> {
    let mut raw = Vec::with_capacity(name.len() + 1);
    raw.extend_from_slice(name.as_bytes());
    raw.push(0);

    lib.get::<T>(&raw).map(|sym| *sym).map_err(|e| {
        let msg = format!("symbol {} not found: {}", name, e);
        error!("[Native] {}", msg);
        FmError::Library(msg)
    })
}

/// FM backend backed by a dynamically loaded vendor library.
pub struct NativeBackend {
    symbols: Symbols,
    scan_capacity: usize,
    text_capacity: usize,
    // Keeps the code behind `symbols` mapped; must outlive them.
    _lib: Library,
}

impl NativeBackend {
    /// Load the driver library and resolve every entry point.
    pub fn load(config: &NativeConfig) -> Result<Self, FmError> {
        let path = &config.library;

        if is_explicit_path(path) && !path.exists() {
            let msg = format!("FM driver library not found: {}", path.display());
            error!("[Native] {}", msg);
            return Err(FmError::Library(msg));
        }

        info!("[Native] Loading {:?}...", path);

        // Safety: loading runs the library's initialisers; the library is a
        // vendor FM driver chosen by configuration.
        let lib = unsafe { Library::new(path) }.map_err(|e| {
            let msg = format!("Failed to load FM driver library {}: {}", path.display(), e);
            error!("[Native] {}", msg);
            FmError::Library(msg)
        })?;

        let symbols = unsafe { Symbols::resolve(&lib)? };
        info!("[Native] Driver library loaded: {}", path.display());

        Ok(Self {
            symbols,
            scan_capacity: config.scan_capacity,
            text_capacity: config.text_capacity,
            _lib: lib,
        })
    }
}

/// Driver `int` booleans: any non-zero value is true.
fn flag(ret: c_int) -> bool {
    ret != 0
}

fn call_flag(f: BoolFn) -> bool {
    flag(unsafe { f() })
}

fn call_status(f: StatusFn) -> c_int {
    unsafe { f() }
}

/// Call a buffer entry point with a buffer of `capacity` elements.
///
/// A zero return means the driver has no data. A reported length that is
/// negative or exceeds the buffer is treated the same way rather than read.
fn read_buffer<T: Copy + Default>(
    what: &str,
    f: unsafe extern "C" fn(*mut T, *mut c_int) -> c_int,
    capacity: usize,
) -> Option<Vec<T>> {
    let capacity = capacity.min(c_int::MAX as usize);
    let mut buf = vec![T::default(); capacity];
    let mut len = capacity as c_int;

    if !flag(unsafe { f(buf.as_mut_ptr(), &mut len) }) {
        debug!("[Native] {}: no data", what);
        return None;
    }

    if len < 0 || len as usize > capacity {
        warn!(
            "[Native] {}: driver reported length {} for a buffer of {}",
            what, len, capacity
        );
        return None;
    }

    buf.truncate(len as usize);
    Some(buf)
}

fn is_explicit_path(path: &Path) -> bool {
    path.parent().map_or(false, |p| !p.as_os_str().is_empty())
}

impl FmBackend for NativeBackend {
    fn name(&self) -> &str {
        "native"
    }

    fn open_dev(&self) -> bool {
        call_flag(self.symbols.open_dev)
    }

    fn close_dev(&self) -> bool {
        call_flag(self.symbols.close_dev)
    }

    fn power_up(&self, frequency: f32) -> bool {
        flag(unsafe { (self.symbols.power_up)(frequency) })
    }

    fn power_down(&self, device_type: i32) -> bool {
        flag(unsafe { (self.symbols.power_down)(device_type) })
    }

    fn tune(&self, frequency: f32) -> bool {
        flag(unsafe { (self.symbols.tune)(frequency) })
    }

    fn seek(&self, frequency: f32, is_up: bool) -> f32 {
        unsafe { (self.symbols.seek)(frequency, is_up as c_int) }
    }

    fn auto_scan(&self) -> Option<Vec<i16>> {
        read_buffer("auto_scan", self.symbols.auto_scan, self.scan_capacity)
    }

    fn stop_scan(&self) -> bool {
        call_flag(self.symbols.stop_scan)
    }

    fn set_rds(&self, rds_on: bool) -> i32 {
        unsafe { (self.symbols.set_rds)(rds_on as c_int) }
    }

    fn read_rds(&self) -> i16 {
        unsafe { (self.symbols.read_rds)() }
    }

    fn get_ps(&self) -> Option<Vec<u8>> {
        read_buffer("get_ps", self.symbols.get_ps, self.text_capacity)
    }

    fn get_lr_text(&self) -> Option<Vec<u8>> {
        read_buffer("get_lr_text", self.symbols.get_lr_text, self.text_capacity)
    }

    fn active_af(&self) -> i16 {
        unsafe { (self.symbols.active_af)() }
    }

    fn set_mute(&self, mute: bool) -> i32 {
        unsafe { (self.symbols.set_mute)(mute as c_int) }
    }

    fn is_rds_support(&self) -> i32 {
        call_status(self.symbols.is_rds_support)
    }

    fn switch_antenna(&self, antenna: i32) -> i32 {
        unsafe { (self.symbols.switch_antenna)(antenna) }
    }
}
