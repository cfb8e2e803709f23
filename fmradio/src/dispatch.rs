//! Hardware dispatch selector.
//!
//! [`FmDispatcher`] reads the hardware mode once, builds the matching backend
//! and forwards every FM operation to it. Arguments and results are passed
//! through unchanged; the dispatcher adds no validation or retry.

use std::fmt;

use log::{info, trace};

use crate::backend::FmBackend;
use crate::error::FmError;
use crate::mode::HardwareMode;
use crate::properties::Properties;
use crate::registry::BackendRegistry;

/// Routes FM operations to the backend selected by hardware mode.
pub struct FmDispatcher {
    mode: HardwareMode,
    backend: Box<dyn FmBackend>,
}

impl FmDispatcher {
    /// Build the backend for `mode` from `registry`.
    pub fn new(mode: HardwareMode, registry: &BackendRegistry) -> Result<Self, FmError> {
        let backend = registry.create(mode)?;
        Ok(Self::with_backend(mode, backend))
    }

    /// Select the mode from `ro.fm.hardware.type` and build its backend.
    ///
    /// The property is read here and never again; later changes to `props`
    /// do not affect the returned dispatcher.
    pub fn from_properties(
        props: &Properties,
        registry: &BackendRegistry,
    ) -> Result<Self, FmError> {
        let mode = HardwareMode::from_properties(props)?;
        Self::new(mode, registry)
    }

    /// Select the mode from a raw mode code.
    pub fn from_code(code: i32, registry: &BackendRegistry) -> Result<Self, FmError> {
        let mode = HardwareMode::try_from(code)?;
        Self::new(mode, registry)
    }

    /// Wrap an already constructed backend.
    pub fn with_backend(mode: HardwareMode, backend: Box<dyn FmBackend>) -> Self {
        info!("FM dispatcher using {} backend (mode {})", backend.name(), mode);
        Self { mode, backend }
    }

    /// The mode fixed at construction.
    pub fn mode(&self) -> HardwareMode {
        self.mode
    }

    /// Name of the selected backend.
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub fn open_dev(&self) -> bool {
        trace!("[{}] open_dev", self.mode);
        self.backend.open_dev()
    }

    pub fn close_dev(&self) -> bool {
        trace!("[{}] close_dev", self.mode);
        self.backend.close_dev()
    }

    pub fn power_up(&self, frequency: f32) -> bool {
        trace!("[{}] power_up({})", self.mode, frequency);
        self.backend.power_up(frequency)
    }

    pub fn power_down(&self, device_type: i32) -> bool {
        trace!("[{}] power_down({})", self.mode, device_type);
        self.backend.power_down(device_type)
    }

    pub fn tune(&self, frequency: f32) -> bool {
        trace!("[{}] tune({})", self.mode, frequency);
        self.backend.tune(frequency)
    }

    pub fn seek(&self, frequency: f32, is_up: bool) -> f32 {
        trace!("[{}] seek({}, up={})", self.mode, frequency, is_up);
        self.backend.seek(frequency, is_up)
    }

    pub fn auto_scan(&self) -> Option<Vec<i16>> {
        trace!("[{}] auto_scan", self.mode);
        self.backend.auto_scan()
    }

    pub fn stop_scan(&self) -> bool {
        trace!("[{}] stop_scan", self.mode);
        self.backend.stop_scan()
    }

    pub fn set_rds(&self, rds_on: bool) -> i32 {
        trace!("[{}] set_rds({})", self.mode, rds_on);
        self.backend.set_rds(rds_on)
    }

    pub fn read_rds(&self) -> i16 {
        trace!("[{}] read_rds", self.mode);
        self.backend.read_rds()
    }

    pub fn get_ps(&self) -> Option<Vec<u8>> {
        trace!("[{}] get_ps", self.mode);
        self.backend.get_ps()
    }

    pub fn get_lr_text(&self) -> Option<Vec<u8>> {
        trace!("[{}] get_lr_text", self.mode);
        self.backend.get_lr_text()
    }

    pub fn active_af(&self) -> i16 {
        trace!("[{}] active_af", self.mode);
        self.backend.active_af()
    }

    pub fn set_mute(&self, mute: bool) -> i32 {
        trace!("[{}] set_mute({})", self.mode, mute);
        self.backend.set_mute(mute)
    }

    pub fn is_rds_support(&self) -> i32 {
        trace!("[{}] is_rds_support", self.mode);
        self.backend.is_rds_support()
    }

    pub fn switch_antenna(&self, antenna: i32) -> i32 {
        trace!("[{}] switch_antenna({})", self.mode, antenna);
        self.backend.switch_antenna(antenna)
    }
}

impl fmt::Debug for FmDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FmDispatcher")
            .field("mode", &self.mode)
            .field("backend", &self.backend.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;
    use crate::properties::HARDWARE_TYPE_PROP;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        OpenDev,
        CloseDev,
        PowerUp(f32),
        PowerDown(i32),
        Tune(f32),
        Seek(f32, bool),
        AutoScan,
        StopScan,
        SetRds(bool),
        ReadRds,
        GetPs,
        GetLrText,
        ActiveAf,
        SetMute(bool),
        IsRdsSupport,
        SwitchAntenna(i32),
    }

    type Log = Arc<Mutex<Vec<Call>>>;

    /// Records every call; results depend on `tag` so the caller can tell
    /// backends apart.
    struct Recording {
        tag: i16,
        calls: Log,
    }

    impl Recording {
        fn record(&self, call: Call) {
            self.calls.lock().push(call);
        }
    }

    impl FmBackend for Recording {
        fn name(&self) -> &str {
            "recording"
        }
        fn open_dev(&self) -> bool {
            self.record(Call::OpenDev);
            self.tag == 0
        }
        fn close_dev(&self) -> bool {
            self.record(Call::CloseDev);
            self.tag != 0
        }
        fn power_up(&self, frequency: f32) -> bool {
            self.record(Call::PowerUp(frequency));
            self.tag == 0
        }
        fn power_down(&self, device_type: i32) -> bool {
            self.record(Call::PowerDown(device_type));
            self.tag != 0
        }
        fn tune(&self, frequency: f32) -> bool {
            self.record(Call::Tune(frequency));
            self.tag == 0
        }
        fn seek(&self, frequency: f32, is_up: bool) -> f32 {
            self.record(Call::Seek(frequency, is_up));
            100.0 + self.tag as f32
        }
        fn auto_scan(&self) -> Option<Vec<i16>> {
            self.record(Call::AutoScan);
            if self.tag == 0 {
                Some(vec![875, 1017, 1079])
            } else {
                None
            }
        }
        fn stop_scan(&self) -> bool {
            self.record(Call::StopScan);
            self.tag != 0
        }
        fn set_rds(&self, rds_on: bool) -> i32 {
            self.record(Call::SetRds(rds_on));
            10 + self.tag as i32
        }
        fn read_rds(&self) -> i16 {
            self.record(Call::ReadRds);
            0x0040 | self.tag
        }
        fn get_ps(&self) -> Option<Vec<u8>> {
            self.record(Call::GetPs);
            Some(format!("PS{}", self.tag).into_bytes())
        }
        fn get_lr_text(&self) -> Option<Vec<u8>> {
            self.record(Call::GetLrText);
            if self.tag == 0 {
                Some(b"NOW PLAYING".to_vec())
            } else {
                None
            }
        }
        fn active_af(&self) -> i16 {
            self.record(Call::ActiveAf);
            1000 + self.tag
        }
        fn set_mute(&self, mute: bool) -> i32 {
            self.record(Call::SetMute(mute));
            20 + self.tag as i32
        }
        fn is_rds_support(&self) -> i32 {
            self.record(Call::IsRdsSupport);
            if self.tag == 0 {
                1
            } else {
                -1
            }
        }
        fn switch_antenna(&self, antenna: i32) -> i32 {
            self.record(Call::SwitchAntenna(antenna));
            2 - self.tag as i32
        }
    }

    struct Fixture {
        registry: BackendRegistry,
        logs: Vec<(HardwareMode, Log)>,
        builds: Arc<AtomicUsize>,
    }

    fn fixture() -> Fixture {
        let mut registry = BackendRegistry::new();
        let builds = Arc::new(AtomicUsize::new(0));
        let mut logs = Vec::new();

        for mode in HardwareMode::ALL {
            let calls: Log = Arc::new(Mutex::new(Vec::new()));
            logs.push((mode, Arc::clone(&calls)));
            let builds = Arc::clone(&builds);
            registry.register(mode, move || {
                builds.fetch_add(1, Ordering::SeqCst);
                Ok(Box::new(Recording {
                    tag: mode.code() as i16,
                    calls: Arc::clone(&calls),
                }) as Box<dyn FmBackend>)
            });
        }

        Fixture {
            registry,
            logs,
            builds,
        }
    }

    fn props_for(code: &str) -> Properties {
        let mut props = Properties::new();
        props.set(HARDWARE_TYPE_PROP, code);
        props
    }

    #[test]
    fn test_every_operation_routes_to_selected_backend() {
        for mode in HardwareMode::ALL {
            let fx = fixture();
            let dispatcher =
                FmDispatcher::from_properties(&props_for(&mode.code().to_string()), &fx.registry)
                    .unwrap();
            assert_eq!(dispatcher.mode(), mode);

            let tag = mode.code() as i16;
            assert_eq!(dispatcher.open_dev(), tag == 0);
            assert_eq!(dispatcher.power_up(87.5), tag == 0);
            assert_eq!(dispatcher.tune(87.55), tag == 0);
            assert_eq!(dispatcher.seek(101.7, false), 100.0 + tag as f32);
            assert_eq!(
                dispatcher.auto_scan(),
                if tag == 0 { Some(vec![875, 1017, 1079]) } else { None }
            );
            assert_eq!(dispatcher.stop_scan(), tag != 0);
            assert_eq!(dispatcher.set_rds(true), 10 + tag as i32);
            assert_eq!(dispatcher.read_rds(), 0x0040 | tag);
            assert_eq!(dispatcher.get_ps(), Some(format!("PS{}", tag).into_bytes()));
            assert_eq!(
                dispatcher.get_lr_text(),
                if tag == 0 { Some(b"NOW PLAYING".to_vec()) } else { None }
            );
            assert_eq!(dispatcher.active_af(), 1000 + tag);
            assert_eq!(dispatcher.set_mute(true), 20 + tag as i32);
            assert_eq!(dispatcher.is_rds_support(), if tag == 0 { 1 } else { -1 });
            assert_eq!(dispatcher.switch_antenna(1), 2 - tag as i32);
            assert_eq!(dispatcher.power_down(0), tag != 0);
            assert_eq!(dispatcher.close_dev(), tag != 0);

            for (log_mode, log) in &fx.logs {
                let calls = log.lock();
                if *log_mode == mode {
                    assert_eq!(
                        *calls,
                        vec![
                            Call::OpenDev,
                            Call::PowerUp(87.5),
                            Call::Tune(87.55),
                            Call::Seek(101.7, false),
                            Call::AutoScan,
                            Call::StopScan,
                            Call::SetRds(true),
                            Call::ReadRds,
                            Call::GetPs,
                            Call::GetLrText,
                            Call::ActiveAf,
                            Call::SetMute(true),
                            Call::IsRdsSupport,
                            Call::SwitchAntenna(1),
                            Call::PowerDown(0),
                            Call::CloseDev,
                        ]
                    );
                } else {
                    assert!(calls.is_empty(), "mode {} must not be called", log_mode);
                }
            }
        }
    }

    #[test]
    fn test_tune_passes_frequency_unaltered() {
        let fx = fixture();
        let dispatcher = FmDispatcher::new(HardwareMode::Jni, &fx.registry).unwrap();

        assert!(dispatcher.tune(87.5));
        let calls = fx.logs[0].1.lock();
        match calls.as_slice() {
            [Call::Tune(f)] => assert_eq!(f.to_bits(), 87.5f32.to_bits()),
            other => panic!("unexpected calls: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let fx = fixture();
        assert!(matches!(
            FmDispatcher::from_properties(&props_for("5"), &fx.registry),
            Err(FmError::UnsupportedMode(5))
        ));
        assert!(matches!(
            FmDispatcher::from_code(-1, &fx.registry),
            Err(FmError::UnsupportedMode(-1))
        ));
        assert_eq!(fx.builds.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unbacked_mode_is_rejected() {
        let registry = BackendRegistry::new();
        assert!(matches!(
            FmDispatcher::from_code(1, &registry),
            Err(FmError::BackendUnavailable(HardwareMode::Hisi))
        ));
    }

    #[test]
    fn test_missing_property_defaults_to_jni() {
        let fx = fixture();
        let dispatcher = FmDispatcher::from_properties(&Properties::new(), &fx.registry).unwrap();
        assert_eq!(dispatcher.mode(), HardwareMode::Jni);
    }

    #[test]
    fn test_mode_is_read_once() {
        let fx = fixture();
        let mut props = props_for("1");
        let dispatcher = FmDispatcher::from_properties(&props, &fx.registry).unwrap();

        props.set(HARDWARE_TYPE_PROP, "0");
        for _ in 0..10 {
            dispatcher.read_rds();
        }

        assert_eq!(dispatcher.mode(), HardwareMode::Hisi);
        assert_eq!(fx.builds.load(Ordering::SeqCst), 1);
        assert!(fx.logs[0].1.lock().is_empty());
        assert_eq!(fx.logs[1].1.lock().len(), 10);
    }

    #[test]
    fn test_debug_output() {
        let fx = fixture();
        let dispatcher = FmDispatcher::new(HardwareMode::Hisi, &fx.registry).unwrap();
        assert_eq!(dispatcher.backend_name(), "recording");
        assert_eq!(
            format!("{:?}", dispatcher),
            "FmDispatcher { mode: Hisi, backend: \"recording\" }"
        );
    }
}
