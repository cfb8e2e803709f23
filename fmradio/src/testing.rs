//! Test backends shared by unit tests.

use crate::backend::FmBackend;
use crate::error::FmError;

/// Backend returning fixed values tagged by `id`.
pub(crate) struct FixedBackend {
    pub id: i32,
}

impl FmBackend for FixedBackend {
    fn name(&self) -> &str {
        "fixed"
    }
    fn open_dev(&self) -> bool {
        true
    }
    fn close_dev(&self) -> bool {
        true
    }
    fn power_up(&self, _frequency: f32) -> bool {
        true
    }
    fn power_down(&self, _device_type: i32) -> bool {
        true
    }
    fn tune(&self, _frequency: f32) -> bool {
        true
    }
    fn seek(&self, frequency: f32, _is_up: bool) -> f32 {
        frequency
    }
    fn auto_scan(&self) -> Option<Vec<i16>> {
        None
    }
    fn stop_scan(&self) -> bool {
        true
    }
    fn set_rds(&self, _rds_on: bool) -> i32 {
        self.id
    }
    fn read_rds(&self) -> i16 {
        0
    }
    fn get_ps(&self) -> Option<Vec<u8>> {
        None
    }
    fn get_lr_text(&self) -> Option<Vec<u8>> {
        None
    }
    fn active_af(&self) -> i16 {
        0
    }
    fn set_mute(&self, _mute: bool) -> i32 {
        self.id
    }
    fn is_rds_support(&self) -> i32 {
        self.id
    }
    fn switch_antenna(&self, _antenna: i32) -> i32 {
        self.id
    }
}

pub(crate) fn fixed(id: i32) -> Result<Box<dyn FmBackend>, FmError> {
    Ok(Box::new(FixedBackend { id }))
}
