//! Metadata types

use std::fmt;

/// Sensors whose capture metadata can be normalized.
///
/// Only the stereo RGB camera on top of the gantry is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorId {
    StereoTop,
}

impl SensorId {
    /// Identifier used in capture records.
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorId::StereoTop => "stereoTop",
        }
    }

    /// Directory under `<cache>/sensors/` holding the sensor's fixed metadata.
    pub fn cache_name(&self) -> &'static str {
        match self {
            SensorId::StereoTop => "stereo",
        }
    }
}

impl fmt::Display for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
