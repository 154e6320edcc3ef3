//! Device-dependent speed normalization.
//!
//! Speed/cadence sensors report in different native units. Everything the
//! game consumes is rebased onto one canonical speed unit here.

use crate::input::types::InputError;
use serde::{Deserialize, Serialize};

/// Default wheel circumference in millimeters (700x25c road tyre).
pub const DEFAULT_CIRCUMFERENCE_MM: f32 = 2100.0;

/// Kind of device feeding physical speed samples.
///
/// Set once when a device connects and kept until the next pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    /// No device configured yet
    #[default]
    None,
    /// Crank/wheel revolution sensor, needs wheel geometry
    CadenceSensor,
    /// Sensor reporting a per-second rate
    SpeedSensor,
    /// Device already reporting final units
    DirectSpeed,
}

impl DeviceType {
    /// Map the numeric code used by pairing transports onto a device type.
    pub fn from_code(code: i32) -> Result<Self, InputError> {
        match code {
            0 => Ok(DeviceType::None),
            1 => Ok(DeviceType::CadenceSensor),
            2 => Ok(DeviceType::SpeedSensor),
            3 => Ok(DeviceType::DirectSpeed),
            other => Err(InputError::UnknownDeviceType(other)),
        }
    }

    /// Numeric code for this device type.
    pub fn code(&self) -> i32 {
        match self {
            DeviceType::None => 0,
            DeviceType::CadenceSensor => 1,
            DeviceType::SpeedSensor => 2,
            DeviceType::DirectSpeed => 3,
        }
    }

    /// Whether a conversion formula exists for this device type.
    pub fn is_configured(&self) -> bool {
        !matches!(self, DeviceType::None)
    }
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceType::None => write!(f, "None"),
            DeviceType::CadenceSensor => write!(f, "Cadence Sensor"),
            DeviceType::SpeedSensor => write!(f, "Speed Sensor"),
            DeviceType::DirectSpeed => write!(f, "Direct Speed"),
        }
    }
}

/// Convert a raw sensor value into canonical speed.
///
/// Returns `None` when no device type is configured; callers keep their
/// previous value in that case. Zero and negative inputs are valid.
pub fn normalize(raw_speed: f32, device_type: DeviceType, circumference_mm: f32) -> Option<f32> {
    match device_type {
        DeviceType::None => None,
        DeviceType::CadenceSensor => Some(raw_speed * circumference_mm / 1000.0),
        DeviceType::SpeedSensor => Some(raw_speed * 60.0),
        DeviceType::DirectSpeed => Some(raw_speed),
    }
}

/// Check a wheel circumference value.
pub fn validate_circumference(circumference_mm: f32) -> Result<f32, InputError> {
    if circumference_mm.is_finite() && circumference_mm > 0.0 {
        Ok(circumference_mm)
    } else {
        Err(InputError::InvalidCircumference(circumference_mm))
    }
}

/// Normalizer bound to a device type and wheel geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedNormalizer {
    device_type: DeviceType,
    circumference_mm: f32,
}

impl Default for SpeedNormalizer {
    fn default() -> Self {
        Self {
            device_type: DeviceType::None,
            circumference_mm: DEFAULT_CIRCUMFERENCE_MM,
        }
    }
}

impl SpeedNormalizer {
    /// Create a normalizer for the given device.
    pub fn new(device_type: DeviceType, circumference_mm: f32) -> Result<Self, InputError> {
        Ok(Self {
            device_type,
            circumference_mm: validate_circumference(circumference_mm)?,
        })
    }

    pub fn device_type(&self) -> DeviceType {
        self.device_type
    }

    pub fn circumference_mm(&self) -> f32 {
        self.circumference_mm
    }

    /// Switch the device type (on pairing a new device).
    pub fn set_device_type(&mut self, device_type: DeviceType) {
        if self.device_type != device_type {
            tracing::info!("Device type changed: {} -> {}", self.device_type, device_type);
            self.device_type = device_type;
        }
    }

    /// Update the wheel circumference. Invalid values keep the previous one.
    pub fn set_circumference(&mut self, circumference_mm: f32) -> Result<(), InputError> {
        match validate_circumference(circumference_mm) {
            Ok(value) => {
                self.circumference_mm = value;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    "Rejected circumference {} mm, keeping {} mm",
                    circumference_mm,
                    self.circumference_mm
                );
                Err(e)
            }
        }
    }

    /// Normalize a raw value with the bound settings.
    pub fn normalize(&self, raw_speed: f32) -> Option<f32> {
        normalize(raw_speed, self.device_type, self.circumference_mm)
    }
}
