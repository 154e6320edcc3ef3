//! Shared input types and errors.

use serde::{Deserialize, Serialize};
use std::time::Instant;
use thiserror::Error;

/// Which side of the crank produced a pedal trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PedalSide {
    Left,
    Right,
}

impl std::fmt::Display for PedalSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PedalSide::Left => write!(f, "Left"),
            PedalSide::Right => write!(f, "Right"),
        }
    }
}

/// A single pedal crossing the trigger point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PedalEvent {
    /// When the trigger fired
    pub timestamp: Instant,
    /// Which pedal fired it
    pub side: PedalSide,
}

/// Raw speed value as delivered by a sensor or mobile transport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedSample {
    /// Value in the device's native unit
    pub raw_value: f32,
    /// When the sample arrived
    pub arrival_time: Instant,
}

impl SpeedSample {
    /// Create a sample stamped with the current time.
    pub fn now(raw_value: f32) -> Self {
        Self {
            raw_value,
            arrival_time: Instant::now(),
        }
    }
}

/// Errors raised by input configuration and input tasks.
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    /// Wheel circumference must be a positive, finite number of millimeters
    #[error("Invalid wheel circumference: {0} mm")]
    InvalidCircumference(f32),

    /// Device type code outside the known range
    #[error("Unknown device type code: {0}")]
    UnknownDeviceType(i32),

    /// The receiving side of a sample feed was dropped
    #[error("Sample feed closed")]
    FeedClosed,
}
