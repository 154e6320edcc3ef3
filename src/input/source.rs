//! Physical vs. mobile input source selection.
//!
//! A rider pairs either a physical sensor or the companion mobile app for a
//! session. Samples from whichever transport is running are queued on a
//! channel and drained on the tick thread, so all state here is
//! single-writer.

use crate::input::speed::{DeviceType, SpeedNormalizer};
use crate::input::types::{InputError, SpeedSample};
use crossbeam::channel::{Receiver, Sender};
use serde::{Deserialize, Serialize};

/// Speed value reported by a source that is not connected.
pub const DISCONNECTED_SPEED: f32 = -1.0;

/// Which kind of source is currently authoritative.
///
/// Derived from the enable flags, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    None,
    Mobile,
    Physical,
}

impl ConnectionState {
    /// All states, in index order.
    pub const ALL: [ConnectionState; 3] = [
        ConnectionState::None,
        ConnectionState::Mobile,
        ConnectionState::Physical,
    ];

    /// Stable index used for per-source records.
    pub fn index(&self) -> usize {
        match self {
            ConnectionState::None => 0,
            ConnectionState::Mobile => 1,
            ConnectionState::Physical => 2,
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionState::None => write!(f, "None"),
            ConnectionState::Mobile => write!(f, "Mobile"),
            ConnectionState::Physical => write!(f, "Physical"),
        }
    }
}

/// Create a sample channel for one input task.
///
/// The sender goes to the transport (any thread), the feed is handed to
/// [`InputSourceSelector`].
pub fn sample_channel() -> (SampleSender, SampleFeed) {
    let (tx, rx) = crossbeam::channel::unbounded();
    (SampleSender { tx }, SampleFeed { rx })
}

/// Transport-side handle for pushing raw speed samples.
#[derive(Debug, Clone)]
pub struct SampleSender {
    tx: Sender<SpeedSample>,
}

impl SampleSender {
    /// Queue a raw value stamped with the current time.
    pub fn send(&self, raw_value: f32) -> Result<(), InputError> {
        self.send_sample(SpeedSample::now(raw_value))
    }

    /// Queue a sample.
    pub fn send_sample(&self, sample: SpeedSample) -> Result<(), InputError> {
        self.tx.send(sample).map_err(|_| InputError::FeedClosed)
    }
}

/// Tick-side end of an input task. Dropping it stops the task.
#[derive(Debug)]
pub struct SampleFeed {
    rx: Receiver<SpeedSample>,
}

impl SampleFeed {
    /// Samples queued since the last drain, oldest first.
    pub fn drain(&self) -> impl Iterator<Item = SpeedSample> + '_ {
        self.rx.try_iter()
    }

    /// Number of samples waiting.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

/// Chooses between physical-sensor and mobile speed.
#[derive(Debug)]
pub struct InputSourceSelector {
    /// Converts raw physical samples
    normalizer: SpeedNormalizer,
    /// Last normalized physical speed
    physical_speed: f32,
    /// Last mobile speed
    mobile_speed: f32,
    sensor_enabled: bool,
    mobile_enabled: bool,
    /// Mobile session state code, `None` when no session
    mobile_state: Option<i32>,
    /// Last message code from the mobile app
    mobile_message: i32,
    /// Address of the paired physical device
    device_address: Option<String>,
    /// Running physical input task
    physical_task: Option<SampleFeed>,
    /// Running mobile input task
    mobile_task: Option<SampleFeed>,
}

impl Default for InputSourceSelector {
    fn default() -> Self {
        Self::new(SpeedNormalizer::default())
    }
}

impl InputSourceSelector {
    /// Create a selector with both sources disconnected.
    pub fn new(normalizer: SpeedNormalizer) -> Self {
        Self {
            normalizer,
            physical_speed: DISCONNECTED_SPEED,
            mobile_speed: DISCONNECTED_SPEED,
            sensor_enabled: false,
            mobile_enabled: false,
            mobile_state: None,
            mobile_message: 0,
            device_address: None,
            physical_task: None,
            mobile_task: None,
        }
    }

    /// Authoritative speed: physical if a sensor is enabled, else mobile.
    pub fn get_speed(&self) -> f32 {
        if self.sensor_enabled {
            self.physical_speed
        } else {
            self.mobile_speed
        }
    }

    pub fn physical_speed(&self) -> f32 {
        self.physical_speed
    }

    pub fn mobile_speed(&self) -> f32 {
        self.mobile_speed
    }

    /// Handle a raw physical sample.
    ///
    /// Without a configured device type the previous speed is kept.
    pub fn report_speed_sample(&mut self, raw: f32) {
        match self.normalizer.normalize(raw) {
            Some(speed) => self.physical_speed = speed,
            None => tracing::debug!("No device type configured, ignoring sample {}", raw),
        }
    }

    /// Handle a mobile speed value (already in final units).
    pub fn set_mobile_speed(&mut self, speed: f32) {
        self.mobile_speed = speed;
    }

    /// Enable or disable the physical sensor.
    ///
    /// Disabling resets the stored physical speed to [`DISCONNECTED_SPEED`].
    pub fn set_sensor_enabled(&mut self, enabled: bool) {
        if self.sensor_enabled == enabled {
            return;
        }
        self.sensor_enabled = enabled;
        if !enabled {
            self.physical_speed = DISCONNECTED_SPEED;
        }
        tracing::info!(
            "Sensor {}, source now {}",
            if enabled { "enabled" } else { "disabled" },
            self.connection_state()
        );
    }

    /// Enable or disable the mobile source.
    ///
    /// Disabling resets the stored mobile speed to [`DISCONNECTED_SPEED`].
    pub fn set_mobile_enabled(&mut self, enabled: bool) {
        if self.mobile_enabled == enabled {
            return;
        }
        self.mobile_enabled = enabled;
        if !enabled {
            self.mobile_speed = DISCONNECTED_SPEED;
        }
        tracing::info!(
            "Mobile {}, source now {}",
            if enabled { "enabled" } else { "disabled" },
            self.connection_state()
        );
    }

    pub fn sensor_enabled(&self) -> bool {
        self.sensor_enabled
    }

    pub fn mobile_enabled(&self) -> bool {
        self.mobile_enabled
    }

    pub fn connection_state(&self) -> ConnectionState {
        if self.sensor_enabled {
            ConnectionState::Physical
        } else if self.mobile_enabled {
            ConnectionState::Mobile
        } else {
            ConnectionState::None
        }
    }

    pub fn device_type(&self) -> DeviceType {
        self.normalizer.device_type()
    }

    pub fn set_device_type(&mut self, device_type: DeviceType) {
        self.normalizer.set_device_type(device_type);
    }

    pub fn circumference_mm(&self) -> f32 {
        self.normalizer.circumference_mm()
    }

    /// Update wheel circumference; invalid values keep the previous one.
    pub fn set_circumference(&mut self, circumference_mm: f32) -> Result<(), InputError> {
        self.normalizer.set_circumference(circumference_mm)
    }

    pub fn device_address(&self) -> Option<&str> {
        self.device_address.as_deref()
    }

    pub fn set_device_address(&mut self, address: impl Into<String>) {
        self.device_address = Some(address.into());
    }

    pub fn mobile_state(&self) -> Option<i32> {
        self.mobile_state
    }

    /// Move the mobile session to a new state. Speed and message restart from zero.
    pub fn set_mobile_state(&mut self, state: i32) {
        self.mobile_state = Some(state);
        self.mobile_speed = 0.0;
        self.mobile_message = 0;
    }

    pub fn mobile_message(&self) -> i32 {
        self.mobile_message
    }

    pub fn set_mobile_message(&mut self, message: i32) {
        self.mobile_message = message;
    }

    /// Attach the feed of a physical input task, replacing any running one.
    pub fn start_physical_task(&mut self, feed: SampleFeed) {
        if self.physical_task.replace(feed).is_some() {
            tracing::debug!("Replaced running physical input task");
        }
        tracing::info!("Physical input task started");
    }

    /// Stop the physical input task and disable the sensor.
    pub fn stop_physical_task(&mut self) {
        self.set_sensor_enabled(false);
        if let Some(feed) = self.physical_task.take() {
            tracing::info!(
                "Physical input task stopped, {} queued samples discarded",
                feed.pending()
            );
        }
    }

    /// Attach the feed of a mobile input task, replacing any running one.
    pub fn start_mobile_task(&mut self, feed: SampleFeed) {
        if self.mobile_task.replace(feed).is_some() {
            tracing::debug!("Replaced running mobile input task");
        }
        tracing::info!("Mobile input task started");
    }

    /// Stop the mobile input task and clear the mobile session.
    pub fn stop_mobile_task(&mut self) {
        self.mobile_state = None;
        self.mobile_speed = DISCONNECTED_SPEED;
        if let Some(feed) = self.mobile_task.take() {
            tracing::info!(
                "Mobile input task stopped, {} queued samples discarded",
                feed.pending()
            );
        }
    }

    pub fn physical_task_running(&self) -> bool {
        self.physical_task.is_some()
    }

    pub fn mobile_task_running(&self) -> bool {
        self.mobile_task.is_some()
    }

    /// Apply every queued sample from running tasks. Returns how many were applied.
    pub fn drain_feeds(&mut self) -> usize {
        let physical: Vec<SpeedSample> = self
            .physical_task
            .as_ref()
            .map(|feed| feed.drain().collect())
            .unwrap_or_default();
        let mobile: Vec<SpeedSample> = self
            .mobile_task
            .as_ref()
            .map(|feed| feed.drain().collect())
            .unwrap_or_default();

        let applied = physical.len() + mobile.len();
        for sample in physical {
            self.report_speed_sample(sample.raw_value);
        }
        for sample in mobile {
            self.set_mobile_speed(sample.raw_value);
        }
        applied
    }

    /// Stop both tasks.
    pub fn shutdown(&mut self) {
        self.stop_physical_task();
        self.stop_mobile_task();
    }
}
