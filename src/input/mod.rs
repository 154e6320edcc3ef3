//! Input module: speed normalization, cadence detection and source selection.

pub mod cadence;
pub mod source;
pub mod speed;
pub mod types;

pub use cadence::{CadenceTracker, DEFAULT_STALL_TIMEOUT, PEDAL_WINDOW_CAPACITY};
pub use source::{
    sample_channel, ConnectionState, InputSourceSelector, SampleFeed, SampleSender,
    DISCONNECTED_SPEED,
};
pub use speed::{normalize, DeviceType, SpeedNormalizer, DEFAULT_CIRCUMFERENCE_MM};
pub use types::{InputError, PedalEvent, PedalSide, SpeedSample};
