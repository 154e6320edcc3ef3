//! PedalPower - pedal effort to game power
//!
//! Turns rider effort from a speed/cadence sensor, the companion mobile app
//! or an on-screen virtual pedal into a normalized speed and a smoothly eased
//! power level that gameplay systems consume.

pub mod game;
pub mod input;
pub mod power;
pub mod storage;

// Re-export commonly used types
pub use game::controller::RideController;
pub use input::cadence::CadenceTracker;
pub use input::source::InputSourceSelector;
pub use power::engine::PowerTransitionEngine;
pub use power::movement::MovementState;
pub use storage::config::AppConfig;
