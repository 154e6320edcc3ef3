//! Game-facing state: the ride controller, rewards and player statistics.

pub mod controller;
pub mod reward;
pub mod stats;

pub use controller::RideController;
pub use reward::{CurrencyCounter, PlayerHealth};
pub use stats::PlayerStats;
