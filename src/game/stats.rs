//! Player statistics updated during play.
//!
//! Only the numeric bookkeeping lives here; writing the record to durable
//! storage is the host's job, so the struct is plain serde data.

use crate::input::source::ConnectionState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifetime statistics of one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Best power level ever reached, indexed by [`ConnectionState::index`]
    pub max_power: [f32; 3],
    /// Currency banked across sessions
    pub total_currency: i64,
    /// Distance travelled in game units
    pub total_distance: f64,
    /// Boss segments cleared
    pub boss_chunks: u32,
    /// Runs of the main game mode
    pub main_mode_count: u32,
    /// Runs of the endless game mode
    pub endless_mode_count: u32,
    /// Stages completed
    pub stages_complete: u32,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            max_power: [0.0; 3],
            total_currency: 0,
            total_distance: 0.0,
            boss_chunks: 0,
            main_mode_count: 0,
            endless_mode_count: 0,
            stages_complete: 0,
            updated_at: Utc::now(),
        }
    }
}

impl PlayerStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Best power recorded while using `source`.
    pub fn max_power(&self, source: ConnectionState) -> f32 {
        self.max_power
            .get(source.index())
            .copied()
            .unwrap_or_default()
    }

    /// Overwrite the best power for `source`.
    pub fn set_max_power(&mut self, source: ConnectionState, power: f32) {
        if let Some(slot) = self.max_power.get_mut(source.index()) {
            *slot = power;
            self.touch();
        }
    }

    /// Keep `power` if it beats the best for `source`. Returns `true` on a new best.
    pub fn record_power(&mut self, source: ConnectionState, power: f32) -> bool {
        if power.is_finite() && power > self.max_power(source) {
            self.set_max_power(source, power);
            true
        } else {
            false
        }
    }

    pub fn update_currency(&mut self, amount: i64) {
        self.total_currency = self.total_currency.saturating_add(amount);
        self.touch();
    }

    pub fn add_distance(&mut self, distance: f64) {
        if distance.is_finite() && distance > 0.0 {
            self.total_distance += distance;
            self.touch();
        }
    }

    pub fn inc_boss_chunks(&mut self) {
        self.boss_chunks = self.boss_chunks.saturating_add(1);
        self.touch();
    }

    pub fn inc_main_mode_count(&mut self) {
        self.main_mode_count = self.main_mode_count.saturating_add(1);
        self.touch();
    }

    pub fn inc_endless_mode_count(&mut self) {
        self.endless_mode_count = self.endless_mode_count.saturating_add(1);
        self.touch();
    }

    pub fn inc_stages_complete(&mut self) {
        self.stages_complete = self.stages_complete.saturating_add(1);
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
