//! Ride controller.
//!
//! Owns every piece of per-ride state and is the single writer for all of
//! it. The host game loop feeds inputs in and calls [`RideController::tick`]
//! once per frame.

use crate::game::reward::{CurrencyCounter, PlayerHealth};
use crate::game::stats::PlayerStats;
use crate::input::cadence::CadenceTracker;
use crate::input::source::{ConnectionState, InputSourceSelector};
use crate::input::speed::SpeedNormalizer;
use crate::input::types::PedalSide;
use crate::power::engine::{effort_level, PowerTransitionEngine};
use crate::power::movement::{MovementState, MovementStateMachine};
use crate::storage::config::{AppConfig, ConfigError};
use std::time::Instant;

/// Drives speed, cadence and power for one player.
#[derive(Debug)]
pub struct RideController {
    selector: InputSourceSelector,
    cadence: CadenceTracker,
    engine: PowerTransitionEngine,
    movement: MovementStateMachine,
    stats: PlayerStats,
    currency: CurrencyCounter,
    health: PlayerHealth,
    /// Cadence mapped to full power
    full_power_rpm: f32,
    /// Speed mapped to full power
    full_effort_speed: f32,
}

impl RideController {
    /// Build a controller from validated configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let normalizer =
            SpeedNormalizer::new(config.input.device_type, config.input.circumference_mm)
                .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        let mut engine = PowerTransitionEngine::new(config.power.table.clone());
        engine.set_auto_level(config.power.auto_level);

        Ok(Self {
            selector: InputSourceSelector::new(normalizer),
            cadence: CadenceTracker::with_stall_timeout(config.cadence.stall_timeout()),
            engine,
            movement: MovementStateMachine::new(),
            stats: PlayerStats::new(),
            currency: CurrencyCounter::new(&config.reward),
            health: PlayerHealth::new(config.reward.max_health),
            full_power_rpm: config.cadence.full_power_rpm,
            full_effort_speed: config.input.full_effort_speed,
        })
    }

    /// Continue from previously saved statistics.
    pub fn with_stats(mut self, stats: PlayerStats) -> Self {
        self.stats = stats;
        self
    }

    /// Raw physical sensor sample.
    pub fn report_speed_sample(&mut self, raw: f32) {
        self.selector.report_speed_sample(raw);
    }

    /// Mobile app speed.
    pub fn report_mobile_speed(&mut self, speed: f32) {
        self.selector.set_mobile_speed(speed);
    }

    /// Virtual pedal trigger happening now.
    pub fn report_pedal_trigger(&mut self, side: PedalSide) -> bool {
        self.cadence.on_pedal_trigger(side)
    }

    /// Virtual pedal trigger at an explicit time.
    pub fn report_pedal_trigger_at(&mut self, side: PedalSide, at: Instant) -> bool {
        self.cadence.on_pedal_trigger_at(side, at)
    }

    /// Keyboard/manual power input.
    pub fn set_manual_level(&mut self, level: f32) {
        self.engine.set_manual_level(level);
    }

    /// Automatic baseline power input.
    pub fn set_auto_level(&mut self, level: f32) {
        self.engine.set_auto_level(level);
    }

    /// The only entry point changing movement state.
    ///
    /// Leaving a boss encounter counts one cleared boss chunk.
    pub fn set_movement_state(&mut self, state: MovementState) {
        let previous = self.movement.state();
        if self.movement.set_state(state) {
            self.engine.apply_movement_state(state);
            if previous.is_boss_phase() && !state.is_boss_phase() {
                self.stats.inc_boss_chunks();
            }
        }
    }

    /// Advance one frame.
    pub fn tick(&mut self, delta_time: f32) -> f32 {
        self.tick_at(delta_time, Instant::now())
    }

    /// Advance one frame with an explicit clock.
    ///
    /// Paused or stalled frames (`delta_time <= 0`) change nothing.
    pub fn tick_at(&mut self, delta_time: f32, now: Instant) -> f32 {
        if !(delta_time > 0.0 && delta_time.is_finite()) {
            return self.engine.power_level();
        }

        self.selector.drain_feeds();

        let level_max = self.engine.table().get(MovementState::Normal).level_max;
        let rpm_level = effort_level(
            self.cadence.rpm_at(now) as f32,
            self.full_power_rpm,
            level_max,
        );
        let speed_level = effort_level(self.selector.get_speed(), self.full_effort_speed, level_max);
        self.engine.set_cadence_level(rpm_level.max(speed_level));

        self.movement.advance(delta_time);
        let power = self.engine.tick(self.movement.state(), delta_time);

        let source = self.selector.connection_state();
        if self.stats.record_power(source, power) {
            tracing::trace!("New best power {:.1} on {}", power, source);
        }
        power
    }

    pub fn get_speed(&self) -> f32 {
        self.selector.get_speed()
    }

    pub fn get_power_level(&self) -> f32 {
        self.engine.power_level()
    }

    pub fn get_power_level_max(&self) -> f32 {
        self.engine.power_level_max()
    }

    /// Cadence at `now`, in RPM.
    pub fn cadence_rpm_at(&self, now: Instant) -> f64 {
        self.cadence.rpm_at(now)
    }

    pub fn movement_state(&self) -> MovementState {
        self.movement.state()
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.selector.connection_state()
    }

    /// Best power for the active source.
    pub fn max_power(&self) -> f32 {
        self.stats.max_power(self.connection_state())
    }

    pub fn selector(&self) -> &InputSourceSelector {
        &self.selector
    }

    /// Connection management (enable flags, tasks, device settings).
    pub fn selector_mut(&mut self) -> &mut InputSourceSelector {
        &mut self.selector
    }

    pub fn engine(&self) -> &PowerTransitionEngine {
        &self.engine
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut PlayerStats {
        &mut self.stats
    }

    pub fn currency(&self) -> i64 {
        self.currency.count()
    }

    pub fn award_currency(&mut self, positive: bool, multiplier: i32) -> i64 {
        self.currency.award(positive, multiplier)
    }

    pub fn try_revive(&mut self, multiplier: i32) -> bool {
        self.currency.try_revive(multiplier)
    }

    pub fn health(&self) -> &PlayerHealth {
        &self.health
    }

    pub fn player_hit(&mut self, off_screen: bool) {
        self.health.hit(off_screen);
    }

    pub fn heal(&mut self, to_max: bool) {
        self.health.heal(to_max);
    }

    /// Bank the run's currency into the lifetime stats and start over.
    pub fn finish_run(&mut self) -> i64 {
        let earned = self.currency.count();
        self.stats.update_currency(earned);
        self.currency.reset();
        self.health.heal(true);
        self.cadence.reset();
        self.engine.reset();
        self.set_movement_state(MovementState::Normal);
        tracing::info!("Run finished, banked {} currency", earned);
        earned
    }

    /// Stop all input tasks.
    pub fn shutdown(&mut self) {
        self.selector.shutdown();
    }
}
