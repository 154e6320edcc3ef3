//! Power level easing.
//!
//! Manual, cadence and automatic power inputs are reduced to one target per
//! tick according to the movement state, and the visible power level eases
//! toward it at a per-state rate.

use crate::power::movement::MovementState;
use serde::{Deserialize, Serialize};

/// Default upper bound of the power level.
pub const DEFAULT_LEVEL_MAX: f32 = 100.0;

/// Blend rate and ceiling for one movement state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateTuning {
    /// Fraction of the remaining gap closed per second
    pub blend_alpha: f32,
    /// Highest reachable power level
    pub level_max: f32,
}

impl StateTuning {
    pub fn new(blend_alpha: f32, level_max: f32) -> Self {
        Self {
            blend_alpha,
            level_max,
        }
    }

    /// Check alpha lies in `[0, 1]` and the ceiling is positive.
    pub fn is_valid(&self) -> bool {
        (0.0..=1.0).contains(&self.blend_alpha)
            && self.level_max.is_finite()
            && self.level_max > 0.0
    }
}

/// Tuning for every movement state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerTable {
    pub normal: StateTuning,
    pub boss_charge: StateTuning,
    pub boss_dodge: StateTuning,
    pub boss_attack: StateTuning,
    pub boss_cooldown: StateTuning,
    pub slow_down: StateTuning,
}

impl Default for PowerTable {
    fn default() -> Self {
        Self {
            normal: StateTuning::new(0.75, DEFAULT_LEVEL_MAX),
            boss_charge: StateTuning::new(0.9, DEFAULT_LEVEL_MAX),
            boss_dodge: StateTuning::new(0.75, DEFAULT_LEVEL_MAX),
            boss_attack: StateTuning::new(1.0, DEFAULT_LEVEL_MAX),
            boss_cooldown: StateTuning::new(0.6, DEFAULT_LEVEL_MAX),
            slow_down: StateTuning::new(0.25, DEFAULT_LEVEL_MAX),
        }
    }
}

impl PowerTable {
    /// Same tuning for every state.
    pub fn uniform(tuning: StateTuning) -> Self {
        Self {
            normal: tuning,
            boss_charge: tuning,
            boss_dodge: tuning,
            boss_attack: tuning,
            boss_cooldown: tuning,
            slow_down: tuning,
        }
    }

    pub fn get(&self, state: MovementState) -> StateTuning {
        match state {
            MovementState::Normal => self.normal,
            MovementState::BossCharge => self.boss_charge,
            MovementState::BossDodge => self.boss_dodge,
            MovementState::BossAttack => self.boss_attack,
            MovementState::BossCooldown => self.boss_cooldown,
            MovementState::SlowDown => self.slow_down,
        }
    }

    pub fn get_mut(&mut self, state: MovementState) -> &mut StateTuning {
        match state {
            MovementState::Normal => &mut self.normal,
            MovementState::BossCharge => &mut self.boss_charge,
            MovementState::BossDodge => &mut self.boss_dodge,
            MovementState::BossAttack => &mut self.boss_attack,
            MovementState::BossCooldown => &mut self.boss_cooldown,
            MovementState::SlowDown => &mut self.slow_down,
        }
    }

    /// First state whose tuning is invalid, if any.
    pub fn first_invalid(&self) -> Option<MovementState> {
        MovementState::ALL
            .into_iter()
            .find(|state| !self.get(*state).is_valid())
    }
}

/// All power sources plus the eased output.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PowerState {
    /// Externally visible power level
    pub level_current: f32,
    /// Level being eased toward
    pub level_target: f32,
    /// Ceiling of the active state
    pub level_max: f32,
    /// Keyboard/manual input
    pub level_manual: f32,
    /// Automatic baseline
    pub level_auto: f32,
    /// Derived from cadence or sensor speed
    pub level_cadence: f32,
    /// Blend rate of the active state
    pub blend_alpha: f32,
}

/// Scale an effort reading into `[0, level_max]`.
///
/// `full_effort` is the reading that maps to `level_max`. Negative,
/// non-finite readings (including the disconnected sentinel) map to zero.
pub fn effort_level(value: f32, full_effort: f32, level_max: f32) -> f32 {
    if !value.is_finite() || value <= 0.0 || full_effort <= 0.0 {
        return 0.0;
    }
    (value / full_effort).clamp(0.0, 1.0) * level_max
}

/// One easing step toward `target`, clamped to `[0, level_max]`.
///
/// The closed fraction `alpha * delta_time` saturates at 1 so long frames
/// land on the target rather than overshoot it.
pub fn blend_step(current: f32, target: f32, alpha: f32, delta_time: f32, level_max: f32) -> f32 {
    let factor = (alpha * delta_time).clamp(0.0, 1.0);
    let next = current + (target - current) * factor;
    if next.is_finite() {
        next.clamp(0.0, level_max.max(0.0))
    } else {
        current.clamp(0.0, level_max.max(0.0))
    }
}

/// Eases the power level every simulation tick.
#[derive(Debug, Clone)]
pub struct PowerTransitionEngine {
    state: PowerState,
    table: PowerTable,
}

impl Default for PowerTransitionEngine {
    fn default() -> Self {
        Self::new(PowerTable::default())
    }
}

impl PowerTransitionEngine {
    pub fn new(table: PowerTable) -> Self {
        let normal = table.get(MovementState::Normal);
        Self {
            state: PowerState {
                level_max: normal.level_max,
                blend_alpha: normal.blend_alpha,
                ..PowerState::default()
            },
            table,
        }
    }

    /// Current power level.
    pub fn power_level(&self) -> f32 {
        self.state.level_current
    }

    /// Ceiling of the active state.
    pub fn power_level_max(&self) -> f32 {
        self.state.level_max
    }

    pub fn state(&self) -> &PowerState {
        &self.state
    }

    pub fn table(&self) -> &PowerTable {
        &self.table
    }

    /// Replace the tuning table. Takes effect on the next tick.
    pub fn set_table(&mut self, table: PowerTable) {
        self.table = table;
    }

    pub fn set_manual_level(&mut self, level: f32) {
        self.state.level_manual = sanitize(level);
    }

    pub fn set_cadence_level(&mut self, level: f32) {
        self.state.level_cadence = sanitize(level);
    }

    pub fn set_auto_level(&mut self, level: f32) {
        self.state.level_auto = sanitize(level);
    }

    /// Target level the given movement state asks for.
    pub fn select_target(&self, movement: MovementState) -> f32 {
        let s = &self.state;
        match movement {
            MovementState::Normal => s.level_manual.max(s.level_cadence).max(s.level_auto),
            MovementState::BossCharge | MovementState::BossAttack => {
                self.table.get(movement).level_max
            }
            MovementState::BossCooldown | MovementState::SlowDown => 0.0,
            MovementState::BossDodge => s.level_manual,
        }
    }

    /// Adopt the ceiling and rate of a new movement state.
    ///
    /// The current level is clamped right away so it never exceeds a lower
    /// ceiling, even before the next tick.
    pub fn apply_movement_state(&mut self, movement: MovementState) {
        let tuning = self.table.get(movement);
        self.state.level_max = tuning.level_max;
        self.state.blend_alpha = tuning.blend_alpha;
        self.state.level_current = self.state.level_current.clamp(0.0, tuning.level_max);
    }

    /// Advance one simulation step. Non-positive deltas are ignored.
    pub fn tick(&mut self, movement: MovementState, delta_time: f32) -> f32 {
        if !(delta_time > 0.0 && delta_time.is_finite()) {
            return self.state.level_current;
        }

        self.apply_movement_state(movement);
        let target = self.select_target(movement);
        self.state.level_target = target;
        self.state.level_current = blend_step(
            self.state.level_current,
            target,
            self.state.blend_alpha,
            delta_time,
            self.state.level_max,
        );

        tracing::trace!(
            "Power {:.2} -> target {:.2} ({})",
            self.state.level_current,
            target,
            movement
        );
        self.state.level_current
    }

    /// Drop manual and cadence inputs and the eased level back to zero.
    ///
    /// The automatic baseline is configuration, not ride input, and stays.
    pub fn reset(&mut self) {
        let PowerState {
            level_max,
            blend_alpha,
            level_auto,
            ..
        } = self.state;
        self.state = PowerState {
            level_max,
            blend_alpha,
            level_auto,
            ..PowerState::default()
        };
    }
}

fn sanitize(level: f32) -> f32 {
    if level.is_finite() {
        level.max(0.0)
    } else {
        tracing::debug!("Ignoring non-finite power input");
        0.0
    }
}
