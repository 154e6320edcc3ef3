//! Player movement state.
//!
//! Gameplay scripts switch the player between free riding and boss
//! segments. Power easing, speed and rewards all read the active state.

use serde::{Deserialize, Serialize};

/// The player's current movement mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementState {
    /// Free riding
    #[default]
    Normal,
    /// Single-lane boss charge
    BossCharge,
    /// Three-lane boss dodge
    BossDodge,
    /// Attacking the boss
    BossAttack,
    /// Cooling down after an attack
    BossCooldown,
    /// Slowing to a stop
    SlowDown,
}

impl MovementState {
    pub const ALL: [MovementState; 6] = [
        MovementState::Normal,
        MovementState::BossCharge,
        MovementState::BossDodge,
        MovementState::BossAttack,
        MovementState::BossCooldown,
        MovementState::SlowDown,
    ];

    /// Get a human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            MovementState::Normal => "Normal movement",
            MovementState::BossCharge => "One lane boss",
            MovementState::BossDodge => "Three lane boss",
            MovementState::BossAttack => "Attacking boss",
            MovementState::BossCooldown => "Cooling down",
            MovementState::SlowDown => "Slowing to stop",
        }
    }

    /// Whether this state belongs to a boss encounter.
    pub fn is_boss_phase(&self) -> bool {
        match self {
            MovementState::BossCharge
            | MovementState::BossDodge
            | MovementState::BossAttack
            | MovementState::BossCooldown => true,
            MovementState::Normal | MovementState::SlowDown => false,
        }
    }
}

impl std::fmt::Display for MovementState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MovementState::Normal => write!(f, "Normal"),
            MovementState::BossCharge => write!(f, "BossCharge"),
            MovementState::BossDodge => write!(f, "BossDodge"),
            MovementState::BossAttack => write!(f, "BossAttack"),
            MovementState::BossCooldown => write!(f, "BossCooldown"),
            MovementState::SlowDown => write!(f, "SlowDown"),
        }
    }
}

/// Holds the single active movement state.
#[derive(Debug, Clone, Default)]
pub struct MovementStateMachine {
    state: MovementState,
    /// Simulation seconds spent in the current state
    time_in_state: f32,
    /// Number of state changes since creation
    transitions: u32,
}

impl MovementStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MovementState {
        self.state
    }

    pub fn time_in_state(&self) -> f32 {
        self.time_in_state
    }

    pub fn transitions(&self) -> u32 {
        self.transitions
    }

    /// Switch to `next`. Returns `true` if the state actually changed.
    pub fn set_state(&mut self, next: MovementState) -> bool {
        if next == self.state {
            return false;
        }
        tracing::info!(
            "Movement state {} -> {} ({}) after {:.2}s",
            self.state,
            next,
            next.description(),
            self.time_in_state
        );
        self.state = next;
        self.time_in_state = 0.0;
        self.transitions = self.transitions.saturating_add(1);
        true
    }

    /// Accumulate simulation time.
    pub fn advance(&mut self, delta_time: f32) {
        if delta_time > 0.0 && delta_time.is_finite() {
            self.time_in_state += delta_time;
        }
    }
}
