//! Power module: movement state and power level easing.

pub mod engine;
pub mod movement;

pub use engine::{
    blend_step, effort_level, PowerState, PowerTable, PowerTransitionEngine, StateTuning,
    DEFAULT_LEVEL_MAX,
};
pub use movement::{MovementState, MovementStateMachine};
