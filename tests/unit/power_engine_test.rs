//! Unit tests for power easing.

use pedalpower::power::{
    blend_step, MovementState, PowerTable, PowerTransitionEngine, StateTuning,
};
use proptest::prelude::*;

/// At alpha 1 and one second the target is reached in one tick.
#[test]
fn test_one_step_to_target() {
    let mut engine = PowerTransitionEngine::new(PowerTable::uniform(StateTuning::new(1.0, 100.0)));
    engine.set_cadence_level(100.0);
    assert!((engine.tick(MovementState::Normal, 1.0) - 100.0).abs() < 1e-6);
    assert!((blend_step(0.0, 100.0, 1.0, 1.0, 100.0) - 100.0).abs() < 1e-6);
}

/// Easing is frame-rate independent to first order.
#[test]
fn test_frame_rate_independence() {
    let table = PowerTable::uniform(StateTuning::new(1.0, 100.0));
    let mut slow = PowerTransitionEngine::new(table.clone());
    let mut fast = PowerTransitionEngine::new(table);
    slow.set_manual_level(100.0);
    fast.set_manual_level(100.0);

    for _ in 0..30 {
        slow.tick(MovementState::Normal, 1.0 / 30.0);
    }
    for _ in 0..120 {
        fast.tick(MovementState::Normal, 1.0 / 120.0);
    }
    assert!((slow.power_level() - fast.power_level()).abs() < 2.0);
}

/// Dodge ignores cadence and auto power.
#[test]
fn test_dodge_needs_manual_input() {
    let mut engine = PowerTransitionEngine::new(PowerTable::uniform(StateTuning::new(1.0, 100.0)));
    engine.set_cadence_level(90.0);
    engine.set_auto_level(50.0);
    assert_eq!(engine.tick(MovementState::BossDodge, 1.0), 0.0);

    engine.set_manual_level(35.0);
    assert!((engine.tick(MovementState::BossDodge, 1.0) - 35.0).abs() < 1e-6);
}

fn movement() -> impl Strategy<Value = MovementState> {
    (0usize..MovementState::ALL.len()).prop_map(|i| MovementState::ALL[i])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// The level stays within [0, level_max] across long random tick sequences.
    #[test]
    fn power_level_stays_bounded(
        ticks in prop::collection::vec(
            (
                movement(),
                -100.0f32..1000.0,
                -100.0f32..1000.0,
                -100.0f32..1000.0,
                0.0f32..=1.0,
                1.0f32..500.0,
                -0.5f32..3.0,
            ),
            10_000,
        )
    ) {
        let mut engine = PowerTransitionEngine::default();
        for (state, manual, cadence, auto, alpha, level_max, dt) in ticks {
            engine.set_table(PowerTable::uniform(StateTuning::new(alpha, level_max)));
            engine.set_manual_level(manual);
            engine.set_cadence_level(cadence);
            engine.set_auto_level(auto);
            let level = engine.tick(state, dt);

            prop_assert!(level >= 0.0);
            prop_assert!(level <= engine.power_level_max());
        }
    }

    /// A single blend step never leaves the bounds.
    #[test]
    fn blend_step_is_bounded(
        current in 0.0f32..200.0,
        target in -500.0f32..500.0,
        alpha in 0.0f32..=1.0,
        dt in 0.0f32..10.0,
        level_max in 1.0f32..200.0,
    ) {
        let next = blend_step(current, target, alpha, dt, level_max);
        prop_assert!(next >= 0.0);
        prop_assert!(next <= level_max);
    }
}
