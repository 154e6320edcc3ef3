//! PedalPower - scripted ride demo
//!
//! Plays a short ride through the power pipeline and prints a JSON summary.

use anyhow::Context;
use pedalpower::input::{DeviceType, PedalSide};
use pedalpower::storage::load_config;
use pedalpower::{MovementState, RideController};
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const FRAME_SECONDS: f32 = 1.0 / 60.0;

/// Scripted phases: state, seconds, pedal interval in ms (0 = not pedalling).
const SCRIPT: &[(MovementState, u32, u64)] = &[
    (MovementState::Normal, 6, 333),
    (MovementState::BossCharge, 3, 333),
    (MovementState::BossDodge, 3, 0),
    (MovementState::BossAttack, 2, 250),
    (MovementState::BossCooldown, 3, 500),
    (MovementState::Normal, 4, 400),
    (MovementState::SlowDown, 4, 0),
];

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting PedalPower v{}", env!("CARGO_PKG_VERSION"));

    let mut config = load_config().context("loading config")?;
    if !config.input.device_type.is_configured() {
        config.input.device_type = DeviceType::CadenceSensor;
    }
    let mut ride = RideController::from_config(&config).context("building ride controller")?;

    let start = Instant::now();
    let mut sim_time = Duration::ZERO;
    let frame = Duration::from_secs_f32(FRAME_SECONDS);
    let mut side = PedalSide::Left;

    for &(state, seconds, pedal_ms) in SCRIPT {
        ride.set_movement_state(state);
        if state == MovementState::BossDodge {
            ride.set_manual_level(40.0);
        } else {
            ride.set_manual_level(0.0);
        }

        let frames = seconds * 60;
        let mut next_pedal = sim_time;
        for _ in 0..frames {
            if pedal_ms > 0 && sim_time >= next_pedal {
                ride.report_pedal_trigger_at(side, start + sim_time);
                side = match side {
                    PedalSide::Left => PedalSide::Right,
                    PedalSide::Right => PedalSide::Left,
                };
                next_pedal = sim_time + Duration::from_millis(pedal_ms);
            }
            sim_time += frame;
            ride.tick_at(FRAME_SECONDS, start + sim_time);
        }

        tracing::info!(
            "{} done: power {:.1}/{:.1}, cadence {:.0} rpm",
            state,
            ride.get_power_level(),
            ride.get_power_level_max(),
            ride.cadence_rpm_at(start + sim_time)
        );
    }

    ride.award_currency(true, ride.max_power().round() as i32);
    ride.finish_run();
    ride.shutdown();

    let summary = serde_json::json!({
        "final_power": ride.get_power_level(),
        "best_power": ride.max_power(),
        "stats": ride.stats(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
