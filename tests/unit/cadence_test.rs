//! Unit tests for cadence detection.

use pedalpower::input::{CadenceTracker, PedalEvent, PedalSide, PEDAL_WINDOW_CAPACITY};
use std::time::{Duration, Instant};

fn alternate(i: u64) -> PedalSide {
    if i % 2 == 0 {
        PedalSide::Left
    } else {
        PedalSide::Right
    }
}

/// No triggers means no cadence.
#[test]
fn test_empty_tracker_is_zero() {
    let tracker = CadenceTracker::new();
    assert_eq!(tracker.rpm(), 0.0);
    assert_eq!(tracker.rpm_at(Instant::now()), 0.0);
}

/// Two triggers on opposite sides 500ms apart is one revolution per second.
#[test]
fn test_opposite_sides_half_second_apart() {
    let mut tracker = CadenceTracker::new();
    let t0 = Instant::now();
    tracker.record(PedalEvent {
        timestamp: t0,
        side: PedalSide::Left,
    });
    tracker.record(PedalEvent {
        timestamp: t0 + Duration::from_millis(500),
        side: PedalSide::Right,
    });

    assert!((tracker.rpm() - 60.0).abs() < 1e-6);
}

/// Cadence follows a change of pace within one full window.
#[test]
fn test_follows_pace_change() {
    let mut tracker = CadenceTracker::new();
    let t0 = Instant::now();
    let mut now = t0;

    // 60 rpm
    for i in 0..20 {
        tracker.on_pedal_trigger_at(alternate(i), now);
        now += Duration::from_millis(500);
    }
    assert!((tracker.rpm() - 60.0).abs() < 0.01);

    // 120 rpm, enough triggers to flush both windows
    for i in 20..(20 + 2 * PEDAL_WINDOW_CAPACITY as u64) {
        tracker.on_pedal_trigger_at(alternate(i), now);
        now += Duration::from_millis(250);
    }
    assert!((tracker.rpm() - 120.0).abs() < 0.01);
}

/// Jitter on single strokes is damped by the window.
#[test]
fn test_single_stroke_jitter_is_damped() {
    let mut tracker = CadenceTracker::new();
    let t0 = Instant::now();
    let mut now = t0;
    for i in 0..20u64 {
        // Every fifth stroke arrives 100ms late, the next one on time again
        let offset = if i % 5 == 0 { 100 } else { 0 };
        tracker.on_pedal_trigger_at(alternate(i), now + Duration::from_millis(offset));
        now += Duration::from_millis(500);
    }
    assert!((tracker.rpm() - 60.0).abs() < 5.0);
}

/// Stopping pedalling brings cadence down to zero instead of freezing it.
#[test]
fn test_stall_decays() {
    let mut tracker = CadenceTracker::with_stall_timeout(Duration::from_secs(2));
    let t0 = Instant::now();
    for i in 0..8u64 {
        tracker.on_pedal_trigger_at(alternate(i), t0 + Duration::from_millis(333 * i));
    }
    let last = tracker.last_trigger().unwrap();
    let steady = tracker.rpm_at(last);
    assert!(steady > 85.0);

    let samples: Vec<f64> = [300u64, 600, 1200, 1800, 2500]
        .iter()
        .map(|ms| tracker.rpm_at(last + Duration::from_millis(*ms)))
        .collect();
    for pair in samples.windows(2) {
        assert!(pair[1] <= pair[0]);
    }
    assert_eq!(samples[4], 0.0);
}

/// Out-of-order triggers on a side are ignored.
#[test]
fn test_out_of_order_ignored() {
    let mut tracker = CadenceTracker::new();
    let t0 = Instant::now();
    assert!(tracker.on_pedal_trigger_at(PedalSide::Right, t0 + Duration::from_secs(1)));
    assert!(!tracker.on_pedal_trigger_at(PedalSide::Right, t0));
    assert_eq!(tracker.side_count(PedalSide::Right), 1);
}
