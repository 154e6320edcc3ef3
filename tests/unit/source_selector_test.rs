//! Unit tests for input source selection.

use pedalpower::input::{
    ConnectionState, DeviceType, InputSourceSelector, SpeedNormalizer, DISCONNECTED_SPEED,
};

fn selector() -> InputSourceSelector {
    InputSourceSelector::new(SpeedNormalizer::new(DeviceType::DirectSpeed, 2100.0).unwrap())
}

/// Sensor keeps priority when both sources are enabled.
#[test]
fn test_sensor_priority() {
    let mut selector = selector();
    selector.set_sensor_enabled(true);
    selector.set_mobile_enabled(true);
    selector.report_speed_sample(5.0);
    selector.set_mobile_speed(9.0);
    assert_eq!(selector.get_speed(), 5.0);
}

/// Losing the sensor hands over to mobile on the next read.
#[test]
fn test_sensor_loss_flips_to_mobile() {
    let mut selector = selector();
    selector.set_sensor_enabled(true);
    selector.set_mobile_enabled(true);
    selector.report_speed_sample(5.0);
    selector.set_mobile_speed(9.0);

    selector.set_sensor_enabled(false);
    assert_eq!(selector.get_speed(), 9.0);
}

/// A disabled source never serves a stale value.
#[test]
fn test_disabled_mobile_reads_sentinel() {
    let mut selector = selector();
    selector.set_mobile_enabled(true);
    selector.set_mobile_speed(14.0);
    selector.set_mobile_enabled(false);
    assert_eq!(selector.get_speed(), DISCONNECTED_SPEED);
    assert_eq!(selector.connection_state(), ConnectionState::None);
}

/// Connection state indices are stable.
#[test]
fn test_connection_state_indices() {
    let indices: Vec<usize> = ConnectionState::ALL.iter().map(|s| s.index()).collect();
    assert_eq!(indices, vec![0, 1, 2]);
}

/// Circumference changes apply to later samples only if valid.
#[test]
fn test_circumference_update() {
    let mut selector = InputSourceSelector::new(
        SpeedNormalizer::new(DeviceType::CadenceSensor, 2100.0).unwrap(),
    );
    selector.set_sensor_enabled(true);
    assert!(selector.set_circumference(0.0).is_err());
    selector.report_speed_sample(10.0);
    assert!((selector.get_speed() - 21.0).abs() < 1e-4);

    selector.set_circumference(1000.0).unwrap();
    selector.report_speed_sample(10.0);
    assert!((selector.get_speed() - 10.0).abs() < 1e-4);
}
