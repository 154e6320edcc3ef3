//! Unit tests for speed normalization.

use pedalpower::input::{normalize, DeviceType, InputError, SpeedNormalizer};

/// Speed sensors rebase per-second rates to per-minute.
#[test]
fn test_speed_sensor_times_sixty() {
    for raw in [-2.0_f32, 0.0, 0.1, 3.3, 99.9] {
        assert_eq!(normalize(raw, DeviceType::SpeedSensor, 2100.0), Some(raw * 60.0));
    }
}

/// Cadence sensors with the default wheel scale by 2.1.
#[test]
fn test_cadence_sensor_default_wheel() {
    for raw in [0.0_f32, 1.0, 4.0, 10.0, -3.0] {
        let speed = normalize(raw, DeviceType::CadenceSensor, 2100.0).unwrap();
        assert!((speed - raw * 2.1).abs() < 1e-4);
    }
}

/// Bound normalizer follows its device type.
#[test]
fn test_bound_normalizer() {
    let mut normalizer = SpeedNormalizer::new(DeviceType::DirectSpeed, 2100.0).unwrap();
    assert_eq!(normalizer.normalize(18.0), Some(18.0));

    normalizer.set_device_type(DeviceType::None);
    assert_eq!(normalizer.normalize(18.0), None);
}

/// Invalid wheel size is rejected up front.
#[test]
fn test_invalid_circumference() {
    assert_eq!(
        SpeedNormalizer::new(DeviceType::CadenceSensor, -1.0),
        Err(InputError::InvalidCircumference(-1.0))
    );
}
