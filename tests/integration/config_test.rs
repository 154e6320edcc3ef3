//! Config on disk feeding a ride controller.

use pedalpower::input::DeviceType;
use pedalpower::storage::{load_config_from, save_config_to, AppConfig, ConfigError};
use pedalpower::{MovementState, RideController};
use tempfile::tempdir;

#[test]
fn test_config_file_drives_controller() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");

    let mut config = AppConfig::default();
    config.input.device_type = DeviceType::CadenceSensor;
    config.input.circumference_mm = 2000.0;
    config.power.table.get_mut(MovementState::Normal).level_max = 50.0;
    save_config_to(&path, &config).unwrap();

    let loaded = load_config_from(&path).unwrap();
    let mut ride = RideController::from_config(&loaded).unwrap();
    ride.selector_mut().set_sensor_enabled(true);
    ride.report_speed_sample(10.0);
    assert!((ride.get_speed() - 20.0).abs() < 1e-4);

    ride.set_manual_level(100.0);
    for _ in 0..600 {
        ride.tick(1.0 / 60.0);
    }
    assert!(ride.get_power_level() <= 50.0);
    assert!(ride.get_power_level() > 49.0);
}

#[test]
fn test_hand_written_table() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[input]
device_type = "direct_speed"

[power.table.normal]
blend_alpha = 1.0
level_max = 100.0

[power.table.boss_charge]
blend_alpha = 1.0
level_max = 100.0

[power.table.boss_dodge]
blend_alpha = 1.0
level_max = 100.0

[power.table.boss_attack]
blend_alpha = 1.0
level_max = 120.0

[power.table.boss_cooldown]
blend_alpha = 1.0
level_max = 100.0

[power.table.slow_down]
blend_alpha = 0.25
level_max = 100.0
"#,
    )
    .unwrap();

    let config = load_config_from(&path).unwrap();
    assert_eq!(config.input.device_type, DeviceType::DirectSpeed);
    assert_eq!(config.power.table.boss_attack.level_max, 120.0);
    assert_eq!(config.power.table.slow_down.blend_alpha, 0.25);
}

#[test]
fn test_hand_written_alpha_above_one_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[power.table.boss_attack]
blend_alpha = 10.0
level_max = 100.0
"#,
    )
    .unwrap();

    assert!(matches!(
        load_config_from(&path),
        Err(ConfigError::Invalid(_))
    ));
}
