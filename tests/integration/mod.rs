//! Integration test modules.

mod config_test;
mod sensor_mock;
