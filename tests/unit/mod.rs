//! Unit test modules.

mod cadence_test;
mod power_engine_test;
mod source_selector_test;
mod speed_test;
