//! Integration test runner for unit tests
//! This file makes cargo test discover the unit test modules

#[path = "log_capture.rs"]
mod log_capture;

#[path = "test_properties.rs"]
mod test_properties;


#[path = "test_round_trip.rs"]
mod test_round_trip;
