//! # Twist control library.
//!
//! This library allows other crates in the workspace (and the benchmarks) to access items defined
//! inside the twist executable crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Data store - holds the state of the executable between cycles
pub mod data_store;

/// First order low pass filter
pub mod lpf;

/// Generic PID controller with anti-windup
pub mod pid;

/// Telecommand processor - routes telecommands into the twist node
pub mod tc_processor;

/// Twist control module - converts demanded twists into drive-by-wire commands
pub mod twist_ctrl;

/// Yaw control - kinematic steering model
pub mod yaw_ctrl;
