//! # Communications interface crate.
//!
//! Provides all common communications interfaces for the software.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Telecommands delivered to the controller (motion commands, feedback, enable, reconfiguration)
pub mod tc;

/// Drive-by-wire actuator commands and vehicle reports
pub mod dbw;
