//! # Drive-by-wire messages
//!
//! Actuator commands produced by the twist controller, and the reports from the vehicle which it
//! consumes.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A desired motion of the vehicle body.
#[derive(Serialize, Deserialize, Debug, Default, Copy, Clone, PartialEq)]
pub struct Twist {
    /// Forward speed.
    ///
    /// Units: meters/second
    pub linear_ms: f64,

    /// Yaw rate, positive turning left (right hand rule about Z+ upwards).
    ///
    /// Units: radians/second
    pub angular_rads: f64,
}

/// A desired motion with optional acceleration limits.
#[derive(Serialize, Deserialize, Debug, Default, Copy, Clone, PartialEq)]
pub struct TwistCmd {
    pub twist: Twist,

    /// Acceleration limit, zero means use the configured maximum.
    ///
    /// Units: meters/second^2
    #[serde(default)]
    pub accel_limit_mss: f64,

    /// Deceleration limit, zero means use the configured maximum.
    ///
    /// Units: meters/second^2
    #[serde(default)]
    pub decel_limit_mss: f64,
}

/// Throttle pedal demand.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct ThrottleCmd {
    pub enable: bool,
    pub pedal_cmd_type: PedalCmdType,

    /// Pedal demand, interpreted according to `pedal_cmd_type`.
    pub pedal_cmd: f64,
}

/// Brake demand.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct BrakeCmd {
    pub enable: bool,
    pub pedal_cmd_type: PedalCmdType,

    /// Pedal demand, interpreted according to `pedal_cmd_type`.
    pub pedal_cmd: f64,
}

/// Steering wheel demand.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct SteeringCmd {
    pub enable: bool,

    /// Units: radians, positive turning left
    pub steering_wheel_angle_cmd_rad: f64,
}

/// Report from the steering system, which carries the measured vehicle speed.
#[derive(Serialize, Deserialize, Debug, Default, Copy, Clone, PartialEq)]
pub struct SteeringReport {
    /// Units: meters/second
    pub speed_ms: f64,
}

/// Inertial measurement of the vehicle yaw rate.
#[derive(Serialize, Deserialize, Debug, Default, Copy, Clone, PartialEq)]
pub struct YawRateReport {
    /// Units: radians/second
    pub yaw_rate_rads: f64,
}

/// Fuel tank level.
#[derive(Serialize, Deserialize, Debug, Default, Copy, Clone, PartialEq)]
pub struct FuelLevelReport {
    /// Units: percent of capacity, 0 to 100
    pub fuel_level_pct: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// How a pedal demand should be interpreted by the actuator layer.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum PedalCmdType {
    /// Fraction of full pedal travel, between 0 and 1.
    Percent,

    /// Wheel torque in newton meters.
    Torque,
}
