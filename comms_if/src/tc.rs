//! # Telecommand module
//!
//! Everything the twist controller is told from the outside world arrives as a telecommand:
//! motion commands, vehicle reports, the enable signal and new configurations.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Serialize, Deserialize};
use serde_json::{self, Value};
use thiserror::Error;

// Internal
use crate::dbw::{FuelLevelReport, SteeringReport, Twist, TwistCmd, YawRateReport};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A telecommand.
///
/// In JSON a TC is an object with a `"type"` string and, for most types, a `"payload"`, for
/// example `{"type": "TWIST", "payload": {"linear_ms": 5.0, "angular_rads": 0.0}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tc {
    /// Desired motion without limits.
    Twist(Twist),

    /// Desired motion stamped by the sender. Limits are reset like `Twist`.
    TwistStamped(Twist),

    /// Desired motion with acceleration limits.
    TwistLimits(TwistCmd),

    /// Measured speed from the steering report.
    SpeedReport(SteeringReport),

    /// Measured yaw rate.
    YawRate(YawRateReport),

    /// Measured fuel level.
    FuelLevel(FuelLevelReport),

    /// Enable the drive-by-wire system.
    Enable,

    /// Disable the drive-by-wire system.
    Disable,

    /// A new vehicle configuration. The payload is interpreted by the controller.
    Reconfig(Value),
}

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum TcParseError {
    #[error("TC contains invalid JSON: {0}")]
    InvalidJson(serde_json::Error),

    #[error("TC has an invalid type ({0})")]
    InvalidType(String),

    #[error("TC of type {0} is invalid: {1}")]
    InvalidPayload(String, serde_json::Error),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Tc {

    /// Parse a new TC from a JSON packet
    pub fn from_json(json_str: &str) -> Result<Self, TcParseError> {
        // Parse into a generic value first so that bad types can be reported separately from bad
        // payloads.
        let val: Value = serde_json::from_str(json_str).map_err(TcParseError::InvalidJson)?;

        let tc_type = match val["type"].as_str() {
            Some(s) => s.to_string(),
            None => return Err(TcParseError::InvalidType(String::from(
                "Expected \"type\" to be a string"
            )))
        };

        if !TC_TYPES.contains(&tc_type.as_str()) {
            return Err(TcParseError::InvalidType(
                format!("{} is not a recognised TC type", tc_type)
            ))
        }

        serde_json::from_value(val).map_err(|e| TcParseError::InvalidPayload(tc_type, e))
    }
}

// ---------------------------------------------------------------------------
// STATICS
// ---------------------------------------------------------------------------

static TC_TYPES: [&str; 9] = [
    "TWIST",
    "TWIST_STAMPED",
    "TWIST_LIMITS",
    "SPEED_REPORT",
    "YAW_RATE",
    "FUEL_LEVEL",
    "ENABLE",
    "DISABLE",
    "RECONFIG",
];
