//! Commands passed into and out of TwistCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;
use comms_if::dbw::{BrakeCmd, SteeringCmd, ThrottleCmd, Twist, TwistCmd};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The last motion command received.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct CommandState {
    /// Demanded body motion
    pub twist: Twist,

    /// Acceleration limit, 0 if not set by the command.
    ///
    /// Units: meters/second^2
    pub accel_limit_mss: f64,

    /// Deceleration limit, 0 if not set by the command.
    ///
    /// Units: meters/second^2
    pub decel_limit_mss: f64,

    /// Time the command was received, or `None` if no command has been
    /// received yet.
    ///
    /// Units: seconds
    pub stamp_s: Option<f64>,
}

/// The measured motion of the vehicle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ActualState {
    /// Units: meters/second
    pub linear_ms: f64,

    /// Units: radians/second
    pub angular_rads: f64,
}

/// Demands output by TwistCtrl on an active cycle.
///
/// Actuator demands which are not being published (see
/// `VehicleConfig::pub_pedals` and `VehicleConfig::pub_steering`) are `None`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DbwCmds {
    pub throttle: Option<ThrottleCmd>,
    pub brake: Option<BrakeCmd>,
    pub steering: Option<SteeringCmd>,

    /// Acceleration demanded by the speed loop.
    ///
    /// Units: meters/second^2
    pub req_accel_mss: f64,

    /// Filtered measured acceleration.
    ///
    /// Units: meters/second^2
    pub filtered_accel_mss: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl CommandState {

    /// A command without acceleration limits.
    pub fn from_twist(twist: Twist, stamp_s: f64) -> Self {
        Self {
            twist,
            accel_limit_mss: 0.0,
            decel_limit_mss: 0.0,
            stamp_s: Some(stamp_s),
        }
    }

    /// A command with acceleration limits.
    pub fn from_twist_cmd(cmd: TwistCmd, stamp_s: f64) -> Self {
        Self {
            twist: cmd.twist,
            accel_limit_mss: cmd.accel_limit_mss,
            decel_limit_mss: cmd.decel_limit_mss,
            stamp_s: Some(stamp_s),
        }
    }

    /// True if the command is older than `timeout_s` at `now_s`, or if no
    /// command has been received.
    pub fn is_stale(&self, now_s: f64, timeout_s: f64) -> bool {
        match self.stamp_s {
            Some(t) => now_s - t > timeout_s,
            None => true
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_staleness() {
        let twist = Twist { linear_ms: 1.0, angular_rads: 0.0 };

        assert!(CommandState::default().is_stale(0.0, 0.2));

        let cmd = CommandState::from_twist(twist, 10.0);
        assert!(!cmd.is_stale(10.0, 0.2));
        assert!(!cmd.is_stale(10.2, 0.2));
        assert!(cmd.is_stale(10.21, 0.2));
    }

    #[test]
    fn test_limits() {
        let twist = Twist { linear_ms: 1.0, angular_rads: 0.5 };

        let cmd = CommandState::from_twist_cmd(
            TwistCmd { twist, accel_limit_mss: 1.0, decel_limit_mss: -2.0 }, 
            3.0
        );
        assert_eq!(cmd.accel_limit_mss, 1.0);
        assert_eq!(cmd.decel_limit_mss, -2.0);
        assert_eq!(cmd.stamp_s, Some(3.0));

        let cmd = CommandState::from_twist(twist, 4.0);
        assert_eq!(cmd.accel_limit_mss, 0.0);
        assert_eq!(cmd.decel_limit_mss, 0.0);
    }
}
