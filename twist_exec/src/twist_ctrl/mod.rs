//! # Twist control module
//!
//! Twist control converts a demanded body motion (forward speed and yaw rate)
//! into drive-by-wire actuator demands: throttle pedal, brake torque and
//! steering wheel angle.
//!
//! Longitudinal control is a cascade. An outer proportional speed loop turns
//! the speed error into a demanded acceleration, limited by the command and
//! the vehicle configuration. Positive demands are tracked by an inner PI loop
//! on the filtered measured acceleration which outputs the throttle pedal
//! position. Negative demands beyond the brake deadband are converted straight
//! into a brake torque from the vehicle mass (which varies with the fuel
//! level) and the wheel radius.
//!
//! Lateral control uses the kinematic steering model in `yaw_ctrl`, plus a
//! proportional correction on the yaw rate error.
//!
//! Every cycle the controller is in one of three states:
//! - `Stale`: no command has been received for 10 control periods, nothing is
//!   output,
//! - `Disabled`: the drive-by-wire system is not enabled, nothing is output,
//! - `Active`: actuator demands are output.
//!
//! Integrators are reset whenever the controller is not `Active`.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod cmd;
mod inputs;
mod node;
mod params;
mod reconfig;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use cmd::*;
pub use inputs::*;
pub use node::*;
pub use params::*;
pub use state::*;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Density of gasoline.
///
/// Units: kilograms/gallon
pub const GAS_DENSITY_KG_PER_GAL: f64 = 2.858;

/// Mass assumed for the occupants of the vehicle. This is an approximation
/// added onto the configured vehicle mass, not a measurement.
///
/// Units: kilograms
pub const PASSENGER_MASS_KG: f64 = 150.0;

/// Acceleration and deceleration limit used when neither the command nor the
/// configuration provides one.
///
/// Units: meters/second^2
pub const DEFAULT_ACCEL_LIMIT_MSS: f64 = 9.8;

/// Number of control periods without a command after which the command is
/// considered stale.
pub const STALE_CMD_PERIODS: f64 = 10.0;

/// Below this demanded speed the speed loop integrator is held at zero.
///
/// Units: miles/hour
pub const STOP_SPEED_MPH: f64 = 1.0;

/// At or below this demanded speed the minimum brake torque is applied.
///
/// Units: meters/second
pub const ZERO_SPEED_MS: f64 = 0.01;

/// Output range of the acceleration loop, which is the throttle pedal
/// fraction.
pub const THROTTLE_PEDAL_RANGE: (f64, f64) = (0.0, 1.0);

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur while setting up TwistCtrl.
#[derive(Debug, thiserror::Error)]
pub enum TwistCtrlError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(util::params::LoadError),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Could not initialise the archive: {0}")]
    ArchiveError(util::archive::ArchiveError),
}
