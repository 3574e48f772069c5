//! Parameters structures for TwistCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use super::TwistCtrlError;
use crate::yaw_ctrl::DEFAULT_STEERING_WHEEL_ANGLE_MAX_RAD;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for twist control which are fixed for an execution.
///
/// Missing fields take their default values.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Params {

    // ---- RATES ----

    /// Rate at which the control loop is executed.
    ///
    /// Units: hertz
    pub control_rate_hz: f64,

    /// Period of the steering reports carrying the vehicle speed. Used to
    /// differentiate the speed into an acceleration.
    ///
    /// Units: seconds
    pub speed_report_period_s: f64,

    /// Period of the fuel level reports.
    ///
    /// Units: seconds
    pub fuel_report_period_s: f64,

    /// Time constant of the fuel level filter.
    ///
    /// Units: seconds
    pub fuel_filter_tau_s: f64,

    // ---- GEOMETRY ----

    /// Distance between the front and rear axles.
    ///
    /// Units: meters
    pub wheelbase_m: f64,

    /// Distance between the left and right wheels. Not used by the steering
    /// model.
    ///
    /// Units: meters
    pub track_m: f64,

    /// Ratio between the steering wheel angle and the road wheel angle.
    pub steering_ratio: f64,

    /// Maximum steering wheel angle in either direction.
    ///
    /// Units: radians
    pub steering_wheel_angle_max_rad: f64,

    // ---- BRAKES ----

    /// Brake torque always applied when the demanded speed is zero, so the
    /// vehicle is held at standstill.
    ///
    /// Units: newton meters
    pub min_brake_torque_nm: f64,
}

/// Vehicle configuration, which can be replaced while running.
///
/// Missing fields take their default values.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct VehicleConfig {
    /// Mass of the vehicle as specified by the manufacturer, including a full
    /// fuel tank.
    ///
    /// Units: kilograms
    pub vehicle_mass_kg: f64,

    /// Units: gallons
    pub fuel_capacity_gal: f64,

    /// Units: meters
    pub wheel_radius_m: f64,

    /// Maximum demanded acceleration, 0 for the default.
    ///
    /// Units: meters/second^2
    pub accel_max_mss: f64,

    /// Maximum demanded deceleration, 0 for the default.
    ///
    /// Units: meters/second^2
    pub decel_max_mss: f64,

    /// Decelerations smaller than this are left to engine braking.
    ///
    /// Units: meters/second^2
    pub brake_deadband_mss: f64,

    /// Proportional gain on the yaw rate error.
    ///
    /// Units: radians of steering wheel per radian/second
    pub steer_kp: f64,

    /// Units: meters/second^2
    pub max_lat_accel_mss: f64,

    /// Time constant of the measured acceleration filter.
    ///
    /// Units: seconds
    pub accel_tau_s: f64,

    /// Speed loop proportional gain
    pub speed_kp: f64,

    /// Acceleration loop proportional gain
    pub accel_kp: f64,

    /// Acceleration loop integral gain
    pub accel_ki: f64,

    /// Output throttle and brake demands
    pub pub_pedals: bool,

    /// Output steering demands
    pub pub_steering: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            control_rate_hz: 50.0,
            speed_report_period_s: 0.02,
            fuel_report_period_s: 0.1,
            fuel_filter_tau_s: 60.0,
            wheelbase_m: 2.8498,
            track_m: 1.5824,
            steering_ratio: 14.8,
            steering_wheel_angle_max_rad: DEFAULT_STEERING_WHEEL_ANGLE_MAX_RAD,
            min_brake_torque_nm: 530.0,
        }
    }
}

impl Params {

    /// Period of the control loop.
    ///
    /// Units: seconds
    pub fn control_period_s(&self) -> f64 {
        1.0 / self.control_rate_hz
    }

    /// Check that the parameters can be used by the controller.
    pub fn validate(&self) -> Result<(), TwistCtrlError> {
        let positive = [
            ("control_rate_hz", self.control_rate_hz),
            ("speed_report_period_s", self.speed_report_period_s),
            ("fuel_report_period_s", self.fuel_report_period_s),
            ("wheelbase_m", self.wheelbase_m),
            ("steering_ratio", self.steering_ratio),
        ];

        for (name, value) in positive.iter() {
            if !(value.is_finite() && *value > 0.0) {
                return Err(TwistCtrlError::InvalidParams(format!(
                    "{} must be positive and finite, found {}", name, value
                )));
            }
        }

        if !(self.min_brake_torque_nm >= 0.0) {
            return Err(TwistCtrlError::InvalidParams(format!(
                "min_brake_torque_nm must not be negative, found {}", 
                self.min_brake_torque_nm
            )));
        }

        Ok(())
    }
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            vehicle_mass_kg: 1736.35,
            fuel_capacity_gal: 13.5,
            wheel_radius_m: 0.335,
            accel_max_mss: 3.0,
            decel_max_mss: 3.0,
            brake_deadband_mss: 0.1,
            steer_kp: 0.5,
            max_lat_accel_mss: 3.0,
            accel_tau_s: 0.5,
            speed_kp: 2.0,
            accel_kp: 0.4,
            accel_ki: 0.1,
            pub_pedals: true,
            pub_steering: true,
        }
    }
}
