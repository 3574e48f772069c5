//! # Yaw control
//!
//! Converts a demanded yaw rate into a steering wheel angle using the
//! kinematic bicycle model. The curvature of the demanded path is limited so
//! that, at the current vehicle speed, the lateral acceleration never exceeds
//! the configured maximum. Limiting the curvature rather than the final angle
//! keeps the limit tied to the lateral force on the vehicle whatever the
//! steering geometry.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;
use util::maths::clamp;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Demanded speeds smaller than this are replaced by it (keeping their sign)
/// when computing the demanded curvature.
///
/// Units: meters/second
pub const MIN_CURVATURE_SPEED_MS: f64 = 0.01;

/// Steering wheel lock on the default vehicle.
///
/// Units: radians
pub const DEFAULT_STEERING_WHEEL_ANGLE_MAX_RAD: f64 = 8.2;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct YawCtrl {
    /// Units: meters
    wheelbase_m: f64,

    /// Steering wheel angle per road wheel angle
    steering_ratio: f64,

    /// Units: meters/second^2
    lateral_accel_max_mss: f64,

    /// Units: radians
    steering_wheel_angle_max_rad: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for YawCtrl {
    fn default() -> Self {
        Self {
            wheelbase_m: 1.0,
            steering_ratio: 1.0,
            lateral_accel_max_mss: f64::INFINITY,
            steering_wheel_angle_max_rad: DEFAULT_STEERING_WHEEL_ANGLE_MAX_RAD,
        }
    }
}

impl YawCtrl {

    pub fn new(wheelbase_m: f64, steering_ratio: f64) -> Self {
        let mut yc = Self::default();
        yc.set_wheel_base(wheelbase_m);
        yc.set_steering_ratio(steering_ratio);
        yc
    }

    pub fn set_wheel_base(&mut self, wheelbase_m: f64) {
        self.wheelbase_m = wheelbase_m;
    }

    pub fn set_steering_ratio(&mut self, steering_ratio: f64) {
        self.steering_ratio = steering_ratio;
    }

    /// Only the magnitude of the limit is used.
    pub fn set_lateral_accel_max(&mut self, lateral_accel_max_mss: f64) {
        self.lateral_accel_max_mss = lateral_accel_max_mss.abs();
    }

    /// Only the magnitude of the limit is used.
    pub fn set_steering_wheel_angle_max(&mut self, angle_max_rad: f64) {
        self.steering_wheel_angle_max_rad = angle_max_rad.abs();
    }

    /// Get the steering wheel angle which achieves the demanded yaw rate.
    ///
    /// # Inputs
    /// - `cmd_vx_ms`: demanded forward speed
    /// - `cmd_wz_rads`: demanded yaw rate
    /// - `speed_ms`: measured forward speed, used to limit lateral
    ///   acceleration
    pub fn get_steering_wheel_angle(
        &self,
        cmd_vx_ms: f64,
        cmd_wz_rads: f64,
        speed_ms: f64
    ) -> f64 {
        let vx_ms = if cmd_vx_ms.abs() < MIN_CURVATURE_SPEED_MS {
            MIN_CURVATURE_SPEED_MS.copysign(cmd_vx_ms)
        }
        else {
            cmd_vx_ms
        };

        let mut curv_m = cmd_wz_rads / vx_ms;

        // Lateral acceleration of following the demanded curvature at the
        // current speed
        let speed_sq = speed_ms * speed_ms;
        let lat_accel_mss = speed_sq * curv_m;
        let lat_accel_lim_mss = clamp(
            &lat_accel_mss,
            &-self.lateral_accel_max_mss,
            &self.lateral_accel_max_mss
        );

        if lat_accel_lim_mss != lat_accel_mss {
            curv_m = lat_accel_lim_mss / speed_sq;
        }

        let angle_rad = self.steering_ratio * (self.wheelbase_m * curv_m).atan();

        clamp(
            &angle_rad,
            &-self.steering_wheel_angle_max_rad,
            &self.steering_wheel_angle_max_rad
        )
    }
}
