//! Runtime reconfiguration of TwistCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{info, warn};
use super::*;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TwistCtrl {

    /// Apply a new vehicle configuration.
    ///
    /// Gains, limits and the derived vehicle mass are updated. Integrators are
    /// kept, the new gains take effect from the next cycle. A wheel radius or
    /// vehicle mass which is not positive is ignored and the previous value
    /// kept.
    pub fn reconfigure(&mut self, mut config: VehicleConfig) {
        if !(config.wheel_radius_m > 0.0) {
            warn!(
                "Ignoring invalid wheel radius {} m, keeping {} m",
                config.wheel_radius_m, self.config.wheel_radius_m
            );
            config.wheel_radius_m = self.config.wheel_radius_m;
        }

        if !(config.vehicle_mass_kg > 0.0) {
            warn!(
                "Ignoring invalid vehicle mass {} kg, keeping {} kg",
                config.vehicle_mass_kg, self.config.vehicle_mass_kg
            );
            config.vehicle_mass_kg = self.config.vehicle_mass_kg;
        }

        self.vehicle_mass_adj_kg = config.vehicle_mass_kg
            - config.fuel_capacity_gal * GAS_DENSITY_KG_PER_GAL
            + PASSENGER_MASS_KG;

        self.speed_pid.set_gains(config.speed_kp, 0.0, 0.0);
        self.accel_pid.set_gains(config.accel_kp, config.accel_ki, 0.0);
        self.yaw_ctrl.set_lateral_accel_max(config.max_lat_accel_mss);

        self.config = config;

        info!(
            "TwistCtrl reconfigured: mass {:.1} kg (empty, occupied), speed kp {}, \
            accel kp {} ki {}",
            self.vehicle_mass_adj_kg,
            config.speed_kp,
            config.accel_kp,
            config.accel_ki
        );
    }

    /// Vehicle mass with an empty tank and the occupants.
    ///
    /// Units: kilograms
    pub fn vehicle_mass_adj_kg(&self) -> f64 {
        self.vehicle_mass_adj_kg
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_gains_and_mass() {
        let mut ctrl = TwistCtrl::new(Params::default()).unwrap();

        let config = VehicleConfig {
            vehicle_mass_kg: 2000.0,
            fuel_capacity_gal: 10.0,
            speed_kp: 1.5,
            accel_kp: 0.2,
            accel_ki: 0.05,
            ..VehicleConfig::default()
        };
        ctrl.reconfigure(config);

        assert_eq!(ctrl.speed_pid.gains(), (1.5, 0.0, 0.0));
        assert_eq!(ctrl.accel_pid.gains(), (0.2, 0.05, 0.0));
        assert!(
            (ctrl.vehicle_mass_adj_kg() - (2000.0 - 28.58 + 150.0)).abs() < 1e-9
        );
        assert_eq!(ctrl.config(), &config);

        // Output ranges are not touched
        assert_eq!(ctrl.accel_pid.range(), THROTTLE_PEDAL_RANGE);
    }

    #[test]
    fn test_integrators_kept() {
        let mut ctrl = TwistCtrl::new(Params::default()).unwrap();

        ctrl.speed_pid.step(0.1, 0.02);
        ctrl.accel_pid.step(0.1, 0.02);
        let speed_integral = ctrl.speed_pid.integral();
        let accel_integral = ctrl.accel_pid.integral();
        assert!(speed_integral > 0.0);

        ctrl.reconfigure(VehicleConfig { accel_ki: 0.3, ..VehicleConfig::default() });

        assert_eq!(ctrl.speed_pid.integral(), speed_integral);
        assert_eq!(ctrl.accel_pid.integral(), accel_integral);
    }

    #[test]
    fn test_invalid_values_kept() {
        let mut ctrl = TwistCtrl::new(Params::default()).unwrap();
        let default = VehicleConfig::default();

        ctrl.reconfigure(VehicleConfig {
            wheel_radius_m: 0.0,
            vehicle_mass_kg: -10.0,
            speed_kp: 3.0,
            ..default
        });

        assert_eq!(ctrl.config().wheel_radius_m, default.wheel_radius_m);
        assert_eq!(ctrl.config().vehicle_mass_kg, default.vehicle_mass_kg);
        assert_eq!(ctrl.config().speed_kp, 3.0);
    }
}
