//! # Telecommand processor module
//!
//! The telecommand processor routes TCs from any source into the twist node.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, warn};

// Internal
use comms_if::tc::Tc;
use crate::twist_ctrl::{TwistNode, VehicleConfig};

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Execute a telecommand received at `now_s`.
pub fn exec(node: &mut TwistNode, tc: &Tc, now_s: f64) {

    match tc {
        Tc::Twist(t) => node.on_twist(*t, now_s),
        Tc::TwistStamped(t) => node.on_twist_stamped(*t, now_s),
        Tc::TwistLimits(c) => node.on_twist_with_limits(*c, now_s),
        Tc::SpeedReport(r) => node.on_speed_report(r.speed_ms),
        Tc::YawRate(r) => node.on_yaw_rate(r.yaw_rate_rads),
        Tc::FuelLevel(r) => node.on_fuel_level(r.fuel_level_pct),
        Tc::Enable => {
            debug!("Recieved Enable command");
            node.on_enable(true);
        },
        Tc::Disable => {
            debug!("Recieved Disable command");
            node.on_enable(false);
        },
        Tc::Reconfig(v) => {
            match serde_json::from_value::<VehicleConfig>(v.clone()) {
                Ok(c) => {
                    info!("Applying new vehicle configuration");
                    node.reconfigure(c);
                },
                Err(e) => warn!("Invalid vehicle configuration, ignored: {}", e)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::dbw::Twist;
    use crate::twist_ctrl::{CtrlState, Params};

    fn node() -> TwistNode {
        TwistNode::new(Params::default()).unwrap()
    }

    #[test]
    fn test_enable_and_twist() {
        let mut node = node();

        exec(&mut node, &Tc::Twist(Twist { linear_ms: 3.0, angular_rads: 0.0 }), 0.0);
        exec(&mut node, &Tc::Enable, 0.0);
        assert!(node.tick(0.0).is_some());

        exec(&mut node, &Tc::Disable, 0.02);
        assert!(node.tick(0.02).is_none());
        assert_eq!(node.report().state, CtrlState::Disabled);
    }

    #[test]
    fn test_reconfig() {
        let mut node = node();

        let tc = Tc::from_json(
            r#"{"type": "RECONFIG", "payload": {"speed_kp": 1.25, "pub_steering": false}}"#
        ).unwrap();
        exec(&mut node, &tc, 0.0);

        assert_eq!(node.ctrl().config().speed_kp, 1.25);
        assert!(!node.ctrl().config().pub_steering);

        // Missing fields take the defaults
        assert_eq!(
            node.ctrl().config().accel_kp,
            VehicleConfig::default().accel_kp
        );
    }

    #[test]
    fn test_invalid_reconfig_ignored() {
        let mut node = node();

        let tc = Tc::from_json(
            r#"{"type": "RECONFIG", "payload": {"speed_kp": "fast"}}"#
        ).unwrap();
        exec(&mut node, &tc, 0.0);

        assert_eq!(node.ctrl().config(), &VehicleConfig::default());
    }
}
