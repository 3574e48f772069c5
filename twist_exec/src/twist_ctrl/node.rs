//! # Twist control node
//!
//! Ties the input store to the controller. Message handlers may be called
//! from any thread holding a reference to the store, while `tick` runs the
//! control cycle.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::sync::Arc;

// Internal
use super::*;
use comms_if::dbw::{Twist, TwistCmd};
use util::{
    archive::{Archived, ArchiveError},
    module::State,
    session::Session
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

pub struct TwistNode {
    ctrl: TwistCtrl,
    inputs: Arc<InputStore>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TwistNode {

    /// Create a node from the given parameters, with the default vehicle
    /// configuration and no archive.
    pub fn new(params: Params) -> Result<Self, TwistCtrlError> {
        let ctrl = TwistCtrl::new(params)?;
        Ok(Self::from_ctrl(ctrl))
    }

    /// Create a node loading the parameters from `params_path` (relative to
    /// the software root's `params` directory) and archiving into the
    /// session.
    pub fn init(params_path: &'static str, session: &Session)
        -> Result<Self, TwistCtrlError>
    {
        let mut ctrl = TwistCtrl::default();
        ctrl.init(params_path, session)?;
        Ok(Self::from_ctrl(ctrl))
    }

    fn from_ctrl(ctrl: TwistCtrl) -> Self {
        let inputs = Arc::new(InputStore::new(
            ctrl.params(), ctrl.config().accel_tau_s
        ));

        Self { ctrl, inputs }
    }

    /// Shared handle to the input store, for handlers running on other
    /// threads.
    pub fn inputs(&self) -> Arc<InputStore> {
        self.inputs.clone()
    }

    // ---- MESSAGE HANDLERS ----

    /// A plain twist, clearing any acceleration limits.
    pub fn on_twist(&self, twist: Twist, now_s: f64) {
        self.inputs.set_command(CommandState::from_twist(twist, now_s));
    }

    /// A timestamped twist. The receive time is used for staleness, not the
    /// message stamp. Limits are cleared.
    pub fn on_twist_stamped(&self, twist: Twist, now_s: f64) {
        self.on_twist(twist, now_s);
    }

    /// A twist carrying its own acceleration limits.
    pub fn on_twist_with_limits(&self, cmd: TwistCmd, now_s: f64) {
        self.inputs.set_command(CommandState::from_twist_cmd(cmd, now_s));
    }

    pub fn on_speed_report(&self, speed_ms: f64) {
        self.inputs.set_speed(speed_ms);
    }

    pub fn on_yaw_rate(&self, yaw_rate_rads: f64) {
        self.inputs.set_yaw_rate(yaw_rate_rads);
    }

    pub fn on_fuel_level(&self, fuel_level_pct: f64) {
        self.inputs.set_fuel_level(fuel_level_pct);
    }

    pub fn on_enable(&self, enabled: bool) {
        self.inputs.set_enabled(enabled);
    }

    /// Apply a new vehicle configuration to the controller and the
    /// acceleration filter.
    pub fn reconfigure(&mut self, config: VehicleConfig) {
        self.ctrl.reconfigure(config);
        self.inputs.set_accel_tau(self.ctrl.config().accel_tau_s);
    }

    // ---- CYCLE ----

    /// Run one control cycle at `now_s`, returning the demands if the
    /// controller is active.
    pub fn tick(&mut self, now_s: f64) -> Option<DbwCmds> {
        let input = self.inputs.snapshot(now_s);

        match self.ctrl.proc(&input) {
            Ok((output, _)) => output,
            Err(e) => match e {}
        }
    }

    /// Status of the last cycle.
    pub fn report(&self) -> StatusReport {
        self.ctrl.report()
    }

    pub fn ctrl(&self) -> &TwistCtrl {
        &self.ctrl
    }

    /// Write the last cycle to the archive.
    pub fn archive(&mut self) -> Result<(), ArchiveError> {
        self.ctrl.write()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::thread;

    const DT: f64 = 0.02;

    fn node() -> TwistNode {
        TwistNode::new(Params::default()).unwrap()
    }

    fn twist(linear_ms: f64, angular_rads: f64) -> Twist {
        Twist { linear_ms, angular_rads }
    }

    #[test]
    fn test_no_output_before_command() {
        let mut node = node();
        node.on_enable(true);

        for i in 0..5 {
            assert!(node.tick(i as f64 * DT).is_none());
            assert_eq!(node.report().state, CtrlState::Stale);
        }
    }

    #[test]
    fn test_disabled_until_enabled() {
        let mut node = node();
        node.on_twist(twist(5.0, 0.0), 0.0);

        assert!(node.tick(0.0).is_none());
        assert_eq!(node.report().state, CtrlState::Disabled);

        node.on_enable(true);
        assert!(node.tick(DT).is_some());
        assert_eq!(node.report().state, CtrlState::Active);

        node.on_enable(false);
        assert!(node.tick(2.0 * DT).is_none());
        assert_eq!(node.report().state, CtrlState::Disabled);
    }

    #[test]
    fn test_command_goes_stale() {
        let mut node = node();
        node.on_enable(true);
        node.on_twist(twist(5.0, 0.0), 0.0);

        let mut t = 0.0;
        while t < 0.2 - 1e-9 {
            assert!(node.tick(t).is_some());
            t += DT;
        }

        assert!(node.tick(0.25).is_none());
        assert_eq!(node.report().state, CtrlState::Stale);

        // A fresh command recovers
        node.on_twist(twist(5.0, 0.0), 0.26);
        assert!(node.tick(0.26).is_some());
    }

    #[test]
    fn test_limits_replaced_by_plain_twist() {
        let mut node = node();
        node.on_enable(true);

        node.on_twist_with_limits(TwistCmd {
            twist: twist(10.0, 0.0),
            accel_limit_mss: 0.5,
            decel_limit_mss: 0.5,
        }, 0.0);
        assert_eq!(node.tick(0.0).unwrap().req_accel_mss, 0.5);

        node.on_twist_stamped(twist(10.0, 0.0), DT);
        assert_eq!(node.tick(DT).unwrap().req_accel_mss, 3.0);
    }

    #[test]
    fn test_closed_loop_speed_up() {
        let mut node = node();
        node.on_enable(true);
        node.on_fuel_level(50.0);

        // Crude vehicle: acceleration proportional to the throttle pedal
        let mut speed_ms = 0.0;
        node.on_speed_report(speed_ms);

        for i in 0..1000 {
            let t = i as f64 * DT;
            node.on_twist(twist(5.0, 0.0), t);

            let cmds = node.tick(t).unwrap();
            let throttle = cmds.throttle.unwrap().pedal_cmd;
            let brake = cmds.brake.unwrap().pedal_cmd;

            assert!(throttle >= 0.0 && throttle <= 1.0);
            assert!(brake >= 0.0);

            speed_ms += (4.0 * throttle - brake / 500.0) * DT;
            node.on_speed_report(speed_ms);
        }

        assert!((speed_ms - 5.0).abs() < 0.5, "speed was {}", speed_ms);
    }

    #[test]
    fn test_reconfigure_changes_accel_filter() {
        let mut node = node();
        node.on_speed_report(0.0);
        node.on_speed_report(0.02);

        let before = node.inputs().snapshot(0.0).filtered_accel_mss;
        assert!((before - 1.0).abs() < 1e-9);

        node.reconfigure(VehicleConfig { accel_tau_s: 0.0, ..VehicleConfig::default() });

        // Without filtering the next sample passes straight through
        node.on_speed_report(0.1);
        let after = node.inputs().snapshot(0.0).filtered_accel_mss;
        assert!((after - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_handlers_from_other_threads() {
        let mut node = node();
        let inputs = node.inputs();

        let handle = thread::spawn(move || {
            inputs.set_command(CommandState::from_twist(twist(2.0, 0.1), 0.0));
            inputs.set_yaw_rate(0.1);
            inputs.set_enabled(true);
        });
        handle.join().unwrap();

        let cmds = node.tick(0.0).unwrap();
        assert!(cmds.steering.unwrap().steering_wheel_angle_cmd_rad > 0.0);
    }
}
