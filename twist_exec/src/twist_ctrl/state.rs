//! Implementations for the TwistCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, trace, warn};
use serde::Serialize;
use std::convert::Infallible;

// Internal
use super::*;
use crate::{pid::PidCtrl, yaw_ctrl::YawCtrl};
use comms_if::dbw::{BrakeCmd, PedalCmdType, SteeringCmd, ThrottleCmd};
use util::{
    archive::{Archived, Archiver, ArchiveError},
    maths::mph_to_mps,
    module::State,
    params,
    session::Session
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Twist control module state
#[derive(Default)]
pub struct TwistCtrl {
    pub(crate) params: Params,

    pub(crate) config: VehicleConfig,

    /// Vehicle mass with an empty tank and passengers on board, derived from
    /// the configuration.
    ///
    /// Units: kilograms
    pub(crate) vehicle_mass_adj_kg: f64,

    /// Outer loop, speed error to demanded acceleration
    pub(crate) speed_pid: PidCtrl,

    /// Inner loop, acceleration error to throttle pedal
    pub(crate) accel_pid: PidCtrl,

    pub(crate) yaw_ctrl: YawCtrl,

    pub(crate) report: StatusReport,

    pub(crate) output: Option<DbwCmds>,

    /// Time of the last processed cycle
    time_s: f64,

    arch: Archiver,
}

/// Status report for TwistCtrl processing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct StatusReport {
    pub state: CtrlState,

    /// Acceleration demanded by the speed loop, `None` on stale cycles.
    ///
    /// Units: meters/second^2
    pub req_accel_mss: Option<f64>,

    /// Units: meters/second^2
    pub filtered_accel_mss: f64,

    /// Estimated vehicle mass, `None` on stale cycles.
    ///
    /// Units: kilograms
    pub vehicle_mass_kg: Option<f64>,

    pub speed_integral: f64,

    pub accel_integral: f64,
}

/// One row of the TwistCtrl archive.
#[derive(Serialize)]
struct ArchRecord {
    time_s: f64,
    state: CtrlState,
    req_accel_mss: Option<f64>,
    filtered_accel_mss: f64,
    vehicle_mass_kg: Option<f64>,
    throttle_pedal: Option<f64>,
    brake_torque_nm: Option<f64>,
    steering_wheel_angle_rad: Option<f64>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// State of the controller on a cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CtrlState {
    /// No recent command, no output.
    Stale,

    /// Drive-by-wire not enabled, no output.
    Disabled,

    /// Actuator demands output.
    Active,
}

impl Default for CtrlState {
    fn default() -> Self {
        CtrlState::Stale
    }
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for TwistCtrl {
    type InitData = &'static str;
    type InitError = TwistCtrlError;

    type InputData = InputData;
    type OutputData = Option<DbwCmds>;
    type StatusReport = StatusReport;
    type ProcError = Infallible;

    /// Initialise the TwistCtrl module.
    ///
    /// Expected init data is the path to the parameter file. The default
    /// vehicle configuration is applied, use `reconfigure` to change it.
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>
    {
        let params = params::load(init_data)
            .map_err(TwistCtrlError::ParamLoadError)?;

        self.setup(params)?;

        self.arch = Archiver::from_path(session, "twist_ctrl/twist_ctrl.csv")
            .map_err(TwistCtrlError::ArchiveError)?;

        Ok(())
    }

    /// Perform cyclic processing of Twist Control.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        let prev_state = self.report.state;

        self.time_s = input_data.now_s;
        self.output = self.calc_output(input_data);

        self.report.filtered_accel_mss = input_data.filtered_accel_mss;
        self.report.speed_integral = self.speed_pid.integral();
        self.report.accel_integral = self.accel_pid.integral();

        if prev_state != self.report.state {
            match self.report.state {
                CtrlState::Stale => warn!("Twist command is stale, demands stopped"),
                CtrlState::Disabled => info!("Drive-by-wire disabled"),
                CtrlState::Active => info!("Drive-by-wire active")
            }
        }

        trace!("TwistCtrl output: {:?}", self.output);

        Ok((self.output, self.report))
    }
}

impl Archived for TwistCtrl {
    fn write(&mut self) -> Result<(), ArchiveError> {
        let record = ArchRecord {
            time_s: self.time_s,
            state: self.report.state,
            req_accel_mss: self.report.req_accel_mss,
            filtered_accel_mss: self.report.filtered_accel_mss,
            vehicle_mass_kg: self.report.vehicle_mass_kg,
            throttle_pedal: self.output
                .and_then(|o| o.throttle)
                .map(|t| t.pedal_cmd),
            brake_torque_nm: self.output
                .and_then(|o| o.brake)
                .map(|b| b.pedal_cmd),
            steering_wheel_angle_rad: self.output
                .and_then(|o| o.steering)
                .map(|s| s.steering_wheel_angle_cmd_rad),
        };

        self.arch.serialise(record)
    }
}

impl TwistCtrl {

    /// Create a new controller from the given parameters with the default
    /// vehicle configuration. No archive is written.
    pub fn new(params: Params) -> Result<Self, TwistCtrlError> {
        let mut ctrl = Self::default();
        ctrl.setup(params)?;
        Ok(ctrl)
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn config(&self) -> &VehicleConfig {
        &self.config
    }

    /// The status report of the last cycle.
    pub fn report(&self) -> StatusReport {
        self.report
    }

    /// Vehicle mass including the given fuel level.
    ///
    /// Units: kilograms
    pub fn vehicle_mass_kg(&self, fuel_level_pct: f64) -> f64 {
        self.vehicle_mass_adj_kg
            + fuel_level_pct / 100.0
            * self.config.fuel_capacity_gal
            * GAS_DENSITY_KG_PER_GAL
    }

    /// Validate the parameters and build the controllers from them.
    fn setup(&mut self, params: Params) -> Result<(), TwistCtrlError> {
        params.validate()?;

        self.accel_pid.set_range(THROTTLE_PEDAL_RANGE.0, THROTTLE_PEDAL_RANGE.1);

        self.yaw_ctrl = YawCtrl::new(params.wheelbase_m, params.steering_ratio);
        self.yaw_ctrl.set_steering_wheel_angle_max(params.steering_wheel_angle_max_rad);

        self.params = params;

        self.reconfigure(VehicleConfig::default());

        Ok(())
    }

    /// Run the control cascade, updating the status report.
    fn calc_output(&mut self, input: &InputData) -> Option<DbwCmds> {
        let period_s = self.params.control_period_s();

        self.report = StatusReport::default();

        if input.cmd.is_stale(input.now_s, STALE_CMD_PERIODS * period_s) {
            self.speed_pid.reset_integrator();
            self.accel_pid.reset_integrator();
            self.report.state = CtrlState::Stale;
            return None;
        }

        let vehicle_mass_kg = self.vehicle_mass_kg(input.fuel_level_pct);
        self.report.vehicle_mass_kg = Some(vehicle_mass_kg);

        // ---- SPEED LOOP ----

        let cmd_vx_ms = input.cmd.twist.linear_ms;
        let vel_error_ms = cmd_vx_ms - input.actual.linear_ms;

        // Don't integrate while stopping or while the pedals aren't driven
        if cmd_vx_ms.abs() < mph_to_mps(STOP_SPEED_MPH) || !self.config.pub_pedals {
            self.speed_pid.reset_integrator();
        }

        let (decel_lim_mss, accel_lim_mss) = self.accel_limits(&input.cmd);
        self.speed_pid.set_range(-decel_lim_mss, accel_lim_mss);

        let mut accel_cmd_mss = self.speed_pid.step(vel_error_ms, period_s);

        // Hold the vehicle at standstill with at least the minimum brake
        // torque
        if cmd_vx_ms <= ZERO_SPEED_MS {
            accel_cmd_mss = accel_cmd_mss.min(
                -self.params.min_brake_torque_nm
                / vehicle_mass_kg
                / self.config.wheel_radius_m
            );
        }

        self.report.req_accel_mss = Some(accel_cmd_mss);

        if !input.enabled {
            self.speed_pid.reset_integrator();
            self.accel_pid.reset_integrator();
            self.report.state = CtrlState::Disabled;
            return None;
        }

        self.report.state = CtrlState::Active;

        // ---- ACCELERATION LOOP ----

        let throttle_pedal = if accel_cmd_mss >= 0.0 {
            self.accel_pid.step(
                accel_cmd_mss - input.filtered_accel_mss,
                period_s
            )
        }
        else {
            self.accel_pid.reset_integrator();
            0.0
        };

        let brake_torque_nm = if accel_cmd_mss < -self.config.brake_deadband_mss {
            -accel_cmd_mss * vehicle_mass_kg * self.config.wheel_radius_m
        }
        else {
            0.0
        };

        // ---- STEERING ----

        let steering_angle_rad = self.yaw_ctrl.get_steering_wheel_angle(
                cmd_vx_ms,
                input.cmd.twist.angular_rads,
                input.actual.linear_ms
            )
            + self.config.steer_kp
            * (input.cmd.twist.angular_rads - input.actual.angular_rads);

        let pub_pedals = self.config.pub_pedals;
        let pub_steering = self.config.pub_steering;

        Some(DbwCmds {
            throttle: if pub_pedals {
                Some(ThrottleCmd {
                    enable: true,
                    pedal_cmd_type: PedalCmdType::Percent,
                    pedal_cmd: throttle_pedal
                })
            } else { None },
            brake: if pub_pedals {
                Some(BrakeCmd {
                    enable: true,
                    pedal_cmd_type: PedalCmdType::Torque,
                    pedal_cmd: brake_torque_nm
                })
            } else { None },
            steering: if pub_steering {
                Some(SteeringCmd {
                    enable: true,
                    steering_wheel_angle_cmd_rad: steering_angle_rad
                })
            } else { None },
            req_accel_mss: accel_cmd_mss,
            filtered_accel_mss: input.filtered_accel_mss
        })
    }

    /// Get the `(deceleration, acceleration)` limits for the speed loop.
    ///
    /// Limits from the command are used if set, but can never exceed the
    /// configured maximums.
    fn accel_limits(&self, cmd: &CommandState) -> (f64, f64) {
        let cmd_lim = |l: f64| if l.abs() > 0.0 { l.abs() } else { DEFAULT_ACCEL_LIMIT_MSS };
        let cfg_lim = |l: f64| if l > 0.0 { l } else { DEFAULT_ACCEL_LIMIT_MSS };

        (
            cmd_lim(cmd.decel_limit_mss).min(cfg_lim(self.config.decel_max_mss)),
            cmd_lim(cmd.accel_limit_mss).min(cfg_lim(self.config.accel_max_mss))
        )
    }
}
