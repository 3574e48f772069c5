//! Input store for TwistCtrl
//!
//! Commands, vehicle reports and the enable signal arrive independently of
//! the control cycle. Each is written into the store as soon as it arrives,
//! overwriting the previous value, and the control cycle takes a single
//! snapshot of everything at its start.
//!
//! The store can be shared between threads (for example behind an `Arc`), each
//! group of fields being guarded separately.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex, MutexGuard, PoisonError
};

// Internal
use super::{ActualState, CommandState, Params};
use crate::lpf::LowPassFilter;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Shared, last-value-wins storage for everything TwistCtrl reads.
#[derive(Debug)]
pub struct InputStore {
    cmd: Mutex<CommandState>,
    feedback: Mutex<Feedback>,
    enabled: AtomicBool,
}

/// Vehicle feedback, including the filters which run as reports arrive.
#[derive(Debug, Clone)]
struct Feedback {
    actual: ActualState,

    /// Previous speed report, `None` until the first report.
    prev_speed_ms: Option<f64>,

    /// Units: seconds
    speed_report_period_s: f64,

    accel_lpf: LowPassFilter,
    fuel_lpf: LowPassFilter,
}

/// Snapshot of the input store taken at the start of a cycle.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputData {
    /// Time of the cycle.
    ///
    /// Units: seconds
    pub now_s: f64,

    pub cmd: CommandState,

    pub actual: ActualState,

    pub enabled: bool,

    /// Filtered fuel level, 0 if no report has been received.
    ///
    /// Units: percent
    pub fuel_level_pct: f64,

    /// Filtered measured acceleration.
    ///
    /// Units: meters/second^2
    pub filtered_accel_mss: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl InputStore {

    /// Create a new store. The system starts disabled with no command.
    pub fn new(params: &Params, accel_tau_s: f64) -> Self {
        Self {
            cmd: Mutex::new(CommandState::default()),
            feedback: Mutex::new(Feedback {
                actual: ActualState::default(),
                prev_speed_ms: None,
                speed_report_period_s: params.speed_report_period_s,
                accel_lpf: LowPassFilter::new(
                    accel_tau_s, params.speed_report_period_s
                ),
                fuel_lpf: LowPassFilter::new(
                    params.fuel_filter_tau_s, params.fuel_report_period_s
                ),
            }),
            enabled: AtomicBool::new(false),
        }
    }

    /// Replace the current command.
    pub fn set_command(&self, cmd: CommandState) {
        *lock(&self.cmd) = cmd;
    }

    /// Record a new speed measurement.
    ///
    /// The acceleration is estimated by differentiating successive reports
    /// over the report period and filtering the result.
    pub fn set_speed(&self, speed_ms: f64) {
        let mut fb = lock(&self.feedback);

        if let Some(prev_speed_ms) = fb.prev_speed_ms {
            let raw_accel_mss = (speed_ms - prev_speed_ms) / fb.speed_report_period_s;
            let accel_mss = fb.accel_lpf.filter(raw_accel_mss);
            trace!("Filtered acceleration: {:.4} m/s^2", accel_mss);
        }

        fb.prev_speed_ms = Some(speed_ms);
        fb.actual.linear_ms = speed_ms;
    }

    /// Record a new yaw rate measurement.
    pub fn set_yaw_rate(&self, yaw_rate_rads: f64) {
        lock(&self.feedback).actual.angular_rads = yaw_rate_rads;
    }

    /// Record a new fuel level measurement.
    pub fn set_fuel_level(&self, fuel_level_pct: f64) {
        lock(&self.feedback).fuel_lpf.filter(fuel_level_pct);
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    /// Change the time constant of the measured acceleration filter, keeping
    /// its current value.
    pub fn set_accel_tau(&self, accel_tau_s: f64) {
        let mut fb = lock(&self.feedback);
        let period_s = fb.speed_report_period_s;
        fb.accel_lpf.set_params(accel_tau_s, period_s);
    }

    /// Take a consistent copy of all inputs for the cycle at `now_s`.
    pub fn snapshot(&self, now_s: f64) -> InputData {
        let cmd = *lock(&self.cmd);
        let (actual, fuel_level_pct, filtered_accel_mss) = {
            let fb = lock(&self.feedback);
            (fb.actual, fb.fuel_lpf.get(), fb.accel_lpf.get())
        };

        InputData {
            now_s,
            cmd,
            actual,
            enabled: self.enabled.load(Ordering::SeqCst),
            fuel_level_pct,
            filtered_accel_mss,
        }
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Lock a mutex, recovering the data if another writer panicked. All guarded
/// values are plain data which is overwritten by the next update anyway.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::dbw::Twist;
    use std::sync::Arc;
    use std::thread;

    fn store() -> InputStore {
        InputStore::new(&Params::default(), 0.5)
    }

    #[test]
    fn test_defaults() {
        let inputs = store().snapshot(1.0);

        assert_eq!(inputs.now_s, 1.0);
        assert!(!inputs.enabled);
        assert_eq!(inputs.cmd.stamp_s, None);
        assert_eq!(inputs.fuel_level_pct, 0.0);
        assert_eq!(inputs.filtered_accel_mss, 0.0);
    }

    #[test]
    fn test_first_speed_report_seeds_acceleration() {
        let store = store();

        store.set_speed(5.0);
        let inputs = store.snapshot(0.0);
        assert_eq!(inputs.actual.linear_ms, 5.0);
        assert_eq!(inputs.filtered_accel_mss, 0.0);

        // 0.02 m/s over one 0.02 s report period, which is taken directly as
        // the first acceleration sample
        store.set_speed(5.02);
        let inputs = store.snapshot(0.0);
        assert!((inputs.filtered_accel_mss - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_fields_update_independently() {
        let store = store();

        store.set_yaw_rate(0.3);
        store.set_speed(2.0);
        store.set_fuel_level(40.0);
        store.set_fuel_level(60.0);

        let inputs = store.snapshot(0.0);
        assert_eq!(inputs.actual.angular_rads, 0.3);
        assert_eq!(inputs.actual.linear_ms, 2.0);
        assert!(inputs.fuel_level_pct > 40.0 && inputs.fuel_level_pct < 60.0);
    }

    #[test]
    fn test_command_overwrite() {
        let store = store();

        store.set_command(CommandState::from_twist(
            Twist { linear_ms: 1.0, angular_rads: 0.0 }, 1.0
        ));
        store.set_command(CommandState::from_twist(
            Twist { linear_ms: 2.0, angular_rads: 0.1 }, 2.0
        ));

        let inputs = store.snapshot(2.0);
        assert_eq!(inputs.cmd.twist.linear_ms, 2.0);
        assert_eq!(inputs.cmd.stamp_s, Some(2.0));
    }

    #[test]
    fn test_shared_between_threads() {
        let store = Arc::new(store());

        let writer = {
            let store = store.clone();
            thread::spawn(move || {
                for i in 0..100 {
                    store.set_speed(i as f64);
                }
                store.set_enabled(true);
            })
        };

        writer.join().unwrap();

        let inputs = store.snapshot(0.0);
        assert!(inputs.enabled);
        assert_eq!(inputs.actual.linear_ms, 99.0);
    }
}
