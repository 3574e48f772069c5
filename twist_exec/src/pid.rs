//! # PID controller
//!
//! A discrete proportional-integral-derivative controller with a saturated
//! output. While the output is saturated the integrator is frozen, so that the
//! integral does not wind up while the actuator cannot follow the demand.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use util::maths::order;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A PID controller
#[derive(Debug, Serialize, Clone)]
pub struct PidCtrl {
    /// Proportional gain
    k_p: f64,

    /// Integral gain
    k_i: f64,

    /// Derivative gain
    k_d: f64,

    /// Lower output limit
    min: f64,

    /// Upper output limit
    max: f64,

    /// The integral accumulation
    integral: f64,

    /// The integral before the last step
    prev_integral: f64,

    /// Error passed into the last step
    prev_error: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for PidCtrl {
    /// A controller with zero gains and an unlimited output.
    fn default() -> Self {
        Self {
            k_p: 0.0,
            k_i: 0.0,
            k_d: 0.0,
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
            integral: 0.0,
            prev_integral: 0.0,
            prev_error: 0.0,
        }
    }
}

impl PidCtrl {

    /// Create a new controller with the given gains and output range.
    ///
    /// The range is reordered if `min > max`.
    pub fn new(k_p: f64, k_i: f64, k_d: f64, min: f64, max: f64) -> Self {
        let mut pid = Self::default();
        pid.set_params(k_p, k_i, k_d, min, max);
        pid
    }

    pub fn set_gains(&mut self, k_p: f64, k_i: f64, k_d: f64) {
        self.k_p = k_p;
        self.k_i = k_i;
        self.k_d = k_d;
    }

    /// Set the output range, swapping the bounds if they are given the wrong
    /// way round.
    pub fn set_range(&mut self, min: f64, max: f64) {
        let (min, max) = order(min, max);
        self.min = min;
        self.max = max;
    }

    pub fn set_params(&mut self, k_p: f64, k_i: f64, k_d: f64, min: f64, max: f64) {
        self.set_gains(k_p, k_i, k_d);
        self.set_range(min, max);
    }

    /// Zero the integrator.
    pub fn reset_integrator(&mut self) {
        self.integral = 0.0;
        self.prev_integral = 0.0;
    }

    /// Undo the accumulation made by the last step.
    pub fn revert_integrator(&mut self) {
        self.integral = self.prev_integral;
    }

    /// Get the output of the controller for the given error.
    ///
    /// The integral term uses the integral accumulated up to the previous
    /// step. The accumulation for this step is only kept if the output is not
    /// saturated.
    ///
    /// `sample_period_s` must be positive.
    pub fn step(&mut self, error: f64, sample_period_s: f64) -> f64 {
        self.prev_integral = self.integral;

        let integral = self.integral + error * sample_period_s;
        let deriv = (error - self.prev_error) / sample_period_s;

        let mut out =
            self.k_p * error
            + self.k_i * self.integral
            + self.k_d * deriv;

        if out > self.max {
            out = self.max;
        }
        else if out < self.min {
            out = self.min;
        }
        else {
            self.integral = integral;
        }

        self.prev_error = error;

        out
    }

    /// The current integral accumulation.
    pub fn integral(&self) -> f64 {
        self.integral
    }

    /// The output range as `(min, max)`.
    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// The gains as `(k_p, k_i, k_d)`.
    pub fn gains(&self) -> (f64, f64, f64) {
        (self.k_p, self.k_i, self.k_d)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_is_unlimited() {
        let pid = PidCtrl::default();
        assert_eq!(pid.gains(), (0.0, 0.0, 0.0));
        assert_eq!(pid.range(), (f64::NEG_INFINITY, f64::INFINITY));
        assert_eq!(pid.integral(), 0.0);
    }

    #[test]
    fn test_range_is_ordered() {
        let mut pid = PidCtrl::new(1.0, 0.0, 0.0, 2.0, -1.0);
        assert_eq!(pid.range(), (-1.0, 2.0));

        pid.set_range(5.0, 3.0);
        assert_eq!(pid.range(), (3.0, 5.0));
    }

    #[test]
    fn test_saturated_step_freezes_integral() {
        let mut pid = PidCtrl::new(1.0, 1.0, 0.0, 0.0, 1.0);

        let out = pid.step(10.0, 1.0);

        assert_eq!(out, 1.0);
        assert_eq!(pid.integral(), 0.0);

        // Also when saturating at the bottom
        let out = pid.step(-10.0, 1.0);
        assert_eq!(out, 0.0);
        assert_eq!(pid.integral(), 0.0);
    }

    #[test]
    fn test_integral_uses_previous_accumulation() {
        let mut pid = PidCtrl::new(0.0, 1.0, 0.0, -10.0, 10.0);

        // First step sees no integral, but accumulates it
        assert_eq!(pid.step(1.0, 0.5), 0.0);
        assert_eq!(pid.integral(), 0.5);

        // Second step uses the integral from the first
        assert_eq!(pid.step(1.0, 0.5), 0.5);
        assert_eq!(pid.integral(), 1.0);
    }

    #[test]
    fn test_derivative() {
        let mut pid = PidCtrl::new(0.0, 0.0, 1.0, -100.0, 100.0);

        assert!((pid.step(1.0, 0.1) - 10.0).abs() < 1e-9);
        assert!((pid.step(1.5, 0.1) - 5.0).abs() < 1e-9);
        assert!((pid.step(1.5, 0.1)).abs() < 1e-9);
    }

    #[test]
    fn test_reset_removes_integral_contribution() {
        let mut pid = PidCtrl::new(2.0, 3.0, 0.0, -100.0, 100.0);

        pid.step(1.0, 1.0);
        pid.step(1.0, 1.0);
        assert!(pid.integral() > 0.0);

        pid.reset_integrator();
        assert_eq!(pid.integral(), 0.0);

        // Only the proportional term remains
        assert_eq!(pid.step(1.0, 1.0), 2.0);
    }

    #[test]
    fn test_reset_then_zero_error() {
        let mut pid = PidCtrl::new(1.0, 5.0, 0.0, -100.0, 100.0);
        pid.step(3.0, 1.0);
        pid.step(3.0, 1.0);

        pid.reset_integrator();

        assert_eq!(pid.step(0.0, 1.0), 0.0);
    }

    #[test]
    fn test_revert_restores_pre_step_integral() {
        let mut pid = PidCtrl::new(0.3, 0.7, 0.1, -50.0, 50.0);

        pid.step(2.0, 0.02);
        pid.step(-1.0, 0.02);
        let before = pid.integral();

        pid.step(4.0, 0.02);
        assert_ne!(pid.integral(), before);

        pid.revert_integrator();
        assert_eq!(pid.integral(), before);
    }
}
