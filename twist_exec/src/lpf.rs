//! # First order low pass filter

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An exponential smoothing filter parameterised by a time constant and the
/// period of the samples passed into it.
///
/// The first sample after creation or a reset is taken as the filter value
/// directly, otherwise a signal starting far from zero (like a fuel level)
/// would take several time constants to be trusted.
#[derive(Debug, Default, Clone, Serialize)]
pub struct LowPassFilter {
    /// Units: seconds
    tau_s: f64,

    /// Units: seconds
    sample_period_s: f64,

    /// Blend coefficient for new samples
    a: f64,

    value: f64,

    ready: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LowPassFilter {

    pub fn new(tau_s: f64, sample_period_s: f64) -> Self {
        let mut lpf = Self::default();
        lpf.set_params(tau_s, sample_period_s);
        lpf
    }

    /// Set the time constant and sample period of the filter.
    ///
    /// The current value is kept. A time constant which is not positive
    /// disables filtering, each sample passes straight through.
    pub fn set_params(&mut self, tau_s: f64, sample_period_s: f64) {
        self.tau_s = tau_s;
        self.sample_period_s = sample_period_s;

        self.a = if tau_s > 0.0 && sample_period_s > 0.0 {
            sample_period_s / (tau_s + sample_period_s)
        }
        else {
            1.0
        };
    }

    /// Pass a new sample through the filter, returning the filtered value.
    pub fn filter(&mut self, sample: f64) -> f64 {
        if self.ready {
            self.value = (1.0 - self.a) * self.value + self.a * sample;
        }
        else {
            self.value = sample;
            self.ready = true;
        }

        self.value
    }

    /// The current filtered value, zero if no sample has been filtered yet.
    pub fn get(&self) -> f64 {
        self.value
    }

    /// Forget the filter history, the next sample will set the value directly.
    pub fn reset(&mut self) {
        self.value = 0.0;
        self.ready = false;
    }

    /// True once at least one sample has been filtered.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn coefficient(&self) -> f64 {
        self.a
    }
}
