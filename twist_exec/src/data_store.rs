//! # Data Store

use comms_if::tc::Tc;
use log::debug;

use crate::twist_ctrl::{DbwCmds, StatusReport};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// True if this cycle falls on a 1Hz boundary
    pub is_1_hz_cycle: bool,

    /// Elapsed session time at the start of the cycle
    pub time_s: f64,

    // Commands
    /// Twist TC to repeat every cycle, if latching is enabled.
    pub latched_twist: Option<Tc>,

    // TwistCtrl
    pub twist_ctrl_output: Option<DbwCmds>,
    pub twist_ctrl_status_rpt: StatusReport,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {

    /// Perform actions required at the start of a cycle.
    ///
    /// Clears the outputs of the previous cycle, sets the 1Hz cycle flag and
    /// the cycle time.
    pub fn cycle_start(&mut self, cycle_frequency_hz: f64, time_s: f64) {
        let cycles_per_s = (cycle_frequency_hz.round() as u128).max(1);

        self.is_1_hz_cycle = self.num_cycles % cycles_per_s == 0;

        self.twist_ctrl_output = None;
        self.twist_ctrl_status_rpt = StatusReport::default();

        self.time_s = time_s;
    }

    /// Perform actions required at the end of a cycle.
    pub fn cycle_end(&mut self) {
        if self.is_1_hz_cycle {
            debug!(
                "Cycle {}: {:?}, req accel {:?} m/s^2",
                self.num_cycles,
                self.twist_ctrl_status_rpt.state,
                self.twist_ctrl_status_rpt.req_accel_mss
            );
        }

        self.num_cycles += 1;
    }

    /// Latch a twist TC so it is repeated on every following cycle.
    pub fn latch(&mut self, tc: &Tc) {
        match tc {
            Tc::Twist(_) | Tc::TwistStamped(_) | Tc::TwistLimits(_) =>
                self.latched_twist = Some(tc.clone()),
            _ => ()
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::dbw::Twist;

    #[test]
    fn test_1_hz_flag() {
        let mut ds = DataStore::default();
        let mut flags = vec![];

        for _ in 0..101 {
            ds.cycle_start(50.0, 0.0);
            flags.push(ds.is_1_hz_cycle);
            ds.cycle_end();
        }

        assert_eq!(flags.iter().filter(|f| **f).count(), 3);
        assert!(flags[0] && flags[50] && flags[100]);
        assert_eq!(ds.num_cycles, 101);
    }

    #[test]
    fn test_latch_only_twists() {
        let mut ds = DataStore::default();

        ds.latch(&Tc::Enable);
        assert!(ds.latched_twist.is_none());

        let tc = Tc::Twist(Twist { linear_ms: 1.0, angular_rads: 0.0 });
        ds.latch(&tc);
        assert_eq!(ds.latched_twist, Some(tc));
    }
}
