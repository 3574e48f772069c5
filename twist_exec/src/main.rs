//! Main twist controller executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise the session, logging and the twist node
//!     - Main loop, at the control rate:
//!         - Telecommand processing, which feeds commands and vehicle reports
//!           into the node
//!         - Twist control processing
//!         - Archiving
//!
//! Telecommands are read from a script, see `util::script_interpreter`.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{Report, eyre::WrapErr};
use log::{debug, info, trace, warn};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use structopt::StructOpt;

// Internal
use twist_lib::{
    data_store::DataStore,
    tc_processor,
    twist_ctrl::{TwistNode, VehicleConfig}
};
use util::{
    raise_error,
    host,
    logger::{logger_init, LevelFilter},
    session::Session,
    script_interpreter::{ScriptInterpreter, PendingTcs},
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Limit of the number of consecutive cycle overruns before execution is
/// stopped.
const MAX_CONSEC_CYCLE_OVERRUNS: u64 = 500;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Drive-by-wire twist controller
#[derive(Debug, StructOpt)]
#[structopt(name = "twist_exec")]
struct Opt {
    /// Path to the telecommand script to execute
    #[structopt(parse(from_os_str))]
    script: PathBuf,

    /// Minimum level of log messages (info, debug or trace)
    #[structopt(short, long, default_value = "info")]
    log_level: LevelFilter,

    /// Repeat the last twist command every cycle until another is received
    #[structopt(long)]
    latch_twist: bool,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {

    color_eyre::install()?;

    let opt = Opt::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new(
        "twist_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(opt.log_level, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Drive-by-Wire Twist Controller Executable\n");
    info!(
        "Software root: {:?}",
        host::get_sw_root().wrap_err("Software root is not set")?
    );
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI options: {:?}", opt);

    // ---- INITIALISE TC SOURCE ----

    info!("Loading script from {:?}", opt.script);

    let mut si = ScriptInterpreter::new(&opt.script)
        .wrap_err("Failed to load script")?;

    info!(
        "Loaded script lasts {:.02} s and contains {} TCs\n",
        si.get_duration(),
        si.get_num_tcs()
    );

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();

    let mut node = TwistNode::init("twist_ctrl.toml", &session)
        .wrap_err("Failed to initialise TwistCtrl")?;

    let vehicle: VehicleConfig = util::params::load("vehicle.toml")
        .wrap_err("Could not load the vehicle configuration")?;
    node.reconfigure(vehicle);

    info!("TwistCtrl init complete");

    let cycle_period_s = node.ctrl().params().control_period_s();
    let cycle_frequency_hz = node.ctrl().params().control_rate_hz;
    let cycle_period = Duration::from_secs_f64(cycle_period_s);

    // ---- MAIN LOOP ----

    info!("Begining main loop at {} Hz\n", cycle_frequency_hz);

    loop {

        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Clear items that need wiping at the start of the cycle
        ds.cycle_start(
            cycle_frequency_hz,
            util::session::get_elapsed_seconds()
        );

        // ---- TELECOMMAND PROCESSING ----

        if let Some(ref tc) = ds.latched_twist {
            tc_processor::exec(&mut node, tc, ds.time_s);
        }

        match si.get_pending_tcs(ds.time_s) {
            PendingTcs::None => (),
            PendingTcs::Some(tc_vec) => {
                for tc in tc_vec.iter() {
                    trace!("Executing TC: {:?}", tc);
                    tc_processor::exec(&mut node, tc, ds.time_s);

                    if opt.latch_twist {
                        ds.latch(tc);
                    }
                }
            }
            // Exit if end of script reached
            PendingTcs::EndOfScript => {
                info!("End of TC script reached, stopping");
                break
            }
        }

        // ---- CONTROL ALGORITHM PROCESSING ----

        ds.twist_ctrl_output = node.tick(ds.time_s);
        ds.twist_ctrl_status_rpt = node.report();

        // ---- WRITE ARCHIVES ----

        if let Err(e) = node.archive() {
            warn!("Could not archive TwistCtrl: {}", e);
        }

        ds.cycle_end();

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match cycle_period.checked_sub(cycle_dur) {
            Some(d) => {
                ds.num_consec_cycle_overruns = 0;
                thread::sleep(d);
            },
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - cycle_period_s
                );
                ds.num_consec_cycle_overruns += 1;

                if ds.num_consec_cycle_overruns > MAX_CONSEC_CYCLE_OVERRUNS {
                    raise_error!(
                        "More than {} consecutive cycle overruns!",
                        MAX_CONSEC_CYCLE_OVERRUNS
                    );
                }
            }
        }
    }

    // ---- SHUTDOWN ----

    info!("End of execution, {} cycles", ds.num_cycles);

    Ok(())
}
