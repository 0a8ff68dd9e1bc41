#[macro_use]
extern crate log;

use std::path::PathBuf;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use structopt::StructOpt;

use switchback::input::demo::demo_level;
use switchback::output::history::{summary, Recorder};
use switchback::{AppResult, Session, SessionConfig};

/// Switchback -- junction puzzle simulation
#[derive(StructOpt, Debug)]
#[structopt(name = "switchback")]
struct Opt {
    /// Verbose mode (-v, -vv, -vvv)
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    verbose: u8,

    /// Randomize the initial switch positions from this seed
    #[structopt(short = "s", long = "seed")]
    seed: Option<u64>,

    /// Frame time step in seconds
    #[structopt(short = "d", long = "dt", default_value = "0.033333333")]
    dt: f64,

    /// Depart immediately instead of waiting out the planning time
    #[structopt(long = "skip-planning")]
    skip_planning: bool,

    /// Toggle the switch at this node before departure (repeatable)
    #[structopt(short = "t", long = "toggle", number_of_values = 1)]
    toggle: Vec<String>,

    /// Write the event summary to this file
    #[structopt(long = "trace-file", parse(from_os_str))]
    trace_file: Option<PathBuf>,

    /// Stop after this many frames
    #[structopt(long = "max-frames", default_value = "100000")]
    max_frames: usize,
}

fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn run(opt: &Opt) -> AppResult<()> {
    if !(opt.dt > 0.0) {
        return Err(failure::err_msg(format!("time step must be positive, got {}", opt.dt)));
    }

    let config = SessionConfig {
        planning_time: if opt.skip_planning { Some(0.0) } else { None },
        randomize_switches: opt.seed.is_some(),
        ..Default::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(opt.seed.unwrap_or(0));
    let mut session = Session::start(demo_level(), config, &mut rng);
    for d in session.diagnostics() {
        println!("Warning: {}", d);
    }

    let recorder = Recorder::new();
    session.subscribe(recorder.listener());

    for node in &opt.toggle {
        if !session.toggle_switch(node) {
            warn!("No switch at node {}", node);
        }
    }
    for s in session.simulation().switches().iter() {
        info!("Switch {} set to {:?}", s.node, s.current_target());
    }

    let mut frame = 0;
    while !session.is_over() && frame < opt.max_frames {
        recorder.set_time(frame as f64 * opt.dt);
        session.update(opt.dt);
        frame += 1;
    }

    println!("# Level {}: {:?} after {:.2}s", session.level().id, session.phase(), frame as f64 * opt.dt);
    println!("# {} of {} trains home, {} stars",
             session.trains_completed(), session.simulation().trains().len(), session.stars());

    let text = summary(session.simulation(), &recorder.history())?;
    print!("{}", text);

    if let Some(ref path) = opt.trace_file {
        use std::fs::File;
        use std::io::{BufWriter, Write};
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        write!(writer, "{}", text)?;
    }

    Ok(())
}

pub fn main() {
    let opt = Opt::from_args();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_filter(opt.verbose))).init();
    debug!("{:?}", opt);
    match run(&opt) {
        Ok(()) => {}
        Err(e) => {
            println!("Error:\n{}", e.as_fail());
            std::process::exit(1);
        }
    }
}
