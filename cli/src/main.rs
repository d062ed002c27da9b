//! Simstack CLI — a text console for the command stack.
//!
//! # Usage
//!
//! ```text
//! simstack                                  # interactive, commands from stdin
//! simstack --scenario demo --until 600      # replay demo.scn for ten minutes
//! simstack --settings stack.yaml --dt 0.5
//! ```

mod console;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use simstack_core::settings::{self, StackSettings};
use simstack_core::world::SimControl;
use simstack_core::Interpreter;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use console::ConsoleWorld;

#[derive(Parser, Debug)]
#[command(name = "simstack")]
#[command(about = "Drive a simulation from typed commands and scenario files")]
struct Cli {
    /// YAML settings file (falls back to $SIMSTACK_SETTINGS)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Scenario to open at start, by name or path
    #[arg(long)]
    scenario: Option<String>,

    /// Simulated seconds per step
    #[arg(long, default_value = "1.0")]
    dt: f64,

    /// Replay without reading stdin and exit at this simulated time
    #[arg(long)]
    until: Option<f64>,

    /// Print the scenario load report as JSON
    #[arg(long)]
    report_json: bool,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "simstack=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("{}", e);
        eprintln!("simstack: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let settings = match resolve_settings_path(cli.settings) {
        Some(path) => {
            info!("Loading settings from: {}", path.display());
            settings::load(&path).map_err(|e| e.to_string())?
        }
        None => StackSettings::default(),
    };
    let mut interp = Interpreter::new(settings).map_err(|e| e.to_string())?;

    if let Some(name) = &cli.scenario {
        let report = interp
            .load_scenario(name, 0.0, false)
            .map_err(|e| e.to_string())?;
        if cli.report_json {
            let json = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
            println!("{}", json);
        }
        info!(loaded = report.loaded, skipped = report.diagnostics.len(), "scenario opened");
    }

    let mut world = ConsoleWorld::new(io::stdout(), cli.dt)?;
    if cli.scenario.is_some() {
        world.start();
    }

    match cli.until {
        Some(until) => run_batch(&mut interp, &mut world, until),
        None => run_interactive(&mut interp, &mut world, io::stdin().lock()),
    }
}

/// Replay until `until`, or until the simulation stops or holds.
fn run_batch<W: Write>(
    interp: &mut Interpreter,
    world: &mut ConsoleWorld<W>,
    until: f64,
) -> Result<(), String> {
    world.start();
    loop {
        let now = world.sim_time();
        interp.tick(world, now);
        if !world.is_running() || now >= until {
            break;
        }
        world.step();
    }
    info!(sim_time = world.sim_time(), "replay finished");
    Ok(())
}

/// One step per input line; `STOP` ends the session.
fn run_interactive<W: Write, R: BufRead>(
    interp: &mut Interpreter,
    world: &mut ConsoleWorld<W>,
    input: R,
) -> Result<(), String> {
    let now = world.sim_time();
    interp.tick(world, now);
    for line in input.lines() {
        let line = line.map_err(|e| e.to_string())?;
        interp.stack(&line);
        let now = world.sim_time();
        interp.tick(world, now);
        fast_forward(interp, world);
        if world.is_stopped() {
            break;
        }
        world.step();
    }
    Ok(())
}

/// Run steps back to back while a fast-forward is active.
fn fast_forward<W: Write>(interp: &mut Interpreter, world: &mut ConsoleWorld<W>) {
    while let Some(end) = world.fast_forward_target() {
        let dry = end.is_infinite() && interp.scheduler().timeline().is_empty();
        if world.sim_time() >= end || dry || !world.is_running() {
            world.end_fast_forward();
            break;
        }
        world.step();
        let now = world.sim_time();
        interp.tick(world, now);
    }
}

fn resolve_settings_path(flag: Option<PathBuf>) -> Option<PathBuf> {
    flag.or_else(|| std::env::var_os("SIMSTACK_SETTINGS").map(PathBuf::from))
}
