//! ConsoleWorld — the world behind the `simstack` console.
//!
//! A [`Roster`] for the vehicles, a simulation clock that advances by `dt`
//! per step while running, and a text sink for operator output. There is
//! no navigation database and no display, so view requests are only
//! logged.

use std::io::Write;

use simstack_core::command::CommandResult;
use simstack_core::world::roster::Roster;
use simstack_core::world::{
    Feedback, Navigation, PanTarget, Relocation, RouteEnd, Selection, SimControl, Traffic,
    VehicleSpec, VehicleState,
};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimState {
    Init,
    Running,
    Held,
    Stopped,
}

pub struct ConsoleWorld<W: Write> {
    roster: Roster,
    out: W,
    sim_time: f64,
    dt: f64,
    dt_mult: f64,
    state: SimState,
    /// Simulated time at which fast-forward ends; infinite means "until
    /// the scenario runs dry".
    ff_until: Option<f64>,
}

impl<W: Write> ConsoleWorld<W> {
    pub fn new(out: W, dt: f64) -> Result<Self, String> {
        if dt.is_nan() || dt <= 0.0 {
            return Err(format!("time step must be positive, got {}", dt));
        }
        Ok(ConsoleWorld {
            roster: Roster::new(),
            out,
            sim_time: 0.0,
            dt,
            dt_mult: 1.0,
            state: SimState::Init,
            ff_until: None,
        })
    }

    pub fn state(&self) -> SimState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SimState::Running
    }

    pub fn is_stopped(&self) -> bool {
        self.state == SimState::Stopped
    }

    /// Advance the clock by one step if running.
    pub fn step(&mut self) {
        if self.is_running() {
            self.sim_time += self.dt * self.dt_mult;
        }
    }

    pub fn fast_forward_target(&self) -> Option<f64> {
        self.ff_until
    }

    pub fn end_fast_forward(&mut self) {
        self.ff_until = None;
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Traffic for ConsoleWorld<W> {
    fn id_to_index(&self, id: &str) -> Option<usize> {
        self.roster.id_to_index(id)
    }

    fn vehicle_id(&self, index: usize) -> Option<String> {
        self.roster.vehicle_id(index)
    }

    fn create(&mut self, spec: VehicleSpec) -> CommandResult {
        self.roster.create(spec)
    }

    fn delete(&mut self, id: &str) -> bool {
        self.roster.delete(id)
    }

    fn select(&mut self, index: usize, selection: Selection) -> CommandResult {
        self.roster.select(index, selection)
    }

    fn relocate(&mut self, index: usize, to: Relocation) -> CommandResult {
        self.roster.relocate(index, to)
    }

    fn set_route_end(&mut self, index: usize, end: RouteEnd, name: &str) -> CommandResult {
        self.roster.set_route_end(index, end, name)
    }

    fn route_end(&self, index: usize, end: RouteEnd) -> Option<String> {
        self.roster.route_end(index, end)
    }

    fn nominal(&mut self, index: usize) -> CommandResult {
        self.roster.nominal(index)
    }

    fn status_lines(&self, index: usize) -> Vec<String> {
        self.roster.status_lines(index)
    }

    fn position(&self, index: usize) -> Option<(f64, f64)> {
        self.roster.position(index)
    }

    fn snapshot(&self) -> Vec<VehicleState> {
        self.roster.snapshot()
    }
}

impl<W: Write> Navigation for ConsoleWorld<W> {
    fn waypoint(&self, _name: &str) -> Option<(f64, f64)> {
        None
    }

    fn airport(&self, _name: &str) -> Option<(f64, f64)> {
        None
    }
}

impl<W: Write> SimControl for ConsoleWorld<W> {
    fn sim_time(&self) -> f64 {
        self.sim_time
    }

    fn start(&mut self) {
        self.state = SimState::Running;
    }

    fn hold(&mut self) {
        self.state = SimState::Held;
    }

    fn stop(&mut self) {
        self.state = SimState::Stopped;
    }

    fn reset(&mut self) {
        self.roster.clear();
        self.sim_time = 0.0;
        self.ff_until = None;
        self.state = SimState::Init;
    }

    fn set_dt(&mut self, dt: f64) -> CommandResult {
        if dt > 0.0 {
            self.dt = dt;
            CommandResult::ok()
        } else {
            CommandResult::error("time step must be positive")
        }
    }

    fn set_dt_multiplier(&mut self, multiplier: f64) -> CommandResult {
        if multiplier > 0.0 {
            self.dt_mult = multiplier;
            CommandResult::ok()
        } else {
            CommandResult::error("multiplier must be positive")
        }
    }

    fn fast_forward(&mut self, until: Option<f64>) {
        self.ff_until = Some(match until {
            Some(seconds) => self.sim_time + seconds,
            None => f64::INFINITY,
        });
        self.state = SimState::Running;
    }

    fn set_fixed_dt(&mut self, on: bool, until: Option<f64>) {
        // The console always steps by a fixed dt.
        debug!(on, ?until, "fixed time step");
    }

    fn set_seed(&mut self, seed: i64) {
        info!(seed, "random seed set");
    }
}

impl<W: Write> Feedback for ConsoleWorld<W> {
    fn echo(&mut self, text: &str) {
        let _ = writeln!(self.out, "{}", text);
    }

    fn pan(&mut self, target: PanTarget) {
        debug!(?target, "pan");
    }

    fn zoom(&mut self, factor: f64, absolute: bool) {
        debug!(factor, absolute, "zoom");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> ConsoleWorld<Vec<u8>> {
        ConsoleWorld::new(Vec::new(), 0.5).unwrap()
    }

    #[test]
    fn rejects_non_positive_dt() {
        assert!(ConsoleWorld::new(Vec::new(), 0.0).is_err());
        assert!(ConsoleWorld::new(Vec::new(), f64::NAN).is_err());
    }

    #[test]
    fn clock_only_moves_while_running() {
        let mut w = world();
        w.step();
        assert_eq!(w.sim_time(), 0.0);
        w.start();
        w.step();
        w.step();
        assert_eq!(w.sim_time(), 1.0);
        w.hold();
        w.step();
        assert_eq!(w.sim_time(), 1.0);
    }

    #[test]
    fn multiplier_scales_steps() {
        let mut w = world();
        assert!(w.set_dt_multiplier(4.0).ok);
        assert!(!w.set_dt_multiplier(0.0).ok);
        w.start();
        w.step();
        assert_eq!(w.sim_time(), 2.0);
    }

    #[test]
    fn fast_forward_is_relative() {
        let mut w = world();
        w.start();
        w.step();
        w.fast_forward(Some(10.0));
        assert_eq!(w.fast_forward_target(), Some(10.5));
        w.fast_forward(None);
        assert_eq!(w.fast_forward_target(), Some(f64::INFINITY));
    }

    #[test]
    fn echo_writes_lines() {
        let mut w = world();
        w.echo("one");
        w.echo("two");
        assert_eq!(String::from_utf8(w.into_inner()).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn reset_rewinds() {
        let mut w = world();
        w.start();
        w.step();
        w.reset();
        assert_eq!(w.sim_time(), 0.0);
        assert_eq!(w.state(), SimState::Init);
    }
}
