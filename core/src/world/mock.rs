//! Mock world for testing.
//!
//! Records every collaborator call and every echoed message, and keeps a
//! real [`Roster`] so that lookups behave like a host would.

use std::collections::HashMap;

use crate::command::CommandResult;
use crate::units::Speed;

use super::roster::Roster;
use super::{
    Feedback, Navigation, PanTarget, Relocation, RouteEnd, Selection, SimControl, Traffic,
    VehicleSpec, VehicleState,
};

/// One recorded collaborator call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create(String),
    Delete(String),
    Select(usize, Selection),
    Relocate(usize, Relocation),
    SetRouteEnd(usize, RouteEnd, String),
    Nominal(usize),
    Start,
    Hold,
    Stop,
    Reset,
    SetDt(f64),
    SetDtMultiplier(f64),
    FastForward(Option<f64>),
    FixedDt(bool, Option<f64>),
    Seed(i64),
    Pan(PanTarget),
    Zoom(f64, bool),
    ShowRoute(String),
}

/// A test-double world.
pub struct MockWorld {
    pub roster: Roster,
    /// All collaborator calls, in order. Lookups are not recorded.
    pub calls: Vec<Call>,
    /// All echoed messages, in order.
    pub messages: Vec<String>,
    pub waypoints: HashMap<String, (f64, f64)>,
    pub airports: HashMap<String, (f64, f64)>,
    pub sim_time: f64,
    pub running: bool,
    /// Returned by the next `choose_scenario` call.
    pub file_choice: Option<String>,
}

impl MockWorld {
    pub fn new() -> Self {
        MockWorld {
            roster: Roster::new(),
            calls: Vec::new(),
            messages: Vec::new(),
            waypoints: HashMap::new(),
            airports: HashMap::new(),
            sim_time: 0.0,
            running: false,
            file_choice: None,
        }
    }

    /// Create a mock with vehicles already on the roster.
    pub fn with_vehicles(ids: &[&str]) -> Self {
        let mut world = MockWorld::new();
        for (i, id) in ids.iter().enumerate() {
            world.roster.create(VehicleSpec {
                id: id.to_string(),
                type_code: "A320".into(),
                lat: 52.0 + i as f64,
                lon: 4.0,
                hdg: 90.0,
                alt: 3048.0,
                spd: Speed::Cas(128.0),
            });
        }
        world
    }

    pub fn add_waypoint(&mut self, name: &str, lat: f64, lon: f64) {
        self.waypoints.insert(name.to_string(), (lat, lon));
    }

    pub fn add_airport(&mut self, name: &str, lat: f64, lon: f64) {
        self.airports.insert(name.to_string(), (lat, lon));
    }

    pub fn last_message(&self) -> Option<&str> {
        self.messages.last().map(String::as_str)
    }

    /// Whether any echoed message equals `text`.
    pub fn echoed(&self, text: &str) -> bool {
        self.messages.iter().any(|m| m == text)
    }

    pub fn clear(&mut self) {
        self.calls.clear();
        self.messages.clear();
    }
}

impl Default for MockWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl Traffic for MockWorld {
    fn id_to_index(&self, id: &str) -> Option<usize> {
        self.roster.id_to_index(id)
    }

    fn vehicle_id(&self, index: usize) -> Option<String> {
        self.roster.vehicle_id(index)
    }

    fn create(&mut self, spec: VehicleSpec) -> CommandResult {
        self.calls.push(Call::Create(spec.id.clone()));
        self.roster.create(spec)
    }

    fn delete(&mut self, id: &str) -> bool {
        self.calls.push(Call::Delete(id.to_string()));
        self.roster.delete(id)
    }

    fn select(&mut self, index: usize, selection: Selection) -> CommandResult {
        self.calls.push(Call::Select(index, selection));
        self.roster.select(index, selection)
    }

    fn relocate(&mut self, index: usize, to: Relocation) -> CommandResult {
        self.calls.push(Call::Relocate(index, to));
        self.roster.relocate(index, to)
    }

    fn set_route_end(&mut self, index: usize, end: RouteEnd, name: &str) -> CommandResult {
        self.calls.push(Call::SetRouteEnd(index, end, name.to_string()));
        self.roster.set_route_end(index, end, name)
    }

    fn route_end(&self, index: usize, end: RouteEnd) -> Option<String> {
        self.roster.route_end(index, end)
    }

    fn nominal(&mut self, index: usize) -> CommandResult {
        self.calls.push(Call::Nominal(index));
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

impl Navigation for MockWorld {
    fn waypoint(&self, name: &str) -> Option<(f64, f64)> {
        self.waypoints.get(name).copied()
    }

    fn airport(&self, name: &str) -> Option<(f64, f64)> {
        self.airports.get(name).copied()
    }
}

impl SimControl for MockWorld {
    fn sim_time(&self) -> f64 {
        self.sim_time
    }

    fn start(&mut self) {
        self.running = true;
        self.calls.push(Call::Start);
    }

    fn hold(&mut self) {
        self.running = false;
        self.calls.push(Call::Hold);
    }

    fn stop(&mut self) {
        self.running = false;
        self.calls.push(Call::Stop);
    }

    fn reset(&mut self) {
        self.running = false;
        self.sim_time = 0.0;
        self.roster.clear();
        self.calls.push(Call::Reset);
    }

    fn set_dt(&mut self, dt: f64) -> CommandResult {
        self.calls.push(Call::SetDt(dt));
        if dt > 0.0 {
            CommandResult::ok()
        } else {
            CommandResult::error("time step must be positive")
        }
    }

    fn set_dt_multiplier(&mut self, multiplier: f64) -> CommandResult {
        self.calls.push(Call::SetDtMultiplier(multiplier));
        CommandResult::ok()
    }

    fn fast_forward(&mut self, until: Option<f64>) {
        self.calls.push(Call::FastForward(until));
    }

    fn set_fixed_dt(&mut self, on: bool, until: Option<f64>) {
        self.calls.push(Call::FixedDt(on, until));
    }

    fn set_seed(&mut self, seed: i64) {
        self.calls.push(Call::Seed(seed));
    }
}

impl Feedback for MockWorld {
    fn echo(&mut self, text: &str) {
        self.messages.push(text.to_string());
    }

    fn pan(&mut self, target: PanTarget) {
        self.calls.push(Call::Pan(target));
    }

    fn zoom(&mut self, factor: f64, absolute: bool) {
        self.calls.push(Call::Zoom(factor, absolute));
    }

    fn show_route(&mut self, id: &str) {
        self.calls.push(Call::ShowRoute(id.to_string()));
    }

    fn choose_scenario(&mut self) -> Option<String> {
        self.file_choice.take()
    }
}
