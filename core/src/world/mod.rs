//! World collaborators — the capabilities the command stack drives.
//!
//! The interpreter never simulates anything itself. Built-in commands
//! forward their coerced arguments to these traits, and the host
//! application (or the `mock` test double) decides what they mean.

pub mod mock;
pub mod roster;

use serde::{Deserialize, Serialize};

use crate::command::CommandResult;
use crate::units::Speed;

// ---------------------------------------------------------------------------
// Value types crossing the boundary
// ---------------------------------------------------------------------------

/// Current and commanded state of one vehicle, in internal units
/// (degrees, metres, metres per second). Speeds keep the kind they were
/// given in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VehicleState {
    pub id: String,
    pub type_code: String,
    pub lat: f64,
    pub lon: f64,
    /// Track over ground in degrees.
    pub track: f64,
    pub alt: f64,
    pub spd: Speed,
    pub vs: f64,
    pub selected_alt: f64,
    pub selected_hdg: f64,
    pub selected_spd: Speed,
    pub selected_vs: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
}

/// Arguments of a create request (`CRE`).
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleSpec {
    pub id: String,
    pub type_code: String,
    pub lat: f64,
    pub lon: f64,
    pub hdg: f64,
    pub alt: f64,
    pub spd: Speed,
}

/// Autopilot target selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection {
    Altitude { alt: f64, vspd: Option<f64> },
    Heading(f64),
    Speed(Speed),
    VerticalSpeed(f64),
}

/// Instant relocation (`MOVE`). `None` leaves a value unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Relocation {
    pub lat: f64,
    pub lon: f64,
    pub alt: Option<f64>,
    pub hdg: Option<f64>,
    pub spd: Option<Speed>,
    pub vspd: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteEnd {
    Origin,
    Destination,
}

impl RouteEnd {
    pub fn command(&self) -> &'static str {
        match self {
            RouteEnd::Origin => "ORIG",
            RouteEnd::Destination => "DEST",
        }
    }
}

/// Where to move the view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanTarget {
    /// Fractions of the current view size.
    Relative { dlat: f64, dlon: f64 },
    Absolute { lat: f64, lon: f64 },
}

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// The vehicle roster.
pub trait Traffic {
    /// Roster index of the vehicle with exactly this identifier.
    fn id_to_index(&self, id: &str) -> Option<usize>;

    fn vehicle_id(&self, index: usize) -> Option<String>;

    fn create(&mut self, spec: VehicleSpec) -> CommandResult;

    /// Remove a vehicle. Returns false when the id is unknown.
    fn delete(&mut self, id: &str) -> bool;

    fn select(&mut self, index: usize, selection: Selection) -> CommandResult;

    fn relocate(&mut self, index: usize, to: Relocation) -> CommandResult;

    fn set_route_end(&mut self, index: usize, end: RouteEnd, name: &str) -> CommandResult;

    fn route_end(&self, index: usize, end: RouteEnd) -> Option<String>;

    /// Return to nominal speed.
    fn nominal(&mut self, index: usize) -> CommandResult;

    /// Human-readable status of one vehicle.
    fn status_lines(&self, index: usize) -> Vec<String>;

    fn position(&self, index: usize) -> Option<(f64, f64)>;

    /// State of every vehicle, in roster order.
    fn snapshot(&self) -> Vec<VehicleState>;
}

/// Navigation database lookups.
pub trait Navigation {
    fn waypoint(&self, name: &str) -> Option<(f64, f64)>;
    fn airport(&self, name: &str) -> Option<(f64, f64)>;
}

/// Simulation control surface.
pub trait SimControl {
    /// Simulated seconds since scenario start.
    fn sim_time(&self) -> f64;
    fn start(&mut self);
    fn hold(&mut self);
    fn stop(&mut self);
    /// Full reset: clears the roster and rewinds the clock.
    fn reset(&mut self);
    fn set_dt(&mut self, dt: f64) -> CommandResult;
    fn set_dt_multiplier(&mut self, multiplier: f64) -> CommandResult;
    fn fast_forward(&mut self, until: Option<f64>);
    fn set_fixed_dt(&mut self, on: bool, until: Option<f64>);
    fn set_seed(&mut self, seed: i64);
}

/// Operator-facing output.
pub trait Feedback {
    fn echo(&mut self, text: &str);

    fn pan(&mut self, target: PanTarget);

    fn zoom(&mut self, factor: f64, absolute: bool);

    fn show_route(&mut self, _id: &str) {}

    /// Ask the operator for a scenario file. `None` when not interactive.
    fn choose_scenario(&mut self) -> Option<String> {
        None
    }
}

/// Everything a command handler can reach.
pub trait World: Traffic + Navigation + SimControl + Feedback {}

impl<T: Traffic + Navigation + SimControl + Feedback> World for T {}
