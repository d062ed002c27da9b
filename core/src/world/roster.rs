//! Roster — plain bookkeeping implementation of [`Traffic`].
//!
//! Stores vehicles and records selected targets without flying toward
//! them. Hosts without their own traffic model (the console, tests) use it
//! as is.

use crate::command::CommandResult;
use crate::units::{Speed, FT, KTS};

use super::{Relocation, RouteEnd, Selection, Traffic, VehicleSpec, VehicleState};

#[derive(Debug, Clone, Default)]
pub struct Roster {
    vehicles: Vec<VehicleState>,
}

impl Roster {
    pub fn new() -> Self {
        Roster {
            vehicles: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&VehicleState> {
        self.vehicles.get(index)
    }

    pub fn clear(&mut self) {
        self.vehicles.clear();
    }

    fn vehicle_mut(&mut self, index: usize) -> Result<&mut VehicleState, CommandResult> {
        self.vehicles
            .get_mut(index)
            .ok_or_else(|| CommandResult::error(format!("no vehicle at index {}", index)))
    }
}

impl Traffic for Roster {
    fn id_to_index(&self, id: &str) -> Option<usize> {
        self.vehicles.iter().position(|v| v.id == id)
    }

    fn vehicle_id(&self, index: usize) -> Option<String> {
        self.vehicles.get(index).map(|v| v.id.clone())
    }

    fn create(&mut self, spec: VehicleSpec) -> CommandResult {
        if self.id_to_index(&spec.id).is_some() {
            return CommandResult::error(format!("{} already exists", spec.id));
        }
        self.vehicles.push(VehicleState {
            id: spec.id,
            type_code: spec.type_code,
            lat: spec.lat,
            lon: spec.lon,
            track: spec.hdg,
            alt: spec.alt,
            spd: spec.spd,
            vs: 0.0,
            selected_alt: spec.alt,
            selected_hdg: spec.hdg,
            selected_spd: spec.spd,
            selected_vs: 0.0,
            origin: None,
            destination: None,
        });
        CommandResult::ok()
    }

    fn delete(&mut self, id: &str) -> bool {
        match self.id_to_index(id) {
            Some(index) => {
                self.vehicles.remove(index);
                true
            }
            None => false,
        }
    }

    fn select(&mut self, index: usize, selection: Selection) -> CommandResult {
        let v = match self.vehicle_mut(index) {
            Ok(v) => v,
            Err(e) => return e,
        };
        match selection {
            Selection::Altitude { alt, vspd } => {
                v.selected_alt = alt;
                if let Some(vs) = vspd {
                    v.selected_vs = vs;
                }
            }
            Selection::Heading(hdg) => v.selected_hdg = hdg.rem_euclid(360.0),
            Selection::Speed(spd) => v.selected_spd = spd,
            Selection::VerticalSpeed(vs) => v.selected_vs = vs,
        }
        CommandResult::ok()
    }

    fn relocate(&mut self, index: usize, to: Relocation) -> CommandResult {
        let v = match self.vehicle_mut(index) {
            Ok(v) => v,
            Err(e) => return e,
        };
        v.lat = to.lat;
        v.lon = to.lon;
        if let Some(alt) = to.alt {
            v.alt = alt;
            v.selected_alt = alt;
        }
        if let Some(hdg) = to.hdg {
            v.track = hdg;
            v.selected_hdg = hdg;
        }
        if let Some(spd) = to.spd {
            v.spd = spd;
            v.selected_spd = spd;
        }
        if let Some(vs) = to.vspd {
            v.vs = vs;
            v.selected_vs = vs;
        }
        CommandResult::ok()
    }

    fn set_route_end(&mut self, index: usize, end: RouteEnd, name: &str) -> CommandResult {
        let v = match self.vehicle_mut(index) {
            Ok(v) => v,
            Err(e) => return e,
        };
        let name = Some(name.trim().to_ascii_uppercase());
        match end {
            RouteEnd::Origin => v.origin = name,
            RouteEnd::Destination => v.destination = name,
        }
        CommandResult::ok()
    }

    fn route_end(&self, index: usize, end: RouteEnd) -> Option<String> {
        let v = self.vehicles.get(index)?;
        match end {
            RouteEnd::Origin => v.origin.clone(),
            RouteEnd::Destination => v.destination.clone(),
        }
    }

    fn nominal(&mut self, index: usize) -> CommandResult {
        let v = match self.vehicle_mut(index) {
            Ok(v) => v,
            Err(e) => return e,
        };
        v.selected_spd = v.spd;
        CommandResult::ok()
    }

    fn status_lines(&self, index: usize) -> Vec<String> {
        let v = match self.vehicles.get(index) {
            Some(v) => v,
            None => return Vec::new(),
        };
        let speed = match v.spd {
            Speed::Cas(ms) => format!("{} kts", (ms / KTS).round() as i64),
            Speed::Mach(m) => format!("Mach {:.2}", m),
        };
        let mut lines = vec![
            format!("Info on {} {}   index = {}", v.id, v.type_code, index),
            format!("Pos = {} , {}", v.lat, v.lon),
            format!("{} at {} ft", speed, (v.alt / FT).round() as i64),
            format!("Hdg = {}", v.track.round() as i64),
        ];
        let mut flying = String::from("Flying");
        if let Some(orig) = &v.origin {
            flying.push_str(&format!(" from {}", orig));
        }
        if let Some(dest) = &v.destination {
            flying.push_str(&format!(" to {}", dest));
        }
        lines.push(flying);
        lines
    }

    fn position(&self, index: usize) -> Option<(f64, f64)> {
        self.vehicles.get(index).map(|v| (v.lat, v.lon))
    }

    fn snapshot(&self) -> Vec<VehicleState> {
        self.vehicles.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(id: &str) -> VehicleSpec {
        VehicleSpec {
            id: id.into(),
            type_code: "B738".into(),
            lat: 52.0,
            lon: 4.0,
            hdg: 90.0,
            alt: 3000.0,
            spd: Speed::knots(250.0),
        }
    }

    #[test]
    fn create_and_lookup() {
        let mut r = Roster::new();
        assert!(r.create(spec("KL1")).ok);
        assert!(r.create(spec("KL2")).ok);
        assert_eq!(r.id_to_index("KL2"), Some(1));
        assert_eq!(r.id_to_index("kl2"), None);
    }

    #[test]
    fn duplicate_create_rejected() {
        let mut r = Roster::new();
        r.create(spec("KL1"));
        let res = r.create(spec("KL1"));
        assert!(!res.ok);
        assert_eq!(res.message.as_deref(), Some("KL1 already exists"));
    }

    #[test]
    fn delete_shifts_indices() {
        let mut r = Roster::new();
        r.create(spec("A"));
        r.create(spec("B"));
        assert!(r.delete("A"));
        assert!(!r.delete("A"));
        assert_eq!(r.id_to_index("B"), Some(0));
    }

    #[test]
    fn selections_recorded() {
        let mut r = Roster::new();
        r.create(spec("A"));
        r.select(0, Selection::Altitude { alt: 6000.0, vspd: Some(10.0) });
        r.select(0, Selection::Heading(-90.0));
        let v = r.get(0).unwrap();
        assert_eq!(v.selected_alt, 6000.0);
        assert_eq!(v.selected_vs, 10.0);
        assert_eq!(v.selected_hdg, 270.0);
        assert_eq!(v.alt, 3000.0);
    }

    #[test]
    fn bad_index_is_error_not_panic() {
        let mut r = Roster::new();
        assert!(!r.select(3, Selection::Speed(Speed::knots(200.0))).ok);
        assert!(r.status_lines(3).is_empty());
    }

    #[test]
    fn mach_speed_kept_as_mach() {
        let mut r = Roster::new();
        r.create(VehicleSpec {
            spd: Speed::Mach(0.84),
            ..spec("KL1")
        });
        r.select(0, Selection::Speed(Speed::Mach(0.80)));
        let v = r.get(0).unwrap();
        assert_eq!(v.spd, Speed::Mach(0.84));
        assert_eq!(v.selected_spd, Speed::Mach(0.80));
        assert_eq!(r.status_lines(0)[2], "Mach 0.84 at 9843 ft");

        r.nominal(0);
        assert_eq!(r.get(0).unwrap().selected_spd, Speed::Mach(0.84));
    }

    #[test]
    fn cas_status_in_knots() {
        let mut r = Roster::new();
        r.create(spec("KL1"));
        assert_eq!(r.status_lines(0)[2], "250 kts at 9843 ft");
    }

    #[test]
    fn route_ends_uppercased() {
        let mut r = Roster::new();
        r.create(spec("A"));
        r.set_route_end(0, RouteEnd::Destination, "eham");
        assert_eq!(r.route_end(0, RouteEnd::Destination).as_deref(), Some("EHAM"));
        assert_eq!(r.route_end(0, RouteEnd::Origin), None);
        assert_eq!(r.status_lines(0).last().unwrap(), "Flying to EHAM");
    }
}
