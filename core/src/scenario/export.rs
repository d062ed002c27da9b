//! State export — write the current roster as a replayable scenario.
//!
//! Every line carries the zero timestamp, so loading the file recreates
//! the vehicles and re-issues any autopilot target that differs from the
//! current value by more than its deadband.

use std::fmt::Write as _;
use std::path::Path;

use crate::error::ScenarioError;
use crate::units::{Speed, FPM, FT};
use crate::world::VehicleState;

const TIMESTAMP: &str = "00:00:00.00>";

/// Vertical speed deadband, m/s (about 10 fpm).
const VS_DEADBAND: f64 = 0.05;
/// Altitude deadband, m.
const ALT_DEADBAND: f64 = 10.0;
/// Heading deadband, degrees.
const HDG_DEADBAND: f64 = 0.5;
/// CAS deadband, m/s.
const SPD_DEADBAND: f64 = 0.4;
/// Mach deadband.
const MACH_DEADBAND: f64 = 0.001;

/// Scenario lines reconstructing `vehicles`.
pub fn export_lines(vehicles: &[VehicleState]) -> Vec<String> {
    let mut lines = Vec::new();
    for v in vehicles {
        lines.push(format!(
            "{TIMESTAMP}CRE {},{},{},{},{},{},{}",
            v.id,
            v.type_code,
            v.lat,
            v.lon,
            v.track,
            v.alt / FT,
            v.spd.operator_value()
        ));

        if v.vs.abs() > VS_DEADBAND {
            let vs = if v.selected_vs.abs() > VS_DEADBAND {
                v.selected_vs
            } else {
                v.vs
            };
            lines.push(format!("{TIMESTAMP}VS {},{}", v.id, vs / FPM));
        }

        if (v.alt - v.selected_alt).abs() > ALT_DEADBAND {
            lines.push(format!("{TIMESTAMP}ALT {},{}", v.id, v.selected_alt / FT));
        }

        let delhdg = (v.selected_hdg - v.track + 180.0).rem_euclid(360.0) - 180.0;
        if delhdg.abs() > HDG_DEADBAND {
            lines.push(format!("{TIMESTAMP}HDG {},{}", v.id, v.selected_hdg));
        }

        if speed_differs(v.selected_spd, v.spd) {
            lines.push(format!(
                "{TIMESTAMP}SPD {},{}",
                v.id,
                v.selected_spd.operator_value()
            ));
        }

        if let Some(dest) = &v.destination {
            lines.push(format!("{TIMESTAMP}DEST {},{}", v.id, dest));
        }
        if let Some(orig) = &v.origin {
            lines.push(format!("{TIMESTAMP}ORIG {},{}", v.id, orig));
        }
    }
    lines
}

/// A speed target is exported whenever its kind differs from the current
/// speed, since CAS and Mach cannot be compared without an atmosphere.
fn speed_differs(selected: Speed, current: Speed) -> bool {
    match (selected, current) {
        (Speed::Cas(a), Speed::Cas(b)) => (a - b).abs() > SPD_DEADBAND,
        (Speed::Mach(a), Speed::Mach(b)) => (a - b).abs() > MACH_DEADBAND,
        _ => true,
    }
}

/// Write scenario lines to `path`, creating the parent directory if needed.
pub fn save_scenario(path: &Path, lines: &[String]) -> Result<(), ScenarioError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ScenarioError::from_io(parent.to_path_buf(), e))?;
    }
    let mut content = String::new();
    for line in lines {
        let _ = writeln!(content, "{line}");
    }
    std::fs::write(path, content).map_err(|e| ScenarioError::from_io(path.to_path_buf(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::text::parse_spd;
    use crate::units::KTS;

    fn level(id: &str) -> VehicleState {
        VehicleState {
            id: id.into(),
            type_code: "B744".into(),
            lat: 52.0,
            lon: 4.5,
            track: 90.0,
            alt: 10000.0 * FT,
            spd: Speed::knots(250.0),
            vs: 0.0,
            selected_alt: 10000.0 * FT,
            selected_hdg: 90.0,
            selected_spd: Speed::knots(250.0),
            selected_vs: 0.0,
            origin: None,
            destination: None,
        }
    }

    #[test]
    fn steady_vehicle_is_one_create_line() {
        let lines = export_lines(&[level("KL001")]);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("00:00:00.00>CRE KL001,B744,52,4.5,90,"));
    }

    #[test]
    fn targets_outside_deadband_exported() {
        let mut v = level("KL002");
        v.vs = 5.0;
        v.selected_vs = 0.0;
        v.selected_alt = 20000.0 * FT;
        v.selected_hdg = 180.0;
        v.selected_spd = Speed::knots(280.0);
        v.destination = Some("EHAM".into());
        v.origin = Some("LFPG".into());
        let lines = export_lines(&[v]);
        let cmds: Vec<&str> = lines
            .iter()
            .map(|l| l.trim_start_matches(TIMESTAMP).split(' ').next().unwrap())
            .collect();
        assert_eq!(cmds, vec!["CRE", "VS", "ALT", "HDG", "SPD", "DEST", "ORIG"]);
        assert!(lines[1].starts_with("00:00:00.00>VS KL002,"));
        assert!(lines.iter().any(|l| l == "00:00:00.00>DEST KL002,EHAM"));
    }

    #[test]
    fn small_differences_within_deadband_dropped() {
        let mut v = level("KL003");
        v.vs = 0.04;
        v.selected_alt = v.alt + 9.0;
        v.selected_hdg = 90.4;
        v.selected_spd = Speed::Cas(250.0 * KTS + 0.3);
        assert_eq!(export_lines(&[v]).len(), 1);
    }

    #[test]
    fn mach_written_as_bare_number() {
        let mut v = level("KL007");
        v.spd = Speed::Mach(0.84);
        v.selected_spd = Speed::Mach(0.80);
        let lines = export_lines(&[v]);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(",0.84"));
        assert_eq!(lines[1], "00:00:00.00>SPD KL007,0.8");
        assert_eq!(parse_spd("0.84").unwrap(), Speed::Mach(0.84));
    }

    #[test]
    fn speed_kind_change_always_exported() {
        let mut v = level("KL008");
        v.selected_spd = Speed::Mach(0.78);
        let lines = export_lines(&[v]);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "00:00:00.00>SPD KL008,0.78");

        let mut v = level("KL009");
        v.spd = Speed::Mach(0.80);
        v.selected_spd = Speed::Mach(0.8005);
        assert_eq!(export_lines(&[v]).len(), 1);
    }

    #[test]
    fn heading_difference_wraps_through_north() {
        let mut v = level("KL004");
        v.track = 359.8;
        v.selected_hdg = 0.1;
        assert_eq!(export_lines(&[v]).len(), 1);
    }

    #[test]
    fn selected_vertical_speed_preferred() {
        let mut v = level("KL005");
        v.vs = 2.0;
        v.selected_vs = 1000.0 * FPM;
        let lines = export_lines(&[v]);
        let value: f64 = lines[1]
            .trim_start_matches("00:00:00.00>VS KL005,")
            .parse()
            .unwrap();
        assert!((value - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn save_writes_one_line_each() {
        let dir = std::env::temp_dir().join(format!("simstack_export_test_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("nested").join("out.scn");
        let lines = export_lines(&[level("KL006")]);
        save_scenario(&path, &lines).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
