//! Unit conversions between operator units and the internal SI units.
//!
//! Operators type knots, feet and feet-per-minute; everything behind the
//! command stack works in metres and metres per second.

use serde::{Deserialize, Serialize};

/// Metres per second in one knot.
pub const KTS: f64 = 1852.0 / 3600.0;

/// Metres in one foot.
pub const FT: f64 = 0.3048;

/// Metres per second in one foot per minute.
pub const FPM: f64 = FT / 60.0;

/// An airspeed as the operator gave it: calibrated airspeed or Mach.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Speed {
    /// Calibrated airspeed in metres per second.
    Cas(f64),
    Mach(f64),
}

impl Speed {
    pub fn knots(kts: f64) -> Self {
        Speed::Cas(kts * KTS)
    }

    /// The value an operator would type: knots for CAS, the bare Mach
    /// number otherwise (read back as Mach because it lies below 1).
    pub fn operator_value(&self) -> f64 {
        match self {
            Speed::Cas(ms) => ms / KTS,
            Speed::Mach(m) => *m,
        }
    }
}
