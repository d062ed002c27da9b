use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ArgType
// ---------------------------------------------------------------------------

/// Declared type of one command parameter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ArgType {
    /// Free text, passed through verbatim.
    Txt,
    Int,
    Float,
    /// ON/1/TRUE switch. Also declared as `bool`.
    OnOff,
    /// Vehicle identifier, resolved to a roster index.
    AcId,
    Lat,
    Lon,
    /// Calibrated airspeed in knots or a Mach number.
    Spd,
    /// Vertical speed in feet per minute.
    VSpd,
    /// Altitude in feet or as a flight level.
    Alt,
    /// Heading in degrees with an optional T/M suffix.
    Hdg,
    /// `HH:MM:SS[.ss]` or plain seconds.
    Time,
}

impl ArgType {
    /// The tag this type is declared with in a signature.
    pub fn tag(&self) -> &'static str {
        match self {
            ArgType::Txt => "txt",
            ArgType::Int => "int",
            ArgType::Float => "float",
            ArgType::OnOff => "onoff",
            ArgType::AcId => "acid",
            ArgType::Lat => "lat",
            ArgType::Lon => "lon",
            ArgType::Spd => "spd",
            ArgType::VSpd => "vspd",
            ArgType::Alt => "alt",
            ArgType::Hdg => "hdg",
            ArgType::Time => "time",
        }
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ArgType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "txt" => Ok(ArgType::Txt),
            "int" => Ok(ArgType::Int),
            "float" => Ok(ArgType::Float),
            "onoff" | "bool" => Ok(ArgType::OnOff),
            "acid" => Ok(ArgType::AcId),
            "lat" => Ok(ArgType::Lat),
            "lon" => Ok(ArgType::Lon),
            "spd" => Ok(ArgType::Spd),
            "vspd" => Ok(ArgType::VSpd),
            "alt" => Ok(ArgType::Alt),
            "hdg" => Ok(ArgType::Hdg),
            "time" => Ok(ArgType::Time),
            other => Err(format!("unknown argument type '{}'", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

/// Ordered parameter list: a mandatory prefix followed by optional types.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Signature {
    pub mandatory: Vec<ArgType>,
    pub optional: Vec<ArgType>,
}

impl Signature {
    /// Number of arguments that must be supplied.
    pub fn mandatory_len(&self) -> usize {
        self.mandatory.len()
    }

    /// Total number of declared parameters.
    pub fn len(&self) -> usize {
        self.mandatory.len() + self.optional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Type of the parameter at `position`, mandatory first.
    pub fn get(&self, position: usize) -> Option<ArgType> {
        self.types().nth(position)
    }

    pub fn types(&self) -> impl Iterator<Item = ArgType> + '_ {
        self.mandatory.iter().chain(self.optional.iter()).copied()
    }

    /// A signature made of exactly one `txt` parameter (mandatory or not)
    /// receives the whole remainder of the line instead of one token.
    pub fn is_single_text(&self) -> bool {
        self.len() == 1 && self.get(0) == Some(ArgType::Txt)
    }
}

impl FromStr for Signature {
    type Err = String;

    /// Parse `"acid,alt,[vspd]"` style declarations. Everything after the
    /// first `[` is optional.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (head, tail) = match s.find('[') {
            Some(pos) => (&s[..pos], Some(&s[pos + 1..])),
            None => (s, None),
        };
        let mandatory = parse_tags(head)?;
        let optional = match tail {
            Some(t) => parse_tags(&t.replace(['[', ']'], ""))?,
            None => Vec::new(),
        };
        Ok(Signature { mandatory, optional })
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head: Vec<&str> = self.mandatory.iter().map(|t| t.tag()).collect();
        write!(f, "{}", head.join(","))?;
        if !self.optional.is_empty() {
            let tail: Vec<&str> = self.optional.iter().map(|t| t.tag()).collect();
            if !head.is_empty() {
                f.write_str(",")?;
            }
            write!(f, "[{}]", tail.join(","))?;
        }
        Ok(())
    }
}

fn parse_tags(list: &str) -> Result<Vec<ArgType>, String> {
    list.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::parse)
        .collect()
}
