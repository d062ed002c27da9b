//! Text parsers for the domain value kinds.
//!
//! Each parser returns the value in operator units except where noted;
//! conversion to internal units happens in the coercer.

use crate::units::Speed;

/// Latitude in decimal degrees from `52.3`, `-4.1`, `N52'18'30.5"` or `S12.5`.
pub fn parse_lat(text: &str) -> Result<f64, String> {
    parse_angle(text, 'N', 'S')
}

/// Longitude in decimal degrees from `4.76`, `E004'45'00"` or `W1.5`.
pub fn parse_lon(text: &str) -> Result<f64, String> {
    parse_angle(text, 'E', 'W')
}

fn parse_angle(text: &str, positive: char, negative: char) -> Result<f64, String> {
    let upper = text.trim().to_ascii_uppercase();
    let mut sign = 1.0;
    let mut body = upper.as_str();
    if let Some(rest) = body.strip_prefix(positive) {
        body = rest;
    } else if let Some(rest) = body.strip_prefix(negative) {
        sign = -1.0;
        body = rest;
    }
    if let Some(rest) = body.strip_prefix('-') {
        sign = -sign;
        body = rest;
    } else if let Some(rest) = body.strip_prefix('+') {
        body = rest;
    }
    if body.is_empty() {
        return Err(format!("invalid angle '{}'", text));
    }

    let magnitude = if body.contains(['\'', '"', '°']) {
        let mut value = 0.0;
        let mut scale = 1.0;
        for part in body
            .split(['\'', '"', '°'])
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .take(3)
        {
            let v: f64 = part
                .parse()
                .map_err(|_| format!("invalid angle '{}'", text))?;
            value += v / scale;
            scale *= 60.0;
        }
        value
    } else {
        body.parse::<f64>()
            .map_err(|_| format!("invalid angle '{}'", text))?
    };
    Ok(sign * magnitude)
}

/// Altitude in feet from `FL250` or `25000`.
pub fn parse_alt(text: &str) -> Result<f64, String> {
    let upper = text.trim().to_ascii_uppercase();
    match upper.strip_prefix("FL") {
        Some(level) => level
            .parse::<u32>()
            .map(|fl| f64::from(fl) * 100.0)
            .map_err(|_| format!("invalid flight level '{}'", text)),
        None => upper
            .parse::<f64>()
            .map_err(|_| format!("invalid altitude '{}'", text)),
    }
}

/// Speed from a knots literal or a Mach literal (`M.8`, `M80`, `0.8`).
///
/// Values strictly between 0.1 and 1.0 are a Mach number; anything else
/// is knots, returned as CAS in metres per second.
pub fn parse_spd(text: &str) -> Result<Speed, String> {
    let cleaned = text.trim().to_ascii_uppercase().replace('M', ".").replace("..", ".");
    let value: f64 = cleaned
        .parse()
        .map_err(|_| format!("invalid speed '{}'", text))?;
    if value > 0.1 && value < 1.0 {
        Ok(Speed::Mach(value))
    } else {
        Ok(Speed::knots(value))
    }
}

/// Heading in degrees; a trailing `T` (true) or `M` (magnetic) is dropped.
pub fn parse_hdg(text: &str) -> Result<f64, String> {
    text.trim()
        .to_ascii_uppercase()
        .trim_end_matches(['T', 'M'])
        .parse::<f64>()
        .map_err(|_| format!("invalid heading '{}'", text))
}

/// Seconds from `HH:MM:SS[.ss]` or a bare number of seconds.
pub fn parse_time(text: &str) -> Result<f64, String> {
    let text = text.trim();
    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() >= 3 {
        let hours: u32 = parts[0]
            .trim()
            .parse()
            .map_err(|_| format!("invalid hours in '{}'", text))?;
        let minutes: u32 = parts[1]
            .trim()
            .parse()
            .map_err(|_| format!("invalid minutes in '{}'", text))?;
        let seconds: f64 = parts[2]
            .trim()
            .parse()
            .map_err(|_| format!("invalid seconds in '{}'", text))?;
        Ok(f64::from(hours) * 3600.0 + f64::from(minutes) * 60.0 + seconds)
    } else {
        text.parse::<f64>()
            .map_err(|_| format!("invalid time '{}'", text))
    }
}

/// ON, 1 or TRUE (any case) switch on; anything else switches off.
pub fn parse_onoff(text: &str) -> bool {
    let t = text.trim();
    t.eq_ignore_ascii_case("ON") || t == "1" || t.eq_ignore_ascii_case("TRUE")
}
