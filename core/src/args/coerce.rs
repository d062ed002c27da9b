use serde::Serialize;

use crate::error::CommandError;
use crate::units::{Speed, FPM, FT};

use super::signature::{ArgType, Signature};
use super::text;

// ---------------------------------------------------------------------------
// ArgValue
// ---------------------------------------------------------------------------

/// A coerced argument value, in internal units.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ArgValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Roster index of a resolved vehicle identifier.
    Index(usize),
    Speed(Speed),
}

impl ArgValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ArgValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ArgValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Floats, and integers widened to float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ArgValue::Float(f) => Some(*f),
            ArgValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            ArgValue::Index(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_speed(&self) -> Option<Speed> {
        match self {
            ArgValue::Speed(s) => Some(*s),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Args
// ---------------------------------------------------------------------------

/// Positional handler arguments. `None` is the null value produced by the
/// wildcard token and by optional parameters that were not supplied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args(Vec<Option<ArgValue>>);

impl Args {
    pub fn new(values: Vec<Option<ArgValue>>) -> Self {
        Args(values)
    }

    /// The single-`txt` form: the whole remainder of the line, or null.
    pub fn from_remainder(remainder: &str) -> Self {
        let remainder = remainder.trim();
        if is_wildcard(remainder) {
            Args(vec![None])
        } else {
            Args(vec![Some(ArgValue::Text(remainder.to_string()))])
        }
    }

    /// Pad with nulls up to `len` positions.
    pub fn padded(mut self, len: usize) -> Self {
        while self.0.len() < len {
            self.0.push(None);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&ArgValue> {
        self.0.get(position).and_then(Option::as_ref)
    }

    pub fn is_null(&self, position: usize) -> bool {
        self.get(position).is_none()
    }

    pub fn text(&self, position: usize) -> Option<&str> {
        self.get(position).and_then(ArgValue::as_text)
    }

    pub fn int(&self, position: usize) -> Option<i64> {
        self.get(position).and_then(ArgValue::as_int)
    }

    pub fn float(&self, position: usize) -> Option<f64> {
        self.get(position).and_then(ArgValue::as_f64)
    }

    pub fn flag(&self, position: usize) -> Option<bool> {
        self.get(position).and_then(ArgValue::as_bool)
    }

    pub fn index(&self, position: usize) -> Option<usize> {
        self.get(position).and_then(ArgValue::as_index)
    }

    pub fn speed(&self, position: usize) -> Option<Speed> {
        self.get(position).and_then(ArgValue::as_speed)
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&ArgValue>> {
        self.0.iter().map(Option::as_ref)
    }
}

// ---------------------------------------------------------------------------
// Coercion
// ---------------------------------------------------------------------------

/// Coerce raw tokens according to `signature`.
///
/// Tokens beyond the declared parameters are ignored; missing optional
/// parameters come back as nulls. An unresolved `acid` aborts at once with
/// a lookup error. A malformed `lat`/`lon` is remembered and collection
/// continues, the first such failure is returned at the end. Any other
/// malformed token aborts immediately.
pub fn coerce<F>(
    command: &str,
    signature: &Signature,
    tokens: &[String],
    resolve_id: F,
) -> Result<Args, CommandError>
where
    F: Fn(&str) -> Option<usize>,
{
    let mut values = Vec::with_capacity(signature.len());
    let mut deferred: Option<CommandError> = None;

    for (position, (kind, token)) in signature.types().zip(tokens.iter()).enumerate() {
        let token = token.trim();
        if is_wildcard(token) {
            values.push(None);
            continue;
        }

        let value = match kind {
            ArgType::AcId => {
                let id = token.to_ascii_uppercase();
                match resolve_id(&id) {
                    Some(index) => ArgValue::Index(index),
                    None => {
                        return Err(CommandError::NotFound {
                            command: command.to_string(),
                            target: id,
                        })
                    }
                }
            }
            ArgType::Lat | ArgType::Lon => match convert(kind, token) {
                Ok(v) => v,
                Err(reason) => {
                    if deferred.is_none() {
                        deferred = Some(invalid(command, position, kind, token, reason));
                    }
                    values.push(None);
                    continue;
                }
            },
            other => convert(other, token)
                .map_err(|reason| invalid(command, position, other, token, reason))?,
        };
        values.push(Some(value));
    }

    if let Some(err) = deferred {
        return Err(err);
    }
    Ok(Args::new(values).padded(signature.len()))
}

/// Empty tokens and `*` mean "leave unchanged" for every type.
pub(crate) fn is_wildcard(token: &str) -> bool {
    token.is_empty() || token == "*"
}

fn convert(kind: ArgType, token: &str) -> Result<ArgValue, String> {
    match kind {
        ArgType::Txt | ArgType::AcId => Ok(ArgValue::Text(token.to_string())),
        ArgType::Int => token
            .parse::<i64>()
            .map(ArgValue::Int)
            .map_err(|_| format!("expected an integer, got '{}'", token)),
        ArgType::Float => token
            .parse::<f64>()
            .map(ArgValue::Float)
            .map_err(|_| format!("expected a number, got '{}'", token)),
        ArgType::OnOff => Ok(ArgValue::Bool(text::parse_onoff(token))),
        ArgType::Lat => text::parse_lat(token).map(ArgValue::Float),
        ArgType::Lon => text::parse_lon(token).map(ArgValue::Float),
        ArgType::Spd => text::parse_spd(token).map(ArgValue::Speed),
        ArgType::VSpd => token
            .parse::<f64>()
            .map(|fpm| ArgValue::Float(fpm * FPM))
            .map_err(|_| format!("invalid vertical speed '{}'", token)),
        ArgType::Alt => text::parse_alt(token).map(|feet| ArgValue::Float(feet * FT)),
        ArgType::Hdg => text::parse_hdg(token).map(ArgValue::Float),
        ArgType::Time => text::parse_time(token).map(ArgValue::Float),
    }
}

fn invalid(command: &str, position: usize, kind: ArgType, token: &str, reason: String) -> CommandError {
    CommandError::InvalidArgument {
        command: command.to_string(),
        position,
        kind,
        token: token.to_string(),
        reason,
    }
}
