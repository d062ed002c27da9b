//! Argument coercion — typed signatures and raw-token conversion.
//!
//! A command declares its parameters as a comma-separated list of type
//! tags, optional ones enclosed in brackets (`"acid,alt,[vspd]"`). The
//! coercer turns the raw tokens of a command line into typed values
//! according to that list.

mod coerce;
mod signature;
pub mod text;

pub use coerce::{coerce, ArgValue, Args};
pub use signature::{ArgType, Signature};
