//! Command — registered command specs, the handler contract and the
//! uniform result protocol.
//!
//! Every command is a [`CommandSpec`]: an upper-cased canonical name, a
//! usage line shown on syntax errors, a typed [`Signature`] and a handler.
//! Handlers all share one shape: a [`CommandContext`] and the coerced
//! [`Args`] go in, a [`CommandResult`] comes out.
//!
//! # Result protocol
//!
//! | ok    | message | reported as                              |
//! |-------|---------|------------------------------------------|
//! | true  | none    | nothing                                  |
//! | true  | some    | `NAME: message`                          |
//! | false | some    | `NAME: message` (no usage echo)          |
//! | false | none    | `Syntax error: <usage>`                  |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::args::{Args, Signature};
use crate::error::CommandError;
use crate::queue::PendingQueue;
use crate::registry::{CommandRegistry, SynonymTable};
use crate::scenario::ScenarioScheduler;
use crate::settings::StackSettings;
use crate::world::World;

// ---------------------------------------------------------------------------
// CommandResult
// ---------------------------------------------------------------------------

/// Outcome of a handler: success flag plus an optional operator message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CommandResult {
    /// Success, nothing to report.
    pub fn ok() -> Self {
        CommandResult {
            ok: true,
            message: None,
        }
    }

    /// Failure without a message; the dispatcher echoes the usage line.
    pub fn fail() -> Self {
        CommandResult {
            ok: false,
            message: None,
        }
    }

    /// Success with an informational message.
    pub fn info(message: impl Into<String>) -> Self {
        CommandResult {
            ok: true,
            message: Some(message.into()),
        }
    }

    /// Failure with its own message; the usage line is not echoed.
    pub fn error(message: impl Into<String>) -> Self {
        CommandResult {
            ok: false,
            message: Some(message.into()),
        }
    }
}

impl Default for CommandResult {
    fn default() -> Self {
        Self::ok()
    }
}

impl From<()> for CommandResult {
    fn from(_: ()) -> Self {
        CommandResult::ok()
    }
}

impl From<bool> for CommandResult {
    fn from(ok: bool) -> Self {
        CommandResult { ok, message: None }
    }
}

impl From<(bool, String)> for CommandResult {
    fn from((ok, message): (bool, String)) -> Self {
        CommandResult {
            ok,
            message: Some(message),
        }
    }
}

impl From<(bool, &str)> for CommandResult {
    fn from((ok, message): (bool, &str)) -> Self {
        CommandResult::from((ok, message.to_string()))
    }
}

// ---------------------------------------------------------------------------
// CommandContext
// ---------------------------------------------------------------------------

/// What a handler can reach while it runs.
pub struct CommandContext<'a> {
    pub world: &'a mut dyn World,
    /// The queue being drained; lines stacked here run in the same pass.
    pub queue: &'a mut PendingQueue,
    pub scheduler: &'a mut ScenarioScheduler,
    pub registry: &'a CommandRegistry,
    pub synonyms: &'a SynonymTable,
    pub settings: &'a StackSettings,
    /// Scenario most recently opened with `IC`.
    pub scenario_file: &'a mut Option<String>,
    /// Canonical name of the command being run.
    pub command: &'a str,
    /// The raw command segment, original casing.
    pub line: &'a str,
}

// ---------------------------------------------------------------------------
// CommandSpec
// ---------------------------------------------------------------------------

/// The uniform handler signature.
pub type Handler = Box<dyn Fn(&mut CommandContext<'_>, &Args) -> CommandResult>;

/// A registered command.
pub struct CommandSpec {
    pub name: String,
    pub usage: String,
    pub signature: Signature,
    handler: Handler,
}

impl CommandSpec {
    /// Build a spec, parsing the signature declaration. The name is
    /// stored upper-cased.
    pub fn new<F>(name: &str, usage: &str, signature: &str, handler: F) -> Result<Self, CommandError>
    where
        F: Fn(&mut CommandContext<'_>, &Args) -> CommandResult + 'static,
    {
        let name = name.trim().to_ascii_uppercase();
        let signature = signature
            .parse::<Signature>()
            .map_err(|reason| CommandError::InvalidSignature {
                name: name.clone(),
                reason,
            })?;
        Ok(CommandSpec {
            name,
            usage: usage.to_string(),
            signature,
            handler: Box::new(handler),
        })
    }

    pub fn call(&self, ctx: &mut CommandContext<'_>, args: &Args) -> CommandResult {
        (self.handler)(ctx, args)
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("usage", &self.usage)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::ArgType;

    #[test]
    fn result_conversions() {
        assert_eq!(CommandResult::from(()), CommandResult::ok());
        assert_eq!(CommandResult::from(false), CommandResult::fail());
        assert_eq!(
            CommandResult::from((true, "done")),
            CommandResult::info("done")
        );
        assert_eq!(
            CommandResult::from((false, String::from("bad"))),
            CommandResult::error("bad")
        );
    }

    #[test]
    fn result_serializes_without_empty_message() {
        let json = serde_json::to_string(&CommandResult::ok()).unwrap();
        assert_eq!(json, r#"{"ok":true}"#);
        let back: CommandResult = serde_json::from_str(r#"{"ok":false,"message":"x"}"#).unwrap();
        assert_eq!(back, CommandResult::error("x"));
    }

    #[test]
    fn spec_uppercases_name_and_parses_signature() {
        let spec = CommandSpec::new("alt", "ALT acid,alt,[vspd]", "acid,alt,[vspd]", |_, _| {
            CommandResult::ok()
        })
        .unwrap();
        assert_eq!(spec.name, "ALT");
        assert_eq!(spec.signature.mandatory, vec![ArgType::AcId, ArgType::Alt]);
        assert!(format!("{:?}", spec).contains("ALT"));
    }

    #[test]
    fn spec_rejects_bad_signature() {
        let err = CommandSpec::new("X", "X", "acid,nope", |_, _| CommandResult::ok()).unwrap_err();
        assert!(matches!(err, CommandError::InvalidSignature { .. }));
    }
}
