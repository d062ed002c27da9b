//! Simstack core — the command stack of a simulation.
//!
//! Operators type commands, scenario files replay time-stamped commands,
//! and both end up in the same pending queue that the [`Interpreter`]
//! drains once per simulation tick.
//!
//! ```text
//! scenario file ──► ScenarioScheduler ──┐
//!                                       ├──► PendingQueue ──► Interpreter ──► World
//! operator input ───────────────────────┘
//! ```

pub mod args;
pub mod builtins;
pub mod command;
pub mod dispatch;
pub mod error;
pub mod extension;
pub mod help;
pub mod queue;
pub mod registry;
pub mod scenario;
pub mod settings;
pub mod tokenize;
pub mod units;
pub mod world;

pub use command::{CommandContext, CommandResult, CommandSpec};
pub use dispatch::{Interpreter, InterpreterBuilder, LineOutcome, Outcome};
pub use error::{CommandError, ConfigError, ScenarioError};
pub use extension::{Extension, ExtensionRequest};
pub use settings::StackSettings;
pub use world::World;
