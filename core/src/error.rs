//! Error kinds surfaced by the command stack.
//!
//! None of these ever abort a drain pass: the interpreter renders them
//! through the feedback sink and moves on to the next queued line.

use std::path::PathBuf;

use thiserror::Error;

use crate::args::ArgType;

// ---------------------------------------------------------------------------
// CommandError
// ---------------------------------------------------------------------------

/// Failure while resolving, checking or coercing a single command line.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Syntax error: Too few arguments")]
    TooFewArguments {
        command: String,
        given: usize,
        required: usize,
    },

    #[error("Syntax error in processing arguments")]
    InvalidArgument {
        command: String,
        position: usize,
        kind: ArgType,
        token: String,
        reason: String,
    },

    /// An `acid` argument did not name a known vehicle.
    #[error("{command}: {target} not found")]
    NotFound { command: String, target: String },

    #[error("Unknown command: {name}")]
    UnknownCommand { name: String },

    /// A bare token that is neither a command nor a vehicle.
    #[error("Unknown command or aircraft: {name}")]
    UnknownCommandOrTarget { name: String },

    #[error("command already registered: {name}")]
    DuplicateCommand { name: String },

    #[error("invalid signature for {name}: {reason}")]
    InvalidSignature { name: String, reason: String },

    #[error("synonym already defined: {alias} -> {target}")]
    DuplicateAlias { alias: String, target: String },

    #[error("synonym {alias} would chain through synonym {target}")]
    AliasChain { alias: String, target: String },

    #[error("extension prefix {prefix} must be {expected} characters")]
    InvalidPrefix { prefix: String, expected: usize },

    #[error("extension prefix already registered: {prefix}")]
    DuplicatePrefix { prefix: String },
}

impl CommandError {
    /// Whether this error is reported as a syntax error with usage text.
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            CommandError::TooFewArguments { .. } | CommandError::InvalidArgument { .. }
        )
    }
}

// ---------------------------------------------------------------------------
// ScenarioError
// ---------------------------------------------------------------------------

/// Failure opening, reading or writing a scenario file.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("cannot find file: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScenarioError {
    pub(crate) fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            ScenarioError::NotFound { path }
        } else {
            ScenarioError::Io { path, source }
        }
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Failure loading or saving interpreter settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings: {0}")]
    Parse(#[from] serde_yaml::Error),
}
