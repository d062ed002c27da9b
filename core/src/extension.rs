//! Extension router — command families served by external handlers.
//!
//! A command name whose first `prefix_len` characters match a registered
//! prefix (`"ASA_"`, `"SYN_"`) is handed to that extension with the prefix
//! stripped. The core does not look at what the extension does.

use std::collections::BTreeMap;

use crate::command::CommandContext;
use crate::error::CommandError;

/// One routed command.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtensionRequest<'a> {
    /// Command name with the prefix stripped (`"DTLOOK"` for `ASA_DTLOOK`).
    pub subcommand: &'a str,
    /// Full command name followed by the argument tokens.
    pub args: &'a [String],
}

impl ExtensionRequest<'_> {
    /// Number of arguments after the command name.
    pub fn arg_count(&self) -> usize {
        self.args.len().saturating_sub(1)
    }
}

/// The uniform "process remainder" capability.
pub trait Extension {
    fn process(&mut self, request: &ExtensionRequest<'_>, ctx: &mut CommandContext<'_>);
}

pub struct ExtensionRouter {
    prefix_len: usize,
    entries: BTreeMap<String, Box<dyn Extension>>,
}

impl ExtensionRouter {
    pub fn new(prefix_len: usize) -> Self {
        ExtensionRouter {
            prefix_len,
            entries: BTreeMap::new(),
        }
    }

    pub fn prefix_len(&self) -> usize {
        self.prefix_len
    }

    /// Register an extension under a prefix of exactly `prefix_len`
    /// characters.
    pub fn register(&mut self, prefix: &str, extension: Box<dyn Extension>) -> Result<(), CommandError> {
        let prefix = prefix.to_ascii_uppercase();
        if prefix.chars().count() != self.prefix_len {
            return Err(CommandError::InvalidPrefix {
                prefix,
                expected: self.prefix_len,
            });
        }
        if self.entries.contains_key(&prefix) {
            return Err(CommandError::DuplicatePrefix { prefix });
        }
        self.entries.insert(prefix, extension);
        Ok(())
    }

    /// The prefix of `name` that routes to an extension, if any.
    pub fn matching_prefix(&self, name: &str) -> Option<&str> {
        let upper = name.to_ascii_uppercase();
        let prefix = upper.get(..self.prefix_len)?;
        self.entries.get_key_value(prefix).map(|(k, _)| k.as_str())
    }

    pub fn get_mut(&mut self, prefix: &str) -> Option<&mut (dyn Extension + 'static)> {
        self.entries.get_mut(prefix).map(|e| e.as_mut())
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for ExtensionRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionRouter")
            .field("prefix_len", &self.prefix_len)
            .field("prefixes", &self.prefixes().collect::<Vec<_>>())
            .finish()
    }
}
