//! Command registry and synonym table.
//!
//! Both are filled while the interpreter is built and are read-only
//! afterwards. Lookups are case-insensitive; names are stored upper-cased.

use std::collections::{BTreeMap, HashMap};

use crate::command::CommandSpec;
use crate::error::CommandError;

// ---------------------------------------------------------------------------
// CommandRegistry
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, CommandSpec>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        CommandRegistry {
            commands: BTreeMap::new(),
        }
    }

    /// Add a command. Fails if the name is already taken.
    pub fn register(&mut self, spec: CommandSpec) -> Result<(), CommandError> {
        if self.contains(&spec.name) {
            return Err(CommandError::DuplicateCommand { name: spec.name });
        }
        self.commands.insert(spec.name.clone(), spec);
        Ok(())
    }

    /// Exact lookup of a canonical name (any case).
    pub fn get(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.get(&name.to_ascii_uppercase())
    }

    /// Lookup after at most one synonym hop.
    pub fn resolve(&self, synonyms: &SynonymTable, name: &str) -> Option<&CommandSpec> {
        self.get(&synonyms.canonical(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Canonical names in alphabetical order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

// ---------------------------------------------------------------------------
// SynonymTable
// ---------------------------------------------------------------------------

/// Alias → canonical name. Targets may be registry commands or extension
/// commands, but never another alias.
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    aliases: HashMap<String, String>,
}

impl SynonymTable {
    pub fn new() -> Self {
        SynonymTable {
            aliases: HashMap::new(),
        }
    }

    /// Add an alias. Rejects redefinitions and anything that would form
    /// a chain.
    pub fn insert(&mut self, alias: &str, target: &str) -> Result<(), CommandError> {
        let alias = alias.trim().to_ascii_uppercase();
        let target = target.trim().to_ascii_uppercase();
        if let Some(existing) = self.aliases.get(&alias) {
            return Err(CommandError::DuplicateAlias {
                alias,
                target: existing.clone(),
            });
        }
        if self.aliases.contains_key(&target) || alias == target {
            return Err(CommandError::AliasChain { alias, target });
        }
        if self.aliases.values().any(|t| *t == alias) {
            return Err(CommandError::AliasChain { alias: alias.clone(), target: alias });
        }
        self.aliases.insert(alias, target);
        Ok(())
    }

    /// The canonical name for `name`, upper-cased. Names that are not
    /// aliases map to themselves.
    pub fn canonical(&self, name: &str) -> String {
        let upper = name.to_ascii_uppercase();
        match self.aliases.get(&upper) {
            Some(target) => target.clone(),
            None => upper,
        }
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}
