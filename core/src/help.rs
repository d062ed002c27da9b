//! Help system — usage text for registered commands.
//!
//! Two levels of detail:
//!
//! 1. **Overview** (`HELP`) — hint lines plus every canonical name, wrapped
//! 2. **Command help** (`HELP ALT`) — the usage line of one command, with
//!    synonyms resolved first

use crate::registry::{CommandRegistry, SynonymTable};

/// Generate help text for a given topic.
///
/// - `None` → overview of all commands, wrapped at `width` characters
/// - `Some("alt")` → usage of ALT
/// - `Some("turn")` → usage of HDG, through the synonym table
pub fn help_text(
    registry: &CommandRegistry,
    synonyms: &SynonymTable,
    topic: Option<&str>,
    width: usize,
) -> String {
    match topic.map(str::trim).filter(|t| !t.is_empty()) {
        None => overview(registry, width),
        Some(t) => match registry.resolve(synonyms, t) {
            Some(spec) => spec.usage.clone(),
            None => format!("HELP: Unknown command: {}", t.to_ascii_uppercase()),
        },
    }
}

fn overview(registry: &CommandRegistry, width: usize) -> String {
    let mut text = String::from(
        "To get help on a command, enter it without arguments.\n\
         Some basic commands are given below:\n\n",
    );
    let mut row = String::new();
    for name in registry.names() {
        row.push_str(name);
        row.push(' ');
        if row.len() >= width {
            text.push_str(row.trim_end());
            text.push('\n');
            row.clear();
        }
    }
    if !row.is_empty() {
        text.push_str(row.trim_end());
        text.push('\n');
    }
    text.push_str("\nEnter HELP <command> for its usage.");
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CommandResult, CommandSpec};

    fn registry(names: &[&str]) -> CommandRegistry {
        let mut reg = CommandRegistry::new();
        for n in names {
            let usage = format!("{n} usage");
            reg.register(CommandSpec::new(n, &usage, "", |_, _| CommandResult::ok()).unwrap())
                .unwrap();
        }
        reg
    }

    #[test]
    fn overview_lists_all_names() {
        let reg = registry(&["OP", "HOLD", "ALT"]);
        let text = help_text(&reg, &SynonymTable::new(), None, 40);
        assert!(text.starts_with("To get help on a command"));
        assert!(text.contains("ALT HOLD OP"));
    }

    #[test]
    fn overview_wraps_at_width() {
        let reg = registry(&["AAAA", "BBBB", "CCCC", "DDDD", "EEEE"]);
        let text = help_text(&reg, &SynonymTable::new(), None, 10);
        assert!(text.contains("AAAA BBBB\nCCCC DDDD\nEEEE\n"));
    }

    #[test]
    fn topic_usage_through_synonym() {
        let reg = registry(&["HDG"]);
        let mut syn = SynonymTable::new();
        syn.insert("TURN", "HDG").unwrap();
        assert_eq!(help_text(&reg, &syn, Some("hdg"), 40), "HDG usage");
        assert_eq!(help_text(&reg, &syn, Some("turn"), 40), "HDG usage");
    }

    #[test]
    fn unknown_topic_is_a_message() {
        let reg = registry(&["HDG"]);
        assert_eq!(
            help_text(&reg, &SynonymTable::new(), Some("nope"), 40),
            "HELP: Unknown command: NOPE"
        );
    }
}
