//! Interpreter settings, loaded from YAML.
//!
//! Every field has a default, so a settings file only lists what it
//! overrides:
//!
//! ```yaml
//! scenario_path: /srv/sim/scenario
//! start_commands:
//!   - ECHO Training session 3
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StackSettings {
    /// Directory searched for scenario names given without a path separator.
    pub scenario_path: PathBuf,
    /// Extension appended to scenario names that lack it (without the dot).
    pub scenario_extension: String,
    /// Scenario lines whose trimmed length is at most this are ignored.
    pub min_line_length: usize,
    /// Length of the command-name prefix routed to extensions.
    pub extension_prefix_len: usize,
    /// Wrap width of the HELP command list.
    pub help_line_width: usize,
    /// Lines stacked when the interpreter is built.
    pub start_commands: Vec<String>,
}

impl Default for StackSettings {
    fn default() -> Self {
        StackSettings {
            scenario_path: PathBuf::from("scenario"),
            scenario_extension: "scn".into(),
            min_line_length: 12,
            extension_prefix_len: 4,
            help_line_width: 40,
            start_commands: vec![
                "ECHO Simstack console: enter HELP or ? for info.".into(),
                "ECHO Or use IC to open a scenario file.".into(),
            ],
        }
    }
}

/// Load settings from a YAML file.
pub fn load(path: &Path) -> Result<StackSettings, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content)
}

/// Parse settings from a YAML string. An empty document yields the defaults.
pub fn parse(content: &str) -> Result<StackSettings, ConfigError> {
    if content.trim().is_empty() {
        return Ok(StackSettings::default());
    }
    Ok(serde_yaml::from_str(content)?)
}

/// Save settings to a YAML file.
pub fn save(path: &Path, settings: &StackSettings) -> Result<(), ConfigError> {
    let content = serde_yaml::to_string(settings)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "simstack_settings_{}_{}",
            suffix,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn defaults() {
        let s = StackSettings::default();
        assert_eq!(s.scenario_path, PathBuf::from("scenario"));
        assert_eq!(s.scenario_extension, "scn");
        assert_eq!(s.min_line_length, 12);
        assert_eq!(s.extension_prefix_len, 4);
        assert_eq!(s.start_commands.len(), 2);
    }

    #[test]
    fn partial_document_keeps_defaults() {
        let s = parse("scenario_path: /data/scn\nmin_line_length: 8\n").unwrap();
        assert_eq!(s.scenario_path, PathBuf::from("/data/scn"));
        assert_eq!(s.min_line_length, 8);
        assert_eq!(s.scenario_extension, "scn");
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(parse("").unwrap(), StackSettings::default());
    }

    #[test]
    fn start_commands_list() {
        let s = parse("start_commands:\n  - ECHO hi\n  - OP\n").unwrap();
        assert_eq!(s.start_commands, vec!["ECHO hi", "OP"]);
    }

    #[test]
    fn malformed_yaml_rejected() {
        let err = parse("min_line_length: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn save_load_round_trip() {
        let dir = test_dir("roundtrip");
        let path = dir.join("stack.yaml");
        let mut s = StackSettings::default();
        s.help_line_width = 60;
        s.start_commands = vec!["OP".into()];
        save(&path, &s).unwrap();
        assert_eq!(load(&path).unwrap(), s);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_missing_file() {
        let err = load(Path::new("/nonexistent/simstack.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
