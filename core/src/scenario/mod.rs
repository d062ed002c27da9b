//! Scenario scheduler — time-tagged command files replayed against
//! simulated time.
//!
//! A fresh load replaces the timeline; a nested load (`PCALL`) merges into
//! it. Each [`ScenarioScheduler::tick`] releases every entry that has come
//! due into the pending queue, in trigger order.

pub mod export;
pub mod parse;
pub mod timeline;

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::ScenarioError;
use crate::queue::PendingQueue;
use crate::settings::StackSettings;

pub use self::parse::LineDiagnostic;
pub use self::timeline::{ScheduledCommand, Timeline};

/// What a load did.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct LoadReport {
    /// Resolved file, or `None` for in-memory loads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub loaded: usize,
    /// Comment and short lines.
    pub ignored: usize,
    pub diagnostics: Vec<LineDiagnostic>,
    pub merged: bool,
}

/// Resolve a scenario name to a file path.
///
/// The extension is appended unless the name already ends with it (any
/// case). A name without a path separator is lower-cased and looked up in
/// `dir`.
pub fn scenario_file_path(dir: &Path, extension: &str, name: &str) -> PathBuf {
    let name = name.trim();
    let suffix = format!(".{}", extension.to_ascii_lowercase());
    let mut file = name.to_string();
    if !file.to_ascii_lowercase().ends_with(&suffix) {
        file.push_str(&suffix);
    }
    if file.contains('/') || file.contains('\\') {
        PathBuf::from(file)
    } else {
        dir.join(file.to_lowercase())
    }
}

#[derive(Debug, Clone)]
pub struct ScenarioScheduler {
    timeline: Timeline,
    directory: PathBuf,
    extension: String,
    min_line_length: usize,
}

impl ScenarioScheduler {
    pub fn new(settings: &StackSettings) -> Self {
        ScenarioScheduler {
            timeline: Timeline::new(),
            directory: settings.scenario_path.clone(),
            extension: settings.scenario_extension.clone(),
            min_line_length: settings.min_line_length,
        }
    }

    pub fn resolve_path(&self, name: &str) -> PathBuf {
        scenario_file_path(&self.directory, &self.extension, name)
    }

    /// Load a scenario file. With `merge` the entries join the current
    /// timeline; otherwise they replace it. A missing file leaves the
    /// timeline untouched.
    pub fn load(&mut self, name: &str, time_offset: f64, merge: bool) -> Result<LoadReport, ScenarioError> {
        let path = self.resolve_path(name);
        info!(path = %path.display(), merge, time_offset, "reading scenario file");
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot open scenario file");
                return Err(ScenarioError::from_io(path, e));
            }
        };
        let mut report = self.load_str(&content, time_offset, merge);
        report.path = Some(path);
        Ok(report)
    }

    /// Load scenario text directly.
    pub fn load_str(&mut self, content: &str, time_offset: f64, merge: bool) -> LoadReport {
        let parsed = parse::parse_scenario(content, time_offset, self.min_line_length);
        for d in &parsed.diagnostics {
            warn!(line = d.line_number, reason = %d.reason, "skipping scenario line");
        }
        let loaded = parsed.commands.len();
        if merge {
            self.timeline.merge(parsed.commands);
        } else {
            self.timeline.replace(parsed.commands);
        }
        debug!(loaded, pending = self.timeline.len(), "scenario timeline updated");
        LoadReport {
            path: None,
            loaded,
            ignored: parsed.ignored,
            diagnostics: parsed.diagnostics,
            merged: merge,
        }
    }

    /// Move every entry due at `now` onto `queue`. Returns how many were
    /// released.
    pub fn tick(&mut self, now: f64, queue: &mut PendingQueue) -> usize {
        let mut released = 0;
        while let Some(entry) = self.timeline.pop_due(now) {
            queue.stack(&entry.text);
            released += 1;
        }
        released
    }

    pub fn reset(&mut self) {
        self.timeline.clear();
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }
}
